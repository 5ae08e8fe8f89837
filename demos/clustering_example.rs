use kdscan::dataset::{make_blobs, make_line};
use kdscan::{ClusterIndices, Expansion, KdTree, KdTreeParams, PointCloud, DBSCAN};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("=== DBSCAN over a kd-tree ===\n");

    // Three natural clusters plus a few stragglers
    let blobs = make_blobs(&[[2.0, 2.0], [8.0, 8.0], [2.0, 8.0]], 40, 0.6, 42)?;
    let mut points = blobs.points().to_vec();
    points.extend([[5.0, 5.0], [0.0, 0.0], [10.0, 0.0]]);
    let cloud = PointCloud::from_points(points)?;

    println!("Dataset: {} points in {} dimensions\n", cloud.len(), cloud.dim());

    let tree = KdTree::build(&cloud, KdTreeParams::default())?;
    println!(
        "kd-tree: {} nodes, depth {}, leaf size {}",
        tree.node_count(),
        tree.depth(),
        tree.leaf_size()
    );
    let nearby = tree.radius_search(&[2.0, 2.0], 0.25);
    println!("Points within 0.5 of (2, 2): {}\n", nearby.len());

    let configs = [
        (0.3, 3, "Tight clusters"),
        (0.5, 4, "Medium density"),
        (1.0, 4, "Loose clusters"),
        (0.5, 8, "Higher min points"),
    ];

    for &(eps, min_points, description) in &configs {
        let mut dbscan = DBSCAN::new(eps, min_points)?;
        dbscan.fit(&cloud)?;
        println!(
            "DBSCAN(eps={}, min_points={}): {} - {} clusters, {} noise points",
            eps,
            min_points,
            description,
            dbscan.get_n_clusters().unwrap_or(0),
            dbscan.get_n_noise_points().unwrap_or(0)
        );
    }

    println!("\n=== Chained points ===");
    let chain = make_line(12, 1.0)?;
    for expansion in [Expansion::Canonical, Expansion::OneLevel] {
        let mut dbscan = DBSCAN::new(1.0, 3)?.expansion(expansion);
        dbscan.fit(&chain)?;
        if let Some(groups) = dbscan.cluster_indices() {
            println!("{:?}:", expansion);
            print_cluster_summary(groups);
        }
    }

    Ok(())
}

fn print_cluster_summary(groups: &ClusterIndices) {
    for (label, indices) in groups.iter() {
        println!("  {}: {:?}", label, indices);
    }
}
