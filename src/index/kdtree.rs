use crate::error::{Error, Result};
use crate::point::{squared_distance, PointCloud};
use log::trace;
use ndarray::NdFloat;
use std::cmp::Ordering;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KdTreeParams {
    /// Slices at or below this many points become leaves.
    pub leaf_size: usize,
    /// Order query results by ascending squared distance, ties by index.
    pub sort_results: bool,
}

impl Default for KdTreeParams {
    fn default() -> Self {
        Self {
            leaf_size: 10,
            sort_results: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Neighbour<T> {
    pub index: usize,
    pub squared_distance: T,
}

#[derive(Clone, Copy, Debug)]
enum Node<T> {
    Leaf {
        start: usize,
        end: usize,
    },
    Split {
        axis: usize,
        value: T,
        left: usize,
        right: usize,
    },
}

/// Static kd-tree over a borrowed [`PointCloud`].
///
/// Nodes live in an arena and refer to their children by position. Leaves
/// own a contiguous range of `indices`, a permutation of `0..cloud.len()`.
#[derive(Clone, Debug)]
pub struct KdTree<'a, T, const D: usize> {
    cloud: &'a PointCloud<T, D>,
    params: KdTreeParams,
    nodes: Vec<Node<T>>,
    indices: Vec<usize>,
    root: Option<usize>,
}

impl<'a, T: NdFloat, const D: usize> KdTree<'a, T, D> {
    pub fn build(cloud: &'a PointCloud<T, D>, params: KdTreeParams) -> Result<Self> {
        if params.leaf_size == 0 {
            return Err(Error::config("leaf_size must be > 0"));
        }

        let mut tree = Self {
            cloud,
            params,
            nodes: Vec::new(),
            indices: (0..cloud.len()).collect(),
            root: None,
        };

        // Fewer than two points gives an index that answers every query empty.
        if cloud.len() < 2 {
            trace!("kd-tree over {} points left empty", cloud.len());
            return Ok(tree);
        }

        tree.nodes.reserve(2 * (cloud.len() / params.leaf_size + 1));
        let root = tree.build_node(0, cloud.len());
        tree.root = Some(root);

        trace!(
            "built kd-tree over {} points: {} nodes, depth {}",
            cloud.len(),
            tree.nodes.len(),
            tree.depth()
        );

        Ok(tree)
    }

    fn build_node(&mut self, start: usize, end: usize) -> usize {
        let count = end - start;
        if count <= self.params.leaf_size {
            return self.push(Node::Leaf { start, end });
        }

        let cloud = self.cloud;
        let points = cloud.points();
        let axis = self.widest_axis(start, end);

        // Introselect: everything left of `mid` is <= the pivot, everything
        // from `mid` on is >= it.
        let mid = count / 2;
        self.indices[start..end].select_nth_unstable_by(mid, |&a, &b| {
            points[a][axis]
                .partial_cmp(&points[b][axis])
                .unwrap_or(Ordering::Equal)
        });
        let value = points[self.indices[start + mid]][axis];

        let left = self.build_node(start, start + mid);
        let right = self.build_node(start + mid, end);

        self.push(Node::Split {
            axis,
            value,
            left,
            right,
        })
    }

    /// Axis with the greatest coordinate spread over the slice, lowest axis on ties.
    fn widest_axis(&self, start: usize, end: usize) -> usize {
        let points = self.cloud.points();
        let first = points[self.indices[start]];
        let mut min = first;
        let mut max = first;

        for &index in &self.indices[start + 1..end] {
            for (axis, &c) in points[index].iter().enumerate() {
                if c < min[axis] {
                    min[axis] = c;
                }
                if c > max[axis] {
                    max[axis] = c;
                }
            }
        }

        let mut best = 0;
        for axis in 1..D {
            if max[axis] - min[axis] > max[best] - min[best] {
                best = axis;
            }
        }
        best
    }

    fn push(&mut self, node: Node<T>) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// All stored points within `squared_radius` of `query`, the query point
    /// itself included when it is stored.
    pub fn radius_search(&self, query: &[T; D], squared_radius: T) -> Vec<Neighbour<T>> {
        let mut neighbours = Vec::new();
        self.radius_search_into(query, squared_radius, &mut neighbours);
        neighbours
    }

    /// Same as [`radius_search`](Self::radius_search), writing into a
    /// caller-owned buffer that is cleared first.
    pub fn radius_search_into(
        &self,
        query: &[T; D],
        squared_radius: T,
        neighbours: &mut Vec<Neighbour<T>>,
    ) {
        neighbours.clear();

        if let Some(root) = self.root {
            self.search_node(root, query, squared_radius, neighbours);
        }

        if self.params.sort_results {
            neighbours.sort_by(|a, b| {
                a.squared_distance
                    .partial_cmp(&b.squared_distance)
                    .unwrap_or(Ordering::Equal)
                    .then(a.index.cmp(&b.index))
            });
        }
    }

    /// Radius search centred on a stored point.
    pub fn radius_search_index(&self, index: usize, squared_radius: T) -> Result<Vec<Neighbour<T>>> {
        let query = self.cloud.point(index)?;
        Ok(self.radius_search(query, squared_radius))
    }

    fn search_node(
        &self,
        node: usize,
        query: &[T; D],
        squared_radius: T,
        neighbours: &mut Vec<Neighbour<T>>,
    ) {
        match self.nodes[node] {
            Node::Leaf { start, end } => {
                let points = self.cloud.points();
                for &index in &self.indices[start..end] {
                    let d = squared_distance(query, &points[index]);
                    if d <= squared_radius {
                        neighbours.push(Neighbour {
                            index,
                            squared_distance: d,
                        });
                    }
                }
            }
            Node::Split {
                axis,
                value,
                left,
                right,
            } => {
                let diff = query[axis] - value;
                let (near, far) = if diff < T::zero() {
                    (left, right)
                } else {
                    (right, left)
                };

                self.search_node(near, query, squared_radius, neighbours);

                // The far side can still hold neighbours while the splitting
                // plane is inside the radius.
                if diff * diff <= squared_radius {
                    self.search_node(far, query, squared_radius, neighbours);
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.cloud.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cloud.is_empty()
    }

    pub fn cloud(&self) -> &'a PointCloud<T, D> {
        self.cloud
    }

    pub fn leaf_size(&self) -> usize {
        self.params.leaf_size
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of levels from the root to the deepest leaf; 0 for an empty tree.
    pub fn depth(&self) -> usize {
        match self.root {
            Some(root) => self.node_depth(root),
            None => 0,
        }
    }

    fn node_depth(&self, node: usize) -> usize {
        match self.nodes[node] {
            Node::Leaf { .. } => 1,
            Node::Split { left, right, .. } => 1 + self.node_depth(left).max(self.node_depth(right)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::uniform;

    fn random_cloud<const D: usize>(n: usize, seed: u64) -> PointCloud<f64, D> {
        uniform::<D>(n, -10.0, 10.0, seed).unwrap()
    }

    fn brute_force<const D: usize>(
        cloud: &PointCloud<f64, D>,
        query: &[f64; D],
        squared_radius: f64,
    ) -> Vec<usize> {
        cloud
            .iter()
            .enumerate()
            .filter(|(_, p)| squared_distance(query, p) <= squared_radius)
            .map(|(i, _)| i)
            .collect()
    }

    fn sorted_indices(neighbours: &[Neighbour<f64>]) -> Vec<usize> {
        let mut indices: Vec<usize> = neighbours.iter().map(|n| n.index).collect();
        indices.sort_unstable();
        indices
    }

    fn check_against_brute_force<const D: usize>(n: usize, leaf_size: usize, seed: u64) {
        let cloud = random_cloud::<D>(n, seed);
        let params = KdTreeParams {
            leaf_size,
            ..Default::default()
        };
        let tree = KdTree::build(&cloud, params).unwrap();

        for &radius in &[0.5, 2.0, 5.0, 30.0] {
            let squared_radius = radius * radius;
            for (i, query) in cloud.iter().enumerate() {
                let found = tree.radius_search(query, squared_radius);
                let expected = brute_force(&cloud, query, squared_radius);

                assert_eq!(sorted_indices(&found), expected, "point {} radius {}", i, radius);
                assert!(found.iter().any(|nb| nb.index == i));
            }
        }
    }

    #[test]
    fn test_radius_search_matches_brute_force_2d() {
        for (seed, &n) in [2usize, 7, 64, 300].iter().enumerate() {
            for &leaf_size in &[1, 3, 10] {
                check_against_brute_force::<2>(n, leaf_size, seed as u64);
            }
        }
    }

    #[test]
    fn test_radius_search_matches_brute_force_3d() {
        for (seed, &n) in [2usize, 11, 128, 250].iter().enumerate() {
            for &leaf_size in &[1, 4, 10] {
                check_against_brute_force::<3>(n, leaf_size, 100 + seed as u64);
            }
        }
    }

    #[test]
    fn test_query_off_the_stored_points() {
        let cloud = random_cloud::<2>(200, 7);
        let tree = KdTree::build(&cloud, KdTreeParams::default()).unwrap();

        for query in [[0.0, 0.0], [9.5, -9.5], [-20.0, 3.0]] {
            let found = tree.radius_search(&query, 9.0);
            assert_eq!(sorted_indices(&found), brute_force(&cloud, &query, 9.0));
        }
    }

    #[test]
    fn test_reported_distances() {
        let cloud = PointCloud::from_points(vec![[0.0, 0.0], [3.0, 4.0], [6.0, 8.0]]).unwrap();
        let tree = KdTree::build(&cloud, KdTreeParams::default()).unwrap();

        let mut found = tree.radius_search(&[0.0, 0.0], 25.0);
        found.sort_by_key(|nb| nb.index);
        assert_eq!(
            found,
            vec![
                Neighbour { index: 0, squared_distance: 0.0 },
                Neighbour { index: 1, squared_distance: 25.0 },
            ]
        );
    }

    #[test]
    fn test_sorted_results() {
        let cloud = PointCloud::from_points(vec![
            [5.0, 0.0],
            [1.0, 0.0],
            [3.0, 0.0],
            [0.0, 0.0],
            [-1.0, 0.0],
            [2.0, 0.0],
        ])
        .unwrap();
        let params = KdTreeParams {
            leaf_size: 1,
            sort_results: true,
        };
        let tree = KdTree::build(&cloud, params).unwrap();

        let found: Vec<usize> = tree
            .radius_search_index(3, 9.0)
            .unwrap()
            .iter()
            .map(|nb| nb.index)
            .collect();
        assert_eq!(found, vec![3, 1, 4, 5, 2]);
    }

    #[test]
    fn test_duplicate_points() {
        let cloud = PointCloud::from_points(vec![[1.0, 1.0, 1.0]; 50]).unwrap();
        let tree = KdTree::build(&cloud, KdTreeParams::default()).unwrap();

        assert_eq!(tree.radius_search_index(0, 0.0).unwrap().len(), 50);
    }

    #[test]
    fn test_collinear_points() {
        let points = (0..100).map(|i| [0.0, i as f64]).collect();
        let cloud = PointCloud::from_points(points).unwrap();
        let params = KdTreeParams {
            leaf_size: 2,
            ..Default::default()
        };
        let tree = KdTree::build(&cloud, params).unwrap();

        let found = tree.radius_search_index(50, 1.0).unwrap();
        assert_eq!(sorted_indices(&found), vec![49, 50, 51]);
    }

    #[test]
    fn test_tree_is_balanced() {
        let cloud = random_cloud::<2>(1024, 3);
        let params = KdTreeParams {
            leaf_size: 1,
            ..Default::default()
        };
        let tree = KdTree::build(&cloud, params).unwrap();

        assert_eq!(tree.len(), 1024);
        assert_eq!(tree.node_count(), 2 * 1024 - 1);
        assert_eq!(tree.depth(), 11);
    }

    #[test]
    fn test_degenerate_trees() {
        let empty = PointCloud::<f64, 2>::from_points(Vec::new()).unwrap();
        let tree = KdTree::build(&empty, KdTreeParams::default()).unwrap();
        assert!(tree.is_empty());
        assert_eq!(tree.depth(), 0);
        assert!(tree.radius_search(&[0.0, 0.0], 100.0).is_empty());

        let single = PointCloud::from_points(vec![[1.0, 2.0]]).unwrap();
        let tree = KdTree::build(&single, KdTreeParams::default()).unwrap();
        assert_eq!(tree.node_count(), 0);
        assert!(tree.radius_search_index(0, 100.0).unwrap().is_empty());
    }

    #[test]
    fn test_index_out_of_range() {
        let cloud = random_cloud::<3>(20, 9);
        let tree = KdTree::build(&cloud, KdTreeParams::default()).unwrap();

        assert_eq!(
            tree.radius_search_index(20, 1.0).unwrap_err(),
            Error::IndexOutOfRange { index: 20, len: 20 }
        );
    }

    #[test]
    fn test_zero_leaf_size_rejected() {
        let cloud = random_cloud::<2>(5, 1);
        let params = KdTreeParams {
            leaf_size: 0,
            ..Default::default()
        };
        assert!(matches!(
            KdTree::build(&cloud, params).unwrap_err(),
            Error::InvalidConfiguration(_)
        ));
    }

    #[test]
    fn test_buffer_is_reused() {
        let cloud = random_cloud::<2>(40, 5);
        let tree = KdTree::build(&cloud, KdTreeParams::default()).unwrap();

        let mut buffer = vec![Neighbour { index: 99, squared_distance: -1.0 }];
        tree.radius_search_into(cloud.point(0).unwrap(), 4.0, &mut buffer);
        assert_eq!(sorted_indices(&buffer), brute_force(&cloud, cloud.point(0).unwrap(), 4.0));
    }
}
