//! Density-based clustering (DBSCAN) over 2-D and 3-D point sets, backed by
//! a kd-tree that answers fixed-radius neighbour queries.
//!
//! ```rust
//! use kdscan::{DBSCAN, Label, PointCloud};
//!
//! let cloud = PointCloud::from_points(vec![
//!     [1.0, 1.0], [1.2, 1.1], [1.1, 1.2],
//!     [8.0, 8.0], [8.1, 8.1], [8.2, 7.9],
//!     [15.0, 1.0],
//! ]).unwrap();
//!
//! let mut dbscan = DBSCAN::new(1.0, 2).unwrap();
//! dbscan.fit(&cloud).unwrap();
//!
//! assert_eq!(dbscan.get_n_clusters(), Some(2));
//! assert_eq!(dbscan.labels.as_ref().unwrap()[6], Label::Noise);
//! ```

pub use ndarray::{Array2, NdFloat};

pub mod cluster;
pub mod dataset;
pub mod error;
pub mod index;
pub mod point;

pub use cluster::{ClusterIndices, Expansion, Label, DBSCAN};
pub use error::{Error, Result};
pub use index::{KdTree, KdTreeParams, Neighbour};
pub use point::{squared_distance, PointCloud};

/// Row-major coordinate matrix, one point per row.
pub type Coords<T> = Array2<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_types_work() {
        let coords: Coords<f64> = Coords::zeros((3, 2));
        let cloud = PointCloud::<f64, 2>::from_matrix(&coords).unwrap();
        assert_eq!(cloud.len(), 3);
        assert_eq!(cloud.as_matrix().shape(), &[3, 2]);
    }
}
