//! Spatial indexing for fixed-radius neighbour queries.
//!
//! `KdTree` is built once over a [`PointCloud`](crate::PointCloud) and never
//! mutated afterwards. Each internal node splits its slice of points at the
//! median of the axis with the widest spread, so the tree stays balanced
//! whatever the input order.
//!
//! # Examples
//!
//! ```rust
//! use kdscan::{KdTree, KdTreeParams, PointCloud};
//!
//! let cloud = PointCloud::from_points(vec![
//!     [0.0, 0.0, 0.0],
//!     [0.5, 0.0, 0.0],
//!     [4.0, 4.0, 4.0],
//! ]).unwrap();
//!
//! let tree = KdTree::build(&cloud, KdTreeParams::default()).unwrap();
//! let neighbours = tree.radius_search_index(0, 1.0).unwrap();
//!
//! let mut indices: Vec<usize> = neighbours.iter().map(|n| n.index).collect();
//! indices.sort();
//! assert_eq!(indices, vec![0, 1]);
//! ```

mod kdtree;

pub use kdtree::{KdTree, KdTreeParams, Neighbour};
