//! Density-based clustering.
//!
//! `DBSCAN` labels every point as noise or as a member of a numbered cluster.
//! A point with at least `min_neighbour_points` points (itself included)
//! within `distance_threshold` is a core point; clusters grow outwards from
//! core points, and non-core points they reach become border points.
//!
//! # Examples
//!
//! ```rust
//! use kdscan::{DBSCAN, Expansion, Label, PointCloud};
//!
//! let cloud = PointCloud::from_points(vec![
//!     [1.0, 1.0],
//!     [1.2, 1.1],
//!     [1.1, 1.2],
//!     [8.0, 8.0],
//!     [8.1, 8.1],
//!     [8.2, 7.9],
//!     [15.0, 1.0], // Outlier
//! ]).unwrap();
//!
//! let mut dbscan = DBSCAN::new(1.0, 2).unwrap().expansion(Expansion::Canonical);
//! dbscan.fit(&cloud).unwrap();
//!
//! let groups = dbscan.cluster_indices.as_ref().unwrap();
//! assert_eq!(groups.n_clusters(), 2);
//! assert_eq!(groups.get(Label::Cluster(1)), Some(&[0, 1, 2][..]));
//! assert_eq!(groups.noise(), &[6]);
//! ```

mod dbscan;
mod labels;

pub use dbscan::{Expansion, DBSCAN};
pub use labels::{ClusterIndices, Label};
