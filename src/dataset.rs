//! Synthetic point sets for demos and tests.

use crate::error::{Error, Result};
use crate::point::PointCloud;
use crate::Coords;
use ndarray::Axis;
use ndarray_rand::RandomExt;
use rand::distributions::Uniform;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// `per_center` points jittered uniformly within `spread` of each centre,
/// grouped by centre in input order.
pub fn make_blobs<const D: usize>(
    centers: &[[f64; D]],
    per_center: usize,
    spread: f64,
    seed: u64,
) -> Result<PointCloud<f64, D>> {
    if !(spread > 0.0 && (2.0 * spread).is_finite()) {
        return Err(Error::config(format!("spread must be finite and > 0, got {}", spread)));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut x = Coords::random_using(
        (centers.len() * per_center, D),
        Uniform::new(-spread, spread),
        &mut rng,
    );

    for (i, mut row) in x.axis_iter_mut(Axis(0)).enumerate() {
        let center = &centers[i / per_center];
        for (c, offset) in row.iter_mut().zip(center.iter()) {
            *c += offset;
        }
    }

    PointCloud::from_matrix(&x)
}

/// `n` collinear points along the x axis, `step` apart.
pub fn make_line(n: usize, step: f64) -> Result<PointCloud<f64, 2>> {
    PointCloud::from_points((0..n).map(|i| [i as f64 * step, 0.0]).collect())
}

/// `n` points drawn uniformly from the box `[low, high)^D`.
pub fn uniform<const D: usize>(n: usize, low: f64, high: f64, seed: u64) -> Result<PointCloud<f64, D>> {
    if !(low < high && (high - low).is_finite()) {
        return Err(Error::config(format!("invalid range [{}, {})", low, high)));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let x = Coords::random_using((n, D), Uniform::new(low, high), &mut rng);
    PointCloud::from_matrix(&x)
}
