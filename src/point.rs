use crate::error::{Error, Result};
use crate::Coords;
use ndarray::NdFloat;

/// Immutable, ordered set of `D`-dimensional points. A point is identified by
/// its zero-based position in the cloud.
#[derive(Clone, Debug, PartialEq)]
pub struct PointCloud<T, const D: usize> {
    points: Vec<[T; D]>,
}

impl<T: NdFloat, const D: usize> PointCloud<T, D> {
    pub fn from_points(points: Vec<[T; D]>) -> Result<Self> {
        check_dimension(D)?;

        for (index, point) in points.iter().enumerate() {
            if let Some(axis) = point.iter().position(|c| !c.is_finite()) {
                return Err(Error::NonFiniteCoordinate { index, axis });
            }
        }

        Ok(Self { points })
    }

    /// Builds a cloud from a matrix with one point per row.
    pub fn from_matrix(x: &Coords<T>) -> Result<Self> {
        check_dimension(D)?;

        if x.ncols() != D {
            return Err(Error::DimensionMismatch {
                expected: D,
                found: x.ncols(),
            });
        }

        let points = x
            .rows()
            .into_iter()
            .map(|row| {
                let mut point = [T::zero(); D];
                for (slot, &c) in point.iter_mut().zip(row.iter()) {
                    *slot = c;
                }
                point
            })
            .collect();

        Self::from_points(points)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn dim(&self) -> usize {
        D
    }

    pub fn point(&self, index: usize) -> Result<&[T; D]> {
        self.points.get(index).ok_or(Error::IndexOutOfRange {
            index,
            len: self.points.len(),
        })
    }

    pub fn points(&self) -> &[[T; D]] {
        &self.points
    }

    pub fn iter(&self) -> impl Iterator<Item = &[T; D]> {
        self.points.iter()
    }

    pub fn as_matrix(&self) -> Coords<T> {
        let mut x = Coords::zeros((self.points.len(), D));
        for (mut row, point) in x.rows_mut().into_iter().zip(&self.points) {
            for (slot, &c) in row.iter_mut().zip(point.iter()) {
                *slot = c;
            }
        }
        x
    }
}

/// Squared Euclidean distance between two points.
#[inline]
pub fn squared_distance<T: NdFloat, const D: usize>(a: &[T; D], b: &[T; D]) -> T {
    a.iter()
        .zip(b.iter())
        .fold(T::zero(), |acc, (&x, &y)| acc + (x - y) * (x - y))
}

fn check_dimension(d: usize) -> Result<()> {
    if d == 2 || d == 3 {
        Ok(())
    } else {
        Err(Error::config(format!(
            "only 2 or 3 dimensional points are supported, got {}",
            d
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_from_matrix() {
        let x = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let cloud = PointCloud::<f64, 3>::from_matrix(&x).unwrap();

        assert_eq!(cloud.len(), 2);
        assert_eq!(cloud.dim(), 3);
        assert_eq!(cloud.point(1).unwrap(), &[4.0, 5.0, 6.0]);
        assert_eq!(cloud.as_matrix(), x);
    }

    #[test]
    fn test_column_count_must_match() {
        let x = array![[1.0, 2.0], [3.0, 4.0]];
        let err = PointCloud::<f64, 3>::from_matrix(&x).unwrap_err();
        assert_eq!(err, Error::DimensionMismatch { expected: 3, found: 2 });
    }

    #[test]
    fn test_unsupported_dimension() {
        let err = PointCloud::<f32, 4>::from_points(vec![[0.0; 4]]).unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration(_)));

        let err = PointCloud::<f32, 1>::from_points(Vec::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration(_)));
    }

    #[test]
    fn test_non_finite_rejected() {
        let err = PointCloud::from_points(vec![[0.0, 0.0], [1.0, f64::NAN]]).unwrap_err();
        assert_eq!(err, Error::NonFiniteCoordinate { index: 1, axis: 1 });
    }

    #[test]
    fn test_out_of_range_point() {
        let cloud = PointCloud::from_points(vec![[0.0f32, 0.0]]).unwrap();
        assert_eq!(
            cloud.point(3).unwrap_err(),
            Error::IndexOutOfRange { index: 3, len: 1 }
        );
    }

    #[test]
    fn test_squared_distance() {
        assert_eq!(squared_distance(&[0.0, 0.0], &[3.0, 4.0]), 25.0);
        assert_eq!(squared_distance(&[1.0f32, 1.0, 1.0], &[1.0, 1.0, 3.0]), 4.0);
    }
}
