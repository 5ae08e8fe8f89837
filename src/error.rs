use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("Configuration error: {0}")]
    InvalidConfiguration(String),

    #[error("Point index {index} out of range for a cloud of {len} points")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Dimension mismatch: expected {expected} coordinates per point, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("Point {index} has a non-finite coordinate on axis {axis}")]
    NonFiniteCoordinate { index: usize, axis: usize },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::InvalidConfiguration(msg.into())
    }
}
