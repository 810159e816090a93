//! Error types for geometry, image and resampling operations.

use thiserror::Error;

/// Main error type for voxwarp-core operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// An argument is outside its valid domain (zero axis, non-positive scale).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A matrix inversion was requested on a non-invertible map.
    #[error("Singular transform: {0}")]
    Singular(String),

    /// Image geometry is not usable (spacing, direction).
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Sample buffer length does not match the grid size.
    #[error("Shape mismatch: expected {expected} samples, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// A resample run was stopped by its progress callback.
    #[error("Resampling cancelled after {completed} of {total} slices")]
    Cancelled { completed: usize, total: usize },
}

/// Result type for voxwarp-core operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an invalid argument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a singular transform error.
    pub fn singular(msg: impl Into<String>) -> Self {
        Self::Singular(msg.into())
    }

    /// Create an invalid geometry error.
    pub fn invalid_geometry(msg: impl Into<String>) -> Self {
        Self::InvalidGeometry(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = Error::invalid_argument("zero axis");
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            Error::singular("det = 0").to_string(),
            "Singular transform: det = 0"
        );
        assert_eq!(
            Error::ShapeMismatch { expected: 8, actual: 7 }.to_string(),
            "Shape mismatch: expected 8 samples, got 7"
        );
        assert_eq!(
            Error::Cancelled { completed: 2, total: 5 }.to_string(),
            "Resampling cancelled after 2 of 5 slices"
        );
    }
}
