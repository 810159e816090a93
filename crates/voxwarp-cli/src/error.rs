//! Driver error type.

use std::path::PathBuf;

use thiserror::Error;

/// Failure of one pipeline stage. Every variant maps to exit status 1.
#[derive(Error, Debug)]
pub enum DriverError {
    /// The command line could not be parsed.
    #[error("{0}")]
    Argument(String),

    /// The input image could not be read.
    #[error("Failed to read input image {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    /// The transform parameters do not describe a valid affine map.
    #[error("Failed to build transform")]
    Transform(#[source] voxwarp_core::Error),

    /// The worker pool could not be created.
    #[error("Failed to start worker pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Resampling failed or was cancelled.
    #[error("Failed to resample image")]
    Resample(#[source] voxwarp_core::Error),

    /// The output image could not be written.
    #[error("Failed to write output image {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
}

/// Result type for driver operations.
pub type Result<T> = std::result::Result<T, DriverError>;
