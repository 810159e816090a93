//! Geometry, transforms, interpolation and resampling for 3D scalar rasters.
//!
//! The resample filter maps every output voxel through a transform into the
//! input image and interpolates there. Transforms are therefore applied in
//! the output → input direction; see [`filter::ResampleImageFilter`].

pub mod error;
pub mod spatial;
pub mod image;
pub mod transform;
pub mod interpolation;
pub mod filter;
pub mod progress;

pub use error::{Error, Result};
pub use image::{Image, ImageGrid, Pixel};
pub use spatial::{Direction, Matrix, Point, Spacing, Vector};
