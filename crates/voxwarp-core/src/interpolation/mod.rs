//! Interpolation types and operations.
//!
//! This module provides interpolation traits and implementations
//! for sampling values at continuous coordinates.

pub mod trait_;
pub mod linear;
pub mod nearest;

use crate::image::{Image, Pixel};
use crate::spatial::Point3;

pub use trait_::{clamp_to_grid, Interpolator, INDEX_TOLERANCE};
pub use linear::LinearInterpolator;
pub use nearest::NearestNeighborInterpolator;

/// Interpolation method selected at run time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InterpolationMode {
    /// Trilinear reconstruction.
    #[default]
    Linear,
    /// Nearest grid sample.
    Nearest,
}

impl Interpolator for InterpolationMode {
    fn interpolate<P: Pixel>(&self, image: &Image<P>, index: &Point3) -> Option<f64> {
        match self {
            Self::Linear => LinearInterpolator.interpolate(image, index),
            Self::Nearest => NearestNeighborInterpolator.interpolate(image, index),
        }
    }
}

impl std::fmt::Display for InterpolationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Linear => f.write_str("linear"),
            Self::Nearest => f.write_str("nearest"),
        }
    }
}
