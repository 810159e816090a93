//! Image filters.

pub mod resample;

pub use resample::{resample, ResampleImageFilter};
