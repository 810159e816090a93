//! Image types and operations.
//!
//! This module provides the 3D raster type, its sampling grid and the pixel
//! scalar trait.

pub mod grid;
pub mod image;
pub mod pixel;

pub use grid::ImageGrid;
pub use image::Image;
pub use pixel::Pixel;
