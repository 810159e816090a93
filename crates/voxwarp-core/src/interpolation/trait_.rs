//! Interpolator trait for sampling values at continuous coordinates.
//!
//! This module defines the core Interpolator trait that all interpolation
//! methods implement, plus the in-bounds rule they share.

use crate::image::{Image, Pixel};
use crate::spatial::Point3;

/// Absolute tolerance, in voxels, of the in-bounds test.
///
/// Transforms built from trigonometric terms land a few ulps away from grid
/// boundaries; indices within this distance are clamped onto the grid.
pub const INDEX_TOLERANCE: f64 = 1e-6;

/// Interpolator trait for sampling values at continuous coordinates.
///
/// Interpolators reconstruct an image value at a non-integer index. They are
/// shared by every resampling worker, hence the `Send + Sync` bound.
pub trait Interpolator: Send + Sync {
    /// Interpolate the image at a continuous index `(u, v, w)`.
    ///
    /// # Returns
    /// The reconstructed value in `f64`, or `None` when the index lies
    /// outside `[0, N − 1]` on any axis.
    fn interpolate<P: Pixel>(&self, image: &Image<P>, index: &Point3) -> Option<f64>;

    /// Interpolate and quantize into the image's pixel type.
    fn interpolate_pixel<P: Pixel>(&self, image: &Image<P>, index: &Point3) -> Option<P> {
        self.interpolate(image, index).map(P::from_f64)
    }
}

/// Clamp a continuous index onto the grid.
///
/// Returns `None` when any coordinate falls outside `[0, N − 1]` by more than
/// [`INDEX_TOLERANCE`], or when any axis is empty.
pub fn clamp_to_grid(size: [usize; 3], index: &Point3) -> Option<[f64; 3]> {
    let mut clamped = [0.0; 3];
    for axis in 0..3 {
        if size[axis] == 0 {
            return None;
        }
        let upper = (size[axis] - 1) as f64;
        let u = index[axis];
        // NaN fails both comparisons and is rejected here.
        if !(u >= -INDEX_TOLERANCE && u <= upper + INDEX_TOLERANCE) {
            return None;
        }
        clamped[axis] = u.clamp(0.0, upper);
    }
    Some(clamped)
}
