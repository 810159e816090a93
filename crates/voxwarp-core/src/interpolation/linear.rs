//! Linear interpolation implementation.
//!
//! This module provides trilinear interpolation over the unit cell that
//! contains a continuous index.

use super::trait_::{clamp_to_grid, Interpolator};
use crate::image::{Image, Pixel};
use crate::spatial::Point3;

/// Linear Interpolator.
///
/// Performs trilinear interpolation with weights
/// `(1−α, α) × (1−β, β) × (1−γ, γ)`. On the upper boundary of an axis the
/// fractional part is zero and the upper neighbor is never read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinearInterpolator;

impl LinearInterpolator {
    /// Create a new linear interpolator.
    pub fn new() -> Self {
        Self
    }
}

/// Lower neighbor, upper neighbor and fractional weight along one axis.
#[inline]
fn axis_cell(u: f64, len: usize) -> (usize, usize, f64) {
    let lower = (u.floor() as usize).min(len - 1);
    let upper = (lower + 1).min(len - 1);
    let frac = if upper == lower { 0.0 } else { u - lower as f64 };
    (lower, upper, frac)
}

impl Interpolator for LinearInterpolator {
    fn interpolate<P: Pixel>(&self, image: &Image<P>, index: &Point3) -> Option<f64> {
        let size = image.size();
        let [u, v, w] = clamp_to_grid(size, index)?;

        let (x0, x1, fx) = axis_cell(u, size[0]);
        let (y0, y1, fy) = axis_cell(v, size[1]);
        let (z0, z1, fz) = axis_cell(w, size[2]);

        let sample = |i: usize, j: usize, k: usize| image.get(i, j, k).to_f64();

        // Interpolate along x
        let c00 = sample(x0, y0, z0) * (1.0 - fx) + sample(x1, y0, z0) * fx;
        let c10 = sample(x0, y1, z0) * (1.0 - fx) + sample(x1, y1, z0) * fx;
        let c01 = sample(x0, y0, z1) * (1.0 - fx) + sample(x1, y0, z1) * fx;
        let c11 = sample(x0, y1, z1) * (1.0 - fx) + sample(x1, y1, z1) * fx;

        // Interpolate along y
        let c0 = c00 * (1.0 - fy) + c10 * fy;
        let c1 = c01 * (1.0 - fy) + c11 * fy;

        // Interpolate along z
        Some(c0 * (1.0 - fz) + c1 * fz)
    }
}
