//! Spacing type for representing physical distances between voxels.

use super::Vector;

/// Spacing between adjacent voxels along each axis.
///
/// Type alias to [`Vector`] for semantic clarity.
pub type Spacing<const D: usize> = Vector<D>;

impl<const D: usize> Spacing<D> {
    /// Create uniform spacing (same value for all dimensions).
    pub fn uniform(value: f64) -> Self {
        Vector::repeat(value)
    }

    /// True when every component is strictly positive and finite.
    pub fn is_valid_spacing(&self) -> bool {
        self.0.iter().all(|&s| s > 0.0 && s.is_finite())
    }

    /// Check if spacing is uniform (all components equal).
    pub fn is_uniform(&self) -> bool {
        if D == 0 {
            return true;
        }
        let first = self[0];
        (1..D).all(|i| (self[i] - first).abs() < 1e-9)
    }

    /// Get the minimum spacing value.
    pub fn min_spacing(&self) -> f64 {
        self.0.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Get the maximum spacing value.
    pub fn max_spacing(&self) -> f64 {
        self.0.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }
}
