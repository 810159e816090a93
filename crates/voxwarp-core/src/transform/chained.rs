//! Chained transform implementation.
//!
//! This module provides a mechanism to chain two transforms together.
//! T(x) = T2(T1(x))

use super::trait_::Transform;
use crate::spatial::Point;

/// Chained Transform (T2 after T1).
///
/// Applies two transforms in sequence:
/// y = T2(T1(x))
#[derive(Debug, Clone)]
pub struct ChainedTransform<T1, T2> {
    pub first: T1,
    pub second: T2,
}

impl<T1, T2> ChainedTransform<T1, T2> {
    /// Create a new chained transform.
    ///
    /// # Arguments
    /// * `first` - The first transform to apply
    /// * `second` - The second transform to apply
    pub fn new(first: T1, second: T2) -> Self {
        Self { first, second }
    }
}

impl<T1, T2, const D: usize> Transform<D> for ChainedTransform<T1, T2>
where
    T1: Transform<D>,
    T2: Transform<D>,
{
    fn transform_point(&self, point: &Point<D>) -> Point<D> {
        let intermediate = self.first.transform_point(point);
        self.second.transform_point(&intermediate)
    }

    /// `(T2 ∘ T1)⁻¹ = T1⁻¹ ∘ T2⁻¹`, available when both parts invert.
    fn inverse(&self) -> Option<Box<dyn Transform<D>>> {
        let first = self.second.inverse()?;
        let second = self.first.inverse()?;
        Some(Box::new(ChainedTransform::new(first, second)))
    }
}
