//! Transform trait for spatial coordinate transformations.

use crate::spatial::Point;

/// Maps points from one physical space to another.
///
/// Transforms handed to the resample filter are evaluated concurrently by
/// the worker pool, hence the `Send + Sync` bound.
///
/// # Type Parameters
/// * `D` - The spatial dimensionality
pub trait Transform<const D: usize>: Send + Sync {
    /// Apply the transform to a single point.
    fn transform_point(&self, point: &Point<D>) -> Point<D>;

    /// Get the inverse transform (if available).
    ///
    /// Not all transforms are invertible, so this returns an Option.
    fn inverse(&self) -> Option<Box<dyn Transform<D>>> {
        None
    }
}

impl<const D: usize> Transform<D> for Box<dyn Transform<D>> {
    fn transform_point(&self, point: &Point<D>) -> Point<D> {
        (**self).transform_point(point)
    }

    fn inverse(&self) -> Option<Box<dyn Transform<D>>> {
        (**self).inverse()
    }
}

impl<T: Transform<D> + ?Sized, const D: usize> Transform<D> for &T {
    fn transform_point(&self, point: &Point<D>) -> Point<D> {
        (**self).transform_point(point)
    }

    fn inverse(&self) -> Option<Box<dyn Transform<D>>> {
        (**self).inverse()
    }
}

/// The identity map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdentityTransform;

impl<const D: usize> Transform<D> for IdentityTransform {
    fn transform_point(&self, point: &Point<D>) -> Point<D> {
        *point
    }

    fn inverse(&self) -> Option<Box<dyn Transform<D>>> {
        Some(Box::new(IdentityTransform))
    }
}
