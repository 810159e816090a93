//! Scale transform implementation.
//!
//! This module provides a scale transform (scaling around a center).

use serde::{Deserialize, Serialize};

use super::trait_::Transform;
use crate::error::{Error, Result};
use crate::spatial::{Point, Vector};

/// Scale Transform.
///
/// Represents a scaling transformation with a fixed center:
/// T(x) = S * (x - c) + c
///
/// where:
/// * S is a D-dimensional scale vector (diagonal matrix)
/// * c is a D-dimensional fixed center of scaling
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleTransform<const D: usize> {
    scale: Vector<D>,
    center: Point<D>,
}

impl<const D: usize> ScaleTransform<D> {
    /// Create a new scale transform.
    ///
    /// Every factor must be strictly positive and finite.
    pub fn new(scale: Vector<D>, center: Point<D>) -> Result<Self> {
        if !scale.0.iter().all(|&s| s > 0.0 && s.is_finite()) {
            return Err(Error::invalid_argument(format!(
                "scale factors must be strictly positive and finite, got {:?}",
                scale.components()
            )));
        }
        Ok(Self { scale, center })
    }

    /// Create an identity scale transform (scale = 1.0) about the origin.
    pub fn identity() -> Self {
        Self {
            scale: Vector::repeat(1.0),
            center: Point::origin(),
        }
    }

    /// Get the scale factors.
    pub fn scale(&self) -> &Vector<D> {
        &self.scale
    }

    /// Get the center of scaling.
    pub fn center(&self) -> &Point<D> {
        &self.center
    }
}

impl<const D: usize> Transform<D> for ScaleTransform<D> {
    fn transform_point(&self, point: &Point<D>) -> Point<D> {
        self.center + (*point - self.center).component_mul(&self.scale)
    }

    fn inverse(&self) -> Option<Box<dyn Transform<D>>> {
        let reciprocal = Vector(self.scale.0.map(|s| 1.0 / s));
        Some(Box::new(Self {
            scale: reciprocal,
            center: self.center,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::{Point3, Vector3};

    #[test]
    fn test_scale_transform() {
        let transform = ScaleTransform::new(Vector3::new([2.0, 0.5, 1.0]), Point3::origin()).unwrap();

        assert_eq!(
            transform.transform_point(&Point3::new([1.0, 2.0, 3.0])),
            Point3::new([2.0, 1.0, 3.0])
        );
        assert_eq!(
            transform.transform_point(&Point3::new([2.0, 4.0, 6.0])),
            Point3::new([4.0, 2.0, 6.0])
        );
    }

    #[test]
    fn test_scale_transform_with_center() {
        let transform = ScaleTransform::new(
            Vector::new([2.0, 2.0]),
            Point::new([1.0, 1.0]),
        )
        .unwrap();

        // Point at center should not move
        assert_eq!(transform.transform_point(&Point::new([1.0, 1.0])), Point::new([1.0, 1.0]));
        // (2, 2) is (1, 1) from the center; scaled to (2, 2) and shifted back.
        assert_eq!(transform.transform_point(&Point::new([2.0, 2.0])), Point::new([3.0, 3.0]));
    }

    #[test]
    fn test_scale_transform_rejects_zero() {
        assert!(ScaleTransform::new(Vector3::new([1.0, 0.0, 1.0]), Point3::origin()).is_err());
    }

    #[test]
    fn test_scale_inverse() {
        let transform = ScaleTransform::new(Vector3::new([4.0, 0.5, 2.0]), Point3::new([1.0, 2.0, 3.0])).unwrap();
        let inverse = transform.inverse().unwrap();
        let p = Point3::new([7.0, -1.0, 0.0]);
        let back = inverse.transform_point(&transform.transform_point(&p));
        for axis in 0..3 {
            assert!((back[axis] - p[axis]).abs() < 1e-12);
        }
    }
}
