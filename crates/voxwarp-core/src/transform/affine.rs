//! Affine transform implementation.
//!
//! [`AffineTransform`] stores a single map `x ↦ A·x + b` and accumulates
//! elementary operations into it. Linear operations (scale, rotation, any
//! matrix) act about the current center `c`: applying `M` post-composes the
//! map with `x ↦ M·(x − c) + c`. Translations ignore the center, and moving
//! the center never changes operations that were already applied.

use serde::{Deserialize, Serialize};

use super::scale::ScaleTransform;
use super::trait_::Transform;
use super::translation::TranslationTransform;
use crate::error::{Error, Result};
use crate::spatial::{Matrix, Matrix3, Point, Vector, Vector3};

/// Affine Transform (linear map + offset) with a settable center.
///
/// The center is builder state only: it determines the pivot of subsequent
/// [`scale`](Self::scale), [`rotate_3d`](Self::rotate_3d) and
/// [`apply_linear`](Self::apply_linear) calls and does not enter
/// [`transform_point`](Transform::transform_point).
///
/// # Examples
/// ```rust
/// use voxwarp_core::transform::{AffineTransform, Transform};
/// use voxwarp_core::spatial::{Point3, Vector3};
///
/// let mut t = AffineTransform::<3>::identity();
/// t.translate(&Vector3::new([1.0, 0.0, 0.0]))
///     .scale(&Vector3::new([2.0, 2.0, 2.0]))
///     .unwrap();
///
/// let p = t.transform_point(&Point3::new([1.0, 1.0, 1.0]));
/// assert_eq!(p, Point3::new([4.0, 2.0, 2.0]));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffineTransform<const D: usize> {
    matrix: Matrix<D>,
    offset: Vector<D>,
    center: Point<D>,
}

impl<const D: usize> AffineTransform<D> {
    /// Identity map with the center at the origin.
    pub fn identity() -> Self {
        Self {
            matrix: Matrix::identity(),
            offset: Vector::zeros(),
            center: Point::origin(),
        }
    }

    /// Create the map `x ↦ matrix·x + offset` (center at the origin).
    pub fn new(matrix: Matrix<D>, offset: Vector<D>) -> Self {
        Self {
            matrix,
            offset,
            center: Point::origin(),
        }
    }

    /// Linear part `A`.
    pub fn matrix(&self) -> &Matrix<D> {
        &self.matrix
    }

    /// Offset `b`.
    pub fn offset(&self) -> &Vector<D> {
        &self.offset
    }

    /// Pivot used by subsequent center-relative operations.
    pub fn center(&self) -> &Point<D> {
        &self.center
    }

    /// Set the pivot for subsequent center-relative operations.
    pub fn set_center(&mut self, center: Point<D>) -> &mut Self {
        self.center = center;
        self
    }

    /// Post-compose with a translation: `b ← b + v`.
    pub fn translate(&mut self, translation: &Vector<D>) -> &mut Self {
        self.offset = self.offset + *translation;
        self
    }

    /// Post-compose with an anisotropic scaling about the current center.
    ///
    /// Every factor must be strictly positive and finite.
    pub fn scale(&mut self, factors: &Vector<D>) -> Result<&mut Self> {
        if !factors.0.iter().all(|&s| s > 0.0 && s.is_finite()) {
            return Err(Error::invalid_argument(format!(
                "scale factors must be strictly positive and finite, got {:?}",
                factors.components()
            )));
        }
        Ok(self.apply_linear(&Matrix::from_diagonal(factors), false))
    }

    /// Apply a linear operation `M` about the current center `c`.
    ///
    /// * post-compose (`pre_multiply = false`): `A ← M·A`, `b ← M·(b − c) + c`
    /// * pre-compose (`pre_multiply = true`): the map becomes
    ///   `x ↦ A·(M·(x − c) + c) + b`, i.e. `A ← A·M`, `b ← b + A·(c − M·c)`
    pub fn apply_linear(&mut self, linear: &Matrix<D>, pre_multiply: bool) -> &mut Self {
        let c = self.center.to_vector();
        if pre_multiply {
            self.offset = self.offset + self.matrix * (c - *linear * c);
            self.matrix = self.matrix * *linear;
        } else {
            self.matrix = *linear * self.matrix;
            self.offset = *linear * (self.offset - c) + c;
        }
        self
    }

    /// Compose with another affine map.
    ///
    /// Post-composition yields `other ∘ self`, pre-composition `self ∘ other`.
    /// The center of `self` is kept.
    pub fn compose(&mut self, other: &AffineTransform<D>, pre_multiply: bool) -> &mut Self {
        if pre_multiply {
            self.offset = self.matrix * other.offset + self.offset;
            self.matrix = self.matrix * other.matrix;
        } else {
            self.offset = other.matrix * self.offset + other.offset;
            self.matrix = other.matrix * self.matrix;
        }
        self
    }

    /// Inverse map `(A⁻¹, −A⁻¹·b)`, keeping the center.
    pub fn try_inverse(&self) -> Result<Self> {
        let inverse = self.matrix.try_inverse().ok_or_else(|| {
            Error::singular(format!(
                "linear part has determinant {:e}",
                self.matrix.determinant()
            ))
        })?;
        Ok(Self {
            matrix: inverse,
            offset: -(inverse * self.offset),
            center: self.center,
        })
    }

    /// Apply only the linear part to a vector.
    pub fn transform_vector(&self, vector: &Vector<D>) -> Vector<D> {
        self.matrix * *vector
    }

    /// True when the map is within `tolerance` of the identity.
    pub fn is_identity(&self, tolerance: f64) -> bool {
        self.matrix.is_identity(tolerance) && self.offset.0.iter().all(|b| b.abs() <= tolerance)
    }
}

impl AffineTransform<3> {
    /// Post- or pre-compose with a right-handed rotation of `angle` radians
    /// about `axis` through the current center.
    ///
    /// The axis is normalized; a zero or non-finite axis is rejected.
    pub fn rotate_3d(&mut self, axis: &Vector3, angle: f64, pre_multiply: bool) -> Result<&mut Self> {
        let rotation = rotation_matrix_3d(axis, angle)?;
        Ok(self.apply_linear(&rotation, pre_multiply))
    }
}

impl AffineTransform<2> {
    /// Post- or pre-compose with a counter-clockwise rotation of `angle`
    /// radians about the current center.
    pub fn rotate_2d(&mut self, angle: f64, pre_multiply: bool) -> Result<&mut Self> {
        if !angle.is_finite() {
            return Err(Error::invalid_argument("rotation angle must be finite"));
        }
        let (sin, cos) = angle.sin_cos();
        let rotation = Matrix::from_rows([[cos, -sin], [sin, cos]]);
        Ok(self.apply_linear(&rotation, pre_multiply))
    }
}

/// Rotation matrix for a right-handed rotation of `angle` radians about
/// `axis` (Rodrigues' formula).
///
/// `R = I + sin θ·K + (1 − cos θ)·K²` where `K` is the cross-product matrix
/// of the normalized axis.
pub fn rotation_matrix_3d(axis: &Vector3, angle: f64) -> Result<Matrix3> {
    if !angle.is_finite() {
        return Err(Error::invalid_argument("rotation angle must be finite"));
    }
    let k = axis.try_normalize().ok_or_else(|| {
        Error::invalid_argument(format!(
            "rotation axis must be non-zero and finite, got {:?}",
            axis.components()
        ))
    })?;
    let (kx, ky, kz) = (k[0], k[1], k[2]);
    let cross = Matrix3::from_rows([
        [0.0, -kz, ky],
        [kz, 0.0, -kx],
        [-ky, kx, 0.0],
    ]);
    let (sin, cos) = angle.sin_cos();
    Ok(Matrix3::identity() + cross * sin + (cross * cross) * (1.0 - cos))
}

impl<const D: usize> Default for AffineTransform<D> {
    fn default() -> Self {
        Self::identity()
    }
}

impl<const D: usize> Transform<D> for AffineTransform<D> {
    #[inline]
    fn transform_point(&self, point: &Point<D>) -> Point<D> {
        Point::from(self.matrix * point.to_vector() + self.offset)
    }

    fn inverse(&self) -> Option<Box<dyn Transform<D>>> {
        self.try_inverse()
            .ok()
            .map(|t| Box::new(t) as Box<dyn Transform<D>>)
    }
}

impl<const D: usize> From<TranslationTransform<D>> for AffineTransform<D> {
    fn from(t: TranslationTransform<D>) -> Self {
        Self::new(Matrix::identity(), *t.translation())
    }
}

impl<const D: usize> From<ScaleTransform<D>> for AffineTransform<D> {
    fn from(t: ScaleTransform<D>) -> Self {
        let mut affine = Self::identity();
        affine
            .set_center(*t.center())
            .apply_linear(&Matrix::from_diagonal(t.scale()), false);
        affine.set_center(Point::origin());
        affine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::Point3;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn assert_point_near(actual: Point3, expected: [f64; 3]) {
        for axis in 0..3 {
            assert!(
                (actual[axis] - expected[axis]).abs() < 1e-9,
                "axis {axis}: got {:?}, expected {:?}",
                actual.coords(),
                expected
            );
        }
    }

    #[test]
    fn test_affine_transform_identity() {
        let t = AffineTransform::<3>::identity();
        let p = Point3::new([1.0, 2.0, 3.0]);
        assert_eq!(t.transform_point(&p), p);
        assert!(t.is_identity(0.0));
    }

    #[test]
    fn test_translate_ignores_center() {
        let mut t = AffineTransform::<3>::identity();
        t.set_center(Point3::new([10.0, 10.0, 10.0]))
            .translate(&Vector3::new([1.0, 1.0, 0.0]));
        assert_point_near(t.transform_point(&Point3::origin()), [1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_scale_with_center() {
        let mut t = AffineTransform::<3>::identity();
        t.set_center(Point3::new([1.0, 1.0, 1.0]));
        t.scale(&Vector3::new([2.0, 2.0, 2.0])).unwrap();

        assert_point_near(t.transform_point(&Point3::new([1.0, 1.0, 1.0])), [1.0, 1.0, 1.0]);
        assert_point_near(t.transform_point(&Point3::new([2.0, 1.0, 1.0])), [3.0, 1.0, 1.0]);
    }

    #[test]
    fn test_scale_rejects_non_positive_factors() {
        let mut t = AffineTransform::<3>::identity();
        assert!(matches!(
            t.scale(&Vector3::new([1.0, 0.0, 1.0])),
            Err(Error::InvalidArgument(_))
        ));
        assert!(t.scale(&Vector3::new([1.0, -2.0, 1.0])).is_err());
        assert!(t.is_identity(0.0));
    }

    #[test]
    fn test_rodrigues_right_handed() {
        let r = rotation_matrix_3d(&Vector3::z_axis(), FRAC_PI_2).unwrap();
        let x = r * Vector3::x_axis();
        assert!((x[0]).abs() < 1e-12 && (x[1] - 1.0).abs() < 1e-12);

        let r = rotation_matrix_3d(&Vector3::x_axis(), FRAC_PI_2).unwrap();
        let y = r * Vector3::y_axis();
        assert!((y[2] - 1.0).abs() < 1e-12);
        assert!(r.is_proper_rotation());
    }

    #[test]
    fn test_rodrigues_normalizes_axis() {
        let unit = rotation_matrix_3d(&Vector3::new([1.0, 1.0, 0.0]), 0.7).unwrap();
        let scaled = rotation_matrix_3d(&Vector3::new([5.0, 5.0, 0.0]), 0.7).unwrap();
        for r in 0..3 {
            for c in 0..3 {
                assert!((unit[(r, c)] - scaled[(r, c)]).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_rotation_rejects_zero_axis() {
        let mut t = AffineTransform::<3>::identity();
        assert!(matches!(
            t.rotate_3d(&Vector3::zeros(), 1.0, false),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_rotation_about_center() {
        let mut t = AffineTransform::<3>::identity();
        t.set_center(Point3::new([1.0, 1.0, 0.0]));
        t.rotate_3d(&Vector3::z_axis(), FRAC_PI_2, false).unwrap();

        // (2, 0) is (1, -1) from the pivot; +90° takes it to (1, 1).
        assert_point_near(t.transform_point(&Point3::new([2.0, 0.0, 0.0])), [2.0, 2.0, 0.0]);
        assert_point_near(t.transform_point(&Point3::new([1.0, 1.0, 5.0])), [1.0, 1.0, 5.0]);
    }

    #[test]
    fn test_set_center_is_not_retroactive() {
        let mut t = AffineTransform::<3>::identity();
        t.scale(&Vector3::new([2.0, 2.0, 2.0])).unwrap();
        t.set_center(Point3::new([100.0, 100.0, 100.0]));

        assert_point_near(t.transform_point(&Point3::new([1.0, 1.0, 1.0])), [2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_post_multiply_formula() {
        let mut t = AffineTransform::<3>::identity();
        t.translate(&Vector3::new([6.0, 2.0, 4.0]));
        t.scale(&Vector3::new([0.5, 0.75, 0.9])).unwrap();
        let c = Point3::new([5.0, 6.0, 7.0]);
        t.set_center(c);
        t.rotate_3d(&Vector3::x_axis(), PI / 3.0, false).unwrap();

        let r = rotation_matrix_3d(&Vector3::x_axis(), PI / 3.0).unwrap();
        let s = Matrix3::from_diagonal(&Vector3::new([0.5, 0.75, 0.9]));
        let b0 = s * Vector3::new([6.0, 2.0, 4.0]);
        let expected_a = r * s;
        let expected_b = r * (b0 - c.to_vector()) + c.to_vector();

        for row in 0..3 {
            for col in 0..3 {
                assert!((t.matrix()[(row, col)] - expected_a[(row, col)]).abs() < 1e-12);
            }
            assert!((t.offset()[row] - expected_b[row]).abs() < 1e-12);
        }
    }

    #[test]
    fn test_pre_multiply_rotation() {
        let mut base = AffineTransform::<3>::identity();
        base.translate(&Vector3::new([3.0, -1.0, 2.0]));
        base.scale(&Vector3::new([2.0, 1.0, 0.5])).unwrap();
        let c = Point3::new([1.0, 2.0, 3.0]);
        base.set_center(c);

        let mut pre = base;
        pre.rotate_3d(&Vector3::y_axis(), 0.4, true).unwrap();

        // Pre-composition rotates the input before the existing map.
        let mut rotation = AffineTransform::<3>::identity();
        rotation.set_center(c).rotate_3d(&Vector3::y_axis(), 0.4, false).unwrap();

        let p = Point3::new([0.3, -2.0, 5.0]);
        let expected = base.transform_point(&rotation.transform_point(&p));
        assert_point_near(pre.transform_point(&p), expected.coords());
    }

    #[test]
    fn test_compose_order() {
        let mut a = AffineTransform::<3>::identity();
        a.scale(&Vector3::new([2.0, 2.0, 2.0])).unwrap();
        let b: AffineTransform<3> = TranslationTransform::new(Vector3::new([1.0, 0.0, 0.0])).into();

        let mut post = a;
        post.compose(&b, false);
        let mut pre = a;
        pre.compose(&b, true);

        let p = Point3::new([1.0, 1.0, 1.0]);
        assert_point_near(post.transform_point(&p), [3.0, 2.0, 2.0]);
        assert_point_near(pre.transform_point(&p), [4.0, 2.0, 2.0]);
    }

    #[test]
    fn test_inverse() {
        let mut t = AffineTransform::<3>::identity();
        t.translate(&Vector3::new([6.0, 2.0, 4.0]));
        t.scale(&Vector3::new([0.5, 0.75, 0.9])).unwrap();
        t.set_center(Point3::new([8.0, 8.0, 8.0]));
        t.rotate_3d(&Vector3::x_axis(), 1.0, false).unwrap();

        let inv = t.try_inverse().unwrap();
        let p = Point3::new([3.0, -4.0, 12.0]);
        assert_point_near(inv.transform_point(&t.transform_point(&p)), p.coords());
        assert!(Transform::<3>::inverse(&t).is_some());
    }

    #[test]
    fn test_singular_inverse() {
        let t = AffineTransform::<3>::new(
            Matrix3::from_diagonal(&Vector3::new([1.0, 0.0, 1.0])),
            Vector3::zeros(),
        );
        assert!(matches!(t.try_inverse(), Err(Error::Singular(_))));
        assert!(Transform::<3>::inverse(&t).is_none());
    }

    #[test]
    fn test_tiny_scale_is_invertible() {
        let mut t = AffineTransform::<3>::identity();
        t.scale(&Vector3::repeat(1e-5)).unwrap();

        let inv = t.try_inverse().unwrap();
        assert!((inv.matrix()[(0, 0)] - 1e5).abs() < 1e-6);
        let p = Point3::new([1.0, -2.0, 3.0]);
        assert_point_near(inv.transform_point(&t.transform_point(&p)), p.coords());
    }

    #[test]
    fn test_rotate_2d() {
        let mut t = AffineTransform::<2>::identity();
        t.rotate_2d(FRAC_PI_2, false).unwrap();
        let p = t.transform_point(&Point::new([1.0, 0.0]));
        assert!(p[0].abs() < 1e-12 && (p[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_from_scale_transform() {
        let s = ScaleTransform::new(Vector3::new([2.0, 2.0, 2.0]), Point3::new([1.0, 1.0, 1.0])).unwrap();
        let affine: AffineTransform<3> = s.into();
        let p = Point3::new([2.0, 3.0, 1.0]);
        assert_point_near(affine.transform_point(&p), s.transform_point(&p).coords());
        assert_eq!(affine.center(), &Point3::origin());
    }
}
