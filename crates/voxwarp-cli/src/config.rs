//! Transform parameters for the driver.
//!
//! The defaults reproduce the fixed exercise transform: translate by
//! (6, 2, 4), scale by (0.5, 0.75, 0.9) about the origin, move the center,
//! then rotate 60° about the x axis.

use voxwarp_core::image::{Image, Pixel};
use voxwarp_core::spatial::{Point3, Vector3};
use voxwarp_core::transform::AffineTransform;

/// How the rotation center is derived from the input image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CenterMode {
    /// `(Nx/2, Ny/2, Nz/2)` used directly as a physical point. Matches the
    /// image center only for unit spacing and zero origin.
    #[default]
    SizeHalf,
    /// Physical position of the continuous index `size / 2`.
    Physical,
}

/// Parameters of the composite affine transform.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformParameters {
    /// Translation, applied first.
    pub translation: Vector3,
    /// Scale factors, applied about the origin.
    pub scale: Vector3,
    /// Rotation center.
    pub center_mode: CenterMode,
    /// Rotation axis; normalized when the transform is built.
    pub axis: Vector3,
    /// Rotation angle in degrees.
    pub angle_degrees: f64,
    /// Pre-compose the rotation instead of post-composing it.
    pub pre_multiply: bool,
}

impl Default for TransformParameters {
    fn default() -> Self {
        Self {
            translation: Vector3::new([6.0, 2.0, 4.0]),
            scale: Vector3::new([0.5, 0.75, 0.9]),
            center_mode: CenterMode::SizeHalf,
            axis: Vector3::x_axis(),
            angle_degrees: 60.0,
            pre_multiply: false,
        }
    }
}

impl TransformParameters {
    /// Set the translation.
    pub fn with_translation(mut self, translation: Vector3) -> Self {
        self.translation = translation;
        self
    }

    /// Set the scale factors.
    pub fn with_scale(mut self, scale: Vector3) -> Self {
        self.scale = scale;
        self
    }

    /// Set how the rotation center is derived.
    pub fn with_center_mode(mut self, center_mode: CenterMode) -> Self {
        self.center_mode = center_mode;
        self
    }

    /// Set the rotation axis and angle (degrees).
    pub fn with_rotation(mut self, axis: Vector3, angle_degrees: f64) -> Self {
        self.axis = axis;
        self.angle_degrees = angle_degrees;
        self
    }

    /// Pre-compose the rotation.
    pub fn with_pre_multiply(mut self, pre_multiply: bool) -> Self {
        self.pre_multiply = pre_multiply;
        self
    }

    /// Rotation center for `image`.
    pub fn center_for<P: Pixel>(&self, image: &Image<P>) -> Point3 {
        let half = image.size().map(|n| n as f64 / 2.0);
        match self.center_mode {
            CenterMode::SizeHalf => Point3::new(half),
            CenterMode::Physical => image.continuous_index_to_physical(&Point3::new(half)),
        }
    }

    /// Build the transform: translate, scale, set center, rotate.
    pub fn build<P: Pixel>(&self, image: &Image<P>) -> voxwarp_core::Result<AffineTransform<3>> {
        let mut transform = AffineTransform::identity();
        transform.translate(&self.translation);
        transform.scale(&self.scale)?;
        transform.set_center(self.center_for(image));
        transform.rotate_3d(&self.axis, self.angle_degrees.to_radians(), self.pre_multiply)?;
        Ok(transform)
    }
}
