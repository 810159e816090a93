//! Nearest neighbor interpolation implementation.

use super::trait_::{clamp_to_grid, Interpolator};
use crate::image::{Image, Pixel};
use crate::spatial::Point3;

/// Nearest Neighbor Interpolator.
///
/// Rounds each coordinate to the nearest grid index (halves round away from
/// zero). Shares the in-bounds rule of the linear interpolator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NearestNeighborInterpolator;

impl NearestNeighborInterpolator {
    /// Create a new nearest neighbor interpolator.
    pub fn new() -> Self {
        Self
    }
}

impl Interpolator for NearestNeighborInterpolator {
    fn interpolate<P: Pixel>(&self, image: &Image<P>, index: &Point3) -> Option<f64> {
        let [u, v, w] = clamp_to_grid(image.size(), index)?;
        Some(
            image
                .get(u.round() as usize, v.round() as usize, w.round() as usize)
                .to_f64(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImageGrid;

    #[test]
    fn test_nearest_interpolation() {
        let image = Image::from_samples(ImageGrid::unit([3, 1, 1]), vec![10u8, 20, 30]).unwrap();
        let interpolator = NearestNeighborInterpolator::new();

        assert_eq!(interpolator.interpolate(&image, &Point3::new([0.4, 0.0, 0.0])), Some(10.0));
        assert_eq!(interpolator.interpolate(&image, &Point3::new([0.5, 0.0, 0.0])), Some(20.0));
        assert_eq!(interpolator.interpolate(&image, &Point3::new([1.9, 0.0, 0.0])), Some(30.0));
        assert_eq!(interpolator.interpolate(&image, &Point3::new([3.0, 0.0, 0.0])), None);
        // A single-voxel axis only accepts coordinate 0.
        assert_eq!(interpolator.interpolate(&image, &Point3::new([1.9, 0.2, 0.0])), None);
    }

    #[test]
    fn test_nearest_rounds_every_axis() {
        let image = Image::from_samples(
            ImageGrid::unit([3, 2, 1]),
            vec![10u8, 20, 30, 40, 50, 60],
        )
        .unwrap();
        let interpolator = NearestNeighborInterpolator::new();

        assert_eq!(interpolator.interpolate(&image, &Point3::new([1.9, 0.2, 0.0])), Some(30.0));
        assert_eq!(interpolator.interpolate(&image, &Point3::new([1.9, 0.6, 0.0])), Some(60.0));
    }
}
