//! Image type with physical metadata and coordinate transformations.
//!
//! This module provides the [`Image`] struct: a 3D scalar raster with the
//! geometry that maps voxel indices to physical coordinates.

use super::grid::ImageGrid;
use super::pixel::Pixel;
use crate::error::{Error, Result};
use crate::spatial::{Direction3, Point3, Spacing3};

/// 3D scalar raster with physical metadata.
///
/// Samples are stored in (k, j, i) row-major order: `i` is the contiguous
/// axis. Integer indexing outside the grid is a programming error and panics;
/// continuous indices are plain [`Point3`] values and never fail.
///
/// # Examples
/// ```rust
/// use voxwarp_core::Image;
/// use voxwarp_core::spatial::{Point3, Spacing3};
///
/// let mut image = Image::<u8>::new(
///     [4, 4, 2],
///     Point3::new([0.0, 0.0, 0.0]),
///     Spacing3::new([1.0, 1.0, 2.5]),
/// )
/// .unwrap();
/// image.set(1, 2, 1, 200);
/// assert_eq!(image.get(1, 2, 1), 200);
///
/// let p = image.index_to_physical(1, 2, 1);
/// assert_eq!(p, Point3::new([1.0, 2.0, 2.5]));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Image<P: Pixel> {
    grid: ImageGrid,
    samples: Vec<P>,
}

impl<P: Pixel> Image<P> {
    /// Create a zero-filled image with identity direction.
    pub fn new(size: [usize; 3], origin: Point3, spacing: Spacing3) -> Result<Self> {
        Ok(Self::from_grid(ImageGrid::with_identity_direction(
            size, origin, spacing,
        )?))
    }

    /// Create a zero-filled image on the given grid.
    pub fn from_grid(grid: ImageGrid) -> Self {
        let samples = vec![P::default(); grid.len()];
        Self { grid, samples }
    }

    /// Create an image from a sample buffer in (k, j, i) row-major order.
    pub fn from_samples(grid: ImageGrid, samples: Vec<P>) -> Result<Self> {
        if samples.len() != grid.len() {
            return Err(Error::ShapeMismatch {
                expected: grid.len(),
                actual: samples.len(),
            });
        }
        Ok(Self { grid, samples })
    }

    /// Create an image by evaluating `f(i, j, k)` at every voxel.
    pub fn from_fn<F>(grid: ImageGrid, mut f: F) -> Self
    where
        F: FnMut(usize, usize, usize) -> P,
    {
        let [nx, ny, nz] = grid.size();
        let mut samples = Vec::with_capacity(grid.len());
        for k in 0..nz {
            for j in 0..ny {
                for i in 0..nx {
                    samples.push(f(i, j, k));
                }
            }
        }
        Self { grid, samples }
    }

    /// Get the sampling grid.
    pub fn grid(&self) -> &ImageGrid {
        &self.grid
    }

    /// Grid size `(Nx, Ny, Nz)`.
    pub fn size(&self) -> [usize; 3] {
        self.grid.size()
    }

    /// Get the origin (physical coordinate of voxel (0, 0, 0)).
    pub fn origin(&self) -> &Point3 {
        self.grid.origin()
    }

    /// Get the spacing (physical distance between voxels).
    pub fn spacing(&self) -> &Spacing3 {
        self.grid.spacing()
    }

    /// Get the direction (orientation matrix).
    pub fn direction(&self) -> &Direction3 {
        self.grid.direction()
    }

    /// Number of voxels.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when the image holds no voxels.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sample buffer in (k, j, i) row-major order.
    pub fn samples(&self) -> &[P] {
        &self.samples
    }

    /// Mutable sample buffer in (k, j, i) row-major order.
    pub fn samples_mut(&mut self) -> &mut [P] {
        &mut self.samples
    }

    /// Consume the image and return its sample buffer.
    pub fn into_samples(self) -> Vec<P> {
        self.samples
    }

    /// Read voxel `(i, j, k)`.
    #[inline]
    pub fn get(&self, i: usize, j: usize, k: usize) -> P {
        self.samples[self.grid.linear_index(i, j, k)]
    }

    /// Write voxel `(i, j, k)`.
    #[inline]
    pub fn set(&mut self, i: usize, j: usize, k: usize, value: P) {
        let offset = self.grid.linear_index(i, j, k);
        self.samples[offset] = value;
    }

    /// Physical position of voxel `(i, j, k)`.
    pub fn index_to_physical(&self, i: usize, j: usize, k: usize) -> Point3 {
        self.grid.index_to_physical(i, j, k)
    }

    /// Convert a continuous index to a physical point.
    pub fn continuous_index_to_physical(&self, index: &Point3) -> Point3 {
        self.grid.continuous_index_to_physical(index)
    }

    /// Convert a physical point to a continuous index.
    pub fn physical_to_index(&self, point: &Point3) -> Point3 {
        self.grid.physical_to_continuous_index(point)
    }

    /// True when both images share size, origin, spacing and direction.
    pub fn same_grid<Q: Pixel>(&self, other: &Image<Q>) -> bool {
        self.grid == other.grid
    }

    /// Smallest and largest sample, or `None` for an empty image.
    pub fn min_max(&self) -> Option<(P, P)> {
        let mut iter = self.samples.iter().copied();
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), v| {
            let lo = if v.to_f64() < lo.to_f64() { v } else { lo };
            let hi = if v.to_f64() > hi.to_f64() { v } else { hi };
            (lo, hi)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_creation() {
        let image = Image::<u8>::new(
            [10, 8, 6],
            Point3::new([1.0, 2.0, 3.0]),
            Spacing3::new([1.0, 1.0, 2.0]),
        )
        .unwrap();

        assert_eq!(image.size(), [10, 8, 6]);
        assert_eq!(image.len(), 480);
        assert!(image.samples().iter().all(|&v| v == 0));
        assert_eq!(image.origin(), &Point3::new([1.0, 2.0, 3.0]));
        assert_eq!(image.direction(), &Direction3::identity());
    }

    #[test]
    fn test_from_samples_checks_length() {
        let grid = ImageGrid::unit([2, 2, 2]);
        let err = Image::<u8>::from_samples(grid, vec![0; 7]).unwrap_err();
        assert_eq!(err, Error::ShapeMismatch { expected: 8, actual: 7 });
    }

    #[test]
    fn test_get_set_follow_row_major_order() {
        let grid = ImageGrid::unit([2, 2, 2]);
        let image =
            Image::from_samples(grid, vec![0u8, 10, 20, 30, 40, 50, 60, 70]).unwrap();
        assert_eq!(image.get(1, 0, 0), 10);
        assert_eq!(image.get(0, 1, 0), 20);
        assert_eq!(image.get(0, 0, 1), 40);
        assert_eq!(image.get(1, 1, 1), 70);

        let mut image = image;
        image.set(0, 1, 1, 99);
        assert_eq!(image.samples()[6], 99);
    }

    #[test]
    fn test_from_fn_matches_get() {
        let image = Image::<u16>::from_fn(ImageGrid::unit([3, 2, 2]), |i, j, k| {
            (i + 10 * j + 100 * k) as u16
        });
        assert_eq!(image.get(2, 1, 1), 112);
        assert_eq!(image.samples()[1], 1);
    }

    #[test]
    fn test_physical_index_roundtrip() {
        let image = Image::<u8>::new(
            [10, 10, 10],
            Point3::new([-5.0, 0.0, 12.5]),
            Spacing3::new([0.7, 1.3, 2.0]),
        )
        .unwrap();

        let original = Point3::new([3.5, 4.5, 5.5]);
        let physical = image.continuous_index_to_physical(&original);
        let back = image.physical_to_index(&physical);
        for axis in 0..3 {
            assert!((original[axis] - back[axis]).abs() < 1e-12);
        }
    }

    #[test]
    fn test_zero_size_image_is_empty() {
        let image = Image::<u8>::from_grid(ImageGrid::unit([0, 4, 4]));
        assert!(image.is_empty());
        assert_eq!(image.min_max(), None);
    }

    #[test]
    fn test_same_grid() {
        let a = Image::<u8>::from_grid(ImageGrid::unit([2, 3, 4]));
        let b = Image::<f32>::from_grid(ImageGrid::unit([2, 3, 4]));
        let c = Image::<u8>::from_grid(ImageGrid::unit([2, 3, 5]));
        assert!(a.same_grid(&b));
        assert!(!a.same_grid(&c));
    }

    #[test]
    fn test_min_max() {
        let image = Image::from_samples(ImageGrid::unit([3, 1, 1]), vec![7u8, 2, 9]).unwrap();
        assert_eq!(image.min_max(), Some((2, 9)));
    }
}
