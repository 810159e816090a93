//! Sampling grid geometry.
//!
//! An [`ImageGrid`] describes where the voxels of a 3D raster sit in physical
//! space: size, origin, spacing and direction. Images carry one, and the
//! resample filter describes its output with one.

use crate::error::{Error, Result};
use crate::spatial::{Direction3, Point3, Spacing3, Vector3};

/// Geometry of a 3D voxel grid.
///
/// # Coordinate Systems
/// * **Index Space**: voxel `(i, j, k)`, or a continuous index `(u, v, w)`
/// * **Physical Space**: `origin + direction · (index ⊙ spacing)`
#[derive(Debug, Clone, PartialEq)]
pub struct ImageGrid {
    size: [usize; 3],
    origin: Point3,
    spacing: Spacing3,
    direction: Direction3,
    inverse_direction: Direction3,
}

impl ImageGrid {
    /// Create a grid with an explicit direction matrix.
    ///
    /// Fails when a spacing component is not strictly positive and finite or
    /// when the direction matrix cannot be inverted.
    pub fn new(
        size: [usize; 3],
        origin: Point3,
        spacing: Spacing3,
        direction: Direction3,
    ) -> Result<Self> {
        if !spacing.is_valid_spacing() {
            return Err(Error::invalid_geometry(format!(
                "spacing must be strictly positive and finite, got {:?}",
                spacing.components()
            )));
        }
        if !origin.is_finite() {
            return Err(Error::invalid_geometry("origin must be finite"));
        }
        let inverse_direction = direction
            .try_inverse()
            .filter(Direction3::is_finite)
            .ok_or_else(|| Error::invalid_geometry("direction matrix must be invertible"))?;

        Ok(Self {
            size,
            origin,
            spacing,
            direction,
            inverse_direction,
        })
    }

    /// Create a grid with identity direction.
    pub fn with_identity_direction(
        size: [usize; 3],
        origin: Point3,
        spacing: Spacing3,
    ) -> Result<Self> {
        Self::new(size, origin, spacing, Direction3::identity())
    }

    /// Unit spacing, zero origin, identity direction.
    pub fn unit(size: [usize; 3]) -> Self {
        Self {
            size,
            origin: Point3::origin(),
            spacing: Spacing3::uniform(1.0),
            direction: Direction3::identity(),
            inverse_direction: Direction3::identity(),
        }
    }

    /// Same geometry with a different size.
    pub fn with_size(&self, size: [usize; 3]) -> Self {
        Self { size, ..self.clone() }
    }

    /// Grid size `(Nx, Ny, Nz)`.
    pub fn size(&self) -> [usize; 3] {
        self.size
    }

    /// Physical coordinate of voxel (0, 0, 0).
    pub fn origin(&self) -> &Point3 {
        &self.origin
    }

    /// Physical distance between voxels along each axis.
    pub fn spacing(&self) -> &Spacing3 {
        &self.spacing
    }

    /// Orientation of the grid axes.
    pub fn direction(&self) -> &Direction3 {
        &self.direction
    }

    /// Number of voxels.
    pub fn len(&self) -> usize {
        self.size.iter().product()
    }

    /// True when any axis has zero length.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of voxels in one k-slice.
    pub fn slice_len(&self) -> usize {
        self.size[0] * self.size[1]
    }

    /// Offset of voxel `(i, j, k)` in (k, j, i) row-major storage.
    ///
    /// # Panics
    /// Panics when the index lies outside the grid.
    #[inline]
    pub fn linear_index(&self, i: usize, j: usize, k: usize) -> usize {
        let [nx, ny, nz] = self.size;
        assert!(
            i < nx && j < ny && k < nz,
            "voxel index ({i}, {j}, {k}) out of range for size ({nx}, {ny}, {nz})"
        );
        (k * ny + j) * nx + i
    }

    /// Physical position of an integer voxel index.
    pub fn index_to_physical(&self, i: usize, j: usize, k: usize) -> Point3 {
        self.continuous_index_to_physical(&Point3::from_index([i, j, k]))
    }

    /// Convert a continuous index to a physical point.
    ///
    /// `point = origin + direction · (index ⊙ spacing)`
    #[inline]
    pub fn continuous_index_to_physical(&self, index: &Point3) -> Point3 {
        let scaled = index.to_vector().component_mul(&self.spacing);
        self.origin + self.direction * scaled
    }

    /// Convert a physical point to a continuous index.
    ///
    /// `index = (direction⁻¹ · (point − origin)) ⊘ spacing`
    #[inline]
    pub fn physical_to_continuous_index(&self, point: &Point3) -> Point3 {
        let diff: Vector3 = *point - self.origin;
        Point3::from((self.inverse_direction * diff).component_div(&self.spacing))
    }

    /// True when `index` lies in `[0, N − 1]` on every axis, widened by
    /// `tolerance` voxels.
    pub fn is_inside_continuous(&self, index: &Point3, tolerance: f64) -> bool {
        (0..3).all(|axis| {
            let upper = self.size[axis] as f64 - 1.0;
            let u = index[axis];
            self.size[axis] > 0 && u >= -tolerance && u <= upper + tolerance
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_rejects_bad_spacing() {
        let err = ImageGrid::with_identity_direction(
            [2, 2, 2],
            Point3::origin(),
            Spacing3::new([1.0, 0.0, 1.0]),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidGeometry(_)));
    }

    #[test]
    fn test_grid_rejects_singular_direction() {
        let err = ImageGrid::new(
            [2, 2, 2],
            Point3::origin(),
            Spacing3::uniform(1.0),
            Direction3::zeros(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidGeometry(_)));
    }

    #[test]
    fn test_linear_index_order() {
        let grid = ImageGrid::unit([4, 3, 2]);
        assert_eq!(grid.linear_index(0, 0, 0), 0);
        assert_eq!(grid.linear_index(1, 0, 0), 1);
        assert_eq!(grid.linear_index(0, 1, 0), 4);
        assert_eq!(grid.linear_index(0, 0, 1), 12);
        assert_eq!(grid.linear_index(3, 2, 1), 23);
        assert_eq!(grid.len(), 24);
        assert_eq!(grid.slice_len(), 12);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_linear_index_out_of_range_panics() {
        ImageGrid::unit([2, 2, 2]).linear_index(2, 0, 0);
    }

    #[test]
    fn test_physical_conversions() {
        let grid = ImageGrid::with_identity_direction(
            [10, 10, 10],
            Point3::new([10.0, 20.0, 30.0]),
            Spacing3::new([2.0, 0.5, 1.0]),
        )
        .unwrap();

        let p = grid.index_to_physical(1, 2, 3);
        assert_eq!(p, Point3::new([12.0, 21.0, 33.0]));

        let index = grid.physical_to_continuous_index(&Point3::new([15.0, 20.25, 30.0]));
        assert!((index[0] - 2.5).abs() < 1e-12);
        assert!((index[1] - 0.5).abs() < 1e-12);
        assert!(index[2].abs() < 1e-12);
    }

    #[test]
    fn test_inside_predicate() {
        let grid = ImageGrid::unit([2, 1, 1]);
        assert!(grid.is_inside_continuous(&Point3::new([1.0, 0.0, 0.0]), 0.0));
        assert!(grid.is_inside_continuous(&Point3::new([0.5, 0.0, 0.0]), 0.0));
        assert!(!grid.is_inside_continuous(&Point3::new([1.5, 0.0, 0.0]), 0.0));
        assert!(!grid.is_inside_continuous(&Point3::new([-1e-3, 0.0, 0.0]), 1e-6));
        assert!(grid.is_inside_continuous(&Point3::new([-1e-9, 0.0, 0.0]), 1e-6));

        let empty = ImageGrid::unit([0, 1, 1]);
        assert!(!empty.is_inside_continuous(&Point3::origin(), 1e-6));
    }
}
