//! Point type for representing spatial coordinates.
//!
//! Points are positions, either in physical space or as continuous indices
//! into an image grid.

use nalgebra::Point as NaPoint;
use serde::{Deserialize, Serialize};

use super::Vector;

/// A point in D-dimensional space.
///
/// Used for image origins, physical coordinates and continuous indices.
/// Subtracting two points yields a [`Vector`]; adding a vector to a point
/// yields a point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point<const D: usize>(pub NaPoint<f64, D>);

impl<const D: usize> Point<D> {
    /// Create a new point from coordinates.
    pub fn new(coords: [f64; D]) -> Self {
        Self(NaPoint::from(coords))
    }

    /// Create a point at the origin (all coordinates zero).
    pub fn origin() -> Self {
        Self(NaPoint::origin())
    }

    /// Create a point from an integer grid index.
    pub fn from_index(index: [usize; D]) -> Self {
        Self::new(index.map(|i| i as f64))
    }

    /// Coordinates as a plain array.
    pub fn coords(&self) -> [f64; D] {
        self.0.coords.into()
    }

    /// Position vector of this point relative to the origin.
    pub fn to_vector(&self) -> Vector<D> {
        Vector(self.0.coords)
    }

    /// True when every coordinate is finite.
    pub fn is_finite(&self) -> bool {
        self.0.coords.iter().all(|c| c.is_finite())
    }

    /// Get the inner nalgebra point.
    pub fn inner(&self) -> &NaPoint<f64, D> {
        &self.0
    }
}

impl<const D: usize> Default for Point<D> {
    fn default() -> Self {
        Self::origin()
    }
}

impl<const D: usize> From<Vector<D>> for Point<D> {
    fn from(vector: Vector<D>) -> Self {
        Self(NaPoint::from(vector.0))
    }
}

impl<const D: usize> std::ops::Index<usize> for Point<D> {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0.coords[index]
    }
}

impl<const D: usize> std::ops::IndexMut<usize> for Point<D> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.0.coords[index]
    }
}

impl<const D: usize> std::ops::Sub for Point<D> {
    type Output = Vector<D>;

    fn sub(self, other: Self) -> Self::Output {
        Vector(self.0 - other.0)
    }
}

impl<const D: usize> std::ops::Add<Vector<D>> for Point<D> {
    type Output = Self;

    fn add(self, vector: Vector<D>) -> Self::Output {
        Self(self.0 + vector.0)
    }
}

impl<const D: usize> std::ops::Sub<Vector<D>> for Point<D> {
    type Output = Self;

    fn sub(self, vector: Vector<D>) -> Self::Output {
        Self(self.0 - vector.0)
    }
}
