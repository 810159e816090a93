//! Spatial types for representing points, vectors, spacing, and matrices.
//!
//! This module provides the fundamental spatial types used throughout voxwarp.
//! All types are thin wrappers over nalgebra fixed-size types.

pub mod point;
pub mod vector;
pub mod spacing;
pub mod matrix;

pub use point::Point;
pub use vector::Vector;
pub use spacing::Spacing;
pub use matrix::{Direction, Matrix};

// Common type aliases for 2D and 3D
pub type Point2 = Point<2>;
pub type Point3 = Point<3>;
pub type Vector2 = Vector<2>;
pub type Vector3 = Vector<3>;
pub type Spacing2 = Spacing<2>;
pub type Spacing3 = Spacing<3>;
pub type Matrix2 = Matrix<2>;
pub type Matrix3 = Matrix<3>;
pub type Direction2 = Direction<2>;
pub type Direction3 = Direction<3>;
