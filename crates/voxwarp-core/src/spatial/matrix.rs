//! Square matrix type for linear maps and image orientation.

use nalgebra::SMatrix;
use serde::{Deserialize, Serialize};

use super::Vector;

/// Relative tolerance on `|det| / ∏ ‖column‖` below which a matrix is
/// treated as singular.
pub const SINGULARITY_TOLERANCE: f64 = 1e-12;

/// A D×D real matrix.
///
/// Used as the linear part of affine transforms and as image direction
/// matrices. Column i of a direction matrix is the physical direction of
/// image axis i.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Matrix<const D: usize>(pub SMatrix<f64, D, D>);

/// Direction matrix representing image orientation.
///
/// Type alias to [`Matrix`] for semantic clarity.
pub type Direction<const D: usize> = Matrix<D>;

impl<const D: usize> Matrix<D> {
    /// Identity matrix.
    pub fn identity() -> Self {
        Self(SMatrix::identity())
    }

    /// Zero matrix.
    pub fn zeros() -> Self {
        Self(SMatrix::zeros())
    }

    /// Diagonal matrix with the given diagonal.
    pub fn from_diagonal(diagonal: &Vector<D>) -> Self {
        Self(SMatrix::from_diagonal(&diagonal.0))
    }

    /// Build a matrix from row-major rows.
    pub fn from_rows(rows: [[f64; D]; D]) -> Self {
        Self(SMatrix::from_fn(|r, c| rows[r][c]))
    }

    /// Determinant.
    ///
    /// Cofactor expansion for D = 2, 3 and partial-pivot Gaussian
    /// elimination otherwise.
    pub fn determinant(&self) -> f64 {
        let m = &self.0;
        match D {
            1 => m[(0, 0)],
            2 => m[(0, 0)] * m[(1, 1)] - m[(0, 1)] * m[(1, 0)],
            3 => {
                m[(0, 0)] * (m[(1, 1)] * m[(2, 2)] - m[(1, 2)] * m[(2, 1)])
                    - m[(0, 1)] * (m[(1, 0)] * m[(2, 2)] - m[(1, 2)] * m[(2, 0)])
                    + m[(0, 2)] * (m[(1, 0)] * m[(2, 1)] - m[(1, 1)] * m[(2, 0)])
            }
            _ => {
                let mut m = self.0;
                let mut det = 1.0;
                for i in 0..D {
                    let pivot = (i..D)
                        .max_by(|&a, &b| m[(a, i)].abs().total_cmp(&m[(b, i)].abs()))
                        .unwrap_or(i);
                    if m[(pivot, i)] == 0.0 {
                        return 0.0;
                    }
                    if pivot != i {
                        m.swap_rows(i, pivot);
                        det = -det;
                    }
                    det *= m[(i, i)];
                    for r in (i + 1)..D {
                        let factor = m[(r, i)] / m[(i, i)];
                        for c in i..D {
                            m[(r, c)] -= factor * m[(i, c)];
                        }
                    }
                }
                det
            }
        }
    }

    /// True when the columns are (numerically) linearly dependent.
    ///
    /// The determinant is compared against the product of the column norms,
    /// its Hadamard bound, so uniformly scaling a matrix never changes the
    /// outcome.
    pub fn is_singular(&self) -> bool {
        let bound: f64 = self.0.column_iter().map(|column| column.norm()).product();
        let det = self.determinant();
        !det.is_finite() || !bound.is_finite() || det.abs() <= SINGULARITY_TOLERANCE * bound
    }

    /// Inverse, or `None` when the matrix is singular.
    pub fn try_inverse(&self) -> Option<Self> {
        if self.is_singular() {
            return None;
        }
        self.0
            .try_inverse()
            .map(Self)
            .filter(Self::is_finite)
    }

    /// Transposed matrix.
    pub fn transpose(&self) -> Self {
        Self(self.0.transpose())
    }

    /// Check if the matrix is orthogonal (`M·Mᵀ = I`).
    pub fn is_orthogonal(&self) -> bool {
        let product = self.0 * self.0.transpose();
        Self(product).is_identity(1e-6)
    }

    /// Check if the matrix is a proper rotation (orthogonal, det = 1).
    pub fn is_proper_rotation(&self) -> bool {
        self.is_orthogonal() && (self.determinant() - 1.0).abs() < 1e-6
    }

    /// True when every entry is within `tolerance` of the identity.
    pub fn is_identity(&self, tolerance: f64) -> bool {
        (0..D).all(|r| {
            (0..D).all(|c| {
                let expected = if r == c { 1.0 } else { 0.0 };
                (self.0[(r, c)] - expected).abs() <= tolerance
            })
        })
    }

    /// True when every entry is finite.
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }

    /// Get the axis directions (columns) as vectors.
    pub fn columns(&self) -> [Vector<D>; D] {
        std::array::from_fn(|c| Vector(self.0.column(c).into_owned()))
    }

    /// Get the inner nalgebra matrix.
    pub fn inner(&self) -> &SMatrix<f64, D, D> {
        &self.0
    }
}

impl<const D: usize> Default for Matrix<D> {
    fn default() -> Self {
        Self::identity()
    }
}

impl<const D: usize> std::ops::Index<(usize, usize)> for Matrix<D> {
    type Output = f64;

    fn index(&self, index: (usize, usize)) -> &Self::Output {
        &self.0[index]
    }
}

impl<const D: usize> std::ops::IndexMut<(usize, usize)> for Matrix<D> {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut Self::Output {
        &mut self.0[index]
    }
}

impl<const D: usize> std::ops::Mul for Matrix<D> {
    type Output = Self;

    fn mul(self, other: Self) -> Self::Output {
        Self(self.0 * other.0)
    }
}

impl<const D: usize> std::ops::Mul<Vector<D>> for Matrix<D> {
    type Output = Vector<D>;

    fn mul(self, vector: Vector<D>) -> Self::Output {
        Vector(self.0 * vector.0)
    }
}

impl<const D: usize> std::ops::Add for Matrix<D> {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Self(self.0 + other.0)
    }
}

impl<const D: usize> std::ops::Mul<f64> for Matrix<D> {
    type Output = Self;

    fn mul(self, scalar: f64) -> Self::Output {
        Self(self.0 * scalar)
    }
}
