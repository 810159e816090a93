//! Transform types and operations.
//!
//! Transforms map points between physical spaces. The resample filter
//! applies them in the output → input direction.

pub mod trait_;
pub mod translation;
pub mod scale;
pub mod affine;
pub mod chained;

pub use trait_::{IdentityTransform, Transform};
pub use translation::TranslationTransform;
pub use scale::ScaleTransform;
pub use affine::{rotation_matrix_3d, AffineTransform};
pub use chained::ChainedTransform;
