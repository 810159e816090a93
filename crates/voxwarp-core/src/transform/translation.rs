//! Translation transform implementation.

use serde::{Deserialize, Serialize};

use super::trait_::Transform;
use crate::spatial::{Point, Vector};

/// Simple Translation Transform.
///
/// Translates points by a fixed offset vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TranslationTransform<const D: usize> {
    translation: Vector<D>,
}

impl<const D: usize> TranslationTransform<D> {
    /// Create a new translation transform.
    pub fn new(translation: Vector<D>) -> Self {
        Self { translation }
    }

    /// Get the translation vector.
    pub fn translation(&self) -> &Vector<D> {
        &self.translation
    }
}

impl<const D: usize> Transform<D> for TranslationTransform<D> {
    fn transform_point(&self, point: &Point<D>) -> Point<D> {
        *point + self.translation
    }

    fn inverse(&self) -> Option<Box<dyn Transform<D>>> {
        Some(Box::new(Self::new(-self.translation)))
    }
}
