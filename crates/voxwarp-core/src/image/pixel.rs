//! Scalar pixel types.
//!
//! Interpolation always runs in `f64`; a [`Pixel`] knows how to widen its
//! samples to `f64` and how to quantize an interpolated value back.

use std::fmt::Debug;

/// Scalar sample type stored in an [`Image`](super::Image).
pub trait Pixel: Copy + Default + PartialEq + Debug + Send + Sync + 'static {
    /// Widen a sample to `f64`.
    fn to_f64(self) -> f64;

    /// Quantize an interpolated value into this type.
    ///
    /// Integer types clamp to their range and round to nearest; NaN maps to
    /// zero. Float types store the value as is.
    fn from_f64(value: f64) -> Self;
}

macro_rules! impl_integer_pixel {
    ($($t:ty),*) => {
        $(
            impl Pixel for $t {
                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }

                #[inline]
                fn from_f64(value: f64) -> Self {
                    if value.is_nan() {
                        return 0;
                    }
                    value.round().clamp(<$t>::MIN as f64, <$t>::MAX as f64) as $t
                }
            }
        )*
    };
}

impl_integer_pixel!(u8, i8, u16, i16, u32, i32);

impl Pixel for f32 {
    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    fn from_f64(value: f64) -> Self {
        value as f32
    }
}

impl Pixel for f64 {
    #[inline]
    fn to_f64(self) -> f64 {
        self
    }

    #[inline]
    fn from_f64(value: f64) -> Self {
        value
    }
}
