use std::fmt::Debug;

use num_traits::{Bounded, Zero};

/// Scalar sample type accepted by the grey-level operators.
///
/// Ordering is taken from `PartialOrd`; NaN samples never win a comparison.
pub trait Pixel: Copy + PartialOrd + Bounded + Zero + Debug + Send + Sync + 'static {
    /// Bottom of the value range (negative infinity for floats).
    fn lowest() -> Self {
        Self::min_value()
    }

    /// Top of the value range (positive infinity for floats).
    fn highest() -> Self {
        Self::max_value()
    }

    /// `self - rhs`, clamped at zero.
    fn clamped_sub(self, rhs: Self) -> Self;
}

macro_rules! impl_pixel_int {
    ($($t:ty),*) => {
        $(
            impl Pixel for $t {
                #[inline]
                fn clamped_sub(self, rhs: Self) -> Self {
                    self.saturating_sub(rhs).max(0)
                }
            }
        )*
    };
}

macro_rules! impl_pixel_float {
    ($($t:ty),*) => {
        $(
            impl Pixel for $t {
                fn lowest() -> Self {
                    <$t>::NEG_INFINITY
                }

                fn highest() -> Self {
                    <$t>::INFINITY
                }

                #[inline]
                fn clamped_sub(self, rhs: Self) -> Self {
                    (self - rhs).max(0.0)
                }
            }
        )*
    };
}

impl_pixel_int!(u8, u16, u32, u64, i8, i16, i32, i64);
impl_pixel_float!(f32, f64);

/// Larger of two samples, keeping `a` on ties and incomparable values.
#[inline]
pub(crate) fn max_of<T: PartialOrd>(a: T, b: T) -> T {
    if b > a {
        b
    } else {
        a
    }
}

/// Smaller of two samples, keeping `a` on ties and incomparable values.
#[inline]
pub(crate) fn min_of<T: PartialOrd>(a: T, b: T) -> T {
    if b < a {
        b
    } else {
        a
    }
}
