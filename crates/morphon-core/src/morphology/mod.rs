//! Dilation, erosion, opening and closing.
//!
//! [`binary`] works on run-length images through a buffered row sweep;
//! [`scalar`] works on dense grey-level arrays of any dimensionality.

pub mod binary;
mod buffer;
mod row_kernel;
pub mod scalar;
mod sweep;

pub use row_kernel::{dilate_row, erode_row};

use serde::{Deserialize, Serialize};

/// How neighbours outside the array are treated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BorderMode {
    /// Outside neighbours do not take part. Binary erosion reads this as
    /// "outside is background".
    #[default]
    Ignore,
    /// Outside neighbours take the value of the nearest in-range sample.
    Replicate,
}

impl BorderMode {
    /// Whether binary erosion should pad the image borders.
    pub fn pads(self) -> bool {
        self == Self::Replicate
    }
}

impl std::fmt::Display for BorderMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ignore => write!(f, "Ignore"),
            Self::Replicate => write!(f, "Replicate"),
        }
    }
}
