use thiserror::Error;

#[derive(Error, Debug)]
pub enum MorphError {
    #[error("Invalid dimensionality: expected {expected}, got {actual}")]
    InvalidDimensionality { expected: String, actual: usize },

    #[error("Shape mismatch: {left:?} vs {right:?}")]
    ShapeMismatch { left: Vec<usize>, right: Vec<usize> },

    #[error("Invalid connectivity: {0}")]
    InvalidConnectivity(String),

    #[error("Invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

impl MorphError {
    pub(crate) fn dimensionality(expected: impl Into<String>, actual: usize) -> Self {
        Self::InvalidDimensionality {
            expected: expected.into(),
            actual,
        }
    }

    pub(crate) fn shape_mismatch(left: &[usize], right: &[usize]) -> Self {
        Self::ShapeMismatch {
            left: left.to_vec(),
            right: right.to_vec(),
        }
    }

    pub(crate) fn parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MorphError>;

/// Fails with `ShapeMismatch` unless both shapes are identical.
pub(crate) fn ensure_same_shape(left: &[usize], right: &[usize]) -> Result<()> {
    if left == right {
        Ok(())
    } else {
        Err(MorphError::shape_mismatch(left, right))
    }
}
