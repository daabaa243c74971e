use std::borrow::Cow;

use ndarray::{Array2, Array3, ArrayD, Ix2, Ix3};

use crate::error::{MorphError, Result};

use super::image2d::RunLengthImage2D;
use super::image3d::RunLengthImage3D;

/// Run-length binary image of supported dimensionality.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BinaryImage {
    Planar(RunLengthImage2D),
    Volume(RunLengthImage3D),
}

impl BinaryImage {
    /// Encode a dense boolean array; only 2D and 3D arrays are accepted.
    pub fn from_dense(array: &ArrayD<bool>) -> Result<Self> {
        match array.ndim() {
            2 => {
                let view = array.view().into_dimensionality::<Ix2>()?;
                Ok(Self::Planar(RunLengthImage2D::from_view(view)))
            }
            3 => {
                let view = array.view().into_dimensionality::<Ix3>()?;
                Ok(Self::Volume(RunLengthImage3D::from_view(view)))
            }
            d => Err(MorphError::dimensionality("2 or 3", d)),
        }
    }

    /// Decode into a dynamic-dimension dense array.
    pub fn to_dense(&self) -> ArrayD<bool> {
        match self {
            Self::Planar(image) => image.to_dense().into_dyn(),
            Self::Volume(image) => image.to_dense().into_dyn(),
        }
    }

    /// 2 for planar images, 3 for volumes.
    pub fn dimensionality(&self) -> usize {
        match self {
            Self::Planar(_) => 2,
            Self::Volume(_) => 3,
        }
    }

    /// Shape in array axis order.
    pub fn shape(&self) -> Vec<usize> {
        match self {
            Self::Planar(image) => image.shape().to_vec(),
            Self::Volume(image) => image.shape().to_vec(),
        }
    }

    pub fn cardinality(&self) -> usize {
        match self {
            Self::Planar(image) => image.cardinality(),
            Self::Volume(image) => image.cardinality(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Planar(image) => image.is_empty(),
            Self::Volume(image) => image.is_empty(),
        }
    }

    /// Complement within the image bounds.
    pub fn complement(&self) -> Self {
        match self {
            Self::Planar(image) => Self::Planar(image.complement()),
            Self::Volume(image) => Self::Volume(image.complement()),
        }
    }

    /// Union of two images of the same variant and shape.
    pub fn union(&self, other: &Self) -> Result<Self> {
        match (self, other) {
            (Self::Planar(a), Self::Planar(b)) => a.union(b).map(Self::Planar),
            (Self::Volume(a), Self::Volume(b)) => a.union(b).map(Self::Volume),
            _ => Err(MorphError::shape_mismatch(&self.shape(), &other.shape())),
        }
    }

    pub fn intersection(&self, other: &Self) -> Result<Self> {
        match (self, other) {
            (Self::Planar(a), Self::Planar(b)) => a.intersection(b).map(Self::Planar),
            (Self::Volume(a), Self::Volume(b)) => a.intersection(b).map(Self::Volume),
            _ => Err(MorphError::shape_mismatch(&self.shape(), &other.shape())),
        }
    }

    /// Pixels set in `self` and not in `other`.
    pub fn difference(&self, other: &Self) -> Result<Self> {
        match (self, other) {
            (Self::Planar(a), Self::Planar(b)) => a.difference(b).map(Self::Planar),
            (Self::Volume(a), Self::Volume(b)) => a.difference(b).map(Self::Volume),
            _ => Err(MorphError::shape_mismatch(&self.shape(), &other.shape())),
        }
    }
}

impl From<RunLengthImage2D> for BinaryImage {
    fn from(image: RunLengthImage2D) -> Self {
        Self::Planar(image)
    }
}

impl From<RunLengthImage3D> for BinaryImage {
    fn from(image: RunLengthImage3D) -> Self {
        Self::Volume(image)
    }
}

/// Conversion into the run-length representation used by the binary operators.
///
/// Run-length inputs are borrowed as-is; dense inputs are encoded.
pub trait ToRunLength {
    fn to_run_length(&self) -> Result<Cow<'_, BinaryImage>>;
}

impl ToRunLength for BinaryImage {
    fn to_run_length(&self) -> Result<Cow<'_, BinaryImage>> {
        Ok(Cow::Borrowed(self))
    }
}

impl ToRunLength for RunLengthImage2D {
    fn to_run_length(&self) -> Result<Cow<'_, BinaryImage>> {
        Ok(Cow::Owned(BinaryImage::Planar(self.clone())))
    }
}

impl ToRunLength for RunLengthImage3D {
    fn to_run_length(&self) -> Result<Cow<'_, BinaryImage>> {
        Ok(Cow::Owned(BinaryImage::Volume(self.clone())))
    }
}

impl ToRunLength for Array2<bool> {
    fn to_run_length(&self) -> Result<Cow<'_, BinaryImage>> {
        Ok(Cow::Owned(BinaryImage::Planar(RunLengthImage2D::from_dense(self))))
    }
}

impl ToRunLength for Array3<bool> {
    fn to_run_length(&self) -> Result<Cow<'_, BinaryImage>> {
        Ok(Cow::Owned(BinaryImage::Volume(RunLengthImage3D::from_dense(self))))
    }
}

impl ToRunLength for ArrayD<bool> {
    fn to_run_length(&self) -> Result<Cow<'_, BinaryImage>> {
        BinaryImage::from_dense(self).map(Cow::Owned)
    }
}
