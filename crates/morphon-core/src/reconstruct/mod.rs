//! Morphological reconstruction.
//!
//! Scalar reconstruction uses the hybrid algorithm: a forward raster scan,
//! a backward raster scan that seeds a FIFO queue, then queue propagation
//! until nothing improves. It comes in 2D (C4/C8), 3D (C6/C26) and N-D
//! (any symmetric connectivity) flavours; [`reconstruct`] picks one.
//!
//! Binary run-length reconstruction propagates whole runs through a queue
//! instead of single pixels, see [`reconstruct_binary`].

mod hybrid2d;
mod hybrid3d;
mod hybrid_nd;
mod rle2d;
mod rle3d;

pub use hybrid2d::HybridReconstruction2D;
pub use hybrid3d::HybridReconstruction3D;
pub use hybrid_nd::HybridReconstructionND;
pub use rle2d::{reconstruct_rle_2d, reconstruct_rle_2d_reported};
pub use rle3d::{reconstruct_rle_3d, reconstruct_rle_3d_reported};

use ndarray::{Array, ArrayBase, Data, Dimension, Ix2, Ix3, Zip};
use serde::{Deserialize, Serialize};

use crate::connectivity::Connectivity;
use crate::error::{ensure_same_shape, MorphError, Result};
use crate::pixel::Pixel;
use crate::progress::{NoOpReporter, ProgressReporter};
use crate::rle::{BinaryImage, ToRunLength};

/// Direction of the reconstruction.
///
/// By dilation the result grows from the marker up to the mask; by erosion
/// it shrinks from the marker down to the mask. All comparisons of the
/// engines go through this type, so the erosion case never negates values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReconstructionType {
    #[default]
    ByDilation,
    ByErosion,
}

impl ReconstructionType {
    /// `+1` by dilation, `-1` by erosion.
    pub fn sign(self) -> i32 {
        match self {
            Self::ByDilation => 1,
            Self::ByErosion => -1,
        }
    }

    /// The opposite direction.
    pub fn other(self) -> Self {
        match self {
            Self::ByDilation => Self::ByErosion,
            Self::ByErosion => Self::ByDilation,
        }
    }

    /// True when `a` strictly improves on `b`: greater by dilation, smaller by erosion.
    #[inline]
    pub fn exceeds<T: PartialOrd>(self, a: T, b: T) -> bool {
        match self {
            Self::ByDilation => a > b,
            Self::ByErosion => a < b,
        }
    }

    /// The better of two values, keeping `a` on ties.
    #[inline]
    pub fn best<T: PartialOrd + Copy>(self, a: T, b: T) -> T {
        if self.exceeds(b, a) {
            b
        } else {
            a
        }
    }

    /// Clip `value` by `mask`: minimum by dilation, maximum by erosion.
    #[inline]
    pub fn bound<T: PartialOrd + Copy>(self, value: T, mask: T) -> T {
        if self.exceeds(value, mask) {
            mask
        } else {
            value
        }
    }

    /// Value that never improves on anything.
    pub fn neutral<T: Pixel>(self) -> T {
        match self {
            Self::ByDilation => T::lowest(),
            Self::ByErosion => T::highest(),
        }
    }
}

impl std::fmt::Display for ReconstructionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ByDilation => write!(f, "By dilation"),
            Self::ByErosion => write!(f, "By erosion"),
        }
    }
}

/// Reconstruct `marker` under `mask`.
///
/// 2D arrays with C4/C8 and 3D arrays with C6/C26 use the dedicated engines;
/// everything else goes through the N-D engine.
pub fn reconstruct<S1, S2, D>(
    marker: &ArrayBase<S1, D>,
    mask: &ArrayBase<S2, D>,
    kind: ReconstructionType,
    connectivity: &Connectivity,
) -> Result<Array<S1::Elem, D>>
where
    S1: Data,
    S2: Data<Elem = S1::Elem>,
    S1::Elem: Pixel,
    D: Dimension,
{
    reconstruct_reported(marker, mask, kind, connectivity, &NoOpReporter)
}

/// [`reconstruct`] with stage notifications sent to `reporter`.
pub fn reconstruct_reported<S1, S2, D>(
    marker: &ArrayBase<S1, D>,
    mask: &ArrayBase<S2, D>,
    kind: ReconstructionType,
    connectivity: &Connectivity,
    reporter: &dyn ProgressReporter,
) -> Result<Array<S1::Elem, D>>
where
    S1: Data,
    S2: Data<Elem = S1::Elem>,
    S1::Elem: Pixel,
    D: Dimension,
{
    ensure_same_shape(marker.shape(), mask.shape())?;
    if connectivity.dimensionality() != marker.ndim() {
        return Err(MorphError::dimensionality(
            format!("{}D (from {connectivity})", connectivity.dimensionality()),
            marker.ndim(),
        ));
    }
    let result = match (marker.ndim(), connectivity) {
        (2, Connectivity::C4 | Connectivity::C8) => {
            let engine = HybridReconstruction2D::new(kind, connectivity.clone())?;
            let marker = marker.view().into_dimensionality::<Ix2>()?;
            let mask = mask.view().into_dimensionality::<Ix2>()?;
            engine
                .apply_reported(marker, mask, reporter)?
                .into_dimensionality::<D>()?
        }
        (3, Connectivity::C6 | Connectivity::C26) => {
            let engine = HybridReconstruction3D::new(kind, connectivity.clone())?;
            let marker = marker.view().into_dimensionality::<Ix3>()?;
            let mask = mask.view().into_dimensionality::<Ix3>()?;
            engine
                .apply_reported(marker, mask, reporter)?
                .into_dimensionality::<D>()?
        }
        _ => {
            let engine = HybridReconstructionND::new(kind, connectivity.clone())?;
            engine.apply_reported(marker, mask, reporter)?
        }
    };
    Ok(result)
}

/// Elementwise `bound(marker, mask)`, the starting point of every scalar engine.
pub(crate) fn initial_result<S1, S2, D>(
    marker: &ArrayBase<S1, D>,
    mask: &ArrayBase<S2, D>,
    kind: ReconstructionType,
) -> Array<S1::Elem, D>
where
    S1: Data,
    S2: Data<Elem = S1::Elem>,
    S1::Elem: Pixel,
    D: Dimension,
{
    let mut result = marker.to_owned();
    Zip::from(&mut result)
        .and(mask)
        .for_each(|r, &m| *r = kind.bound(*r, m));
    result
}

/// Binary reconstruction of `marker` under `mask` on run-length images.
///
/// By erosion is computed as the complement of the reconstruction by
/// dilation of the complemented inputs.
pub fn reconstruct_binary<M, K>(
    marker: &M,
    mask: &K,
    kind: ReconstructionType,
    connectivity: &Connectivity,
) -> Result<BinaryImage>
where
    M: ToRunLength + ?Sized,
    K: ToRunLength + ?Sized,
{
    reconstruct_binary_reported(marker, mask, kind, connectivity, &NoOpReporter)
}

/// [`reconstruct_binary`] with stage notifications sent to `reporter`.
pub fn reconstruct_binary_reported<M, K>(
    marker: &M,
    mask: &K,
    kind: ReconstructionType,
    connectivity: &Connectivity,
    reporter: &dyn ProgressReporter,
) -> Result<BinaryImage>
where
    M: ToRunLength + ?Sized,
    K: ToRunLength + ?Sized,
{
    let marker = marker.to_run_length()?;
    let mask = mask.to_run_length()?;
    match kind {
        ReconstructionType::ByDilation => dilate_binary(&marker, &mask, connectivity, reporter),
        ReconstructionType::ByErosion => {
            let dual =
                dilate_binary(&marker.complement(), &mask.complement(), connectivity, reporter)?;
            Ok(dual.complement())
        }
    }
}

fn dilate_binary(
    marker: &BinaryImage,
    mask: &BinaryImage,
    connectivity: &Connectivity,
    reporter: &dyn ProgressReporter,
) -> Result<BinaryImage> {
    match (marker, mask) {
        (BinaryImage::Planar(marker), BinaryImage::Planar(mask)) => Ok(BinaryImage::Planar(
            reconstruct_rle_2d_reported(marker, mask, connectivity, reporter)?,
        )),
        (BinaryImage::Volume(marker), BinaryImage::Volume(mask)) => Ok(BinaryImage::Volume(
            reconstruct_rle_3d_reported(marker, mask, connectivity, reporter)?,
        )),
        _ => Err(MorphError::shape_mismatch(&marker.shape(), &mask.shape())),
    }
}
