use tracing::debug;

use crate::error::Result;
use crate::progress::{NoOpReporter, ProgressReporter};
use crate::rle::{BinaryImage, RunLengthImage2D, RunLengthImage3D, ToRunLength};
use crate::strel::Strel;

use super::row_kernel::RowOperator;
use super::sweep::{sweep_2d, sweep_3d};

/// Binary dilation: `out[p]` is set when `image[p - s]` is set for some shift `s`.
///
/// Accepts dense boolean arrays or run-length images of dimensionality 2 or
/// 3 and always returns a new run-length image.
pub fn dilation<I: ToRunLength + ?Sized>(image: &I, strel: &Strel) -> Result<BinaryImage> {
    dilation_reported(image, strel, &NoOpReporter)
}

/// [`dilation`] with per-row progress sent to `reporter`.
pub fn dilation_reported<I: ToRunLength + ?Sized>(
    image: &I,
    strel: &Strel,
    reporter: &dyn ProgressReporter,
) -> Result<BinaryImage> {
    let image = image.to_run_length()?;
    filter(&image, strel, RowOperator::Dilation, false, reporter)
}

/// Binary erosion: `out[p]` is set when `image[p + s]` is set for every shift `s`.
///
/// Without `pad`, positions outside the image count as background, so
/// foreground touching the border shrinks away from it. With `pad`, the
/// nearest border pixel is replicated outwards.
pub fn erosion<I: ToRunLength + ?Sized>(
    image: &I,
    strel: &Strel,
    pad: bool,
) -> Result<BinaryImage> {
    erosion_reported(image, strel, pad, &NoOpReporter)
}

/// [`erosion`] with per-row progress sent to `reporter`.
pub fn erosion_reported<I: ToRunLength + ?Sized>(
    image: &I,
    strel: &Strel,
    pad: bool,
    reporter: &dyn ProgressReporter,
) -> Result<BinaryImage> {
    let image = image.to_run_length()?;
    filter(&image, strel, RowOperator::Erosion, pad, reporter)
}

/// Erosion followed by dilation with the same element.
pub fn opening<I: ToRunLength + ?Sized>(
    image: &I,
    strel: &Strel,
    pad: bool,
) -> Result<BinaryImage> {
    let eroded = erosion(image, strel, pad)?;
    dilation(&eroded, strel)
}

/// Dilation followed by erosion with the same element.
pub fn closing<I: ToRunLength + ?Sized>(
    image: &I,
    strel: &Strel,
    pad: bool,
) -> Result<BinaryImage> {
    let dilated = dilation(image, strel)?;
    erosion(&dilated, strel, pad)
}

pub fn dilation_2d(image: &RunLengthImage2D, strel: &Strel) -> Result<RunLengthImage2D> {
    let table = strel.row_table_2d()?;
    Ok(sweep_2d(image, &table, RowOperator::Dilation, false, &NoOpReporter))
}

pub fn erosion_2d(image: &RunLengthImage2D, strel: &Strel, pad: bool) -> Result<RunLengthImage2D> {
    let table = strel.row_table_2d()?;
    Ok(sweep_2d(image, &table, RowOperator::Erosion, pad, &NoOpReporter))
}

pub fn dilation_3d(image: &RunLengthImage3D, strel: &Strel) -> Result<RunLengthImage3D> {
    let table = strel.row_table_3d()?;
    Ok(sweep_3d(image, &table, RowOperator::Dilation, false, &NoOpReporter))
}

pub fn erosion_3d(image: &RunLengthImage3D, strel: &Strel, pad: bool) -> Result<RunLengthImage3D> {
    let table = strel.row_table_3d()?;
    Ok(sweep_3d(image, &table, RowOperator::Erosion, pad, &NoOpReporter))
}

fn filter(
    image: &BinaryImage,
    strel: &Strel,
    op: RowOperator,
    pad: bool,
    reporter: &dyn ProgressReporter,
) -> Result<BinaryImage> {
    debug!(
        operator = ?op,
        shape = ?image.shape(),
        strel = ?strel.size(),
        pad,
        "binary morphology"
    );
    let result = match image {
        BinaryImage::Planar(planar) => {
            let table = strel.row_table_2d()?;
            BinaryImage::Planar(sweep_2d(planar, &table, op, pad, reporter))
        }
        BinaryImage::Volume(volume) => {
            let table = strel.row_table_3d()?;
            BinaryImage::Volume(sweep_3d(volume, &table, op, pad, reporter))
        }
    };
    debug!(cardinality = result.cardinality(), "binary morphology done");
    Ok(result)
}
