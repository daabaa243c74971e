use tracing::debug;

use crate::connectivity::Connectivity;
use crate::error::Result;
use crate::morphology::binary::{closing, dilation, erosion, opening};
use crate::reconstruct::{reconstruct_binary, ReconstructionType};
use crate::rle::{BinaryImage, RunLengthImage2D, RunLengthImage3D, ToRunLength};
use crate::strel::Strel;

/// Dilation minus erosion: the pixels on either side of every edge.
pub fn gradient<I: ToRunLength + ?Sized>(
    image: &I,
    strel: &Strel,
    pad: bool,
) -> Result<BinaryImage> {
    let image = image.to_run_length()?;
    let dilated = dilation(&*image, strel)?;
    let eroded = erosion(&*image, strel, pad)?;
    dilated.difference(&eroded)
}

/// Foreground pixels removed by an erosion.
pub fn inner_gradient<I: ToRunLength + ?Sized>(
    image: &I,
    strel: &Strel,
    pad: bool,
) -> Result<BinaryImage> {
    let image = image.to_run_length()?;
    let eroded = erosion(&*image, strel, pad)?;
    image.difference(&eroded)
}

/// Background pixels added by a dilation.
pub fn outer_gradient<I: ToRunLength + ?Sized>(image: &I, strel: &Strel) -> Result<BinaryImage> {
    let image = image.to_run_length()?;
    let dilated = dilation(&*image, strel)?;
    dilated.difference(&image)
}

/// Foreground details smaller than the element: `image - opening(image)`.
pub fn white_top_hat<I: ToRunLength + ?Sized>(
    image: &I,
    strel: &Strel,
    pad: bool,
) -> Result<BinaryImage> {
    let image = image.to_run_length()?;
    let opened = opening(&*image, strel, pad)?;
    image.difference(&opened)
}

/// Background details smaller than the element: `closing(image) - image`.
pub fn black_top_hat<I: ToRunLength + ?Sized>(
    image: &I,
    strel: &Strel,
    pad: bool,
) -> Result<BinaryImage> {
    let image = image.to_run_length()?;
    let closed = closing(&*image, strel, pad)?;
    closed.difference(&image)
}

/// Set every background component that does not touch the image border.
///
/// The background is reconstructed from the border under the complemented
/// image; whatever the reconstruction misses is a hole.
pub fn fill_holes<I: ToRunLength + ?Sized>(
    image: &I,
    connectivity: &Connectivity,
) -> Result<BinaryImage> {
    let image = image.to_run_length()?;
    let background = image.complement();
    let reached = reconstruct_binary(
        &border_of(&image),
        &background,
        ReconstructionType::ByDilation,
        connectivity,
    )?;
    let filled = reached.complement();
    debug!(
        holes = filled.cardinality() - image.cardinality(),
        "holes filled"
    );
    Ok(filled)
}

/// Clear every foreground component that touches the image border.
pub fn kill_borders<I: ToRunLength + ?Sized>(
    image: &I,
    connectivity: &Connectivity,
) -> Result<BinaryImage> {
    let image = image.to_run_length()?;
    let touching = reconstruct_binary(
        &border_of(&image),
        &*image,
        ReconstructionType::ByDilation,
        connectivity,
    )?;
    image.difference(&touching)
}

/// Image of the same shape, set on its outer boundary.
fn border_of(image: &BinaryImage) -> BinaryImage {
    match image {
        BinaryImage::Planar(planar) => {
            RunLengthImage2D::border(planar.size_x(), planar.size_y()).into()
        }
        BinaryImage::Volume(volume) => {
            RunLengthImage3D::border(volume.size_x(), volume.size_y(), volume.size_z()).into()
        }
    }
}
