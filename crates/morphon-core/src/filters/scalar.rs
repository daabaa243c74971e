use ndarray::{Array, ArrayBase, Data, Dimension, IntoDimension, Zip};

use crate::connectivity::Connectivity;
use crate::error::Result;
use crate::grid::Grid;
use crate::morphology::scalar::{closing, dilation, erosion, opening};
use crate::morphology::BorderMode;
use crate::pixel::Pixel;
use crate::reconstruct::{reconstruct, ReconstructionType};
use crate::strel::Strel;

/// Morphological gradient: `dilation - erosion`.
pub fn gradient<S, D>(
    input: &ArrayBase<S, D>,
    strel: &Strel,
    border: BorderMode,
) -> Result<Array<S::Elem, D>>
where
    S: Data,
    S::Elem: Pixel,
    D: Dimension,
{
    let dilated = dilation(input, strel, border)?;
    let eroded = erosion(input, strel, border)?;
    Ok(clamped_difference(dilated, &eroded))
}

/// `input - erosion`.
pub fn inner_gradient<S, D>(
    input: &ArrayBase<S, D>,
    strel: &Strel,
    border: BorderMode,
) -> Result<Array<S::Elem, D>>
where
    S: Data,
    S::Elem: Pixel,
    D: Dimension,
{
    let eroded = erosion(input, strel, border)?;
    Ok(clamped_difference(input.to_owned(), &eroded))
}

/// `dilation - input`.
pub fn outer_gradient<S, D>(
    input: &ArrayBase<S, D>,
    strel: &Strel,
    border: BorderMode,
) -> Result<Array<S::Elem, D>>
where
    S: Data,
    S::Elem: Pixel,
    D: Dimension,
{
    let dilated = dilation(input, strel, border)?;
    Ok(clamped_difference(dilated, input))
}

/// `input - opening`: bright details narrower than the element.
pub fn white_top_hat<S, D>(
    input: &ArrayBase<S, D>,
    strel: &Strel,
    border: BorderMode,
) -> Result<Array<S::Elem, D>>
where
    S: Data,
    S::Elem: Pixel,
    D: Dimension,
{
    let opened = opening(input, strel, border)?;
    Ok(clamped_difference(input.to_owned(), &opened))
}

/// `closing - input`: dark details narrower than the element.
pub fn black_top_hat<S, D>(
    input: &ArrayBase<S, D>,
    strel: &Strel,
    border: BorderMode,
) -> Result<Array<S::Elem, D>>
where
    S: Data,
    S::Elem: Pixel,
    D: Dimension,
{
    let closed = closing(input, strel, border)?;
    Ok(clamped_difference(closed, input))
}

/// Remove bright structures connected to the array border.
///
/// The border values are reconstructed by dilation under the input and the
/// reconstruction is subtracted, clamping at zero.
pub fn kill_borders<S, D>(
    input: &ArrayBase<S, D>,
    connectivity: &Connectivity,
) -> Result<Array<S::Elem, D>>
where
    S: Data,
    S::Elem: Pixel,
    D: Dimension,
{
    let marker = border_marker(input, <S::Elem as Pixel>::lowest());
    let reconstructed = reconstruct(&marker, input, ReconstructionType::ByDilation, connectivity)?;
    Ok(clamped_difference(input.to_owned(), &reconstructed))
}

/// Fill dark regions not connected to the array border.
///
/// The border values are reconstructed by erosion under the input, which
/// raises every enclosed basin to the level of its lowest exit.
pub fn fill_holes<S, D>(
    input: &ArrayBase<S, D>,
    connectivity: &Connectivity,
) -> Result<Array<S::Elem, D>>
where
    S: Data,
    S::Elem: Pixel,
    D: Dimension,
{
    let marker = border_marker(input, <S::Elem as Pixel>::highest());
    reconstruct(&marker, input, ReconstructionType::ByErosion, connectivity)
}

/// Copy of `input` with every interior sample replaced by `interior`.
fn border_marker<S, D>(input: &ArrayBase<S, D>, interior: S::Elem) -> Array<S::Elem, D>
where
    S: Data,
    S::Elem: Pixel,
    D: Dimension,
{
    let grid = Grid::new(input.shape());
    let mut marker = input.to_owned();
    for (index, value) in marker.indexed_iter_mut() {
        if !grid.is_border(index.into_dimension().slice()) {
            *value = interior;
        }
    }
    marker
}

/// `minuend - subtrahend`, elementwise and clamped at zero.
fn clamped_difference<S, D, T>(
    mut minuend: Array<T, D>,
    subtrahend: &ArrayBase<S, D>,
) -> Array<T, D>
where
    S: Data<Elem = T>,
    T: Pixel,
    D: Dimension,
{
    Zip::from(&mut minuend)
        .and(subtrahend)
        .for_each(|a, &b| *a = a.clamped_sub(b));
    minuend
}
