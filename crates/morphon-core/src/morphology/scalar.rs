use ndarray::{Array, ArrayBase, Data, Dimension};
use rayon::prelude::*;
use tracing::debug;

use crate::consts::PARALLEL_PIXEL_THRESHOLD;
use crate::error::{MorphError, Result};
use crate::grid::Grid;
use crate::pixel::{max_of, min_of, Pixel};
use crate::strel::Strel;

use super::BorderMode;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Extremum {
    Max,
    Min,
}

/// Grey-level dilation: `out[p] = max over s of input[p - s]`.
///
/// Works for any dimensionality matching the structuring element.
pub fn dilation<S, D>(
    input: &ArrayBase<S, D>,
    strel: &Strel,
    border: BorderMode,
) -> Result<Array<S::Elem, D>>
where
    S: Data,
    S::Elem: Pixel,
    D: Dimension,
{
    neighborhood_filter(input, strel, border, Extremum::Max)
}

/// Grey-level erosion: `out[p] = min over s of input[p + s]`.
pub fn erosion<S, D>(
    input: &ArrayBase<S, D>,
    strel: &Strel,
    border: BorderMode,
) -> Result<Array<S::Elem, D>>
where
    S: Data,
    S::Elem: Pixel,
    D: Dimension,
{
    neighborhood_filter(input, strel, border, Extremum::Min)
}

/// Erosion followed by dilation with the same element.
pub fn opening<S, D>(
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
    dilation(&eroded, strel, border)
}

/// Dilation followed by erosion with the same element.
pub fn closing<S, D>(
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
    erosion(&dilated, strel, border)
}

fn neighborhood_filter<S, D>(
    input: &ArrayBase<S, D>,
    strel: &Strel,
    border: BorderMode,
    extremum: Extremum,
) -> Result<Array<S::Elem, D>>
where
    S: Data,
    S::Elem: Pixel,
    D: Dimension,
{
    if strel.dimensionality() != input.ndim() {
        return Err(MorphError::dimensionality(
            strel.dimensionality().to_string(),
            input.ndim(),
        ));
    }
    let shifts: Vec<Vec<isize>> = match extremum {
        Extremum::Max => strel
            .shifts()
            .into_iter()
            .map(|s| s.into_iter().map(|v| -v).collect())
            .collect(),
        Extremum::Min => strel.shifts(),
    };
    let neutral = match extremum {
        Extremum::Max => <S::Elem as Pixel>::lowest(),
        Extremum::Min => <S::Elem as Pixel>::highest(),
    };
    let values: Vec<S::Elem> = input.iter().copied().collect();
    let grid = Grid::new(input.shape());
    let ndim = grid.ndim();
    debug!(
        shape = ?input.shape(),
        shifts = shifts.len(),
        ?border,
        ?extremum,
        "scalar neighbourhood filter"
    );

    let evaluate = |coords: &mut Vec<usize>, index: usize| -> S::Elem {
        grid.unravel(index, coords);
        let mut acc: Option<S::Elem> = None;
        for shift in &shifts {
            let neighbor = match border {
                BorderMode::Ignore => grid.neighbor(coords, shift),
                BorderMode::Replicate => Some(grid.clamped_neighbor(coords, shift)),
            };
            let Some(j) = neighbor else { continue };
            let v = values[j];
            acc = Some(match (acc, extremum) {
                (None, _) => v,
                (Some(a), Extremum::Max) => max_of(a, v),
                (Some(a), Extremum::Min) => min_of(a, v),
            });
        }
        acc.unwrap_or(neutral)
    };

    let output: Vec<S::Elem> = if grid.len() >= PARALLEL_PIXEL_THRESHOLD {
        (0..grid.len())
            .into_par_iter()
            .map_init(|| vec![0usize; ndim], |coords, i| evaluate(coords, i))
            .collect()
    } else {
        let mut coords = vec![0usize; ndim];
        (0..grid.len()).map(|i| evaluate(&mut coords, i)).collect()
    };
    Ok(Array::from_shape_vec(input.raw_dim(), output)?)
}
