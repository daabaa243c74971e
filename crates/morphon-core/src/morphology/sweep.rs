use std::borrow::Cow;

use crate::consts::PROGRESS_GRANULARITY;
use crate::progress::{NoOpReporter, ProgressReporter};
use crate::rle::{BinaryRow, RunLengthImage2D, RunLengthImage3D};
use crate::strel::{RowTable2D, RowTable3D};

use super::buffer::{FilteredRowBuffer, FilteredSliceBuffer};
use super::row_kernel::RowOperator;

/// Filter a 2D image row by row.
///
/// Output row `y` combines data row `y + sign * dy` filtered by element row
/// `dy`, for every active element row. Each data row is filtered once against
/// all element rows and kept in a [`FilteredRowBuffer`] while the sweep needs it.
///
/// With `pad`, erosion replicates the nearest border row and column instead
/// of treating the outside as background. Dilation ignores `pad`.
pub(crate) fn sweep_2d(
    image: &RunLengthImage2D,
    table: &RowTable2D,
    op: RowOperator,
    pad: bool,
    reporter: &dyn ProgressReporter,
) -> RunLengthImage2D {
    let (size_x, size_y) = (image.size_x(), image.size_y());
    let active: Vec<(usize, isize)> = table
        .active_rows()
        .map(|k| (k, op.scan_sign() * table.dy(k)))
        .collect();
    let Some((lo, hi)) = shift_range(&active) else {
        return unconstrained_2d(op, size_x, size_y);
    };

    let replicate = pad && op == RowOperator::Erosion;
    let x_hi = size_x as isize - 1;
    let pad_x = table.max_dx() as isize;
    let fetch = |index: isize| -> Option<Vec<BinaryRow>> {
        let y = resolve_index(index, size_y, replicate)?;
        let data = if replicate {
            Cow::Owned(image.row(y).padded(0, x_hi, pad_x))
        } else {
            Cow::Borrowed(image.row(y))
        };
        Some(
            active
                .iter()
                .map(|&(k, _)| op.apply(&data, &table.rows()[k]))
                .collect(),
        )
    };

    let mut buffer = FilteredRowBuffer::new(lo, (hi - lo) as usize + 1);
    for index in lo..hi {
        buffer.update(fetch(index));
    }

    let mut result = RunLengthImage2D::new(size_x, size_y);
    reporter.begin_stage(op.stage(), Some(size_y));
    for y in 0..size_y {
        let y_signed = y as isize;
        buffer.update(fetch(y_signed + hi));
        let parts = active
            .iter()
            .enumerate()
            .map(|(i, &(_, shift))| buffer.get(y_signed + shift).map(|rows| &rows[i]));
        result.set_row(y, combine_rows(op, parts));
        if (y + 1) % PROGRESS_GRANULARITY == 0 || y + 1 == size_y {
            reporter.advance(y + 1);
        }
    }
    reporter.finish_stage();
    result
}

/// Filter a 3D image slice by slice.
///
/// Output slice `z` combines the 2D filtering of data slice `z + sign * dz`
/// by element plane `dz`, for every active plane.
pub(crate) fn sweep_3d(
    image: &RunLengthImage3D,
    table: &RowTable3D,
    op: RowOperator,
    pad: bool,
    reporter: &dyn ProgressReporter,
) -> RunLengthImage3D {
    let (size_x, size_y, size_z) = (image.size_x(), image.size_y(), image.size_z());
    let active: Vec<(usize, isize)> = table
        .active_planes()
        .map(|p| (p, op.scan_sign() * table.dz(p)))
        .collect();
    let Some((lo, hi)) = shift_range(&active) else {
        return match op {
            RowOperator::Dilation => RunLengthImage3D::new(size_x, size_y, size_z),
            RowOperator::Erosion => RunLengthImage3D::filled(size_x, size_y, size_z),
        };
    };

    let replicate = pad && op == RowOperator::Erosion;
    let fetch = |index: isize| -> Option<Vec<RunLengthImage2D>> {
        let z = resolve_index(index, size_z, replicate)?;
        Some(
            active
                .iter()
                .map(|&(p, _)| sweep_2d(image.slice(z), &table.planes()[p], op, pad, &NoOpReporter))
                .collect(),
        )
    };

    let mut buffer = FilteredSliceBuffer::new(lo, (hi - lo) as usize + 1);
    for index in lo..hi {
        buffer.update(fetch(index));
    }

    let mut result = RunLengthImage3D::new(size_x, size_y, size_z);
    reporter.begin_stage(op.stage(), Some(size_z));
    for z in 0..size_z {
        let z_signed = z as isize;
        buffer.update(fetch(z_signed + hi));
        let parts: Vec<Option<&RunLengthImage2D>> = active
            .iter()
            .enumerate()
            .map(|(i, &(_, shift))| buffer.get(z_signed + shift).map(|slices| &slices[i]))
            .collect();
        let slice = result.slice_mut(z);
        for y in 0..size_y {
            let row = combine_rows(op, parts.iter().map(|part| part.map(|s| s.row(y))));
            slice.set_row(y, row);
        }
        reporter.advance(z + 1);
    }
    reporter.finish_stage();
    result
}

/// Union (dilation) or intersection (erosion) of the filtered parts.
///
/// A missing part is an out-of-range data row: it adds nothing to a
/// dilation and empties an erosion.
fn combine_rows<'a>(
    op: RowOperator,
    parts: impl Iterator<Item = Option<&'a BinaryRow>>,
) -> BinaryRow {
    match op {
        RowOperator::Dilation => parts
            .flatten()
            .fold(BinaryRow::new(), |acc, row| acc.union(row)),
        RowOperator::Erosion => {
            let mut acc: Option<BinaryRow> = None;
            for part in parts {
                let Some(row) = part else {
                    return BinaryRow::new();
                };
                let next = match acc {
                    None => row.clone(),
                    Some(current) => current.intersection(row),
                };
                if next.is_empty() {
                    return next;
                }
                acc = Some(next);
            }
            acc.unwrap_or_default()
        }
    }
}

fn shift_range(active: &[(usize, isize)]) -> Option<(isize, isize)> {
    let lo = active.iter().map(|&(_, shift)| shift).min()?;
    let hi = active.iter().map(|&(_, shift)| shift).max()?;
    Some((lo, hi))
}

/// Map a sweep index onto a data index, clamping when replicating borders.
fn resolve_index(index: isize, len: usize, replicate: bool) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let last = len as isize - 1;
    if (0..=last).contains(&index) {
        Some(index as usize)
    } else if replicate {
        Some(index.clamp(0, last) as usize)
    } else {
        None
    }
}

/// Result of filtering by an element without any active row.
fn unconstrained_2d(op: RowOperator, size_x: usize, size_y: usize) -> RunLengthImage2D {
    match op {
        RowOperator::Dilation => RunLengthImage2D::new(size_x, size_y),
        RowOperator::Erosion => RunLengthImage2D::filled(size_x, size_y),
    }
}
