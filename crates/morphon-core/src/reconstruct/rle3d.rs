use std::collections::VecDeque;

use tracing::debug;

use crate::connectivity::Connectivity;
use crate::consts::QUEUE_PROGRESS_STEP;
use crate::error::{ensure_same_shape, MorphError, Result};
use crate::progress::{MorphStage, NoOpReporter, ProgressReporter};
use crate::rle::{Run, RunLengthImage3D};

const ADJACENT_C6: [(isize, isize); 4] = [(-1, 0), (0, -1), (0, 1), (1, 0)];
const ADJACENT_C26: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Binary reconstruction by dilation of `marker` under `mask` on volumes.
///
/// Same run propagation as the 2D version; neighbouring rows are the rows
/// at `(z + dz, y + dy)`. C6 only reaches the four face-adjacent rows with
/// the exact run extent, C26 reaches all eight with the run widened by one.
pub fn reconstruct_rle_3d(
    marker: &RunLengthImage3D,
    mask: &RunLengthImage3D,
    connectivity: &Connectivity,
) -> Result<RunLengthImage3D> {
    reconstruct_rle_3d_reported(marker, mask, connectivity, &NoOpReporter)
}

pub fn reconstruct_rle_3d_reported(
    marker: &RunLengthImage3D,
    mask: &RunLengthImage3D,
    connectivity: &Connectivity,
    reporter: &dyn ProgressReporter,
) -> Result<RunLengthImage3D> {
    ensure_same_shape(&marker.shape(), &mask.shape())?;
    let (adjacent, reach): (&[(isize, isize)], isize) = match connectivity {
        Connectivity::C6 => (&ADJACENT_C6, 0),
        Connectivity::C26 => (&ADJACENT_C26, 1),
        other => {
            return Err(MorphError::InvalidConnectivity(format!(
                "{other} cannot drive 3D run-length reconstruction, expected C6 or C26"
            )))
        }
    };
    let (size_y, size_z) = (mask.size_y(), mask.size_z());
    let mut result = RunLengthImage3D::new(mask.size_x(), size_y, size_z);

    let mut queue: VecDeque<(Run, usize, usize)> = VecDeque::new();
    for z in 0..size_z {
        for y in 0..size_y {
            let seeds = marker.row(y, z).intersection(mask.row(y, z));
            queue.extend(seeds.iter().map(|&run| (run, y, z)));
        }
    }
    debug!(seeds = queue.len(), shape = ?mask.shape(), "3D run-length reconstruction seeded");

    let mut processed = 0usize;
    reporter.begin_stage(MorphStage::RunPropagation, None);
    while let Some((run, y, z)) = queue.pop_front() {
        processed += 1;
        if result.row(y, z).contains_range(run.left(), run.right()) {
            continue;
        }
        let grown: Vec<Run> = mask
            .row(y, z)
            .intersecting_runs(run)
            .iter()
            .copied()
            .filter(|m| !result.row(y, z).contains_range(m.left(), m.right()))
            .collect();
        for filled in grown {
            result.row_mut(y, z).insert_run(filled);
            let touching = Run::new(filled.left() - reach, filled.right() + reach);
            for &(dz, dy) in adjacent {
                let (Some(nz), Some(ny)) = (z.checked_add_signed(dz), y.checked_add_signed(dy))
                else {
                    continue;
                };
                if nz >= size_z || ny >= size_y {
                    continue;
                }
                for &candidate in mask.row(ny, nz).intersecting_runs(touching) {
                    if !result.row(ny, nz).contains_range(candidate.left(), candidate.right()) {
                        queue.push_back((candidate, ny, nz));
                    }
                }
            }
        }
        if processed % QUEUE_PROGRESS_STEP == 0 {
            reporter.advance(processed);
        }
    }
    reporter.advance(processed);
    reporter.finish_stage();
    debug!(processed, cardinality = result.cardinality(), "3D run-length reconstruction done");
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corner_contact_needs_c26() {
        let mut mask = RunLengthImage3D::new(2, 2, 2);
        mask.set(0, 0, 0, true);
        mask.set(1, 1, 1, true);
        let mut marker = RunLengthImage3D::new(2, 2, 2);
        marker.set(0, 0, 0, true);
        let c6 = reconstruct_rle_3d(&marker, &mask, &Connectivity::C6).unwrap();
        assert_eq!(c6.cardinality(), 1);
        let c26 = reconstruct_rle_3d(&marker, &mask, &Connectivity::C26).unwrap();
        assert_eq!(c26, mask);
    }
}
