use std::collections::VecDeque;

use tracing::debug;

use crate::connectivity::Connectivity;
use crate::consts::QUEUE_PROGRESS_STEP;
use crate::error::{ensure_same_shape, MorphError, Result};
use crate::progress::{MorphStage, NoOpReporter, ProgressReporter};
use crate::rle::{Run, RunLengthImage2D};

/// Binary reconstruction by dilation of `marker` under `mask`.
///
/// The queue holds runs known to belong to the result. Popping one fills
/// every mask run it overlaps in one step, then queues the mask runs of the
/// adjacent rows touching the filled runs (widened by one pixel for C8).
pub fn reconstruct_rle_2d(
    marker: &RunLengthImage2D,
    mask: &RunLengthImage2D,
    connectivity: &Connectivity,
) -> Result<RunLengthImage2D> {
    reconstruct_rle_2d_reported(marker, mask, connectivity, &NoOpReporter)
}

pub fn reconstruct_rle_2d_reported(
    marker: &RunLengthImage2D,
    mask: &RunLengthImage2D,
    connectivity: &Connectivity,
    reporter: &dyn ProgressReporter,
) -> Result<RunLengthImage2D> {
    ensure_same_shape(&marker.shape(), &mask.shape())?;
    let reach = match connectivity {
        Connectivity::C4 => 0,
        Connectivity::C8 => 1,
        other => {
            return Err(MorphError::InvalidConnectivity(format!(
                "{other} cannot drive 2D run-length reconstruction, expected C4 or C8"
            )))
        }
    };
    let size_y = mask.size_y();
    let mut result = RunLengthImage2D::new(mask.size_x(), size_y);

    let mut queue: VecDeque<(Run, usize)> = VecDeque::new();
    for y in 0..size_y {
        let seeds = marker.row(y).intersection(mask.row(y));
        queue.extend(seeds.iter().map(|&run| (run, y)));
    }
    debug!(seeds = queue.len(), shape = ?mask.shape(), "2D run-length reconstruction seeded");

    let mut processed = 0usize;
    reporter.begin_stage(MorphStage::RunPropagation, None);
    while let Some((run, y)) = queue.pop_front() {
        processed += 1;
        if result.row(y).contains_range(run.left(), run.right()) {
            continue;
        }
        let grown: Vec<Run> = mask
            .row(y)
            .intersecting_runs(run)
            .iter()
            .copied()
            .filter(|m| !result.row(y).contains_range(m.left(), m.right()))
            .collect();
        for filled in grown {
            result.row_mut(y).insert_run(filled);
            let touching = Run::new(filled.left() - reach, filled.right() + reach);
            let adjacent = [y.checked_sub(1), (y + 1 < size_y).then_some(y + 1)];
            for ny in adjacent.into_iter().flatten() {
                for &candidate in mask.row(ny).intersecting_runs(touching) {
                    if !result.row(ny).contains_range(candidate.left(), candidate.right()) {
                        queue.push_back((candidate, ny));
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
    debug!(processed, cardinality = result.cardinality(), "2D run-length reconstruction done");
    Ok(result)
}
