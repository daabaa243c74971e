use std::collections::VecDeque;

use ndarray::{Array2, ArrayView2};
use tracing::debug;

use crate::connectivity::Connectivity;
use crate::consts::{PROGRESS_GRANULARITY, QUEUE_PROGRESS_STEP};
use crate::error::{ensure_same_shape, MorphError, Result};
use crate::pixel::Pixel;
use crate::progress::{MorphStage, NoOpReporter, ProgressReporter};

use super::{initial_result, ReconstructionType};

const FORWARD_C4: [(isize, isize); 2] = [(0, -1), (-1, 0)];
const FORWARD_C8: [(isize, isize); 4] = [(-1, -1), (-1, 0), (-1, 1), (0, -1)];
const BACKWARD_C4: [(isize, isize); 2] = [(0, 1), (1, 0)];
const BACKWARD_C8: [(isize, isize); 4] = [(1, 1), (1, 0), (1, -1), (0, 1)];

/// Hybrid reconstruction of 2D arrays with 4- or 8-connectivity.
#[derive(Clone, Debug)]
pub struct HybridReconstruction2D {
    kind: ReconstructionType,
    connectivity: Connectivity,
}

impl HybridReconstruction2D {
    /// Fails with `InvalidConnectivity` unless `connectivity` is C4 or C8.
    pub fn new(kind: ReconstructionType, connectivity: Connectivity) -> Result<Self> {
        match connectivity {
            Connectivity::C4 | Connectivity::C8 => Ok(Self { kind, connectivity }),
            other => Err(MorphError::InvalidConnectivity(format!(
                "{other} cannot drive 2D reconstruction, expected C4 or C8"
            ))),
        }
    }

    pub fn kind(&self) -> ReconstructionType {
        self.kind
    }

    pub fn connectivity(&self) -> &Connectivity {
        &self.connectivity
    }

    /// Reconstruct `marker` under `mask` into a new array.
    pub fn apply<T: Pixel>(
        &self,
        marker: ArrayView2<'_, T>,
        mask: ArrayView2<'_, T>,
    ) -> Result<Array2<T>> {
        self.apply_reported(marker, mask, &NoOpReporter)
    }

    /// Like [`HybridReconstruction2D::apply`], reporting each stage to `reporter`.
    pub fn apply_reported<T: Pixel>(
        &self,
        marker: ArrayView2<'_, T>,
        mask: ArrayView2<'_, T>,
        reporter: &dyn ProgressReporter,
    ) -> Result<Array2<T>> {
        ensure_same_shape(marker.shape(), mask.shape())?;
        let mut result = initial_result(&marker, &mask, self.kind);
        self.propagate(&mut result, mask, reporter);
        Ok(result)
    }

    /// Run the three propagation phases on a caller-owned buffer.
    ///
    /// `result` must already hold the marker bounded by the mask; it is
    /// updated in place to the reconstruction.
    pub fn process_in_place<T: Pixel>(
        &self,
        result: &mut Array2<T>,
        mask: ArrayView2<'_, T>) -> Result<()> {
        ensure_same_shape(result.shape(), mask.shape())?;
        self.propagate(result, mask, &NoOpReporter);
        Ok(())
    }

    fn offsets(&self) -> (&'static [(isize, isize)], &'static [(isize, isize)]) {
        match self.connectivity {
            Connectivity::C8 => (&FORWARD_C8, &BACKWARD_C8),
            _ => (&FORWARD_C4, &BACKWARD_C4),
        }
    }

    fn propagate<T: Pixel>(
        &self,
        result: &mut Array2<T>,
        mask: ArrayView2<'_, T>,
        reporter: &dyn ProgressReporter,
    ) {
        let kind = self.kind;
        let (size_y, size_x) = result.dim();
        let (forward, backward) = self.offsets();

        reporter.begin_stage(MorphStage::ForwardScan, Some(size_y));
        for y in 0..size_y {
            for x in 0..size_x {
                let mut value = result[[y, x]];
                for &(dy, dx) in forward {
                    if let Some(n) = neighbor(y, x, dy, dx, size_y, size_x) {
                        value = kind.best(value, result[n]);
                    }
                }
                value = kind.bound(value, mask[[y, x]]);
                if kind.exceeds(value, result[[y, x]]) {
                    result[[y, x]] = value;
                }
            }
            report_row(reporter, y, size_y);
        }
        reporter.finish_stage();

        let mut queue: VecDeque<(usize, usize)> = VecDeque::new();
        reporter.begin_stage(MorphStage::BackwardScan, Some(size_y));
        for y in (0..size_y).rev() {
            for x in (0..size_x).rev() {
                let current = result[[y, x]];
                let mut value = current;
                for &(dy, dx) in backward {
                    if let Some(n) = neighbor(y, x, dy, dx, size_y, size_x) {
                        value = kind.best(value, result[n]);
                    }
                }
                value = kind.bound(value, mask[[y, x]]);
                if !kind.exceeds(value, current) {
                    continue;
                }
                result[[y, x]] = value;
                for &(dy, dx) in backward {
                    if let Some(n) = neighbor(y, x, dy, dx, size_y, size_x) {
                        if kind.exceeds(kind.bound(value, mask[n]), result[n]) {
                            queue.push_back((n[0], n[1]));
                        }
                    }
                }
            }
            report_row(reporter, size_y - 1 - y, size_y);
        }
        reporter.finish_stage();
        debug!(seeds = queue.len(), "2D reconstruction queue seeded");

        let all: Vec<(isize, isize)> = forward.iter().chain(backward).copied().collect();
        let mut processed = 0usize;
        reporter.begin_stage(MorphStage::QueuePropagation, None);
        while let Some((y, x)) = queue.pop_front() {
            processed += 1;
            let current = result[[y, x]];
            let mut value = current;
            for &(dy, dx) in &all {
                if let Some(n) = neighbor(y, x, dy, dx, size_y, size_x) {
                    value = kind.best(value, result[n]);
                }
            }
            value = kind.bound(value, mask[[y, x]]);
            if !kind.exceeds(value, current) {
                continue;
            }
            result[[y, x]] = value;
            for &(dy, dx) in &all {
                if let Some(n) = neighbor(y, x, dy, dx, size_y, size_x) {
                    if kind.exceeds(kind.bound(value, mask[n]), result[n]) {
                        queue.push_back((n[0], n[1]));
                    }
                }
            }
            if processed % QUEUE_PROGRESS_STEP == 0 {
                reporter.advance(processed);
            }
        }
        reporter.advance(processed);
        reporter.finish_stage();
        debug!(processed, "2D reconstruction queue drained");
    }
}

#[inline]
fn neighbor(
    y: usize,
    x: usize,
    dy: isize,
    dx: isize,
    size_y: usize,
    size_x: usize,
) -> Option<[usize; 2]> {
    let ny = y.checked_add_signed(dy)?;
    let nx = x.checked_add_signed(dx)?;
    (ny < size_y && nx < size_x).then_some([ny, nx])
}

fn report_row(reporter: &dyn ProgressReporter, row: usize, total: usize) {
    if (row + 1) % PROGRESS_GRANULARITY == 0 || row + 1 == total {
        reporter.advance(row + 1);
    }
}
