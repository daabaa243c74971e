use std::collections::VecDeque;

use ndarray::{Array3, ArrayView3};
use tracing::debug;

use crate::connectivity::Connectivity;
use crate::consts::QUEUE_PROGRESS_STEP;
use crate::error::{ensure_same_shape, MorphError, Result};
use crate::pixel::Pixel;
use crate::progress::{MorphStage, NoOpReporter, ProgressReporter};

use super::{initial_result, ReconstructionType};

type Offset3 = [isize; 3];

/// Hybrid reconstruction of 3D arrays with 6- or 26-connectivity.
#[derive(Clone, Debug)]
pub struct HybridReconstruction3D {
    kind: ReconstructionType,
    connectivity: Connectivity,
    forward: Vec<Offset3>,
    backward: Vec<Offset3>,
}

impl HybridReconstruction3D {
    /// Fails with `InvalidConnectivity` unless `connectivity` is C6 or C26.
    pub fn new(kind: ReconstructionType, connectivity: Connectivity) -> Result<Self> {
        if !matches!(connectivity, Connectivity::C6 | Connectivity::C26) {
            return Err(MorphError::InvalidConnectivity(format!(
                "{connectivity} cannot drive 3D reconstruction, expected C6 or C26"
            )));
        }
        let forward: Vec<Offset3> = connectivity
            .offsets()
            .iter()
            .map(|o| [o[0], o[1], o[2]])
            .filter(|o| o.iter().find(|&&c| c != 0).is_some_and(|&c| c < 0))
            .collect();
        let backward = forward.iter().map(|o| [-o[0], -o[1], -o[2]]).collect();
        Ok(Self {
            kind,
            connectivity,
            forward,
            backward,
        })
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
        marker: ArrayView3<'_, T>,
        mask: ArrayView3<'_, T>,
    ) -> Result<Array3<T>> {
        self.apply_reported(marker, mask, &NoOpReporter)
    }

    /// Like [`HybridReconstruction3D::apply`], reporting each stage to `reporter`.
    pub fn apply_reported<T: Pixel>(
        &self,
        marker: ArrayView3<'_, T>,
        mask: ArrayView3<'_, T>,
        reporter: &dyn ProgressReporter,
    ) -> Result<Array3<T>> {
        ensure_same_shape(marker.shape(), mask.shape())?;
        let mut result = initial_result(&marker, &mask, self.kind);
        self.propagate(&mut result, mask, reporter);
        Ok(result)
    }

    /// Run the three propagation phases on a caller-owned buffer that
    /// already holds the marker bounded by the mask.
    pub fn process_in_place<T: Pixel>(
        &self,
        result: &mut Array3<T>,
        mask: ArrayView3<'_, T>) -> Result<()> {
        ensure_same_shape(result.shape(), mask.shape())?;
        self.propagate(result, mask, &NoOpReporter);
        Ok(())
    }

    fn propagate<T: Pixel>(
        &self,
        result: &mut Array3<T>,
        mask: ArrayView3<'_, T>,
        reporter: &dyn ProgressReporter,
    ) {
        let kind = self.kind;
        let shape = result.dim();
        let size_z = shape.0;

        reporter.begin_stage(MorphStage::ForwardScan, Some(size_z));
        for z in 0..size_z {
            for y in 0..shape.1 {
                for x in 0..shape.2 {
                    let p = [z, y, x];
                    let value = kind.bound(best_of(result, p, &self.forward, shape, kind), mask[p]);
                    if kind.exceeds(value, result[p]) {
                        result[p] = value;
                    }
                }
            }
            reporter.advance(z + 1);
        }
        reporter.finish_stage();

        let mut queue: VecDeque<[usize; 3]> = VecDeque::new();
        reporter.begin_stage(MorphStage::BackwardScan, Some(size_z));
        for z in (0..size_z).rev() {
            for y in (0..shape.1).rev() {
                for x in (0..shape.2).rev() {
                    let p = [z, y, x];
                    let value =
                        kind.bound(best_of(result, p, &self.backward, shape, kind), mask[p]);
                    if !kind.exceeds(value, result[p]) {
                        continue;
                    }
                    result[p] = value;
                    for offset in &self.backward {
                        if let Some(q) = neighbor(p, offset, shape) {
                            if kind.exceeds(kind.bound(value, mask[q]), result[q]) {
                                queue.push_back(q);
                            }
                        }
                    }
                }
            }
            reporter.advance(size_z - z);
        }
        reporter.finish_stage();
        debug!(seeds = queue.len(), "3D reconstruction queue seeded");

        let all: Vec<Offset3> = self.forward.iter().chain(&self.backward).copied().collect();
        let mut processed = 0usize;
        reporter.begin_stage(MorphStage::QueuePropagation, None);
        while let Some(p) = queue.pop_front() {
            processed += 1;
            let value = kind.bound(best_of(result, p, &all, shape, kind), mask[p]);
            if !kind.exceeds(value, result[p]) {
                continue;
            }
            result[p] = value;
            for offset in &all {
                if let Some(q) = neighbor(p, offset, shape) {
                    if kind.exceeds(kind.bound(value, mask[q]), result[q]) {
                        queue.push_back(q);
                    }
                }
            }
            if processed % QUEUE_PROGRESS_STEP == 0 {
                reporter.advance(processed);
            }
        }
        reporter.advance(processed);
        reporter.finish_stage();
        debug!(processed, "3D reconstruction queue drained");
    }
}

/// Best of `result[p]` and its neighbours along `offsets`.
#[inline]
fn best_of<T: Pixel>(
    result: &Array3<T>,
    p: [usize; 3],
    offsets: &[Offset3],
    shape: (usize, usize, usize),
    kind: ReconstructionType,
) -> T {
    offsets
        .iter()
        .filter_map(|offset| neighbor(p, offset, shape))
        .fold(result[p], |acc, q| kind.best(acc, result[q]))
}

#[inline]
fn neighbor(p: [usize; 3], offset: &Offset3, shape: (usize, usize, usize)) -> Option<[usize; 3]> {
    let z = p[0].checked_add_signed(offset[0])?;
    let y = p[1].checked_add_signed(offset[1])?;
    let x = p[2].checked_add_signed(offset[2])?;
    (z < shape.0 && y < shape.1 && x < shape.2).then_some([z, y, x])
}
