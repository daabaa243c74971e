use std::collections::VecDeque;

use ndarray::{Array, ArrayBase, Data, DataMut, Dimension};
use tracing::{debug, warn};

use crate::connectivity::Connectivity;
use crate::consts::QUEUE_PROGRESS_STEP;
use crate::error::{ensure_same_shape, MorphError, Result};
use crate::grid::Grid;
use crate::pixel::Pixel;
use crate::progress::{MorphStage, NoOpReporter, ProgressReporter};

use super::{initial_result, ReconstructionType};

/// Hybrid reconstruction for arrays of any dimensionality.
///
/// Offsets whose first non-zero coordinate is negative drive the forward
/// scan, the others the backward scan. The connectivity is expected to be
/// point-symmetric; an asymmetric one is accepted with a warning.
#[derive(Clone, Debug)]
pub struct HybridReconstructionND {
    kind: ReconstructionType,
    connectivity: Connectivity,
    forward: Vec<Vec<isize>>,
    backward: Vec<Vec<isize>>,
}

impl HybridReconstructionND {
    /// Split the connectivity into forward and backward offsets.
    ///
    /// Fails with `InvalidConnectivity` when a custom offset has the wrong
    /// length or is the zero offset.
    pub fn new(kind: ReconstructionType, connectivity: Connectivity) -> Result<Self> {
        connectivity.validate()?;
        if !connectivity.is_symmetric() {
            warn!(
                %connectivity,
                "asymmetric connectivity, reconstruction may not converge to the geodesic result"
            );
        }
        let (forward, backward): (Vec<Vec<isize>>, Vec<Vec<isize>>) = connectivity
            .offsets()
            .into_iter()
            .partition(|o| o.iter().find(|&&c| c != 0).is_some_and(|&c| c < 0));
        Ok(Self {
            kind,
            connectivity,
            forward,
            backward,
        })
    }

    /// Direction of the reconstruction.
    pub fn kind(&self) -> ReconstructionType {
        self.kind
    }

    /// Neighbourhood the engine propagates through.
    pub fn connectivity(&self) -> &Connectivity {
        &self.connectivity
    }

    /// Reconstruct `marker` under `mask` into a new array.
    pub fn apply<S1, S2, D>(
        &self,
        marker: &ArrayBase<S1, D>,
        mask: &ArrayBase<S2, D>,
    ) -> Result<Array<S1::Elem, D>>
    where
        S1: Data,
        S2: Data<Elem = S1::Elem>,
        S1::Elem: Pixel,
        D: Dimension,
    {
        self.apply_reported(marker, mask, &NoOpReporter)
    }

    /// Like [`HybridReconstructionND::apply`], reporting each stage to `reporter`.
    pub fn apply_reported<S1, S2, D>(
        &self,
        marker: &ArrayBase<S1, D>,
        mask: &ArrayBase<S2, D>,
        reporter: &dyn ProgressReporter,
    ) -> Result<Array<S1::Elem, D>>
    where
        S1: Data,
        S2: Data<Elem = S1::Elem>,
        S1::Elem: Pixel,
        D: Dimension,
    {
        ensure_same_shape(marker.shape(), mask.shape())?;
        let mut result = initial_result(marker, mask, self.kind);
        self.process_in_place_reported(&mut result, mask, reporter)?;
        Ok(result)
    }

    /// Run the three propagation phases on a caller-owned buffer that
    /// already holds the marker bounded by the mask.
    pub fn process_in_place<S1, S2, D>(
        &self,
        result: &mut ArrayBase<S1, D>,
        mask: &ArrayBase<S2, D>,
    ) -> Result<()>
    where
        S1: DataMut,
        S2: Data<Elem = S1::Elem>,
        S1::Elem: Pixel,
        D: Dimension,
    {
        self.process_in_place_reported(result, mask, &NoOpReporter)
    }

    fn process_in_place_reported<S1, S2, D>(
        &self,
        result: &mut ArrayBase<S1, D>,
        mask: &ArrayBase<S2, D>,
        reporter: &dyn ProgressReporter,
    ) -> Result<()>
    where
        S1: DataMut,
        S2: Data<Elem = S1::Elem>,
        S1::Elem: Pixel,
        D: Dimension,
    {
        ensure_same_shape(result.shape(), mask.shape())?;
        if self.connectivity.dimensionality() != result.ndim() {
            return Err(MorphError::dimensionality(
                format!("{}D (from {})", self.connectivity.dimensionality(), self.connectivity),
                result.ndim(),
            ));
        }
        let grid = Grid::new(result.shape());
        let mut values: Vec<S1::Elem> = result.iter().copied().collect();
        let bounds: Vec<S1::Elem> = mask.iter().copied().collect();
        self.propagate(&grid, &mut values, &bounds, reporter);
        for (out, value) in result.iter_mut().zip(values) {
            *out = value;
        }
        Ok(())
    }

    fn propagate<T: Pixel>(
        &self,
        grid: &Grid,
        values: &mut [T],
        mask: &[T],
        reporter: &dyn ProgressReporter,
    ) {
        let kind = self.kind;
        let len = grid.len();
        let mut coords = vec![0usize; grid.ndim()];

        reporter.begin_stage(MorphStage::ForwardScan, Some(len));
        for p in 0..len {
            grid.unravel(p, &mut coords);
            let value = kind.bound(best_of(grid, values, p, &coords, &self.forward, kind), mask[p]);
            if kind.exceeds(value, values[p]) {
                values[p] = value;
            }
        }
        reporter.advance(len);
        reporter.finish_stage();

        let mut queue: VecDeque<usize> = VecDeque::new();
        reporter.begin_stage(MorphStage::BackwardScan, Some(len));
        for p in (0..len).rev() {
            grid.unravel(p, &mut coords);
            let value =
                kind.bound(best_of(grid, values, p, &coords, &self.backward, kind), mask[p]);
            if !kind.exceeds(value, values[p]) {
                continue;
            }
            values[p] = value;
            for offset in &self.backward {
                if let Some(q) = grid.neighbor(&coords, offset) {
                    if kind.exceeds(kind.bound(value, mask[q]), values[q]) {
                        queue.push_back(q);
                    }
                }
            }
        }
        reporter.advance(len);
        reporter.finish_stage();
        debug!(seeds = queue.len(), ndim = grid.ndim(), "N-D reconstruction queue seeded");

        let all: Vec<Vec<isize>> = self.forward.iter().chain(&self.backward).cloned().collect();
        let mut processed = 0usize;
        reporter.begin_stage(MorphStage::QueuePropagation, None);
        while let Some(p) = queue.pop_front() {
            processed += 1;
            grid.unravel(p, &mut coords);
            let value = kind.bound(best_of(grid, values, p, &coords, &all, kind), mask[p]);
            if !kind.exceeds(value, values[p]) {
                continue;
            }
            values[p] = value;
            for offset in &all {
                if let Some(q) = grid.neighbor(&coords, offset) {
                    if kind.exceeds(kind.bound(value, mask[q]), values[q]) {
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
        debug!(processed, "N-D reconstruction queue drained");
    }
}

fn best_of<T: Pixel>(
    grid: &Grid,
    values: &[T],
    p: usize,
    coords: &[usize],
    offsets: &[Vec<isize>],
    kind: ReconstructionType,
) -> T {
    offsets
        .iter()
        .filter_map(|offset| grid.neighbor(coords, offset))
        .fold(values[p], |acc, q| kind.best(acc, values[q]))
}
