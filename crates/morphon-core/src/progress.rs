/// Processing stage of a long-running operator, used for progress reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MorphStage {
    Dilation,
    Erosion,
    ForwardScan,
    BackwardScan,
    QueuePropagation,
    RunPropagation,
}

impl std::fmt::Display for MorphStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dilation => write!(f, "Dilation"),
            Self::Erosion => write!(f, "Erosion"),
            Self::ForwardScan => write!(f, "Forward scan"),
            Self::BackwardScan => write!(f, "Backward scan"),
            Self::QueuePropagation => write!(f, "Queue propagation"),
            Self::RunPropagation => write!(f, "Run propagation"),
        }
    }
}

/// Thread-safe progress reporting for long loops.
///
/// Implementors can use this to drive progress bars, logging, or any other
/// UI feedback. All methods have default no-op implementations. Calls arrive
/// synchronously from the thread running the operator, and `items_done`
/// never decreases within a stage.
pub trait ProgressReporter: Send + Sync {
    /// A new stage has started. `total_items` is the number of work items
    /// (rows, slices, positions) in this stage, if known.
    fn begin_stage(&self, _stage: MorphStage, _total_items: Option<usize>) {}

    /// Work items within the current stage have completed.
    fn advance(&self, _items_done: usize) {}

    /// The current stage is finished.
    fn finish_stage(&self) {}
}

/// No-op progress reporter, used by the non-reporting entry points.
pub struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}
