/// Minimum element count to evaluate scalar neighbourhood filters with Rayon.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Side length of the default square structuring element.
pub const DEFAULT_STREL_SIZE: usize = 3;

/// Number of rows (or slices) between two progress notifications.
pub const PROGRESS_GRANULARITY: usize = 16;

/// Number of processed queue items between two progress notifications.
pub const QUEUE_PROGRESS_STEP: usize = 4_096;
