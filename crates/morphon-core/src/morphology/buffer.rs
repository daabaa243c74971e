use std::collections::VecDeque;

use crate::rle::{BinaryRow, RunLengthImage2D};

/// Fixed-capacity window over consecutive data indices along a sweep axis.
///
/// Each slot holds the filtered results of one data index against every
/// active structuring-element row (or plane); `None` marks an index outside
/// the image. Slots are only reachable through [`SlidingBuffer::get`] and
/// are dropped once they leave the window.
#[derive(Debug)]
pub(crate) struct SlidingBuffer<T> {
    slots: VecDeque<Option<Vec<T>>>,
    first: isize,
    capacity: usize,
}

/// One slot per data row, holding that row filtered by each element row.
pub(crate) type FilteredRowBuffer = SlidingBuffer<BinaryRow>;

/// One slot per data slice, holding that slice filtered by each element plane.
pub(crate) type FilteredSliceBuffer = SlidingBuffer<RunLengthImage2D>;

impl<T> SlidingBuffer<T> {
    /// Empty window whose first pushed slot will sit at data index `first`.
    pub(crate) fn new(first: isize, capacity: usize) -> Self {
        Self {
            slots: VecDeque::with_capacity(capacity + 1),
            first,
            capacity: capacity.max(1),
        }
    }

    /// Append the slot for the next data index, evicting the oldest one
    /// once the window is full.
    pub(crate) fn update(&mut self, slot: Option<Vec<T>>) {
        self.slots.push_back(slot);
        if self.slots.len() > self.capacity {
            self.slots.pop_front();
            self.first += 1;
        }
    }

    /// Filtered results at data index `index`, or `None` when that index is
    /// outside the image or no longer in the window.
    pub(crate) fn get(&self, index: isize) -> Option<&[T]> {
        let position = usize::try_from(index - self.first).ok()?;
        self.slots.get(position)?.as_deref()
    }
}
