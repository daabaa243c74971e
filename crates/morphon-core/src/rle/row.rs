use super::run::Run;

/// One binary scanline stored as runs of `true` positions.
///
/// Invariant: runs are sorted by `left`, pairwise disjoint, and never
/// touching (adjacent runs are always fused). Positions not covered by a
/// run are `false`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct BinaryRow {
    runs: Vec<Run>,
}

impl BinaryRow {
    /// Empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a row from runs in any order; overlapping or adjacent runs are merged.
    pub fn from_runs<I: IntoIterator<Item = Run>>(runs: I) -> Self {
        let mut sorted: Vec<Run> = runs.into_iter().collect();
        sorted.sort_unstable();
        let mut merged: Vec<Run> = Vec::with_capacity(sorted.len());
        for run in sorted {
            match merged.last_mut() {
                Some(last) if last.right() + 1 >= run.left() => {
                    *last = Run::new(last.left(), last.right().max(run.right()));
                }
                _ => merged.push(run),
            }
        }
        Self { runs: merged }
    }

    /// Encode a dense scanline; index 0 of the iterator is position 0.
    pub fn from_bools<I: IntoIterator<Item = bool>>(values: I) -> Self {
        let mut runs = Vec::new();
        let mut start: Option<isize> = None;
        let mut position: isize = 0;
        for value in values {
            match (value, start) {
                (true, None) => start = Some(position),
                (false, Some(s)) => {
                    runs.push(Run::new(s, position - 1));
                    start = None;
                }
                _ => {}
            }
            position += 1;
        }
        if let Some(s) = start {
            runs.push(Run::new(s, position - 1));
        }
        Self { runs }
    }

    /// Decode positions `0..len` into a dense vector.
    pub fn to_bools(&self, len: usize) -> Vec<bool> {
        let mut values = vec![false; len];
        self.fill_slice(&mut values);
        values
    }

    /// Write the row into `out`, position 0 at index 0. Runs outside the slice are ignored.
    pub fn fill_slice(&self, out: &mut [bool]) {
        if out.is_empty() {
            return;
        }
        let hi = out.len() as isize - 1;
        for run in self.runs.iter().filter_map(|r| r.cropped(0, hi)) {
            for v in &mut out[run.left() as usize..=run.right() as usize] {
                *v = true;
            }
        }
    }

    /// Runs in increasing order.
    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Run> {
        self.runs.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    /// Number of `true` positions.
    pub fn cardinality(&self) -> usize {
        self.runs.iter().map(Run::length).sum()
    }

    /// Smallest `true` position.
    pub fn min_position(&self) -> Option<isize> {
        self.runs.first().map(Run::left)
    }

    /// Largest `true` position.
    pub fn max_position(&self) -> Option<isize> {
        self.runs.last().map(Run::right)
    }

    /// Value at `position`, by binary search over the runs.
    pub fn get(&self, position: isize) -> bool {
        let idx = self.runs.partition_point(|r| r.right() < position);
        self.runs.get(idx).is_some_and(|r| r.left() <= position)
    }

    /// Set or clear one position, fusing or splitting runs as needed.
    pub fn set(&mut self, position: isize, value: bool) {
        if value {
            self.insert_run(Run::point(position));
        } else {
            self.remove_run(Run::point(position));
        }
    }

    /// Mark every position of `run` as `true`, fusing with touching runs.
    pub fn insert_run(&mut self, run: Run) {
        let start = self.runs.partition_point(|r| r.right() + 1 < run.left());
        let end = self.runs.partition_point(|r| r.left() <= run.right() + 1);
        let merged = if start < end {
            Run::new(
                run.left().min(self.runs[start].left()),
                run.right().max(self.runs[end - 1].right()),
            )
        } else {
            run
        };
        self.runs.splice(start..end, std::iter::once(merged));
    }

    /// Mark every position of `run` as `false`, splitting runs if needed.
    pub fn remove_run(&mut self, run: Run) {
        let start = self.runs.partition_point(|r| r.right() < run.left());
        let end = self.runs.partition_point(|r| r.left() <= run.right());
        if start >= end {
            return;
        }
        let first = self.runs[start];
        let last = self.runs[end - 1];
        let mut remainder = Vec::with_capacity(2);
        if first.left() < run.left() {
            remainder.push(Run::new(first.left(), run.left() - 1));
        }
        if last.right() > run.right() {
            remainder.push(Run::new(run.right() + 1, last.right()));
        }
        self.runs.splice(start..end, remainder);
    }

    /// True if every position in `[left, right]` is set.
    pub fn contains_range(&self, left: isize, right: isize) -> bool {
        let idx = self.runs.partition_point(|r| r.right() < left);
        self.runs
            .get(idx)
            .is_some_and(|r| r.left() <= left && right <= r.right())
    }

    /// The runs overlapping `run`, as a contiguous slice.
    pub fn intersecting_runs(&self, run: Run) -> &[Run] {
        let start = self.runs.partition_point(|r| r.right() < run.left());
        let end = self.runs.partition_point(|r| r.left() <= run.right());
        if start < end {
            &self.runs[start..end]
        } else {
            &[]
        }
    }

    /// Positions set in either row, in one merge pass over both run lists.
    pub fn union(&self, other: &BinaryRow) -> BinaryRow {
        if other.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return other.clone();
        }
        let (a, b) = (&self.runs, &other.runs);
        let mut runs = Vec::with_capacity(a.len() + b.len());
        let (mut i, mut j) = (0, 0);
        let mut current: Option<Run> = None;
        loop {
            let next = match (a.get(i), b.get(j)) {
                (Some(ra), Some(rb)) => {
                    if ra.left() <= rb.left() {
                        i += 1;
                        *ra
                    } else {
                        j += 1;
                        *rb
                    }
                }
                (Some(ra), None) => {
                    i += 1;
                    *ra
                }
                (None, Some(rb)) => {
                    j += 1;
                    *rb
                }
                (None, None) => break,
            };
            current = Some(match current {
                Some(cur) if next.left() <= cur.right() + 1 => {
                    Run::new(cur.left(), cur.right().max(next.right()))
                }
                Some(cur) => {
                    runs.push(cur);
                    next
                }
                None => next,
            });
        }
        runs.extend(current);
        BinaryRow { runs }
    }

    /// Positions set in both rows.
    pub fn intersection(&self, other: &BinaryRow) -> BinaryRow {
        let (a, b) = (&self.runs, &other.runs);
        let mut runs = Vec::new();
        let (mut i, mut j) = (0, 0);
        while i < a.len() && j < b.len() {
            if let Some(common) = a[i].intersection(&b[j]) {
                runs.push(common);
            }
            if a[i].right() < b[j].right() {
                i += 1;
            } else {
                j += 1;
            }
        }
        BinaryRow { runs }
    }

    /// Positions set in `self` but not in `other`.
    pub fn difference(&self, other: &BinaryRow) -> BinaryRow {
        match (self.min_position(), self.max_position()) {
            (Some(lo), Some(hi)) => self.intersection(&other.complement(lo, hi)),
            _ => BinaryRow::new(),
        }
    }

    /// Invert the row within `[lo, hi]`; positions outside the bounds are dropped.
    pub fn complement(&self, lo: isize, hi: isize) -> BinaryRow {
        let mut runs = Vec::new();
        if lo > hi {
            return BinaryRow { runs };
        }
        let mut next_free = lo;
        for run in self.runs.iter().filter_map(|r| r.cropped(lo, hi)) {
            if run.left() > next_free {
                runs.push(Run::new(next_free, run.left() - 1));
            }
            next_free = run.right() + 1;
        }
        if next_free <= hi {
            runs.push(Run::new(next_free, hi));
        }
        BinaryRow { runs }
    }

    /// Translate every run by `shift`.
    pub fn shifted(&self, shift: isize) -> BinaryRow {
        BinaryRow {
            runs: self.runs.iter().map(|r| r.shifted(shift)).collect(),
        }
    }

    /// Clip every run to `[lo, hi]`.
    pub fn cropped(&self, lo: isize, hi: isize) -> BinaryRow {
        BinaryRow {
            runs: self.runs.iter().filter_map(|r| r.cropped(lo, hi)).collect(),
        }
    }

    /// Expand every run by `left_ext` positions on the left and `right_ext`
    /// on the right, merging runs that come to overlap.
    ///
    /// Negative extents shrink runs; runs that vanish are dropped.
    pub fn dilation_left_right(&self, left_ext: isize, right_ext: isize) -> BinaryRow {
        let mut runs: Vec<Run> = Vec::with_capacity(self.runs.len());
        for run in self.runs.iter().filter_map(|r| r.expanded(left_ext, right_ext)) {
            match runs.last_mut() {
                Some(last) if last.right() + 1 >= run.left() => {
                    *last = Run::new(last.left(), last.right().max(run.right()));
                }
                _ => runs.push(run),
            }
        }
        BinaryRow { runs }
    }

    /// Extend runs touching `lo` or `hi` outwards by `pad` positions.
    ///
    /// Emulates a scanline whose border values continue past its ends.
    pub fn padded(&self, lo: isize, hi: isize, pad: isize) -> BinaryRow {
        let mut runs = self.runs.clone();
        if let Some(first) = runs.first_mut() {
            if first.left() <= lo {
                *first = Run::new(lo - pad, first.right());
            }
        }
        if let Some(last) = runs.last_mut() {
            if last.right() >= hi {
                *last = Run::new(last.left(), hi + pad);
            }
        }
        BinaryRow { runs }
    }
}

impl FromIterator<Run> for BinaryRow {
    fn from_iter<I: IntoIterator<Item = Run>>(iter: I) -> Self {
        BinaryRow::from_runs(iter)
    }
}

impl<'a> IntoIterator for &'a BinaryRow {
    type Item = &'a Run;
    type IntoIter = std::slice::Iter<'a, Run>;

    fn into_iter(self) -> Self::IntoIter {
        self.runs.iter()
    }
}
