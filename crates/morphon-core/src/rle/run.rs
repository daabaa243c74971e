/// Closed integer interval `[left, right]` on one scanline.
///
/// Ordering is by `left`, then `right`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Run {
    left: isize,
    right: isize,
}

impl Run {
    /// Create a run. Panics if `left > right`.
    pub fn new(left: isize, right: isize) -> Self {
        assert!(left <= right, "invalid run [{left}, {right}]");
        Self { left, right }
    }

    /// Create a run, or `None` when the bounds are reversed.
    pub fn checked(left: isize, right: isize) -> Option<Self> {
        (left <= right).then_some(Self { left, right })
    }

    /// Single-position run.
    pub fn point(position: isize) -> Self {
        Self {
            left: position,
            right: position,
        }
    }

    pub fn left(&self) -> isize {
        self.left
    }

    pub fn right(&self) -> isize {
        self.right
    }

    /// Number of positions covered (always at least 1).
    pub fn length(&self) -> usize {
        (self.right - self.left) as usize + 1
    }

    pub fn contains(&self, position: isize) -> bool {
        self.left <= position && position <= self.right
    }

    /// True if `other` lies entirely within this run.
    pub fn contains_run(&self, other: &Run) -> bool {
        self.left <= other.left && other.right <= self.right
    }

    pub fn intersects(&self, other: &Run) -> bool {
        self.left <= other.right && other.left <= self.right
    }

    /// True when the two runs overlap or leave no gap between them.
    pub fn touches(&self, other: &Run) -> bool {
        self.right + 1 >= other.left && other.right + 1 >= self.left
    }

    /// Common part of two runs, if any.
    pub fn intersection(&self, other: &Run) -> Option<Run> {
        Run::checked(self.left.max(other.left), self.right.min(other.right))
    }

    /// Both ends moved by `shift`.
    pub fn shifted(&self, shift: isize) -> Run {
        Run {
            left: self.left + shift,
            right: self.right + shift,
        }
    }

    /// Grow by `left_ext` on the left and `right_ext` on the right.
    ///
    /// Negative extents shrink the run; `None` once it vanishes.
    pub fn expanded(&self, left_ext: isize, right_ext: isize) -> Option<Run> {
        Run::checked(self.left - left_ext, self.right + right_ext)
    }

    /// Clip to `[lo, hi]`.
    pub fn cropped(&self, lo: isize, hi: isize) -> Option<Run> {
        Run::checked(self.left.max(lo), self.right.min(hi))
    }
}

impl std::fmt::Display for Run {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.left, self.right)
    }
}
