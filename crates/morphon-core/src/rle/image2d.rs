use ndarray::{Array2, ArrayView2};

use crate::error::{ensure_same_shape, Result};

use super::row::BinaryRow;
use super::run::Run;

/// Binary 2D image stored as one [`BinaryRow`] per row.
///
/// Rows run along the last array axis: dense arrays have shape
/// `(size_y, size_x)` and are indexed `[y, x]`. All runs lie within
/// `[0, size_x - 1]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunLengthImage2D {
    size_x: usize,
    size_y: usize,
    rows: Vec<BinaryRow>,
}

impl RunLengthImage2D {
    /// All-false image.
    pub fn new(size_x: usize, size_y: usize) -> Self {
        Self {
            size_x,
            size_y,
            rows: vec![BinaryRow::new(); size_y],
        }
    }

    /// All-true image.
    pub fn filled(size_x: usize, size_y: usize) -> Self {
        let mut image = Self::new(size_x, size_y);
        if size_x > 0 {
            for row in &mut image.rows {
                row.insert_run(Run::new(0, size_x as isize - 1));
            }
        }
        image
    }

    /// Encode a dense `(size_y, size_x)` array.
    pub fn from_dense(array: &Array2<bool>) -> Self {
        Self::from_view(array.view())
    }

    /// Encode a view; the view need not be contiguous.
    pub fn from_view(array: ArrayView2<'_, bool>) -> Self {
        let (size_y, size_x) = array.dim();
        let rows = array
            .rows()
            .into_iter()
            .map(|r| BinaryRow::from_bools(r.iter().copied()))
            .collect();
        Self {
            size_x,
            size_y,
            rows,
        }
    }

    /// Decode into a dense array indexed `[y, x]`.
    pub fn to_dense(&self) -> Array2<bool> {
        let mut array = Array2::from_elem((self.size_y, self.size_x), false);
        for (mut out, row) in array.rows_mut().into_iter().zip(&self.rows) {
            if let Some(slice) = out.as_slice_mut() {
                row.fill_slice(slice);
            } else {
                for run in row.iter().filter_map(|r| r.cropped(0, self.size_x as isize - 1)) {
                    for x in run.left()..=run.right() {
                        out[x as usize] = true;
                    }
                }
            }
        }
        array
    }

    pub fn size_x(&self) -> usize {
        self.size_x
    }

    pub fn size_y(&self) -> usize {
        self.size_y
    }

    /// Shape in array axis order, `[size_y, size_x]`.
    pub fn shape(&self) -> [usize; 2] {
        [self.size_y, self.size_x]
    }

    /// Pixel at column `x` of row `y`. Panics if `y` is out of bounds.
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.rows[y].get(x as isize)
    }

    /// Set one pixel. Panics if `x` or `y` is out of bounds.
    pub fn set(&mut self, x: usize, y: usize, value: bool) {
        assert!(x < self.size_x, "x = {x} out of bounds ({})", self.size_x);
        self.rows[y].set(x as isize, value);
    }

    /// Runs of row `y`.
    pub fn row(&self, y: usize) -> &BinaryRow {
        &self.rows[y]
    }

    /// Mutable access to a row; callers keep runs within `[0, size_x - 1]`.
    pub(crate) fn row_mut(&mut self, y: usize) -> &mut BinaryRow {
        &mut self.rows[y]
    }

    /// Replace a row, cropping it to the image bounds.
    pub fn set_row(&mut self, y: usize, row: BinaryRow) {
        self.rows[y] = row.cropped(0, self.size_x as isize - 1);
    }

    pub fn rows(&self) -> &[BinaryRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(BinaryRow::is_empty)
    }

    pub fn is_row_empty(&self, y: usize) -> bool {
        self.rows[y].is_empty()
    }

    /// Number of `true` pixels.
    pub fn cardinality(&self) -> usize {
        self.rows.iter().map(BinaryRow::cardinality).sum()
    }

    /// Swap foreground and background within the image bounds.
    pub fn complement(&self) -> Self {
        let hi = self.size_x as isize - 1;
        Self {
            size_x: self.size_x,
            size_y: self.size_y,
            rows: self.rows.iter().map(|r| r.complement(0, hi)).collect(),
        }
    }

    /// Row-wise union; fails with `ShapeMismatch` on differing sizes.
    pub fn union(&self, other: &Self) -> Result<Self> {
        self.combine(other, BinaryRow::union)
    }

    pub fn intersection(&self, other: &Self) -> Result<Self> {
        self.combine(other, BinaryRow::intersection)
    }

    /// Pixels set in `self` and not in `other`.
    pub fn difference(&self, other: &Self) -> Result<Self> {
        self.combine(other, BinaryRow::difference)
    }

    /// True on the first/last row and column, false elsewhere.
    pub fn border(size_x: usize, size_y: usize) -> Self {
        let mut image = Self::new(size_x, size_y);
        if size_x == 0 || size_y == 0 {
            return image;
        }
        let hi = size_x as isize - 1;
        for (y, row) in image.rows.iter_mut().enumerate() {
            if y == 0 || y + 1 == size_y {
                row.insert_run(Run::new(0, hi));
            } else {
                row.insert_run(Run::point(0));
                row.insert_run(Run::point(hi));
            }
        }
        image
    }

    fn combine(&self, other: &Self, op: fn(&BinaryRow, &BinaryRow) -> BinaryRow) -> Result<Self> {
        ensure_same_shape(&self.shape(), &other.shape())?;
        Ok(Self {
            size_x: self.size_x,
            size_y: self.size_y,
            rows: self
                .rows
                .iter()
                .zip(&other.rows)
                .map(|(a, b)| op(a, b))
                .collect(),
        })
    }
}

impl From<&Array2<bool>> for RunLengthImage2D {
    fn from(array: &Array2<bool>) -> Self {
        Self::from_dense(array)
    }
}
