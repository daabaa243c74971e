use crate::progress::MorphStage;
use crate::rle::BinaryRow;

/// Minkowski sum of a data row with one structuring-element row.
///
/// The element row holds offsets `dx` relative to the reference pixel, so a
/// run `[a, b]` grows every data run `[l, r]` into `[l + a, r + b]`. An empty
/// element row contributes nothing and yields an empty row.
pub fn dilate_row(row: &BinaryRow, strel_row: &BinaryRow) -> BinaryRow {
    if row.is_empty() {
        return BinaryRow::new();
    }
    let mut runs = strel_row.iter();
    let Some(first) = runs.next() else {
        return BinaryRow::new();
    };
    let mut result = row.dilation_left_right(-first.left(), first.right());
    for run in runs {
        result = result.union(&row.dilation_left_right(-run.left(), run.right()));
    }
    result
}

/// Minkowski difference of a data row with one structuring-element row.
///
/// Position `x` survives when `x + dx` is set for every `dx` of the element
/// row. Returns `None` for an empty element row, which places no constraint
/// on the result.
pub fn erode_row(row: &BinaryRow, strel_row: &BinaryRow) -> Option<BinaryRow> {
    let mut runs = strel_row.iter();
    let first = runs.next()?;
    let mut result = row.dilation_left_right(first.left(), -first.right());
    for run in runs {
        if result.is_empty() {
            break;
        }
        result = result.intersection(&row.dilation_left_right(run.left(), -run.right()));
    }
    Some(result)
}

/// Which of the two row kernels a sweep applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RowOperator {
    Dilation,
    Erosion,
}

impl RowOperator {
    /// Filter `row` by a non-empty element row.
    pub(crate) fn apply(self, row: &BinaryRow, strel_row: &BinaryRow) -> BinaryRow {
        match self {
            Self::Dilation => dilate_row(row, strel_row),
            Self::Erosion => erode_row(row, strel_row).unwrap_or_else(|| row.clone()),
        }
    }

    /// Direction in which an element offset is read from the data:
    /// dilation reads `p - d`, erosion reads `p + d`.
    pub(crate) fn scan_sign(self) -> isize {
        match self {
            Self::Dilation => -1,
            Self::Erosion => 1,
        }
    }

    pub(crate) fn stage(self) -> MorphStage {
        match self {
            Self::Dilation => MorphStage::Dilation,
            Self::Erosion => MorphStage::Erosion,
        }
    }
}
