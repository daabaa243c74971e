use ndarray::{ArrayView2, ArrayView3, Axis};

use crate::rle::BinaryRow;

/// A 2D structuring element split into one run-length row per `dy`.
///
/// Rows are pre-shifted so that `x` positions are offsets from the
/// reference pixel: a run `[a, b]` means the element covers `dx` in `a..=b`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowTable2D {
    rows: Vec<BinaryRow>,
    offset_y: usize,
}

impl RowTable2D {
    pub(crate) fn from_mask(mask: ArrayView2<'_, bool>, offset_y: usize, offset_x: usize) -> Self {
        let rows = mask
            .rows()
            .into_iter()
            .map(|r| BinaryRow::from_bools(r.iter().copied()).shifted(-(offset_x as isize)))
            .collect();
        Self { rows, offset_y }
    }

    /// One row of `dx` offsets per `dy`, starting at the smallest `dy`.
    pub fn rows(&self) -> &[BinaryRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(BinaryRow::is_empty)
    }

    /// Vertical offset `dy` of row `index`.
    pub fn dy(&self, index: usize) -> isize {
        index as isize - self.offset_y as isize
    }

    /// Row for the vertical offset `dy`, if the element spans it.
    pub fn row_for_offset(&self, dy: isize) -> Option<&BinaryRow> {
        let index = dy + self.offset_y as isize;
        usize::try_from(index).ok().and_then(|i| self.rows.get(i))
    }

    /// Indices of rows that hold at least one run.
    pub fn active_rows(&self) -> impl Iterator<Item = usize> + '_ {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, r)| !r.is_empty())
            .map(|(i, _)| i)
    }

    /// Largest `|dx|` covered by any row.
    pub fn max_dx(&self) -> usize {
        self.rows
            .iter()
            .filter_map(|r| {
                Some(
                    r.min_position()?
                        .unsigned_abs()
                        .max(r.max_position()?.unsigned_abs()),
                )
            })
            .max()
            .unwrap_or(0)
    }

    /// Largest `|dy|` of any active row.
    pub fn max_dy(&self) -> usize {
        self.active_rows()
            .map(|i| self.dy(i).unsigned_abs())
            .max()
            .unwrap_or(0)
    }
}

/// A 3D structuring element split into one [`RowTable2D`] per `dz`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowTable3D {
    planes: Vec<RowTable2D>,
    offset_z: usize,
}

impl RowTable3D {
    pub(crate) fn from_mask(mask: ArrayView3<'_, bool>, offset: &[usize]) -> Self {
        let planes = mask
            .axis_iter(Axis(0))
            .map(|plane| RowTable2D::from_mask(plane, offset[1], offset[2]))
            .collect();
        Self {
            planes,
            offset_z: offset[0],
        }
    }

    /// One row table per `dz`, starting at the smallest `dz`.
    pub fn planes(&self) -> &[RowTable2D] {
        &self.planes
    }

    /// Depth offset `dz` of plane `index`.
    pub fn dz(&self, index: usize) -> isize {
        index as isize - self.offset_z as isize
    }

    /// Row table of plane `dz`, if the element spans it.
    pub fn plane_for_offset(&self, dz: isize) -> Option<&RowTable2D> {
        let index = dz + self.offset_z as isize;
        usize::try_from(index).ok().and_then(|i| self.planes.get(i))
    }

    /// Indices of planes that hold at least one run.
    pub fn active_planes(&self) -> impl Iterator<Item = usize> + '_ {
        self.planes
            .iter()
            .enumerate()
            .filter(|(_, p)| !p.is_empty())
            .map(|(i, _)| i)
    }

    pub fn max_dx(&self) -> usize {
        self.planes.iter().map(RowTable2D::max_dx).max().unwrap_or(0)
    }

    pub fn max_dy(&self) -> usize {
        self.planes.iter().map(RowTable2D::max_dy).max().unwrap_or(0)
    }

    pub fn max_dz(&self) -> usize {
        self.active_planes()
            .map(|i| self.dz(i).unsigned_abs())
            .max()
            .unwrap_or(0)
    }
}
