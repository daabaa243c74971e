use ndarray::{Array3, ArrayView3, Axis};

use crate::error::{ensure_same_shape, Result};

use super::image2d::RunLengthImage2D;
use super::row::BinaryRow;

/// Binary 3D image stored as one [`RunLengthImage2D`] per slice.
///
/// Dense arrays have shape `(size_z, size_y, size_x)` and are indexed
/// `[z, y, x]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunLengthImage3D {
    size_x: usize,
    size_y: usize,
    size_z: usize,
    slices: Vec<RunLengthImage2D>,
}

impl RunLengthImage3D {
    /// All-false volume.
    pub fn new(size_x: usize, size_y: usize, size_z: usize) -> Self {
        Self {
            size_x,
            size_y,
            size_z,
            slices: vec![RunLengthImage2D::new(size_x, size_y); size_z],
        }
    }

    /// All-true volume.
    pub fn filled(size_x: usize, size_y: usize, size_z: usize) -> Self {
        Self {
            size_x,
            size_y,
            size_z,
            slices: vec![RunLengthImage2D::filled(size_x, size_y); size_z],
        }
    }

    /// Assemble a volume from equally sized slices.
    pub fn from_slices(slices: Vec<RunLengthImage2D>) -> Result<Self> {
        let (size_x, size_y) = slices
            .first()
            .map(|s| (s.size_x(), s.size_y()))
            .unwrap_or((0, 0));
        for slice in &slices {
            ensure_same_shape(&[size_y, size_x], &slice.shape())?;
        }
        Ok(Self {
            size_x,
            size_y,
            size_z: slices.len(),
            slices,
        })
    }

    /// Encode a dense `(size_z, size_y, size_x)` array.
    pub fn from_dense(array: &Array3<bool>) -> Self {
        Self::from_view(array.view())
    }

    pub fn from_view(array: ArrayView3<'_, bool>) -> Self {
        let (size_z, size_y, size_x) = array.dim();
        let slices = array
            .axis_iter(Axis(0))
            .map(RunLengthImage2D::from_view)
            .collect();
        Self {
            size_x,
            size_y,
            size_z,
            slices,
        }
    }

    /// Decode into a dense array indexed `[z, y, x]`.
    pub fn to_dense(&self) -> Array3<bool> {
        let mut array = Array3::from_elem((self.size_z, self.size_y, self.size_x), false);
        for (mut out, slice) in array.axis_iter_mut(Axis(0)).zip(&self.slices) {
            out.assign(&slice.to_dense());
        }
        array
    }

    pub fn size_x(&self) -> usize {
        self.size_x
    }

    pub fn size_y(&self) -> usize {
        self.size_y
    }

    pub fn size_z(&self) -> usize {
        self.size_z
    }

    /// Shape in array axis order, `[size_z, size_y, size_x]`.
    pub fn shape(&self) -> [usize; 3] {
        [self.size_z, self.size_y, self.size_x]
    }

    /// Voxel at `(x, y, z)`. Panics if `y` or `z` is out of bounds.
    pub fn get(&self, x: usize, y: usize, z: usize) -> bool {
        self.slices[z].get(x, y)
    }

    /// Set one voxel. Panics on out-of-bounds coordinates.
    pub fn set(&mut self, x: usize, y: usize, z: usize, value: bool) {
        self.slices[z].set(x, y, value);
    }

    /// Runs of row `y` in slice `z`.
    pub fn row(&self, y: usize, z: usize) -> &BinaryRow {
        self.slices[z].row(y)
    }

    pub(crate) fn row_mut(&mut self, y: usize, z: usize) -> &mut BinaryRow {
        self.slices[z].row_mut(y)
    }

    /// Replace a row, cropping it to the volume bounds.
    pub fn set_row(&mut self, y: usize, z: usize, row: BinaryRow) {
        self.slices[z].set_row(y, row);
    }

    /// The 2D image at depth `z`.
    pub fn slice(&self, z: usize) -> &RunLengthImage2D {
        &self.slices[z]
    }

    /// Replace the slice at depth `z`; its shape must match.
    pub fn set_slice(&mut self, z: usize, slice: RunLengthImage2D) -> Result<()> {
        ensure_same_shape(&[self.size_y, self.size_x], &slice.shape())?;
        self.slices[z] = slice;
        Ok(())
    }

    pub(crate) fn slice_mut(&mut self, z: usize) -> &mut RunLengthImage2D {
        &mut self.slices[z]
    }

    pub fn slices(&self) -> &[RunLengthImage2D] {
        &self.slices
    }

    pub fn is_empty(&self) -> bool {
        self.slices.iter().all(RunLengthImage2D::is_empty)
    }

    pub fn cardinality(&self) -> usize {
        self.slices.iter().map(RunLengthImage2D::cardinality).sum()
    }

    /// Swap foreground and background within the volume bounds.
    pub fn complement(&self) -> Self {
        Self {
            size_x: self.size_x,
            size_y: self.size_y,
            size_z: self.size_z,
            slices: self.slices.iter().map(RunLengthImage2D::complement).collect(),
        }
    }

    pub fn union(&self, other: &Self) -> Result<Self> {
        self.combine(other, RunLengthImage2D::union)
    }

    pub fn intersection(&self, other: &Self) -> Result<Self> {
        self.combine(other, RunLengthImage2D::intersection)
    }

    pub fn difference(&self, other: &Self) -> Result<Self> {
        self.combine(other, RunLengthImage2D::difference)
    }

    /// True on the six outer faces of the volume.
    pub fn border(size_x: usize, size_y: usize, size_z: usize) -> Self {
        let slices = (0..size_z)
            .map(|z| {
                if z == 0 || z + 1 == size_z {
                    RunLengthImage2D::filled(size_x, size_y)
                } else {
                    RunLengthImage2D::border(size_x, size_y)
                }
            })
            .collect();
        Self {
            size_x,
            size_y,
            size_z,
            slices,
        }
    }

    fn combine(
        &self,
        other: &Self,
        op: fn(&RunLengthImage2D, &RunLengthImage2D) -> Result<RunLengthImage2D>,
    ) -> Result<Self> {
        ensure_same_shape(&self.shape(), &other.shape())?;
        let slices = self
            .slices
            .iter()
            .zip(&other.slices)
            .map(|(a, b)| op(a, b))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            size_x: self.size_x,
            size_y: self.size_y,
            size_z: self.size_z,
            slices,
        })
    }
}

impl From<&Array3<bool>> for RunLengthImage3D {
    fn from(array: &Array3<bool>) -> Self {
        Self::from_dense(array)
    }
}
