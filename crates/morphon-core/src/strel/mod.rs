//! Flat structuring elements.
//!
//! A structuring element is a binary mask plus the position of its
//! reference pixel. Its shifts are the mask positions relative to that
//! reference, in array axis order.

mod rows;

pub use rows::{RowTable2D, RowTable3D};

use ndarray::{ArrayD, Axis, Dimension, Ix2, Ix3, IxDyn};

use crate::error::{MorphError, Result};

/// Flat structuring element of arbitrary dimensionality.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Strel {
    mask: ArrayD<bool>,
    offset: Vec<usize>,
}

impl Strel {
    /// Build from a mask and the reference position inside it.
    pub fn from_mask(mask: ArrayD<bool>, offset: Vec<usize>) -> Result<Self> {
        if mask.ndim() == 0 {
            return Err(MorphError::parameter(
                "mask",
                "structuring element needs at least one axis",
            ));
        }
        if offset.len() != mask.ndim() {
            return Err(MorphError::parameter(
                "offset",
                format!("{} coordinates for a {}D mask", offset.len(), mask.ndim()),
            ));
        }
        if offset.iter().zip(mask.shape()).any(|(&o, &s)| o >= s) {
            return Err(MorphError::parameter(
                "offset",
                format!("{:?} lies outside mask of shape {:?}", offset, mask.shape()),
            ));
        }
        if !mask.iter().any(|&v| v) {
            return Err(MorphError::parameter("mask", "mask has no active element"));
        }
        Ok(Self { mask, offset })
    }

    /// Build from a mask with the reference at its centre (rounded down for even sizes).
    pub fn centered(mask: ArrayD<bool>) -> Result<Self> {
        let offset = mask.shape().iter().map(|&s| s.saturating_sub(1) / 2).collect();
        Self::from_mask(mask, offset)
    }

    /// Build from a list of shifts; the mask is their bounding box, extended
    /// to contain the origin.
    pub fn from_shifts(shifts: &[Vec<isize>]) -> Result<Self> {
        let Some(first) = shifts.first() else {
            return Err(MorphError::parameter("shifts", "no shift given"));
        };
        let ndim = first.len();
        if shifts.iter().any(|s| s.len() != ndim) {
            return Err(MorphError::parameter("shifts", "shifts differ in length"));
        }
        let mut lo = vec![0isize; ndim];
        let mut hi = vec![0isize; ndim];
        for shift in shifts {
            for axis in 0..ndim {
                lo[axis] = lo[axis].min(shift[axis]);
                hi[axis] = hi[axis].max(shift[axis]);
            }
        }
        let shape: Vec<usize> = lo.iter().zip(&hi).map(|(&l, &h)| (h - l) as usize + 1).collect();
        let mut mask = ArrayD::from_elem(IxDyn(&shape), false);
        for shift in shifts {
            let index: Vec<usize> =
                shift.iter().zip(&lo).map(|(&s, &l)| (s - l) as usize).collect();
            mask[index.as_slice()] = true;
        }
        let offset = lo.iter().map(|&l| l.unsigned_abs()).collect();
        Self::from_mask(mask, offset)
    }

    /// `size` x `size` square, centred.
    pub fn square(size: usize) -> Result<Self> {
        Self::rectangle(size, size)
    }

    /// `height` x `width` rectangle, centred.
    pub fn rectangle(height: usize, width: usize) -> Result<Self> {
        if height == 0 || width == 0 {
            return Err(MorphError::parameter(
                "size",
                format!("rectangle {height}x{width} is empty"),
            ));
        }
        Self::centered(ArrayD::from_elem(IxDyn(&[height, width]), true))
    }

    /// Plus-shaped element with arms of length `radius`.
    pub fn cross(radius: usize) -> Result<Self> {
        let size = 2 * radius + 1;
        let mask = ArrayD::from_shape_fn(IxDyn(&[size, size]), |idx| {
            idx[0] == radius || idx[1] == radius
        });
        Self::from_mask(mask, vec![radius, radius])
    }

    /// Diamond (city-block ball) of the given radius.
    pub fn diamond(radius: usize) -> Result<Self> {
        let size = 2 * radius + 1;
        let r = radius as isize;
        let mask = ArrayD::from_shape_fn(IxDyn(&[size, size]), |idx| {
            (idx[0] as isize - r).abs() + (idx[1] as isize - r).abs() <= r
        });
        Self::from_mask(mask, vec![radius, radius])
    }

    /// Disk: every offset `(dy, dx)` with `dy² + dx² <= radius²`.
    pub fn disk(radius: f64) -> Result<Self> {
        Self::euclidean_ball(radius, 2)
    }

    /// `size`³ cube, centred.
    pub fn cube(size: usize) -> Result<Self> {
        Self::cuboid(size, size, size)
    }

    /// `depth` x `height` x `width` box, centred.
    pub fn cuboid(depth: usize, height: usize, width: usize) -> Result<Self> {
        if depth == 0 || height == 0 || width == 0 {
            return Err(MorphError::parameter(
                "size",
                format!("cuboid {depth}x{height}x{width} is empty"),
            ));
        }
        Self::centered(ArrayD::from_elem(IxDyn(&[depth, height, width]), true))
    }

    /// Ball: every offset `(dz, dy, dx)` with `dz² + dy² + dx² <= radius²`.
    pub fn ball(radius: f64) -> Result<Self> {
        Self::euclidean_ball(radius, 3)
    }

    fn euclidean_ball(radius: f64, ndim: usize) -> Result<Self> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(MorphError::parameter(
                "radius",
                format!("{radius} is not a positive finite number"),
            ));
        }
        let extent = radius.floor() as usize;
        let size = 2 * extent + 1;
        let r2 = radius * radius;
        let mask = ArrayD::from_shape_fn(IxDyn(&vec![size; ndim]), |idx| {
            let d2: f64 = (0..ndim)
                .map(|a| {
                    let d = idx[a] as f64 - extent as f64;
                    d * d
                })
                .sum();
            d2 <= r2
        });
        Self::from_mask(mask, vec![extent; ndim])
    }

    /// Number of axes of the element.
    pub fn dimensionality(&self) -> usize {
        self.mask.ndim()
    }

    /// Mask extent per axis.
    pub fn size(&self) -> &[usize] {
        self.mask.shape()
    }

    /// Reference position inside the mask.
    pub fn offset(&self) -> &[usize] {
        &self.offset
    }

    /// Dense mask; the reference pixel sits at [`Strel::offset`].
    pub fn mask(&self) -> &ArrayD<bool> {
        &self.mask
    }

    /// Active mask positions relative to the reference, in row-major order.
    pub fn shifts(&self) -> Vec<Vec<isize>> {
        self.mask
            .indexed_iter()
            .filter(|(_, active)| **active)
            .map(|(idx, _)| {
                idx.slice()
                    .iter()
                    .zip(&self.offset)
                    .map(|(&i, &o)| i as isize - o as isize)
                    .collect()
            })
            .collect()
    }

    /// Point reflection: every shift `s` becomes `-s`.
    pub fn reverse(&self) -> Self {
        let mut mask = self.mask.clone();
        for axis in 0..mask.ndim() {
            mask.invert_axis(Axis(axis));
        }
        let offset = self
            .offset
            .iter()
            .zip(self.mask.shape())
            .map(|(&o, &s)| s - 1 - o)
            .collect();
        Self {
            mask: mask.as_standard_layout().into_owned(),
            offset,
        }
    }

    /// True if the zero shift belongs to the element.
    pub fn contains_origin(&self) -> bool {
        self.mask[self.offset.as_slice()]
    }

    /// Smallest and largest shift along each axis, as `(min, max)`.
    pub fn extent(&self) -> Vec<(isize, isize)> {
        let mut bounds: Vec<(isize, isize)> = vec![(isize::MAX, isize::MIN); self.dimensionality()];
        for shift in self.shifts() {
            for (b, &s) in bounds.iter_mut().zip(&shift) {
                b.0 = b.0.min(s);
                b.1 = b.1.max(s);
            }
        }
        bounds
    }

    /// Largest absolute shift along each axis.
    pub fn radius(&self) -> Vec<usize> {
        self.extent()
            .into_iter()
            .map(|(lo, hi)| lo.unsigned_abs().max(hi.unsigned_abs()))
            .collect()
    }

    /// Decompose a 2D element into one run-length row per `dy`.
    pub fn row_table_2d(&self) -> Result<RowTable2D> {
        let mask = self
            .mask
            .view()
            .into_dimensionality::<Ix2>()
            .map_err(|_| MorphError::dimensionality("2", self.dimensionality()))?;
        Ok(RowTable2D::from_mask(mask, self.offset[0], self.offset[1]))
    }

    /// Decompose a 3D element into one row table per `dz`.
    pub fn row_table_3d(&self) -> Result<RowTable3D> {
        let mask = self
            .mask
            .view()
            .into_dimensionality::<Ix3>()
            .map_err(|_| MorphError::dimensionality("3", self.dimensionality()))?;
        Ok(RowTable3D::from_mask(mask, &self.offset))
    }
}

impl Default for Strel {
    fn default() -> Self {
        Self {
            mask: ArrayD::from_elem(IxDyn(&[3, 3]), true),
            offset: vec![1, 1],
        }
    }
}
