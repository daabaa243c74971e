/// Row-major index arithmetic for a flat buffer of arbitrary dimensionality.
#[derive(Clone, Debug)]
pub(crate) struct Grid {
    shape: Vec<usize>,
    strides: Vec<usize>,
    len: usize,
}

impl Grid {
    pub(crate) fn new(shape: &[usize]) -> Self {
        let mut strides = vec![0; shape.len()];
        let mut stride = 1;
        for (axis, &extent) in shape.iter().enumerate().rev() {
            strides[axis] = stride;
            stride *= extent;
        }
        Self {
            shape: shape.to_vec(),
            strides,
            len: shape.iter().product(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Write the coordinates of flat `index` into `coords`.
    pub(crate) fn unravel(&self, mut index: usize, coords: &mut [usize]) {
        for (c, &stride) in coords.iter_mut().zip(&self.strides) {
            *c = if stride == 0 { 0 } else { index / stride };
            index -= *c * stride;
        }
    }

    /// Flat index of `coords + shift`, or `None` when it leaves the grid.
    pub(crate) fn neighbor(&self, coords: &[usize], shift: &[isize]) -> Option<usize> {
        let mut index = 0;
        for (((&c, &s), &extent), &stride) in coords
            .iter()
            .zip(shift)
            .zip(&self.shape)
            .zip(&self.strides)
        {
            let position = c as isize + s;
            if position < 0 || position >= extent as isize {
                return None;
            }
            index += position as usize * stride;
        }
        Some(index)
    }

    /// Flat index of `coords + shift` with every coordinate clamped into the grid.
    pub(crate) fn clamped_neighbor(&self, coords: &[usize], shift: &[isize]) -> usize {
        coords
            .iter()
            .zip(shift)
            .zip(&self.shape)
            .zip(&self.strides)
            .map(|(((&c, &s), &extent), &stride)| {
                let position = (c as isize + s).clamp(0, extent as isize - 1);
                position as usize * stride
            })
            .sum()
    }

    /// True when `coords` lies on the outer boundary of the grid.
    pub(crate) fn is_border(&self, coords: &[usize]) -> bool {
        coords
            .iter()
            .zip(&self.shape)
            .any(|(&c, &extent)| c == 0 || c + 1 == extent)
    }
}
