#![allow(dead_code)]

use ndarray::{Array2, Array3, ArrayD, Dimension, IxDyn};

use morphon_core::strel::Strel;

/// Deterministic pseudo-random boolean array; roughly `density` of the pixels are set.
pub fn random_mask(shape: &[usize], density: f64, seed: u64) -> ArrayD<bool> {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    ArrayD::from_shape_fn(IxDyn(shape), |_| {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((state >> 33) as f64 / (1u64 << 31) as f64) < density
    })
}

pub fn random_mask_2d(h: usize, w: usize, density: f64, seed: u64) -> Array2<bool> {
    random_mask(&[h, w], density, seed)
        .into_dimensionality()
        .unwrap()
}

pub fn random_mask_3d(d: usize, h: usize, w: usize, density: f64, seed: u64) -> Array3<bool> {
    random_mask(&[d, h, w], density, seed)
        .into_dimensionality()
        .unwrap()
}

/// Deterministic pseudo-random grey levels in `0..levels`.
pub fn random_levels(shape: &[usize], levels: u8, seed: u64) -> ArrayD<u8> {
    let mut state = seed ^ 0x9e37_79b9_7f4a_7c15;
    ArrayD::from_shape_fn(IxDyn(shape), |_| {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        (state % levels as u64) as u8
    })
}

/// Axis-aligned box of `true` pixels, bounds inclusive, in array axis order.
pub fn filled_box(shape: &[usize], lo: &[usize], hi: &[usize]) -> ArrayD<bool> {
    ArrayD::from_shape_fn(IxDyn(shape), |idx| {
        idx.slice()
            .iter()
            .zip(lo.iter().zip(hi))
            .all(|(&i, (&l, &h))| i >= l && i <= h)
    })
}

fn offset_index(index: &[usize], shift: &[isize], shape: &[usize]) -> Option<Vec<usize>> {
    let mut out = Vec::with_capacity(index.len());
    for ((&i, &s), &n) in index.iter().zip(shift).zip(shape) {
        let j = i as isize + s;
        if j < 0 || j >= n as isize {
            return None;
        }
        out.push(j as usize);
    }
    Some(out)
}

fn clamped_index(index: &[usize], shift: &[isize], shape: &[usize]) -> Vec<usize> {
    index
        .iter()
        .zip(shift)
        .zip(shape)
        .map(|((&i, &s), &n)| (i as isize + s).clamp(0, n as isize - 1) as usize)
        .collect()
}

/// Pixel-by-pixel dilation: `out[p]` is set if some `in[p - s]` is set.
pub fn naive_dilation(input: &ArrayD<bool>, strel: &Strel) -> ArrayD<bool> {
    let shifts = strel.shifts();
    let shape = input.shape().to_vec();
    ArrayD::from_shape_fn(input.raw_dim(), |idx| {
        shifts.iter().any(|s| {
            let back: Vec<isize> = s.iter().map(|v| -v).collect();
            offset_index(idx.slice(), &back, &shape).is_some_and(|j| input[j.as_slice()])
        })
    })
}

/// Pixel-by-pixel erosion: `out[p]` is set if every `in[p + s]` is set.
///
/// With `pad`, positions outside the image take the value of the nearest
/// border pixel; without it they count as background.
pub fn naive_erosion(input: &ArrayD<bool>, strel: &Strel, pad: bool) -> ArrayD<bool> {
    let shifts = strel.shifts();
    let shape = input.shape().to_vec();
    ArrayD::from_shape_fn(input.raw_dim(), |idx| {
        shifts.iter().all(|s| {
            if pad {
                input[clamped_index(idx.slice(), s, &shape).as_slice()]
            } else {
                offset_index(idx.slice(), s, &shape).is_some_and(|j| input[j.as_slice()])
            }
        })
    })
}

/// Reconstruction by dilation through repeated elementary geodesic dilations.
pub fn naive_reconstruction(
    marker: &ArrayD<u8>,
    mask: &ArrayD<u8>,
    offsets: &[Vec<isize>],
) -> ArrayD<u8> {
    let shape = marker.shape().to_vec();
    let mut current = ndarray::Zip::from(marker).and(mask).map_collect(|&a, &b| a.min(b));
    loop {
        let next = ArrayD::from_shape_fn(current.raw_dim(), |idx| {
            let mut best = current[idx.slice()];
            for offset in offsets {
                if let Some(j) = offset_index(idx.slice(), offset, &shape) {
                    best = best.max(current[j.as_slice()]);
                }
            }
            best.min(mask[idx.slice()])
        });
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Dense boolean array to 0/1 grey levels.
pub fn to_levels<D: Dimension>(mask: &ndarray::Array<bool, D>) -> ndarray::Array<u8, D> {
    mask.mapv(u8::from)
}
