mod common;

use ndarray::{array, Array2, Array3, ArrayD};

use morphon_core::connectivity::Connectivity;
use morphon_core::filters::{binary, scalar};
use morphon_core::morphology::BorderMode;
use morphon_core::rle::BinaryImage;
use morphon_core::strel::Strel;

use common::filled_box;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn count(image: &BinaryImage) -> usize {
    image.cardinality()
}

/// Square outline with corners `lo` and `hi` (inclusive) on a `size` x `size` image.
fn ring(size: usize, lo: usize, hi: usize) -> Array2<bool> {
    Array2::from_shape_fn((size, size), |(y, x)| {
        let inside = (lo..=hi).contains(&y) && (lo..=hi).contains(&x);
        inside && (y == lo || y == hi || x == lo || x == hi)
    })
}

fn line(shifts: &[isize]) -> Strel {
    let shifts: Vec<Vec<isize>> = shifts.iter().map(|&s| vec![s]).collect();
    Strel::from_shifts(&shifts).unwrap()
}

// ---------------------------------------------------------------------------
// Binary fill_holes / kill_borders
// ---------------------------------------------------------------------------

#[test]
fn test_fill_holes_closed_ring() {
    let filled = binary::fill_holes(&ring(7, 1, 5), &Connectivity::C4).unwrap();
    assert_eq!(filled.to_dense(), filled_box(&[7, 7], &[1, 1], &[5, 5]));
}

#[test]
fn test_fill_holes_open_ring_untouched() {
    let mut open = ring(7, 1, 5);
    open[[1, 3]] = false;
    let filled = binary::fill_holes(&open, &Connectivity::C4).unwrap();
    assert_eq!(filled.to_dense(), open.into_dyn());
}

#[test]
fn test_fill_holes_background_connectivity() {
    // A diamond outline is closed for C4 background but leaks for C8.
    let diamond = Array2::from_shape_fn((7, 7), |(y, x)| {
        (y as isize - 3).abs() + (x as isize - 3).abs() == 2
    });
    let c4 = binary::fill_holes(&diamond, &Connectivity::C4).unwrap();
    assert_eq!(count(&c4), 8 + 5);
    let c8 = binary::fill_holes(&diamond, &Connectivity::C8).unwrap();
    assert_eq!(count(&c8), 8);

    let sparse = Array2::from_shape_fn((7, 7), |(y, x)| {
        (y as isize - 3).abs() + (x as isize - 3).abs() == 2 && (x == 3 || y == 3)
    });
    let c4 = binary::fill_holes(&sparse, &Connectivity::C4).unwrap();
    assert_eq!(count(&c4), 4);
}

#[test]
fn test_fill_holes_hollow_cube() {
    let shell = Array3::from_shape_fn((6, 6, 6), |(z, y, x)| {
        let inside = [z, y, x].iter().all(|&c| (1..=4).contains(&c));
        let interior = [z, y, x].iter().all(|&c| (2..=3).contains(&c));
        inside && !interior
    });
    let filled = binary::fill_holes(&shell, &Connectivity::C6).unwrap();
    assert_eq!(filled.to_dense(), filled_box(&[6, 6, 6], &[1, 1, 1], &[4, 4, 4]));
}

#[test]
fn test_kill_borders_3d() {
    let mut volume = Array3::from_elem((5, 5, 5), false);
    volume[[0, 2, 2]] = true;
    volume[[1, 2, 2]] = true;
    volume[[3, 3, 3]] = true;
    let kept = binary::kill_borders(&volume, &Connectivity::C6).unwrap();
    assert_eq!(count(&kept), 1);
    assert!(kept.to_dense()[[3, 3, 3]]);
}

#[test]
fn test_kill_borders_full_connectivity_reaches_diagonal() {
    let mut image = Array2::from_elem((6, 6), false);
    image[[0, 0]] = true;
    image[[1, 1]] = true;
    image[[3, 3]] = true;
    let c4 = binary::kill_borders(&image, &Connectivity::C4).unwrap();
    assert_eq!(count(&c4), 2);
    let c8 = binary::kill_borders(&image, &Connectivity::C8).unwrap();
    assert_eq!(count(&c8), 1);
}

// ---------------------------------------------------------------------------
// Binary gradients and top-hats
// ---------------------------------------------------------------------------

#[test]
fn test_binary_gradients_of_block() {
    let block: Array2<bool> = filled_box(&[9, 9], &[3, 3], &[5, 5]).into_dimensionality().unwrap();
    let cross = Strel::cross(1).unwrap();
    let gradient = binary::gradient(&block, &cross, false).unwrap();
    let inner = binary::inner_gradient(&block, &cross, false).unwrap();
    let outer = binary::outer_gradient(&block, &cross).unwrap();
    assert_eq!(count(&inner), 8);
    assert_eq!(count(&outer), 12);
    assert_eq!(count(&gradient), 20);
    assert_eq!(inner.union(&outer).unwrap(), gradient);
    assert!(inner.intersection(&outer).unwrap().is_empty());
}

#[test]
fn test_white_top_hat_keeps_small_details() {
    let mut image: Array2<bool> =
        filled_box(&[12, 12], &[2, 2], &[7, 7]).into_dimensionality().unwrap();
    image[[10, 10]] = true;
    let hat = binary::white_top_hat(&image, &Strel::square(3).unwrap(), false).unwrap();
    assert_eq!(count(&hat), 1);
    assert!(hat.to_dense()[[10, 10]]);
}

#[test]
fn test_black_top_hat_finds_small_holes() {
    let mut image: Array2<bool> =
        filled_box(&[12, 12], &[2, 2], &[8, 8]).into_dimensionality().unwrap();
    image[[5, 5]] = false;
    let hat = binary::black_top_hat(&image, &Strel::square(3).unwrap(), false).unwrap();
    assert_eq!(count(&hat), 1);
    assert!(hat.to_dense()[[5, 5]]);
}

// ---------------------------------------------------------------------------
// Grey-level filters
// ---------------------------------------------------------------------------

#[test]
fn test_scalar_gradients_of_plateau() {
    let input = array![0u8, 0, 5, 5, 5, 0];
    let se = line(&[-1, 0, 1]);
    assert_eq!(
        scalar::gradient(&input, &se, BorderMode::Ignore).unwrap(),
        array![0u8, 5, 5, 0, 5, 5]
    );
    assert_eq!(
        scalar::inner_gradient(&input, &se, BorderMode::Ignore).unwrap(),
        array![0u8, 0, 5, 0, 5, 0]
    );
    assert_eq!(
        scalar::outer_gradient(&input, &se, BorderMode::Ignore).unwrap(),
        array![0u8, 5, 0, 0, 0, 5]
    );
}

#[test]
fn test_scalar_top_hats() {
    let se = line(&[-1, 0, 1]);
    let peak = array![0u8, 0, 7, 0, 0];
    assert_eq!(scalar::white_top_hat(&peak, &se, BorderMode::Ignore).unwrap(), peak);

    let pit = array![5u8, 5, 0, 5, 5];
    assert_eq!(
        scalar::black_top_hat(&pit, &se, BorderMode::Ignore).unwrap(),
        array![0u8, 0, 5, 0, 0]
    );
}

#[test]
fn test_scalar_top_hats_never_negative_on_floats() {
    let input: ArrayD<f32> = common::random_levels(&[9, 9], 20, 4).mapv(|v| v as f32 * 0.25);
    let disk = Strel::disk(1.5).unwrap();
    let white = scalar::white_top_hat(&input, &disk, BorderMode::Replicate).unwrap();
    let black = scalar::black_top_hat(&input, &disk, BorderMode::Replicate).unwrap();
    assert!(white.iter().chain(black.iter()).all(|&v| v >= 0.0));
}

#[test]
fn test_scalar_kill_borders() {
    let mut input = Array2::<u8>::zeros((7, 7));
    input[[0, 3]] = 9;
    input[[1, 3]] = 6;
    input[[3, 3]] = 5;
    let result = scalar::kill_borders(&input, &Connectivity::C4).unwrap();
    let mut expected = Array2::<u8>::zeros((7, 7));
    expected[[3, 3]] = 5;
    assert_eq!(result, expected);
}

#[test]
fn test_scalar_fill_holes_raises_basin_to_exit_level() {
    let mut input = Array2::from_elem((7, 7), 5u8);
    // A channel at level 2 from the left border down to a pit at level 1.
    input[[3, 0]] = 2;
    input[[3, 1]] = 2;
    input[[3, 2]] = 2;
    input[[3, 3]] = 1;
    input[[5, 5]] = 0;
    let result = scalar::fill_holes(&input, &Connectivity::C4).unwrap();

    let mut expected = Array2::from_elem((7, 7), 5u8);
    expected[[3, 0]] = 2;
    expected[[3, 1]] = 2;
    expected[[3, 2]] = 2;
    expected[[3, 3]] = 2;
    assert_eq!(result, expected);
}

#[test]
fn test_scalar_fill_holes_3d_binary_levels_agree() {
    let shell = Array3::from_shape_fn((6, 6, 6), |(z, y, x)| {
        let inside = [z, y, x].iter().all(|&c| (1..=4).contains(&c));
        let interior = [z, y, x].iter().all(|&c| (2..=3).contains(&c));
        inside && !interior
    });
    let levels = shell.mapv(u8::from);
    let filled = scalar::fill_holes(&levels, &Connectivity::C6).unwrap();
    let expected = binary::fill_holes(&shell, &Connectivity::C6).unwrap().to_dense();
    assert_eq!(filled.into_dyn(), expected.mapv(u8::from));
}
