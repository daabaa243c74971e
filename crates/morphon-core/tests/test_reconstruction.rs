mod common;

use std::sync::Mutex;

use ndarray::{Array1, Array2, Array3, ArrayD, IxDyn};

use morphon_core::connectivity::Connectivity;
use morphon_core::error::MorphError;
use morphon_core::progress::{MorphStage, ProgressReporter};
use morphon_core::reconstruct::{
    reconstruct, reconstruct_reported, HybridReconstruction2D, HybridReconstruction3D,
    HybridReconstructionND, ReconstructionType,
};

use common::{naive_reconstruction, random_levels};

const PROFILE: [u8; 16] = [10, 10, 40, 40, 40, 40, 20, 20, 30, 30, 10, 10, 30, 30, 0, 0];

fn profile_inputs() -> (Array2<u8>, Array2<u8>) {
    let mask = Array2::from_shape_fn((10, 16), |(_, x)| PROFILE[x]);
    let marker = Array2::from_shape_fn((10, 16), |(_, x)| if x == 3 { 30 } else { 0 });
    (marker, mask)
}

/// Voxels on the twelve edges of a cube.
fn cube_edges(size: usize) -> Array3<u8> {
    let last = size - 1;
    Array3::from_shape_fn((size, size, size), |(z, y, x)| {
        let on_face = [z, y, x].iter().filter(|&&c| c == 0 || c == last).count();
        u8::from(on_face >= 2)
    })
}

fn invert(values: &ArrayD<u8>) -> ArrayD<u8> {
    values.mapv(|v| u8::MAX - v)
}

// ---------------------------------------------------------------------------
// Worked examples
// ---------------------------------------------------------------------------

#[test]
fn test_profile_reconstruction_2d() {
    let (marker, mask) = profile_inputs();
    let expected: [u8; 16] = [10, 10, 30, 30, 30, 30, 20, 20, 20, 20, 10, 10, 10, 10, 0, 0];
    for connectivity in [Connectivity::C4, Connectivity::C8] {
        let result =
            reconstruct(&marker, &mask, ReconstructionType::ByDilation, &connectivity).unwrap();
        for row in result.rows() {
            assert_eq!(row.to_vec(), expected.to_vec(), "{connectivity}");
        }
    }
}

#[test]
fn test_profile_reconstruction_1d() {
    let mask = Array1::from(PROFILE.to_vec());
    let mut marker = Array1::zeros(16);
    marker[3] = 30u8;
    let result = reconstruct(
        &marker,
        &mask,
        ReconstructionType::ByDilation,
        &Connectivity::orthogonal(1),
    )
    .unwrap();
    assert_eq!(
        result.to_vec(),
        vec![10, 10, 30, 30, 30, 30, 20, 20, 20, 20, 10, 10, 10, 10, 0, 0]
    );
}

#[test]
fn test_cube_edge_mesh_reconstruction() {
    let mask = cube_edges(5);
    let mut marker = Array3::zeros((5, 5, 5));
    marker[[0, 0, 0]] = 1u8;
    for connectivity in [Connectivity::C6, Connectivity::C26] {
        let result =
            reconstruct(&marker, &mask, ReconstructionType::ByDilation, &connectivity).unwrap();
        assert_eq!(result, mask, "{connectivity}");
    }
    assert_eq!(mask.iter().filter(|&&v| v == 1).count(), 8 + 12 * 3);
}

#[test]
fn test_diagonal_chain_needs_full_connectivity() {
    let mask = Array3::from_shape_fn((5, 5, 5), |(z, y, x)| u8::from(z == y && y == x));
    let mut marker = Array3::zeros((5, 5, 5));
    marker[[0, 0, 0]] = 1u8;
    let face =
        reconstruct(&marker, &mask, ReconstructionType::ByDilation, &Connectivity::C6).unwrap();
    assert_eq!(face.sum(), 1);
    let full =
        reconstruct(&marker, &mask, ReconstructionType::ByDilation, &Connectivity::C26).unwrap();
    assert_eq!(full.sum(), 5);
}

#[test]
fn test_reconstruction_by_erosion_fills_basin() {
    // A basin of depth 2 inside a plateau of 5, marker high everywhere but the border.
    let mask = Array2::from_shape_fn((7, 7), |(y, x)| {
        if (2..=4).contains(&y) && (2..=4).contains(&x) {
            3u8
        } else {
            5
        }
    });
    let marker = Array2::from_shape_fn((7, 7), |(y, x)| {
        if y == 0 || x == 0 || y == 6 || x == 6 {
            5u8
        } else {
            u8::MAX
        }
    });
    let result =
        reconstruct(&marker, &mask, ReconstructionType::ByErosion, &Connectivity::C4).unwrap();
    assert!(result.iter().all(|&v| v == 5));
}

// ---------------------------------------------------------------------------
// Agreement with iterated geodesic dilation
// ---------------------------------------------------------------------------

fn check_against_naive(shape: &[usize], connectivity: &Connectivity, seed: u64) {
    let mask = random_levels(shape, 8, seed);
    let marker = random_levels(shape, 8, seed + 1000).mapv(|v| if v < 6 { 0 } else { v });
    let expected = naive_reconstruction(&marker, &mask, &connectivity.offsets());
    let result = reconstruct(&marker, &mask, ReconstructionType::ByDilation, connectivity).unwrap();
    assert_eq!(result, expected, "{connectivity} on {shape:?}");

    // By erosion is the dual under inversion of the grey levels.
    let dual = naive_reconstruction(&invert(&marker), &invert(&mask), &connectivity.offsets());
    let by_erosion =
        reconstruct(&marker, &mask, ReconstructionType::ByErosion, connectivity).unwrap();
    assert_eq!(by_erosion, invert(&dual), "{connectivity} by erosion on {shape:?}");
}

#[test]
fn test_2d_engine_matches_naive() {
    check_against_naive(&[17, 23], &Connectivity::C4, 1);
    check_against_naive(&[17, 23], &Connectivity::C8, 2);
}

#[test]
fn test_3d_engine_matches_naive() {
    check_against_naive(&[6, 7, 9], &Connectivity::C6, 3);
    check_against_naive(&[6, 7, 9], &Connectivity::C26, 4);
}

#[test]
fn test_nd_engine_matches_naive() {
    check_against_naive(&[4, 3, 5, 4], &Connectivity::orthogonal(4), 5);
    check_against_naive(&[3, 4, 3, 4], &Connectivity::full(4), 6);
    check_against_naive(&[40], &Connectivity::orthogonal(1), 7);
}

#[test]
fn test_custom_2d_connectivity_uses_nd_engine() {
    let knight = Connectivity::custom(
        2,
        vec![
            vec![-2, -1],
            vec![-2, 1],
            vec![-1, -2],
            vec![-1, 2],
            vec![1, -2],
            vec![1, 2],
            vec![2, -1],
            vec![2, 1],
        ],
    )
    .unwrap();
    check_against_naive(&[12, 13], &knight, 8);
}

#[test]
fn test_dispatcher_agrees_with_nd_engine() {
    let mask = random_levels(&[9, 11, 8], 16, 21);
    let marker = random_levels(&[9, 11, 8], 16, 22);
    for kind in [ReconstructionType::ByDilation, ReconstructionType::ByErosion] {
        let fast = reconstruct(&marker, &mask, kind, &Connectivity::C26).unwrap();
        let generic = HybridReconstructionND::new(kind, Connectivity::C26)
            .unwrap()
            .apply(&marker, &mask)
            .unwrap();
        assert_eq!(fast, generic, "{kind}");
    }
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

#[test]
fn test_result_bounded_and_stable() {
    let mask = random_levels(&[20, 20], 50, 31);
    let marker = random_levels(&[20, 20], 50, 32);
    let result =
        reconstruct(&marker, &mask, ReconstructionType::ByDilation, &Connectivity::C8).unwrap();
    for ((&r, &m), &k) in result.iter().zip(&mask).zip(&marker) {
        assert!(r <= m);
        assert!(r >= k.min(m));
    }
    let again =
        reconstruct(&result, &mask, ReconstructionType::ByDilation, &Connectivity::C8).unwrap();
    assert_eq!(again, result);
}

#[test]
fn test_by_erosion_bounded_below_by_mask() {
    let mask = random_levels(&[6, 6, 6], 50, 41);
    let marker = random_levels(&[6, 6, 6], 50, 42);
    let result =
        reconstruct(&marker, &mask, ReconstructionType::ByErosion, &Connectivity::C6).unwrap();
    for ((&r, &m), &k) in result.iter().zip(&mask).zip(&marker) {
        assert!(r >= m);
        assert!(r <= k.max(m));
    }
}

#[test]
fn test_float_reconstruction() {
    let mask = Array2::from_shape_fn((5, 8), |(_, x)| x as f32 * 0.5);
    let mut marker = Array2::from_elem((5, 8), f32::NEG_INFINITY);
    marker[[2, 7]] = 10.0;
    let result =
        reconstruct(&marker, &mask, ReconstructionType::ByDilation, &Connectivity::C4).unwrap();
    // The whole ramp is connected to the marker and lies below it.
    assert_eq!(result, mask);
}

#[test]
fn test_process_in_place_matches_apply() {
    let mask = random_levels(&[5, 6, 7], 9, 51)
        .into_dimensionality::<ndarray::Ix3>()
        .unwrap();
    let marker = random_levels(&[5, 6, 7], 9, 52)
        .into_dimensionality::<ndarray::Ix3>()
        .unwrap();
    let engine =
        HybridReconstruction3D::new(ReconstructionType::ByDilation, Connectivity::C6).unwrap();
    let applied = engine.apply(marker.view(), mask.view()).unwrap();

    let mut in_place = ndarray::Zip::from(&marker).and(&mask).map_collect(|&a, &b| a.min(b));
    engine.process_in_place(&mut in_place, mask.view()).unwrap();
    assert_eq!(in_place, applied);
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[test]
fn test_shape_mismatch_rejected() {
    let marker = Array2::<u8>::zeros((4, 5));
    let mask = Array2::<u8>::zeros((5, 4));
    assert!(matches!(
        reconstruct(&marker, &mask, ReconstructionType::ByDilation, &Connectivity::C4),
        Err(MorphError::ShapeMismatch { .. })
    ));
}

#[test]
fn test_nd_engine_shape_mismatch_rejected() {
    let engine =
        HybridReconstructionND::new(ReconstructionType::ByErosion, Connectivity::C4).unwrap();
    let marker = Array2::<u8>::zeros((4, 5));
    let mask = Array2::<u8>::zeros((5, 4));
    assert!(matches!(
        engine.apply(&marker, &mask),
        Err(MorphError::ShapeMismatch { .. })
    ));
}

#[test]
fn test_malformed_custom_connectivity_rejected() {
    let levels = Array2::<u8>::zeros((3, 3));
    let truncated = Connectivity::Custom {
        dimensionality: 2,
        offsets: vec![vec![1]],
    };
    assert!(matches!(
        reconstruct(&levels, &levels, ReconstructionType::ByDilation, &truncated),
        Err(MorphError::InvalidConnectivity(_))
    ));
}

#[test]
fn test_connectivity_dimensionality_must_match() {
    let marker = Array2::<u8>::zeros((4, 4));
    assert!(matches!(
        reconstruct(&marker, &marker, ReconstructionType::ByDilation, &Connectivity::C6),
        Err(MorphError::InvalidDimensionality { actual: 2, .. })
    ));
    let volume = ArrayD::<u8>::zeros(IxDyn(&[2, 2, 2]));
    let dilation = ReconstructionType::ByDilation;
    assert!(reconstruct(&volume, &volume, dilation, &Connectivity::C8).is_err());
}

#[test]
fn test_dedicated_engines_reject_foreign_connectivity() {
    assert!(matches!(
        HybridReconstruction2D::new(ReconstructionType::ByDilation, Connectivity::C26),
        Err(MorphError::InvalidConnectivity(_))
    ));
    assert!(matches!(
        HybridReconstruction3D::new(ReconstructionType::ByErosion, Connectivity::C4),
        Err(MorphError::InvalidConnectivity(_))
    ));
}

#[test]
fn test_reconstruction_type_helpers() {
    let dilation = ReconstructionType::default();
    assert_eq!(dilation, ReconstructionType::ByDilation);
    assert_eq!(dilation.other(), ReconstructionType::ByErosion);
    assert_eq!(dilation.sign(), 1);
    assert_eq!(ReconstructionType::ByErosion.sign(), -1);
    assert_eq!(dilation.bound(7u8, 4), 4);
    assert_eq!(ReconstructionType::ByErosion.bound(7u8, 4), 7);
    assert!(dilation.exceeds(3u8, 2));
    assert!(ReconstructionType::ByErosion.exceeds(2u8, 3));
    assert_eq!(dilation.neutral::<u8>(), 0);
    assert_eq!(ReconstructionType::ByErosion.neutral::<u8>(), u8::MAX);
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

#[derive(Default)]
struct StageRecorder {
    stages: Mutex<Vec<MorphStage>>,
}

impl ProgressReporter for StageRecorder {
    fn begin_stage(&self, stage: MorphStage, _total_items: Option<usize>) {
        self.stages.lock().unwrap().push(stage);
    }
}

#[test]
fn test_hybrid_phases_reported_in_order() {
    let (marker, mask) = profile_inputs();
    let recorder = StageRecorder::default();
    reconstruct_reported(
        &marker,
        &mask,
        ReconstructionType::ByDilation,
        &Connectivity::C8,
        &recorder,
    )
    .unwrap();
    assert_eq!(
        *recorder.stages.lock().unwrap(),
        vec![
            MorphStage::ForwardScan,
            MorphStage::BackwardScan,
            MorphStage::QueuePropagation
        ]
    );
}
