mod common;

use ndarray::Array2;

use morphon_core::connectivity::Connectivity;
use morphon_core::error::MorphError;
use morphon_core::morphology::{binary, scalar, BorderMode};
use morphon_core::pipeline::{
    apply_step_binary, apply_step_scalar, run_steps_binary, run_steps_scalar, MorphOperation,
    MorphStep, MorphologyConfig, StrelShape,
};
use morphon_core::progress::MorphStage;
use morphon_core::reconstruct::ReconstructionType;
use morphon_core::strel::Strel;

use common::{filled_box, random_levels, random_mask_2d};

const PIPELINE_TOML: &str = r#"
[[steps]]
[steps.Filter]
operation = "Opening"
shape = { Disk = { radius = 2.0 } }
border = "Replicate"

[[steps]]
FillHoles = { connectivity = "C8" }

[[steps]]
KillBorders = {}
"#;

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

#[test]
fn test_operation_display() {
    assert_eq!(MorphOperation::Dilation.to_string(), "Dilation");
    assert_eq!(MorphOperation::InnerGradient.to_string(), "Inner gradient");
    assert_eq!(MorphOperation::BlackTopHat.to_string(), "Black top-hat");
}

#[test]
fn test_shape_display() {
    assert_eq!(StrelShape::Square { size: 5 }.to_string(), "Square 5x5");
    assert_eq!(StrelShape::Disk { radius: 2.5 }.to_string(), "Disk (r=2.5)");
    assert_eq!(
        StrelShape::Cuboid {
            depth: 1,
            height: 3,
            width: 5
        }
        .to_string(),
        "Cuboid 1x3x5"
    );
}

#[test]
fn test_step_display() {
    let step = MorphStep::Filter {
        operation: MorphOperation::Closing,
        shape: StrelShape::Cross { radius: 1 },
        border: BorderMode::Ignore,
    };
    assert_eq!(step.to_string(), "Closing with Cross (r=1) (border: Ignore)");
    assert_eq!(
        MorphStep::FillHoles {
            connectivity: Some(Connectivity::C26)
        }
        .to_string(),
        "Fill holes (C26)"
    );
    assert_eq!(MorphStep::KillBorders { connectivity: None }.to_string(), "Kill borders");
}

#[test]
fn test_enum_displays() {
    assert_eq!(Connectivity::C8.to_string(), "C8");
    assert_eq!(Connectivity::orthogonal(4).to_string(), "Custom (4D, 8 neighbors)");
    assert_eq!(ReconstructionType::ByErosion.to_string(), "By erosion");
    assert_eq!(MorphStage::QueuePropagation.to_string(), "Queue propagation");
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

#[test]
fn test_defaults() {
    assert_eq!(StrelShape::default(), StrelShape::Square { size: 3 });
    assert_eq!(MorphOperation::default(), MorphOperation::Dilation);
    assert_eq!(Connectivity::default(), Connectivity::C4);
    assert!(MorphologyConfig::default().steps.is_empty());
}

#[test]
fn test_shape_builds_matching_strel() {
    assert_eq!(StrelShape::default().build().unwrap(), Strel::square(3).unwrap());
    assert_eq!(StrelShape::Ball { radius: 1.0 }.dimensionality(), 3);
    assert_eq!(StrelShape::Diamond { radius: 2 }.dimensionality(), 2);
    assert!(matches!(
        StrelShape::Disk { radius: -1.0 }.build(),
        Err(MorphError::InvalidParameter { .. })
    ));
}

// ---------------------------------------------------------------------------
// Serialization
// ---------------------------------------------------------------------------

#[test]
fn test_toml_pipeline_parses() {
    let config: MorphologyConfig = toml::from_str(PIPELINE_TOML).unwrap();
    assert_eq!(
        config.steps,
        vec![
            MorphStep::Filter {
                operation: MorphOperation::Opening,
                shape: StrelShape::Disk { radius: 2.0 },
                border: BorderMode::Replicate,
            },
            MorphStep::FillHoles {
                connectivity: Some(Connectivity::C8)
            },
            MorphStep::KillBorders { connectivity: None },
        ]
    );
}

#[test]
fn test_toml_filter_defaults() {
    let config: MorphologyConfig = toml::from_str(
        r#"
[[steps]]
[steps.Filter]
operation = "Erosion"
"#,
    )
    .unwrap();
    assert_eq!(
        config.steps,
        vec![MorphStep::Filter {
            operation: MorphOperation::Erosion,
            shape: StrelShape::Square { size: 3 },
            border: BorderMode::Ignore,
        }]
    );
    let empty: MorphologyConfig = toml::from_str("").unwrap();
    assert!(empty.steps.is_empty());
}

#[test]
fn test_json_round_trip() {
    let config = MorphologyConfig {
        steps: vec![
            MorphStep::Filter {
                operation: MorphOperation::WhiteTopHat,
                shape: StrelShape::Ball { radius: 1.5 },
                border: BorderMode::Replicate,
            },
            MorphStep::FillHoles {
                connectivity: Some(Connectivity::custom(2, vec![vec![0, 1], vec![0, -1]]).unwrap()),
            },
        ],
    };
    let json = serde_json::to_string(&config).unwrap();
    let restored: MorphologyConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, config);
}

#[test]
fn test_malformed_custom_connectivity_rejected_on_load() {
    let truncated = serde_json::from_str::<Connectivity>(
        r#"{"Custom":{"dimensionality":2,"offsets":[[1]]}}"#,
    );
    assert!(truncated.is_err());
    let zero = serde_json::from_str::<Connectivity>(
        r#"{"Custom":{"dimensionality":2,"offsets":[[0,0]]}}"#,
    );
    assert!(zero.is_err());
    let valid: Connectivity =
        serde_json::from_str(r#"{"Custom":{"dimensionality":1,"offsets":[[-1],[1]]}}"#).unwrap();
    assert_eq!(valid, Connectivity::orthogonal(1));

    let result: Result<MorphologyConfig, _> = toml::from_str(
        r#"
[[steps]]
FillHoles = { connectivity = { Custom = { dimensionality = 3, offsets = [[0, 1]] } } }
"#,
    );
    assert!(result.is_err());
}

#[test]
fn test_unknown_operation_rejected() {
    let result: Result<MorphologyConfig, _> = toml::from_str(
        r#"
[[steps]]
[steps.Filter]
operation = "Skeleton"
"#,
    );
    assert!(result.is_err());
}

// ---------------------------------------------------------------------------
// Running steps
// ---------------------------------------------------------------------------

#[test]
fn test_single_scalar_step_matches_direct_call() {
    let input = random_levels(&[12, 15], 30, 1);
    let step = MorphStep::Filter {
        operation: MorphOperation::Closing,
        shape: StrelShape::Diamond { radius: 1 },
        border: BorderMode::Replicate,
    };
    let via_step = apply_step_scalar(&input, &step).unwrap();
    let direct =
        scalar::closing(&input, &Strel::diamond(1).unwrap(), BorderMode::Replicate).unwrap();
    assert_eq!(via_step, direct);
}

#[test]
fn test_binary_replicate_border_pads_erosion() {
    let input = Array2::from_shape_fn((10, 10), |(_, x)| x < 5);
    let step = MorphStep::Filter {
        operation: MorphOperation::Erosion,
        shape: StrelShape::Square { size: 3 },
        border: BorderMode::Replicate,
    };
    let via_step = apply_step_binary(&input, &step).unwrap();
    let direct = binary::erosion(&input, &Strel::square(3).unwrap(), true).unwrap();
    assert_eq!(via_step, direct);
}

#[test]
fn test_run_binary_pipeline() {
    let config: MorphologyConfig = toml::from_str(PIPELINE_TOML).unwrap();
    let input = random_mask_2d(30, 30, 0.6, 12);
    let result = run_steps_binary(&input, &config).unwrap();

    let disk = Strel::disk(2.0).unwrap();
    let opened = binary::opening(&input, &disk, true).unwrap();
    let filled = morphon_core::filters::binary::fill_holes(&opened, &Connectivity::C8).unwrap();
    let expected = morphon_core::filters::binary::kill_borders(&filled, &Connectivity::C4).unwrap();
    assert_eq!(result, expected);
}

#[test]
fn test_run_scalar_pipeline_kill_borders() {
    let config = MorphologyConfig {
        steps: vec![MorphStep::KillBorders { connectivity: None }],
    };
    let input = filled_box(&[6, 6, 6], &[0, 0, 0], &[1, 1, 1]).mapv(u8::from)
        + filled_box(&[6, 6, 6], &[3, 3, 3], &[4, 4, 4]).mapv(|v| 2 * u8::from(v));
    let result = run_steps_scalar(&input, &config).unwrap();
    assert_eq!(result, filled_box(&[6, 6, 6], &[3, 3, 3], &[4, 4, 4]).mapv(|v| 2 * u8::from(v)));
}

#[test]
fn test_empty_pipeline_is_identity() {
    let input = random_mask_2d(5, 5, 0.5, 2);
    let result = run_steps_binary(&input, &MorphologyConfig::default()).unwrap();
    assert_eq!(result.to_dense(), input.into_dyn());
}

#[test]
fn test_pipeline_stops_at_first_error() {
    let config = MorphologyConfig {
        steps: vec![MorphStep::Filter {
            operation: MorphOperation::Dilation,
            shape: StrelShape::Cube { size: 3 },
            border: BorderMode::Ignore,
        }],
    };
    let input = random_mask_2d(5, 5, 0.5, 3);
    assert!(matches!(
        run_steps_binary(&input, &config),
        Err(MorphError::InvalidDimensionality { .. })
    ));
}
