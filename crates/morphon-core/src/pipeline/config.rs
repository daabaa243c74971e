use serde::{Deserialize, Serialize};

use crate::connectivity::Connectivity;
use crate::consts::DEFAULT_STREL_SIZE;
use crate::error::Result;
use crate::morphology::BorderMode;
use crate::strel::Strel;

/// Serializable description of a structuring element.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum StrelShape {
    Square { size: usize },
    Rectangle { height: usize, width: usize },
    Cross { radius: usize },
    Diamond { radius: usize },
    /// Every offset within Euclidean distance `radius` of the origin.
    Disk { radius: f64 },
    Cube { size: usize },
    Cuboid { depth: usize, height: usize, width: usize },
    Ball { radius: f64 },
}

impl Default for StrelShape {
    fn default() -> Self {
        Self::Square {
            size: DEFAULT_STREL_SIZE,
        }
    }
}

impl StrelShape {
    /// Construct the structuring element this shape describes.
    pub fn build(&self) -> Result<Strel> {
        match *self {
            Self::Square { size } => Strel::square(size),
            Self::Rectangle { height, width } => Strel::rectangle(height, width),
            Self::Cross { radius } => Strel::cross(radius),
            Self::Diamond { radius } => Strel::diamond(radius),
            Self::Disk { radius } => Strel::disk(radius),
            Self::Cube { size } => Strel::cube(size),
            Self::Cuboid {
                depth,
                height,
                width,
            } => Strel::cuboid(depth, height, width),
            Self::Ball { radius } => Strel::ball(radius),
        }
    }

    /// Number of axes of the built element.
    pub fn dimensionality(&self) -> usize {
        match self {
            Self::Square { .. }
            | Self::Rectangle { .. }
            | Self::Cross { .. }
            | Self::Diamond { .. }
            | Self::Disk { .. } => 2,
            Self::Cube { .. } | Self::Cuboid { .. } | Self::Ball { .. } => 3,
        }
    }
}

impl std::fmt::Display for StrelShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Square { size } => write!(f, "Square {size}x{size}"),
            Self::Rectangle { height, width } => write!(f, "Rectangle {height}x{width}"),
            Self::Cross { radius } => write!(f, "Cross (r={radius})"),
            Self::Diamond { radius } => write!(f, "Diamond (r={radius})"),
            Self::Disk { radius } => write!(f, "Disk (r={radius})"),
            Self::Cube { size } => write!(f, "Cube {size}x{size}x{size}"),
            Self::Cuboid {
                depth,
                height,
                width,
            } => write!(f, "Cuboid {depth}x{height}x{width}"),
            Self::Ball { radius } => write!(f, "Ball (r={radius})"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MorphOperation {
    #[default]
    Dilation,
    Erosion,
    Opening,
    Closing,
    Gradient,
    InnerGradient,
    OuterGradient,
    WhiteTopHat,
    BlackTopHat,
}

impl std::fmt::Display for MorphOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dilation => write!(f, "Dilation"),
            Self::Erosion => write!(f, "Erosion"),
            Self::Opening => write!(f, "Opening"),
            Self::Closing => write!(f, "Closing"),
            Self::Gradient => write!(f, "Gradient"),
            Self::InnerGradient => write!(f, "Inner gradient"),
            Self::OuterGradient => write!(f, "Outer gradient"),
            Self::WhiteTopHat => write!(f, "White top-hat"),
            Self::BlackTopHat => write!(f, "Black top-hat"),
        }
    }
}

/// One step of a morphology pipeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum MorphStep {
    Filter {
        operation: MorphOperation,
        #[serde(default)]
        shape: StrelShape,
        #[serde(default)]
        border: BorderMode,
    },
    /// `None` uses the orthogonal connectivity of the image's dimensionality.
    FillHoles {
        #[serde(default)]
        connectivity: Option<Connectivity>,
    },
    KillBorders {
        #[serde(default)]
        connectivity: Option<Connectivity>,
    },
}

impl std::fmt::Display for MorphStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Filter {
                operation,
                shape,
                border,
            } => write!(f, "{operation} with {shape} (border: {border})"),
            Self::FillHoles { connectivity } => match connectivity {
                Some(c) => write!(f, "Fill holes ({c})"),
                None => write!(f, "Fill holes"),
            },
            Self::KillBorders { connectivity } => match connectivity {
                Some(c) => write!(f, "Kill borders ({c})"),
                None => write!(f, "Kill borders"),
            },
        }
    }
}

/// Ordered list of steps applied to one image.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MorphologyConfig {
    #[serde(default)]
    pub steps: Vec<MorphStep>,
}
