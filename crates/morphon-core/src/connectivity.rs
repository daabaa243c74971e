use serde::{Deserialize, Serialize};

use crate::error::{MorphError, Result};

/// Adjacency relation between grid positions.
///
/// Offsets are expressed in array axis order (`[dy, dx]` in 2D,
/// `[dz, dy, dx]` in 3D), matching `ndarray` indexing.
///
/// Deserialized custom offsets go through [`Connectivity::custom`], so a
/// malformed offset list is rejected at load time.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ConnectivityDef")]
pub enum Connectivity {
    /// 2D, orthogonal neighbours.
    #[default]
    C4,
    /// 2D, orthogonal and diagonal neighbours.
    C8,
    /// 3D, face neighbours.
    C6,
    /// 3D, face, edge and corner neighbours.
    C26,
    /// Arbitrary offset list for the N-dimensional engine.
    Custom {
        dimensionality: usize,
        offsets: Vec<Vec<isize>>,
    },
}

impl std::fmt::Display for Connectivity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::C4 => write!(f, "C4"),
            Self::C8 => write!(f, "C8"),
            Self::C6 => write!(f, "C6"),
            Self::C26 => write!(f, "C26"),
            Self::Custom {
                dimensionality,
                offsets,
            } => write!(f, "Custom ({}D, {} neighbors)", dimensionality, offsets.len()),
        }
    }
}

impl Connectivity {
    /// Build a custom connectivity, validating offset lengths.
    pub fn custom(dimensionality: usize, offsets: Vec<Vec<isize>>) -> Result<Self> {
        check_offsets(dimensionality, &offsets)?;
        Ok(Self::Custom {
            dimensionality,
            offsets,
        })
    }

    /// Re-check a connectivity built directly from the `Custom` variant.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Custom {
                dimensionality,
                offsets,
            } => check_offsets(*dimensionality, offsets),
            _ => Ok(()),
        }
    }

    /// Neighbours differing by one along a single axis (C4 in 2D, C6 in 3D).
    pub fn orthogonal(dimensionality: usize) -> Self {
        match dimensionality {
            2 => Self::C4,
            3 => Self::C6,
            d => Self::Custom {
                dimensionality: d,
                offsets: unit_offsets(d, false),
            },
        }
    }

    /// All neighbours of the unit hypercube (C8 in 2D, C26 in 3D).
    pub fn full(dimensionality: usize) -> Self {
        match dimensionality {
            2 => Self::C8,
            3 => Self::C26,
            d => Self::Custom {
                dimensionality: d,
                offsets: unit_offsets(d, true),
            },
        }
    }

    /// Number of axes the offsets apply to.
    pub fn dimensionality(&self) -> usize {
        match self {
            Self::C4 | Self::C8 => 2,
            Self::C6 | Self::C26 => 3,
            Self::Custom { dimensionality, .. } => *dimensionality,
        }
    }

    /// Neighbour offsets in lexicographic order.
    pub fn offsets(&self) -> Vec<Vec<isize>> {
        match self {
            Self::C4 => unit_offsets(2, false),
            Self::C8 => unit_offsets(2, true),
            Self::C6 => unit_offsets(3, false),
            Self::C26 => unit_offsets(3, true),
            Self::Custom { offsets, .. } => offsets.clone(),
        }
    }

    pub fn neighbor_count(&self) -> usize {
        match self {
            Self::C4 => 4,
            Self::C8 => 8,
            Self::C6 => 6,
            Self::C26 => 26,
            Self::Custom { offsets, .. } => offsets.len(),
        }
    }

    /// True when every offset has its negation in the set.
    pub fn is_symmetric(&self) -> bool {
        let offsets = self.offsets();
        offsets.iter().all(|o| {
            let negated: Vec<isize> = o.iter().map(|&c| -c).collect();
            offsets.contains(&negated)
        })
    }
}

fn check_offsets(dimensionality: usize, offsets: &[Vec<isize>]) -> Result<()> {
    if dimensionality == 0 {
        return Err(MorphError::InvalidConnectivity(
            "dimensionality must be at least 1".to_string(),
        ));
    }
    for offset in offsets {
        if offset.len() != dimensionality {
            return Err(MorphError::InvalidConnectivity(format!(
                "offset {:?} has {} coordinates, expected {}",
                offset,
                offset.len(),
                dimensionality
            )));
        }
        if offset.iter().all(|&c| c == 0) {
            return Err(MorphError::InvalidConnectivity(
                "zero offset is not a neighbor".to_string(),
            ));
        }
    }
    Ok(())
}

/// Serialized form of [`Connectivity`], validated on conversion.
#[derive(Deserialize)]
enum ConnectivityDef {
    C4,
    C8,
    C6,
    C26,
    Custom {
        dimensionality: usize,
        offsets: Vec<Vec<isize>>,
    },
}

impl TryFrom<ConnectivityDef> for Connectivity {
    type Error = MorphError;

    fn try_from(def: ConnectivityDef) -> Result<Self> {
        match def {
            ConnectivityDef::C4 => Ok(Self::C4),
            ConnectivityDef::C8 => Ok(Self::C8),
            ConnectivityDef::C6 => Ok(Self::C6),
            ConnectivityDef::C26 => Ok(Self::C26),
            ConnectivityDef::Custom {
                dimensionality,
                offsets,
            } => Self::custom(dimensionality, offsets),
        }
    }
}

/// Enumerate the offsets of the unit hypercube around the origin.
///
/// With `diagonal == false` only offsets with a single non-zero coordinate
/// are kept.
fn unit_offsets(dimensionality: usize, diagonal: bool) -> Vec<Vec<isize>> {
    let total = 3usize.pow(dimensionality as u32);
    let mut offsets = Vec::with_capacity(total - 1);
    for code in 0..total {
        let mut rest = code;
        let mut offset = vec![0isize; dimensionality];
        for axis in (0..dimensionality).rev() {
            offset[axis] = (rest % 3) as isize - 1;
            rest /= 3;
        }
        let nonzero = offset.iter().filter(|&&c| c != 0).count();
        if nonzero == 0 || (!diagonal && nonzero > 1) {
            continue;
        }
        offsets.push(offset);
    }
    offsets
}
