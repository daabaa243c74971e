//! Operators composed from morphology and reconstruction: gradients,
//! top-hats, hole filling and border killing.

pub mod binary;
pub mod scalar;
