//! Serializable morphology pipelines.

pub mod config;
mod steps;

pub use config::{MorphOperation, MorphStep, MorphologyConfig, StrelShape};
pub use steps::{apply_step_binary, apply_step_scalar, run_steps_binary, run_steps_scalar};
