pub mod connectivity;
pub mod consts;
pub mod error;
pub mod filters;
mod grid;
pub mod morphology;
pub mod pipeline;
pub mod pixel;
pub mod progress;
pub mod reconstruct;
pub mod rle;
pub mod strel;
