//! Run-length encoded binary images.
//!
//! A [`Run`] is a closed interval of `true` positions; a [`BinaryRow`] is a
//! normalized set of runs for one scanline. 2D images hold one row per `y`,
//! 3D images one 2D image per `z`.

mod binary_image;
mod image2d;
mod image3d;
mod row;
mod run;

pub use binary_image::{BinaryImage, ToRunLength};
pub use image2d::RunLengthImage2D;
pub use image3d::RunLengthImage3D;
pub use row::BinaryRow;
pub use run::Run;
