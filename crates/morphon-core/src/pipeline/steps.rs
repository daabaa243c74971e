use ndarray::{Array, ArrayBase, Data, Dimension};
use tracing::info;

use crate::connectivity::Connectivity;
use crate::error::Result;
use crate::filters;
use crate::morphology::{binary, scalar};
use crate::pixel::Pixel;
use crate::rle::{BinaryImage, ToRunLength};

use super::config::{MorphOperation, MorphStep, MorphologyConfig};

/// Apply one step to a grey-level array.
pub fn apply_step_scalar<S, D>(
    input: &ArrayBase<S, D>,
    step: &MorphStep,
) -> Result<Array<S::Elem, D>>
where
    S: Data,
    S::Elem: Pixel,
    D: Dimension,
{
    match step {
        MorphStep::Filter {
            operation,
            shape,
            border,
        } => {
            let strel = shape.build()?;
            let border = *border;
            match operation {
                MorphOperation::Dilation => scalar::dilation(input, &strel, border),
                MorphOperation::Erosion => scalar::erosion(input, &strel, border),
                MorphOperation::Opening => scalar::opening(input, &strel, border),
                MorphOperation::Closing => scalar::closing(input, &strel, border),
                MorphOperation::Gradient => filters::scalar::gradient(input, &strel, border),
                MorphOperation::InnerGradient => {
                    filters::scalar::inner_gradient(input, &strel, border)
                }
                MorphOperation::OuterGradient => {
                    filters::scalar::outer_gradient(input, &strel, border)
                }
                MorphOperation::WhiteTopHat => {
                    filters::scalar::white_top_hat(input, &strel, border)
                }
                MorphOperation::BlackTopHat => {
                    filters::scalar::black_top_hat(input, &strel, border)
                }
            }
        }
        MorphStep::FillHoles { connectivity } => filters::scalar::fill_holes(
            input,
            &resolve_connectivity(connectivity.as_ref(), input.ndim()),
        ),
        MorphStep::KillBorders { connectivity } => filters::scalar::kill_borders(
            input,
            &resolve_connectivity(connectivity.as_ref(), input.ndim()),
        ),
    }
}

/// Apply one step to a binary image. A `Replicate` border pads erosions.
pub fn apply_step_binary<I: ToRunLength + ?Sized>(
    image: &I,
    step: &MorphStep,
) -> Result<BinaryImage> {
    let image = image.to_run_length()?;
    let image: &BinaryImage = &image;
    match step {
        MorphStep::Filter {
            operation,
            shape,
            border,
        } => {
            let strel = shape.build()?;
            let pad = border.pads();
            match operation {
                MorphOperation::Dilation => binary::dilation(image, &strel),
                MorphOperation::Erosion => binary::erosion(image, &strel, pad),
                MorphOperation::Opening => binary::opening(image, &strel, pad),
                MorphOperation::Closing => binary::closing(image, &strel, pad),
                MorphOperation::Gradient => filters::binary::gradient(image, &strel, pad),
                MorphOperation::InnerGradient => {
                    filters::binary::inner_gradient(image, &strel, pad)
                }
                MorphOperation::OuterGradient => filters::binary::outer_gradient(image, &strel),
                MorphOperation::WhiteTopHat => filters::binary::white_top_hat(image, &strel, pad),
                MorphOperation::BlackTopHat => filters::binary::black_top_hat(image, &strel, pad),
            }
        }
        MorphStep::FillHoles { connectivity } => filters::binary::fill_holes(
            image,
            &resolve_connectivity(connectivity.as_ref(), image.dimensionality()),
        ),
        MorphStep::KillBorders { connectivity } => filters::binary::kill_borders(
            image,
            &resolve_connectivity(connectivity.as_ref(), image.dimensionality()),
        ),
    }
}

/// Apply every step of `config` in order, stopping at the first failure.
pub fn run_steps_scalar<S, D>(
    input: &ArrayBase<S, D>,
    config: &MorphologyConfig,
) -> Result<Array<S::Elem, D>>
where
    S: Data,
    S::Elem: Pixel,
    D: Dimension,
{
    let mut current = input.to_owned();
    for (index, step) in config.steps.iter().enumerate() {
        current = apply_step_scalar(&current, step)?;
        info!(index, step = %step, "Morphology step applied");
    }
    info!(count = config.steps.len(), shape = ?input.shape(), "Scalar morphology complete");
    Ok(current)
}

/// Apply every step of `config` to a binary image, in order.
pub fn run_steps_binary<I: ToRunLength + ?Sized>(
    image: &I,
    config: &MorphologyConfig,
) -> Result<BinaryImage> {
    let mut current = image.to_run_length()?.into_owned();
    for (index, step) in config.steps.iter().enumerate() {
        current = apply_step_binary(&current, step)?;
        info!(index, step = %step, cardinality = current.cardinality(), "Morphology step applied");
    }
    info!(count = config.steps.len(), shape = ?current.shape(), "Binary morphology complete");
    Ok(current)
}

fn resolve_connectivity(
    connectivity: Option<&Connectivity>,
    dimensionality: usize,
) -> Connectivity {
    connectivity
        .cloned()
        .unwrap_or_else(|| Connectivity::orthogonal(dimensionality))
}
