//! Starlet Arctan Stretch.
//!
//! Multiscale stretch on the working plane:
//!
//! 1. Starlet decomposition into detail scales plus residual ([`starlet`]).
//! 2. Noise sigma from the finest scale, soft-thresholding of scales 0-1.
//! 3. Per-scale gain, optionally attenuated over bright regions ([`gain`]).
//! 4. Residual flattening, reconstruction, arctan compression and
//!    background renormalization ([`compression`]).
//! 5. Clamp to [0, 1] and merge color.

pub mod compression;
pub mod gain;
pub mod starlet;


use std::time::Instant;

pub use compression::{BackgroundLevel, arctan_compress, normalize_background};
pub use gain::{highlight_modulation, scale_gain, soft_threshold};
pub use starlet::{B3_KERNEL, StarletPyramid};

use crate::config::SasConfig;
use crate::error::Result;
use crate::image::Image;
use crate::luminance::{extract_luminance, reconstruct_color, uses_luminance};
use crate::math::robust_sigma;
use crate::progress::{ProgressContext, StretchStage};
use gain::{HighlightMap, MAX_DENOISED_SCALE};

/// Summary of an SAS run.
#[derive(Debug, Clone, PartialEq)]
pub struct SasReport {
    pub used_luminance: bool,
    /// Robust sigma of the finest detail scale.
    pub noise_sigma: f32,
    /// Soft threshold applied to scales 0-1.
    pub noise_threshold: f32,
    /// Gain applied to each detail scale before highlight modulation.
    pub scale_gains: Vec<f32>,
    pub background: BackgroundLevel,
}

/// Stretch `image` in place.
///
/// `config` is validated first; an out-of-range field fails before any
/// pixel is touched.
pub fn stretch(image: &mut Image, config: &SasConfig, ctx: &ProgressContext) -> Result<SasReport> {
    config.validate()?;
    let start = Instant::now();
    let used_luminance = uses_luminance(image, config.preserve_color);
    let num_scales = config.num_scales as usize;

    ctx.stage(StretchStage::Luminance, 0, 1)?;
    let planes = extract_luminance(image, config.preserve_color, ctx)?;

    let mut pyramid = StarletPyramid::decompose(&planes.working, num_scales, ctx)?;

    let noise_sigma = pyramid
        .details()
        .first()
        .map_or(0.0, |finest| robust_sigma(finest));
    let threshold = gain::noise_threshold(config, noise_sigma);
    let scale_gains = config.scale_gains();
    tracing::debug!(
        "Noise sigma {:.6}, threshold {:.6}, gains {:?}",
        noise_sigma,
        threshold,
        scale_gains
    );

    let mut highlights = HighlightMap::new(&planes.original);
    for (j, detail) in pyramid.details_mut().iter_mut().enumerate() {
        ctx.stage(StretchStage::ScaleProcessing, j, num_scales)?;
        if j <= MAX_DENOISED_SCALE {
            gain::shrink(detail, threshold, ctx)?;
        }
        let g = scale_gains[j];
        if config.highlight_protection > 0.0 {
            let smoothed = highlights.for_scale(j, ctx)?;
            gain::apply_modulated_gain(detail, smoothed, g, config.highlight_protection, ctx)?;
        } else {
            gain::apply_uniform_gain(detail, g, ctx)?;
        }
    }

    if config.flatten_background {
        compression::flatten_residual(pyramid.residual_mut(), config.background_target, ctx)?;
    }

    ctx.stage(StretchStage::Reconstruct, 0, 1)?;
    let mut working = pyramid.reconstruct();
    drop(pyramid);

    ctx.stage(StretchStage::Compression, 0, 2)?;
    compression::compress(
        &mut working,
        config.background_target,
        config.compression_alpha,
        ctx,
    )?;
    ctx.stage(StretchStage::Compression, 1, 2)?;
    let background = normalize_background(&mut working, config.background_target, ctx)?;
    working.clamp(0.0, 1.0);

    ctx.stage(StretchStage::ColorMerge, 0, 1)?;
    reconstruct_color(
        image,
        &planes.original,
        &working,
        config.preserve_color,
        ctx,
    )?;

    if background.rescaled {
        tracing::info!(
            "SAS ({} scales) done in {:.1?}: noise sigma {:.6}, background {:.4} -> {:.4}",
            num_scales,
            start.elapsed(),
            noise_sigma,
            background.measured,
            config.background_target
        );
    } else {
        tracing::info!(
            "SAS ({} scales) done in {:.1?}: noise sigma {:.6}, background {:.4} left as is",
            num_scales,
            start.elapsed(),
            noise_sigma,
            background.measured
        );
    }

    Ok(SasReport {
        used_luminance,
        noise_sigma,
        noise_threshold: threshold,
        scale_gains,
        background,
    })
}
