//! Per-scale noise shrinkage and gain shaping.

use crate::common::parallel::try_par_rows;
use crate::config::SasConfig;
use crate::error::Result;
use crate::math::convolution::gaussian_blur;
use crate::math::lerp;
use crate::plane::Plane;
use crate::progress::ProgressContext;

/// Noise threshold multiplier applied to the robust sigma.
pub const NOISE_SIGMA_FACTOR: f32 = 5.0;
/// Detail scales at or below this index are soft-thresholded.
pub const MAX_DENOISED_SCALE: usize = 1;
/// Upper bound on the highlight-map blur sigma.
pub const MAX_MODULATION_SIGMA: f32 = 16.0;
/// Steepness of the highlight sigmoid.
const SIGMOID_SLOPE: f32 = 8.0;
/// Smallest fraction of the gain kept over highlights.
const MIN_MODULATION: f32 = 0.2;

/// Gain for detail scale `j`, piecewise linear in `j`.
///
/// `j <= 1` uses the fine gain; `(1, 3]` interpolates fine to mid with
/// `t = (j - 1.5) / 2`; `(3, 5]` interpolates mid to coarse with
/// `t = (j - 3.5) / 2`; anything coarser uses the coarse gain.
pub fn scale_gain(j: f64, config: &SasConfig) -> f64 {
    let fine = config.fine_scale_gain as f64;
    let mid = config.mid_scale_gain as f64;
    let coarse = config.coarse_scale_gain as f64;

    if j <= 1.0 {
        fine
    } else if j <= 3.0 {
        lerp(fine, mid, (j - 1.5) / 2.0)
    } else if j <= 5.0 {
        lerp(mid, coarse, (j - 3.5) / 2.0)
    } else {
        coarse
    }
}

/// Shrinkage threshold for the finest scales.
#[inline]
pub fn noise_threshold(config: &SasConfig, sigma: f32) -> f32 {
    config.noise_threshold * sigma * NOISE_SIGMA_FACTOR
}

/// Soft-threshold: zero `|w| <= threshold`, shrink the rest toward zero.
#[inline]
pub fn soft_threshold(w: f32, threshold: f32) -> f32 {
    if w.abs() <= threshold {
        0.0
    } else if w > 0.0 {
        w - threshold
    } else {
        w + threshold
    }
}

/// Blur sigma of the highlight map for scale `j`: `min(2^(j+1), 16)`.
#[inline]
pub fn modulation_sigma(j: usize) -> f32 {
    let exp = (j + 1).min(31) as i32;
    2f32.powi(exp).min(MAX_MODULATION_SIGMA)
}

/// Gain factor over a pixel whose smoothed intensity is `intensity`.
///
/// `max(1 - protection * sigmoid(8 * (intensity - 0.5)), 0.2)`.
#[inline]
pub fn highlight_modulation(intensity: f32, protection: f32) -> f32 {
    let sigmoid = 1.0 / (1.0 + (-SIGMOID_SLOPE * (intensity - 0.5)).exp());
    (1.0 - protection * sigmoid).max(MIN_MODULATION)
}

/// Blurred copies of the original luminance, one per distinct sigma.
///
/// Scales from 3 upward share sigma 16, so only the last blur is kept.
#[derive(Debug)]
pub struct HighlightMap<'a> {
    source: &'a Plane,
    cached: Option<(f32, Plane)>,
}

impl<'a> HighlightMap<'a> {
    pub fn new(source: &'a Plane) -> Self {
        Self {
            source,
            cached: None,
        }
    }

    /// Smoothed intensity map for scale `j`.
    pub fn for_scale(&mut self, j: usize, ctx: &ProgressContext) -> Result<&Plane> {
        let sigma = modulation_sigma(j);
        match self.cached.take() {
            Some((cached_sigma, plane)) if cached_sigma == sigma => {
                Ok(&self.cached.insert((cached_sigma, plane)).1)
            }
            _ => {
                tracing::debug!("Blurring highlight map with sigma {sigma}");
                let blurred = gaussian_blur(self.source, sigma, ctx)?;
                Ok(&self.cached.insert((sigma, blurred)).1)
            }
        }
    }
}

/// Soft-threshold every sample of `detail`.
pub fn shrink(detail: &mut Plane, threshold: f32, ctx: &ProgressContext) -> Result<()> {
    let (width, height) = (detail.width(), detail.height());
    try_par_rows(detail.pixels_mut(), width, height, ctx, |_, row| {
        for w in row.iter_mut() {
            *w = soft_threshold(*w, threshold);
        }
    })
}

/// Multiply every sample of `detail` by `gain`.
pub fn apply_uniform_gain(detail: &mut Plane, gain: f32, ctx: &ProgressContext) -> Result<()> {
    let (width, height) = (detail.width(), detail.height());
    try_par_rows(detail.pixels_mut(), width, height, ctx, |_, row| {
        for w in row.iter_mut() {
            *w *= gain;
        }
    })
}

/// Multiply every sample of `detail` by `gain` attenuated over bright regions of `smoothed`.
pub fn apply_modulated_gain(
    detail: &mut Plane,
    smoothed: &Plane,
    gain: f32,
    protection: f32,
    ctx: &ProgressContext,
) -> Result<()> {
    debug_assert!(detail.same_dimensions(smoothed));
    let (width, height) = (detail.width(), detail.height());
    try_par_rows(detail.pixels_mut(), width, height, ctx, |y, row| {
        for (w, &s) in row.iter_mut().zip(smoothed.row(y)) {
            *w *= gain * highlight_modulation(s, protection);
        }
    })
}
