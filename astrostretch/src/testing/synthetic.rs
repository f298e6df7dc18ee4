//! Deterministic synthetic sky frames.
//!
//! A linear (unstretched) frame is mostly dark background with Gaussian
//! noise, a faint extended nebula and a handful of bright stars. That is the
//! regime both stretches are built for.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::image::Image;
use crate::plane::Plane;

/// Configuration for a synthetic sky frame.
#[derive(Debug, Clone)]
pub struct SkyConfig {
    pub width: usize,
    pub height: usize,
    /// Background level (0.0-1.0)
    pub background: f32,
    /// Gaussian noise sigma
    pub noise_sigma: f32,
    /// Peak amplitude of the extended nebula above background
    pub nebula_amplitude: f32,
    /// Number of point sources
    pub num_stars: usize,
    /// Star peak range (min, max) above background
    pub star_peak_range: (f32, f32),
    /// Star Gaussian sigma in pixels
    pub star_sigma: f32,
    pub seed: u64,
}

impl Default for SkyConfig {
    fn default() -> Self {
        Self {
            width: 128,
            height: 96,
            background: 0.02,
            noise_sigma: 0.003,
            nebula_amplitude: 0.06,
            num_stars: 40,
            star_peak_range: (0.1, 0.9),
            star_sigma: 1.2,
            seed: 42,
        }
    }
}

/// Approximately normal sample from the sum of 4 uniforms.
fn gaussian(rng: &mut ChaCha8Rng) -> f32 {
    let sum: f32 = (0..4).map(|_| rng.random::<f32>()).sum();
    (sum - 2.0) * (3.0f32).sqrt()
}

/// Single-channel synthetic sky frame.
pub fn synthetic_gray(config: &SkyConfig) -> Plane {
    let (w, h) = (config.width, config.height);
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut plane = Plane::filled(w, h, config.background);

    // Extended elliptical nebula centered in the frame
    let (cx, cy) = (w as f32 * 0.5, h as f32 * 0.5);
    let (sx, sy) = (w as f32 * 0.25, h as f32 * 0.18);
    for y in 0..h {
        for x in 0..w {
            let dx = (x as f32 - cx) / sx;
            let dy = (y as f32 - cy) / sy;
            plane[(x, y)] += config.nebula_amplitude * (-0.5 * (dx * dx + dy * dy)).exp();
        }
    }

    let radius = (4.0 * config.star_sigma).ceil() as isize;
    let two_sigma_sq = 2.0 * config.star_sigma * config.star_sigma;
    for _ in 0..config.num_stars {
        let sx = rng.random_range(0..w) as isize;
        let sy = rng.random_range(0..h) as isize;
        let peak = rng.random_range(config.star_peak_range.0..=config.star_peak_range.1);
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                let (x, y) = (sx + dx, sy + dy);
                if x < 0 || y < 0 || x >= w as isize || y >= h as isize {
                    continue;
                }
                let r2 = (dx * dx + dy * dy) as f32;
                plane[(x as usize, y as usize)] += peak * (-r2 / two_sigma_sq).exp();
            }
        }
    }

    for v in plane.iter_mut() {
        *v = (*v + config.noise_sigma * gaussian(&mut rng)).clamp(0.0, 1.0);
    }
    plane
}

/// Three-channel frame: the gray frame tinted with fixed per-channel gains.
pub fn synthetic_rgb(config: &SkyConfig) -> Image {
    let gray = synthetic_gray(config);
    let tint = [1.0f32, 0.8, 0.6];
    let planes = tint
        .iter()
        .map(|&t| {
            let mut p = gray.clone();
            p.iter_mut().for_each(|v| *v = (*v * t).clamp(0.0, 1.0));
            p
        })
        .collect();
    Image::from_planes(planes).expect("synthetic planes share dimensions")
}

/// Horizontal ramp from `lo` to `hi`.
pub fn gradient_plane(width: usize, height: usize, lo: f32, hi: f32) -> Plane {
    let denom = (width.max(2) - 1) as f32;
    let pixels = (0..width * height)
        .map(|i| lo + (hi - lo) * (i % width) as f32 / denom)
        .collect();
    Plane::new(width, height, pixels)
}
