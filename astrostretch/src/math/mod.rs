//! Numeric utilities shared by both stretch engines.

pub mod convolution;
pub mod histogram;
pub mod statistics;

pub use histogram::{
    DISTRIBUTION_RESOLUTION, DistributionTable, bin_index, compute_cdf, compute_histogram,
    inverse_cdf,
};
pub use statistics::{MAD_TO_SIGMA, median, percentile, robust_sigma, sorted_samples};

/// Linear interpolation between `a` and `b`.
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    (1.0 - t) * a + t * b
}

/// Hermite smoothstep of `t`, which is clamped to [0, 1] first.
#[inline]
pub fn smoothstep(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
