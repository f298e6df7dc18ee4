//! Sort-based order statistics: percentile, median, robust noise sigma.
//!
//! All functions sort a copy of the samples (in parallel) and index into the
//! sorted array; even-length medians take the upper-middle element rather
//! than averaging.

#[cfg(test)]
mod tests;

use rayon::prelude::*;

/// MAD (Median Absolute Deviation) to standard deviation conversion factor.
///
/// For a normal distribution, σ ≈ 1.4826 × MAD.
pub const MAD_TO_SIGMA: f32 = 1.4826;

/// Sorted copy of `values`, ascending. NaN sorts last.
pub fn sorted_samples(values: &[f32]) -> Vec<f32> {
    let mut sorted = values.to_vec();
    sorted.par_sort_unstable_by(f32::total_cmp);
    sorted
}

/// Element at sorted index `floor(p * N)`, clamped to the last element.
///
/// Returns 0 for an empty slice.
pub fn percentile(values: &[f32], p: f64) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let sorted = sorted_samples(values);
    sorted[percentile_index(sorted.len(), p)]
}

#[inline]
fn percentile_index(len: usize, p: f64) -> usize {
    ((p.clamp(0.0, 1.0) * len as f64).floor() as usize).min(len - 1)
}

/// Element at sorted index `N / 2`. Returns 0 for an empty slice.
pub fn median(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let sorted = sorted_samples(values);
    sorted[sorted.len() / 2]
}

/// Robust noise sigma of a wavelet detail plane.
///
/// Takes the median `m` of the absolute values, then the median of
/// `| |w| - m |`, scaled by [`MAD_TO_SIGMA`]. This is a MAD of the magnitudes,
/// not of the signed coefficients around their median.
pub fn robust_sigma(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let magnitudes: Vec<f32> = values.par_iter().map(|v| v.abs()).collect();
    let m = median(&magnitudes);
    let deviations: Vec<f32> = magnitudes.par_iter().map(|&a| (a - m).abs()).collect();
    median(&deviations) * MAD_TO_SIGMA
}
