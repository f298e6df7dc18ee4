//! Tests for order statistics.

use super::*;

// ---------------------------------------------------------------------------
// Percentile tests
// ---------------------------------------------------------------------------

#[test]
fn test_percentile_index_is_floor() {
    let values: Vec<f32> = (0..40).rev().map(|i| i as f32).collect();
    // floor(0.05 * 40) = 2
    assert_eq!(percentile(&values, 0.05), 2.0);
    assert_eq!(percentile(&values, 0.0), 0.0);
}

#[test]
fn test_percentile_one_clamps_to_last() {
    let values = [3.0f32, 1.0, 2.0];
    assert_eq!(percentile(&values, 1.0), 3.0);
}

#[test]
fn test_percentile_small_input() {
    // N / 20 = 0 for fewer than 20 samples
    let values = [0.9f32, 0.4, 0.6];
    assert_eq!(percentile(&values, 0.05), 0.4);
}

#[test]
fn test_percentile_empty() {
    assert_eq!(percentile(&[], 0.5), 0.0);
}

// ---------------------------------------------------------------------------
// Median tests
// ---------------------------------------------------------------------------

#[test]
fn test_median_odd() {
    let values = [1.0f32, 3.0, 2.0, 5.0, 4.0];
    assert_eq!(median(&values), 3.0);
}

#[test]
fn test_median_even_takes_upper_middle() {
    let values = [1.0f32, 2.0, 3.0, 4.0];
    assert_eq!(median(&values), 3.0);
}

#[test]
fn test_median_does_not_mutate_input() {
    let values = [5.0f32, 1.0, 3.0];
    let _ = median(&values);
    assert_eq!(values, [5.0, 1.0, 3.0]);
}

// ---------------------------------------------------------------------------
// Robust sigma tests
// ---------------------------------------------------------------------------

#[test]
fn test_robust_sigma_constant_magnitude() {
    // |w| is 0.5 everywhere, so the deviation of magnitudes is zero
    let values = [0.5f32, -0.5, 0.5, -0.5, 0.5];
    assert_eq!(robust_sigma(&values), 0.0);
}

#[test]
fn test_robust_sigma_uses_magnitudes() {
    // magnitudes: [0, 1, 2, 3, 4] -> median 2
    // deviations: [2, 1, 0, 1, 2] -> median 1
    let values = [0.0f32, -1.0, 2.0, -3.0, 4.0];
    assert!((robust_sigma(&values) - MAD_TO_SIGMA).abs() < 1e-6);
}

#[test]
fn test_robust_sigma_differs_from_signed_mad() {
    // Signed MAD around median 0 would be 1.0; magnitude MAD is 0.
    let values = [-1.0f32, 1.0, -1.0, 1.0, 0.0];
    assert_eq!(robust_sigma(&values), 0.0);
}

#[test]
fn test_robust_sigma_empty() {
    assert_eq!(robust_sigma(&[]), 0.0);
}

#[test]
fn test_sorted_samples_ascending() {
    let sorted = sorted_samples(&[0.3, -0.2, 0.9, 0.0]);
    assert_eq!(sorted, vec![-0.2, 0.0, 0.3, 0.9]);
}
