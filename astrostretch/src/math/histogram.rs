//! Histogram and cumulative distribution tables.

use std::ops::Deref;

use rayon::prelude::*;

/// Number of bins in every distribution table and transport map.
pub const DISTRIBUTION_RESOLUTION: usize = 65536;

/// Cumulative probabilities over a fixed number of intensity bins.
///
/// Non-decreasing, first entry >= 0 and, once built from a non-empty input,
/// last entry exactly 1.
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionTable(Vec<f64>);

impl DistributionTable {
    /// Wrap cumulative values. Panics in debug builds if they decrease.
    pub fn from_cumulative(values: Vec<f64>) -> Self {
        debug_assert!(
            values.windows(2).all(|w| w[0] <= w[1]),
            "distribution table must be non-decreasing"
        );
        Self(values)
    }

    /// Cumulative-sum a (not necessarily normalized) density.
    ///
    /// The density is normalized to sum 1 first and the cumulative table is
    /// rescaled so its last entry is exactly 1. Both divisions are skipped when
    /// their denominator is zero.
    pub fn from_density(mut pdf: Vec<f64>) -> Self {
        let sum: f64 = pdf.iter().sum();
        if sum > 0.0 {
            pdf.iter_mut().for_each(|p| *p /= sum);
        }

        let mut acc = 0.0;
        for p in pdf.iter_mut() {
            acc += *p;
            *p = acc;
        }

        let last = pdf.last().copied().unwrap_or(0.0);
        if last > 0.0 {
            pdf.iter_mut().for_each(|c| *c /= last);
        }

        Self(pdf)
    }

    #[inline]
    pub fn resolution(&self) -> usize {
        self.0.len()
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }
}

impl Deref for DistributionTable {
    type Target = [f64];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Bin of `value` in a table of `resolution` bins: `round(value * (resolution - 1))`, clamped.
///
/// NaN lands in bin 0.
#[inline]
pub fn bin_index(value: f32, resolution: usize) -> usize {
    let max_bin = resolution - 1;
    let scaled = (value as f64 * max_bin as f64).round();
    if scaled.is_nan() || scaled <= 0.0 {
        0
    } else {
        (scaled as usize).min(max_bin)
    }
}

/// Count samples per bin.
pub fn compute_histogram(values: &[f32], resolution: usize) -> Vec<u64> {
    assert!(resolution >= 2, "resolution must be at least 2");
    values
        .par_chunks(16 * 1024)
        .fold(
            || vec![0u64; resolution],
            |mut hist, chunk| {
                for &v in chunk {
                    hist[bin_index(v, resolution)] += 1;
                }
                hist
            },
        )
        .reduce(
            || vec![0u64; resolution],
            |mut a, b| {
                a.iter_mut().zip(b).for_each(|(x, y)| *x += y);
                a
            },
        )
}

/// Empirical CDF of `values` over `resolution` bins.
///
/// `cdf[i]` is the fraction of samples whose bin is `<= i`. Cumulative counts
/// are kept as integers so the last entry is exactly 1. An empty input yields
/// an all-zero table.
pub fn compute_cdf(values: &[f32], resolution: usize) -> DistributionTable {
    let hist = compute_histogram(values, resolution);
    let n = values.len();
    if n == 0 {
        return DistributionTable(vec![0.0; resolution]);
    }

    let mut cumulative = 0u64;
    let cdf = hist
        .iter()
        .map(|&count| {
            cumulative += count;
            cumulative as f64 / n as f64
        })
        .collect();
    DistributionTable(cdf)
}

/// Smallest index `j` with `table[j] >= quantile`, or the last index if none.
pub fn inverse_cdf(table: &[f64], quantile: f64) -> usize {
    debug_assert!(!table.is_empty());
    table
        .partition_point(|&c| c < quantile)
        .min(table.len() - 1)
}
