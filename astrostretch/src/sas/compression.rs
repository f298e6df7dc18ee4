//! Residual flattening, arctan compression and background renormalization.

use std::f32::consts::FRAC_2_PI;

use crate::common::parallel::try_par_rows;
use crate::error::Result;
use crate::math::percentile;
use crate::plane::Plane;
use crate::progress::ProgressContext;

/// Fraction of the original residual kept when flattening.
const RESIDUAL_KEEP: f32 = 0.2;
/// Percentile treated as the background level.
pub const BACKGROUND_PERCENTILE: f64 = 0.05;

/// Pull the residual scale toward half the background target:
/// `r' = 0.2 * r + 0.8 * (0.5 * background_target)`.
pub fn flatten_residual(
    residual: &mut Plane,
    background_target: f32,
    ctx: &ProgressContext,
) -> Result<()> {
    let level = (1.0 - RESIDUAL_KEEP) * (0.5 * background_target);
    let (width, height) = (residual.width(), residual.height());
    try_par_rows(residual.pixels_mut(), width, height, ctx, |_, row| {
        for r in row.iter_mut() {
            *r = RESIDUAL_KEEP * *r + level;
        }
    })
}

/// Arctan compression above the `pivot`.
///
/// Samples at or below the pivot are unchanged.
#[inline]
pub fn arctan_compress(x: f32, pivot: f32, alpha: f32) -> f32 {
    if x > pivot {
        let span = 1.0 - pivot;
        let normalized = (x - pivot) / span;
        pivot + FRAC_2_PI * (alpha * normalized).atan() * span
    } else {
        x
    }
}

pub fn compress(plane: &mut Plane, pivot: f32, alpha: f32, ctx: &ProgressContext) -> Result<()> {
    let (width, height) = (plane.width(), plane.height());
    try_par_rows(plane.pixels_mut(), width, height, ctx, |_, row| {
        for v in row.iter_mut() {
            *v = arctan_compress(*v, pivot, alpha);
        }
    })
}

/// Map `current` to `target` piecewise linearly, keeping 0 and 1 fixed.
///
/// Returns `v` unchanged when `current` is not in (0, 1).
#[inline]
pub fn rebase(v: f32, current: f32, target: f32) -> f32 {
    if current <= 0.0 || current >= 1.0 {
        return v;
    }
    if v <= current {
        v * (target / current)
    } else {
        target + (v - current) / (1.0 - current) * (1.0 - target)
    }
}

/// Outcome of [`normalize_background`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundLevel {
    /// 5th percentile before renormalization.
    pub measured: f32,
    /// False when the plane was left untouched.
    pub rescaled: bool,
}

/// Move the 5th percentile of `plane` to `target`.
///
/// Skipped when the measured level is not positive, already equals the
/// target, or is at least 1 (no room above it to remap).
pub fn normalize_background(
    plane: &mut Plane,
    target: f32,
    ctx: &ProgressContext,
) -> Result<BackgroundLevel> {
    let measured = percentile(plane, BACKGROUND_PERCENTILE);
    if measured <= 0.0 || measured == target || measured >= 1.0 {
        return Ok(BackgroundLevel {
            measured,
            rescaled: false,
        });
    }

    let (width, height) = (plane.width(), plane.height());
    try_par_rows(plane.pixels_mut(), width, height, ctx, |_, row| {
        for v in row.iter_mut() {
            *v = rebase(*v, measured, target);
        }
    })?;

    Ok(BackgroundLevel {
        measured,
        rescaled: true,
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_flatten_residual() {
        let mut residual = Plane::new(2, 1, vec![0.0, 0.5]);
        flatten_residual(&mut residual, 0.1, &ProgressContext::default()).unwrap();
        assert_abs_diff_eq!(residual[0], 0.04, epsilon = 1e-7);
        assert_abs_diff_eq!(residual[1], 0.14, epsilon = 1e-7);
    }

    #[test]
    fn test_arctan_pivot_is_fixed_point() {
        assert_eq!(arctan_compress(0.12, 0.12, 8.0), 0.12);
        assert_eq!(arctan_compress(0.05, 0.12, 8.0), 0.05);
        assert_eq!(arctan_compress(-0.3, 0.12, 8.0), -0.3);
    }

    #[test]
    fn test_arctan_compresses_above_pivot() {
        let pivot = 0.1;
        let y = arctan_compress(0.2, pivot, 8.0);
        assert!(y > 0.2, "faint signal is lifted, got {y}");
        // Output approaches 1 but never exceeds it for x <= 1
        let top = arctan_compress(1.0, pivot, 8.0);
        assert!(top < 1.0 && top > 0.9);
        let expected = pivot + FRAC_2_PI * (8.0f32 / 9.0 * 1.0).atan() * 0.9;
        assert_abs_diff_eq!(y, expected, epsilon = 1e-6);
    }

    #[test]
    fn test_arctan_monotone() {
        let mut prev = f32::NEG_INFINITY;
        for i in 0..=100 {
            let y = arctan_compress(i as f32 / 100.0, 0.15, 12.0);
            assert!(y >= prev);
            prev = y;
        }
    }

    #[test]
    fn test_rebase_endpoints() {
        assert_eq!(rebase(0.0, 0.2, 0.1), 0.0);
        assert_abs_diff_eq!(rebase(0.2, 0.2, 0.1), 0.1, epsilon = 1e-7);
        assert_abs_diff_eq!(rebase(1.0, 0.2, 0.1), 1.0, epsilon = 1e-7);
        assert_abs_diff_eq!(rebase(0.6, 0.2, 0.1), 0.1 + 0.5 * 0.9, epsilon = 1e-6);
    }

    #[test]
    fn test_normalize_moves_percentile_to_target() {
        let values: Vec<f32> = (0..200).map(|i| 0.2 + 0.7 * i as f32 / 199.0).collect();
        let mut plane = Plane::new(20, 10, values);
        let level = normalize_background(&mut plane, 0.12, &ProgressContext::default()).unwrap();
        assert!(level.rescaled);
        assert!(level.measured > 0.2);
        assert_abs_diff_eq!(percentile(&plane, BACKGROUND_PERCENTILE), 0.12, epsilon = 1e-6);
    }

    #[test]
    fn test_normalize_skips_zero_background() {
        let mut plane = Plane::new(4, 1, vec![0.0, 0.0, 0.5, 0.9]);
        let before = plane.clone();
        let level = normalize_background(&mut plane, 0.1, &ProgressContext::default()).unwrap();
        assert_eq!(level.measured, 0.0);
        assert!(!level.rescaled);
        assert_eq!(plane, before);
    }

    #[test]
    fn test_normalize_skips_when_on_target() {
        let mut plane = Plane::filled(3, 3, 0.1);
        let level = normalize_background(&mut plane, 0.1, &ProgressContext::default()).unwrap();
        assert!(!level.rescaled);
    }
}
