//! Separable Gaussian blur.
//!
//! Used to build the smoothed intensity map that modulates wavelet gains
//! near bright structures. Borders are handled by clamping sample coordinates
//! to the plane, the same convention the starlet transform uses.

use crate::common::parallel::try_par_rows;
use crate::error::Result;
use crate::plane::Plane;
use crate::progress::ProgressContext;

/// Compute 1D Gaussian kernel.
///
/// The kernel is normalized so that it sums to 1.0.
/// Kernel radius is chosen as ceil(3 * sigma) to capture 99.7% of the Gaussian.
pub fn gaussian_kernel_1d(sigma: f32) -> Vec<f32> {
    assert!(sigma > 0.0, "Sigma must be positive");

    let radius = (3.0 * sigma).ceil() as usize;
    let size = 2 * radius + 1;
    let mut kernel = vec![0.0f32; size];

    let two_sigma_sq = 2.0 * sigma * sigma;
    let mut sum = 0.0f32;

    for (i, k) in kernel.iter_mut().enumerate() {
        let x = i as f32 - radius as f32;
        let value = (-x * x / two_sigma_sq).exp();
        *k = value;
        sum += value;
    }

    for v in &mut kernel {
        *v /= sum;
    }

    kernel
}

/// Blur `plane` with a Gaussian of standard deviation `sigma` (pixels).
pub fn gaussian_blur(plane: &Plane, sigma: f32, ctx: &ProgressContext) -> Result<Plane> {
    let kernel = gaussian_kernel_1d(sigma);
    let (width, height) = (plane.width(), plane.height());

    let mut temp = plane.zeros_like();
    convolve_rows(plane, &mut temp, &kernel, ctx)?;

    let mut output = plane.zeros_like();
    convolve_cols(&temp, &mut output, &kernel, ctx)?;

    debug_assert_eq!(output.len(), width * height);
    Ok(output)
}

/// Horizontal pass with clamped borders.
pub(crate) fn convolve_rows(
    input: &Plane,
    output: &mut Plane,
    kernel: &[f32],
    ctx: &ProgressContext,
) -> Result<()> {
    convolve_rows_spaced(input, output, kernel, 1, ctx)
}

/// Vertical pass with clamped borders.
pub(crate) fn convolve_cols(
    input: &Plane,
    output: &mut Plane,
    kernel: &[f32],
    ctx: &ProgressContext,
) -> Result<()> {
    convolve_cols_spaced(input, output, kernel, 1, ctx)
}

/// Horizontal pass where kernel taps are `spacing` pixels apart.
pub(crate) fn convolve_rows_spaced(
    input: &Plane,
    output: &mut Plane,
    kernel: &[f32],
    spacing: usize,
    ctx: &ProgressContext,
) -> Result<()> {
    let (width, height) = (input.width(), input.height());
    let radius = (kernel.len() / 2) as isize;
    let last = width as isize - 1;

    try_par_rows(output.pixels_mut(), width, height, ctx, |y, out_row| {
        let in_row = input.row(y);
        for (x, out) in out_row.iter_mut().enumerate() {
            let mut sum = 0.0f32;
            for (k, &kval) in kernel.iter().enumerate() {
                let offset = (k as isize - radius) * spacing as isize;
                let sx = (x as isize + offset).clamp(0, last) as usize;
                sum += kval * in_row[sx];
            }
            *out = sum;
        }
    })
}

/// Vertical pass where kernel taps are `spacing` pixels apart.
pub(crate) fn convolve_cols_spaced(
    input: &Plane,
    output: &mut Plane,
    kernel: &[f32],
    spacing: usize,
    ctx: &ProgressContext,
) -> Result<()> {
    let (width, height) = (input.width(), input.height());
    let radius = (kernel.len() / 2) as isize;
    let last = height as isize - 1;

    try_par_rows(output.pixels_mut(), width, height, ctx, |y, out_row| {
        out_row.fill(0.0);
        for (k, &kval) in kernel.iter().enumerate() {
            let offset = (k as isize - radius) * spacing as isize;
            let sy = (y as isize + offset).clamp(0, last) as usize;
            for (out, &v) in out_row.iter_mut().zip(input.row(sy)) {
                *out += kval * v;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_normalized_and_symmetric() {
        let kernel = gaussian_kernel_1d(2.0);
        assert_eq!(kernel.len(), 13);
        let sum: f32 = kernel.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        for i in 0..kernel.len() / 2 {
            assert!((kernel[i] - kernel[kernel.len() - 1 - i]).abs() < 1e-7);
        }
        assert!(kernel[6] > kernel[5]);
    }

    #[test]
    #[should_panic(expected = "Sigma must be positive")]
    fn test_kernel_rejects_zero_sigma() {
        gaussian_kernel_1d(0.0);
    }

    #[test]
    fn test_blur_preserves_constant() {
        let plane = Plane::filled(9, 5, 0.4);
        let blurred = gaussian_blur(&plane, 4.0, &ProgressContext::default()).unwrap();
        assert!(blurred.iter().all(|&v| (v - 0.4).abs() < 1e-5));
    }

    #[test]
    fn test_blur_spreads_impulse() {
        let mut plane = Plane::zeros(21, 21);
        plane[(10, 10)] = 1.0;
        let blurred = gaussian_blur(&plane, 1.5, &ProgressContext::default()).unwrap();

        let total: f32 = blurred.iter().sum();
        assert!((total - 1.0).abs() < 1e-4);
        assert!(blurred[(10, 10)] < 1.0);
        assert!(blurred[(11, 10)] > 0.0);
        assert!((blurred[(11, 10)] - blurred[(10, 11)]).abs() < 1e-6);
    }

    #[test]
    fn test_blur_larger_kernel_than_image() {
        let plane = Plane::new(2, 1, vec![0.0, 1.0]);
        let blurred = gaussian_blur(&plane, 16.0, &ProgressContext::default()).unwrap();
        assert!(blurred.iter().all(|v| v.is_finite()));
        assert!(blurred[0] > 0.0 && blurred[1] < 1.0);
    }
}
