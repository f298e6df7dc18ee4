//! Luminance extraction and color reconstruction.
//!
//! Both engines work on a single intensity plane. For color images with color
//! preservation on, that plane is Rec. 709 luma and the result is merged back
//! by scaling every channel with the per-pixel luminance ratio. Otherwise the
//! first channel is used and the result is broadcast to all channels, which
//! desaturates color input.

use crate::common::parallel::try_par_rows;
use crate::error::Result;
use crate::image::Image;
use crate::plane::Plane;
use crate::progress::ProgressContext;

/// Rec. 709 luma weights for R, G, B.
pub const LUMA_WEIGHTS: [f32; 3] = [0.2126, 0.7152, 0.0722];

/// Pixels whose original luminance is at or below this are left unscaled
/// during ratio reconstruction.
pub const MIN_LUMINANCE: f32 = 1e-10;

/// True when the engines should work on luma and merge by ratio.
#[inline]
pub fn uses_luminance(image: &Image, preserve_color: bool) -> bool {
    preserve_color && image.is_color()
}

/// Working plane plus an untouched copy for ratio reconstruction.
#[derive(Debug, Clone)]
pub struct LuminancePlanes {
    pub working: Plane,
    pub original: Plane,
}

/// Extract the working intensity plane.
///
/// Color images with `preserve_color` yield `0.2126 R + 0.7152 G + 0.0722 B`;
/// anything else yields a copy of channel 0.
pub fn extract_luminance(
    image: &Image,
    preserve_color: bool,
    ctx: &ProgressContext,
) -> Result<LuminancePlanes> {
    let working = if uses_luminance(image, preserve_color) {
        let (r, g, b) = (image.plane(0), image.plane(1), image.plane(2));
        let mut luma = r.zeros_like();
        try_par_rows(
            luma.pixels_mut(),
            image.width(),
            image.height(),
            ctx,
            |y, row| {
                let (rr, gr, br) = (r.row(y), g.row(y), b.row(y));
                for (x, out) in row.iter_mut().enumerate() {
                    *out = LUMA_WEIGHTS[0] * rr[x] + LUMA_WEIGHTS[1] * gr[x] + LUMA_WEIGHTS[2] * br[x];
                }
            },
        )?;
        luma
    } else {
        image.plane(0).clone()
    };

    Ok(LuminancePlanes {
        original: working.clone(),
        working,
    })
}

/// Merge the processed plane back into `image`.
///
/// With `preserve_color` on a color image, every channel of a pixel is scaled
/// by `processed / original` and clamped to [0, 1]; pixels whose original
/// luminance is at most [`MIN_LUMINANCE`] are left as they were. Otherwise
/// every channel is overwritten with `processed`.
pub fn reconstruct_color(
    image: &mut Image,
    original: &Plane,
    processed: &Plane,
    preserve_color: bool,
    ctx: &ProgressContext,
) -> Result<()> {
    debug_assert!(original.same_dimensions(processed));
    let (width, height) = (image.width(), image.height());

    if uses_luminance(image, preserve_color) {
        for plane in image.planes_mut() {
            try_par_rows(plane.pixels_mut(), width, height, ctx, |y, row| {
                let (orig_row, new_row) = (original.row(y), processed.row(y));
                for (x, v) in row.iter_mut().enumerate() {
                    let orig = orig_row[x];
                    if orig > MIN_LUMINANCE {
                        *v = (*v * (new_row[x] / orig)).clamp(0.0, 1.0);
                    }
                }
            })?;
        }
    } else {
        for plane in image.planes_mut() {
            try_par_rows(plane.pixels_mut(), width, height, ctx, |y, row| {
                row.copy_from_slice(processed.row(y));
            })?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb_image(r: Vec<f32>, g: Vec<f32>, b: Vec<f32>, width: usize, height: usize) -> Image {
        Image::from_planes(vec![
            Plane::new(width, height, r),
            Plane::new(width, height, g),
            Plane::new(width, height, b),
        ])
        .unwrap()
    }

    #[test]
    fn test_extract_luma_weights() {
        let image = rgb_image(vec![1.0, 0.0], vec![0.0, 1.0], vec![0.0, 0.0], 2, 1);
        let planes = extract_luminance(&image, true, &ProgressContext::default()).unwrap();
        assert!((planes.working[0] - 0.2126).abs() < 1e-7);
        assert!((planes.working[1] - 0.7152).abs() < 1e-7);
        assert_eq!(planes.working, planes.original);
    }

    #[test]
    fn test_extract_without_preserve_uses_first_channel() {
        let image = rgb_image(vec![0.3, 0.6], vec![0.9, 0.9], vec![0.1, 0.1], 2, 1);
        let planes = extract_luminance(&image, false, &ProgressContext::default()).unwrap();
        assert_eq!(planes.working.pixels(), &[0.3, 0.6]);
    }

    #[test]
    fn test_extract_grayscale_copies_channel() {
        let image = Image::from_gray(2, 1, vec![0.25, 0.75]).unwrap();
        let planes = extract_luminance(&image, true, &ProgressContext::default()).unwrap();
        assert_eq!(planes.working.pixels(), &[0.25, 0.75]);
    }

    #[test]
    fn test_reconstruct_scales_by_ratio() {
        let mut image = rgb_image(vec![0.2], vec![0.4], vec![0.1], 1, 1);
        let original = Plane::new(1, 1, vec![0.4]);
        let processed = Plane::new(1, 1, vec![0.6]);
        reconstruct_color(
            &mut image,
            &original,
            &processed,
            true,
            &ProgressContext::default(),
        )
        .unwrap();
        assert!((image.plane(0)[0] - 0.3).abs() < 1e-6);
        assert!((image.plane(1)[0] - 0.6).abs() < 1e-6);
        assert!((image.plane(2)[0] - 0.15).abs() < 1e-6);
    }

    #[test]
    fn test_reconstruct_clamps_channels() {
        let mut image = rgb_image(vec![0.9], vec![0.1], vec![0.1], 1, 1);
        let original = Plane::new(1, 1, vec![0.2]);
        let processed = Plane::new(1, 1, vec![0.8]);
        reconstruct_color(
            &mut image,
            &original,
            &processed,
            true,
            &ProgressContext::default(),
        )
        .unwrap();
        assert_eq!(image.plane(0)[0], 1.0);
        assert!((image.plane(1)[0] - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_reconstruct_leaves_black_pixels() {
        let mut image = rgb_image(vec![0.0], vec![0.0], vec![0.0], 1, 1);
        let original = Plane::new(1, 1, vec![0.0]);
        let processed = Plane::new(1, 1, vec![0.12]);
        reconstruct_color(
            &mut image,
            &original,
            &processed,
            true,
            &ProgressContext::default(),
        )
        .unwrap();
        assert!(image.planes().iter().all(|p| p[0] == 0.0));
    }

    #[test]
    fn test_reconstruct_without_preserve_desaturates() {
        let mut image = rgb_image(vec![0.9, 0.1], vec![0.1, 0.5], vec![0.4, 0.9], 2, 1);
        let original = image.plane(0).clone();
        let processed = Plane::new(2, 1, vec![0.33, 0.66]);
        reconstruct_color(
            &mut image,
            &original,
            &processed,
            false,
            &ProgressContext::default(),
        )
        .unwrap();
        for plane in image.planes() {
            assert_eq!(plane.pixels(), &[0.33, 0.66]);
        }
    }
}
