//! Undecimated isotropic wavelet (starlet) transform.
//!
//! Each scale smooths the previous one with the B3-spline kernel dilated by
//! `2^j` ("à trous", with holes). The detail plane is the difference between
//! consecutive smoothings, so summing every detail plane and the final
//! residual gives back the input.

use crate::error::Result;
use crate::math::convolution::{convolve_cols_spaced, convolve_rows_spaced};
use crate::plane::Plane;
use crate::progress::{ProgressContext, StretchStage};

/// B3-spline low-pass kernel `[1, 4, 6, 4, 1] / 16`.
pub const B3_KERNEL: [f32; 5] = [1.0 / 16.0, 4.0 / 16.0, 6.0 / 16.0, 4.0 / 16.0, 1.0 / 16.0];

/// Detail planes (finest first) plus the coarse residual.
#[derive(Debug, Clone, PartialEq)]
pub struct StarletPyramid {
    details: Vec<Plane>,
    residual: Plane,
}

impl StarletPyramid {
    /// Decompose `plane` into `num_scales` detail planes and a residual.
    pub fn decompose(plane: &Plane, num_scales: usize, ctx: &ProgressContext) -> Result<Self> {
        let mut details = Vec::with_capacity(num_scales);
        let mut current = plane.clone();
        let mut temp = plane.zeros_like();

        for j in 0..num_scales {
            ctx.stage(StretchStage::Decompose, j, num_scales)?;
            let spacing = 1usize << j;

            let mut smooth = plane.zeros_like();
            convolve_rows_spaced(&current, &mut temp, &B3_KERNEL, spacing, ctx)?;
            convolve_cols_spaced(&temp, &mut smooth, &B3_KERNEL, spacing, ctx)?;

            // current becomes the detail plane, smooth feeds the next scale
            for (c, &s) in current.iter_mut().zip(smooth.iter()) {
                *c -= s;
            }
            details.push(std::mem::replace(&mut current, smooth));
        }

        Ok(Self {
            details,
            residual: current,
        })
    }

    #[inline]
    pub fn num_scales(&self) -> usize {
        self.details.len()
    }

    pub fn details(&self) -> &[Plane] {
        &self.details
    }

    pub fn details_mut(&mut self) -> &mut [Plane] {
        &mut self.details
    }

    pub fn residual(&self) -> &Plane {
        &self.residual
    }

    pub fn residual_mut(&mut self) -> &mut Plane {
        &mut self.residual
    }

    /// Elementwise sum of every detail plane and the residual.
    pub fn reconstruct(&self) -> Plane {
        let mut output = self.residual.zeros_like();
        for detail in &self.details {
            output += detail;
        }
        output += &self.residual;
        output
    }
}
