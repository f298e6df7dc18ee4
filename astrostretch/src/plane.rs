//! Single-channel intensity plane.

use std::ops::{AddAssign, Deref, DerefMut, Index, IndexMut};

use rayon::prelude::*;

use crate::common::parallel::rows_per_chunk;

/// A row-major 2-D array of `f32` intensities.
///
/// Values are nominally in [0, 1] but may leave that range while a wavelet
/// pyramid is being processed.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    pixels: Vec<f32>,
    width: usize,
    height: usize,
}

impl Plane {
    pub fn new(width: usize, height: usize, pixels: Vec<f32>) -> Self {
        assert_eq!(
            pixels.len(),
            width * height,
            "pixels length must equal width * height"
        );
        Self {
            pixels,
            width,
            height,
        }
    }

    pub fn zeros(width: usize, height: usize) -> Self {
        Self::filled(width, height, 0.0)
    }

    pub fn filled(width: usize, height: usize, value: f32) -> Self {
        Self {
            pixels: vec![value; width * height],
            width,
            height,
        }
    }

    /// Creates a plane of the same dimensions as `self`, filled with zeros.
    pub fn zeros_like(&self) -> Self {
        Self::zeros(self.width, self.height)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn pixels(&self) -> &[f32] {
        &self.pixels
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [f32] {
        &mut self.pixels
    }

    #[inline]
    pub fn into_vec(self) -> Vec<f32> {
        self.pixels
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        debug_assert!(x < self.width && y < self.height);
        self.pixels[y * self.width + x]
    }

    #[inline]
    pub fn row(&self, y: usize) -> &[f32] {
        &self.pixels[y * self.width..(y + 1) * self.width]
    }

    pub fn same_dimensions(&self, other: &Plane) -> bool {
        self.width == other.width && self.height == other.height
    }

    /// Applies `f` to every sample in parallel.
    pub fn map_inplace<F>(&mut self, f: F)
    where
        F: Fn(f32) -> f32 + Sync + Send,
    {
        let chunk = rows_per_chunk(self.height) * self.width.max(1);
        self.pixels
            .par_chunks_mut(chunk)
            .for_each(|c| c.iter_mut().for_each(|v| *v = f(*v)));
    }

    /// Clamps every sample to `[lo, hi]`.
    pub fn clamp(&mut self, lo: f32, hi: f32) {
        self.map_inplace(|v| v.clamp(lo, hi));
    }

    /// Minimum and maximum sample, or `None` for an empty plane.
    pub fn min_max(&self) -> Option<(f32, f32)> {
        if self.pixels.is_empty() {
            return None;
        }
        Some(
            self.pixels
                .iter()
                .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
                    (lo.min(v), hi.max(v))
                }),
        )
    }
}

impl AddAssign<&Plane> for Plane {
    fn add_assign(&mut self, other: &Plane) {
        assert!(self.same_dimensions(other), "plane dimensions must match");
        self.pixels
            .par_iter_mut()
            .zip(other.pixels.par_iter())
            .for_each(|(a, &b)| *a += b);
    }
}

impl Index<(usize, usize)> for Plane {
    type Output = f32;

    #[inline]
    fn index(&self, (x, y): (usize, usize)) -> &Self::Output {
        &self.pixels[y * self.width + x]
    }
}

impl IndexMut<(usize, usize)> for Plane {
    #[inline]
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut Self::Output {
        &mut self.pixels[y * self.width + x]
    }
}

impl Index<usize> for Plane {
    type Output = f32;

    #[inline]
    fn index(&self, idx: usize) -> &Self::Output {
        &self.pixels[idx]
    }
}

impl IndexMut<usize> for Plane {
    #[inline]
    fn index_mut(&mut self, idx: usize) -> &mut Self::Output {
        &mut self.pixels[idx]
    }
}

impl Deref for Plane {
    type Target = [f32];

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.pixels
    }
}

impl DerefMut for Plane {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_is_row_major() {
        let plane = Plane::new(3, 2, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(plane[(2, 0)], 2.0);
        assert_eq!(plane[(0, 1)], 3.0);
        assert_eq!(plane.get(1, 1), 4.0);
        assert_eq!(plane.row(1), &[3.0, 4.0, 5.0]);
    }

    #[test]
    #[should_panic(expected = "pixels length must equal width * height")]
    fn test_new_rejects_wrong_length() {
        Plane::new(2, 2, vec![0.0; 3]);
    }

    #[test]
    fn test_add_assign() {
        let mut a = Plane::filled(4, 4, 0.25);
        let b = Plane::filled(4, 4, 0.5);
        a += &b;
        assert!(a.iter().all(|&v| (v - 0.75).abs() < f32::EPSILON));
    }

    #[test]
    fn test_clamp() {
        let mut plane = Plane::new(2, 2, vec![-0.5, 0.25, 1.5, 1.0]);
        plane.clamp(0.0, 1.0);
        assert_eq!(plane.pixels(), &[0.0, 0.25, 1.0, 1.0]);
    }

    #[test]
    fn test_min_max() {
        let plane = Plane::new(2, 2, vec![0.3, -0.1, 0.9, 0.5]);
        assert_eq!(plane.min_max(), Some((-0.1, 0.9)));
        assert_eq!(Plane::zeros(0, 0).min_max(), None);
    }
}
