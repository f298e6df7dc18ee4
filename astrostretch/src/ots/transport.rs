//! Monotone transport map between two intensity distributions.

use crate::common::parallel::try_par_rows;
use crate::error::Result;
use crate::math::{DistributionTable, bin_index, inverse_cdf, lerp, smoothstep};
use crate::plane::Plane;
use crate::progress::ProgressContext;

/// Normalized intensity where highlight protection starts.
const PROTECT_START: f64 = 0.7;
/// Width of the smoothstep ramp above [`PROTECT_START`].
const PROTECT_RAMP: f64 = 0.25;

/// Lookup table from intensity bin to output intensity.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportMap(Vec<f32>);

impl TransportMap {
    pub fn identity(resolution: usize) -> Self {
        let max_bin = (resolution - 1) as f64;
        Self(
            (0..resolution)
                .map(|i| (i as f64 / max_bin) as f32)
                .collect(),
        )
    }

    /// Quantile matching: `map[i] = inverse_cdf(target, source[i]) / (resolution - 1)`.
    ///
    /// Because `source` is non-decreasing and the inverse CDF picks the
    /// smallest satisfying index, the map is non-decreasing. This is the
    /// closed-form 1-D optimal transport plan under quadratic cost.
    pub fn from_distributions(source: &DistributionTable, target: &DistributionTable) -> Self {
        assert_eq!(
            source.resolution(),
            target.resolution(),
            "source and target tables must share a resolution"
        );
        let max_bin = (target.resolution() - 1) as f64;
        Self(
            source
                .iter()
                .map(|&q| (inverse_cdf(target, q) as f64 / max_bin) as f32)
                .collect(),
        )
    }

    #[inline]
    pub fn resolution(&self) -> usize {
        self.0.len()
    }

    pub fn values(&self) -> &[f32] {
        &self.0
    }

    pub fn is_monotone(&self) -> bool {
        self.0.windows(2).all(|w| w[0] <= w[1])
    }

    /// Pull bins above 0.7 back toward identity.
    ///
    /// `blend = smoothstep((x - 0.7) / 0.25) * amount`, then
    /// `map = (1 - blend) * map + blend * x`.
    pub fn protect_highlights(&mut self, amount: f32) {
        let max_bin = (self.resolution() - 1) as f64;
        let amount = amount as f64;
        for (i, m) in self.0.iter_mut().enumerate() {
            let x = i as f64 / max_bin;
            let blend = smoothstep((x - PROTECT_START) / PROTECT_RAMP) * amount;
            *m = lerp(*m as f64, x, blend) as f32;
        }
    }

    /// `map = (1 - intensity) * identity + intensity * map`. Intensity 0 gives identity.
    pub fn blend_with_identity(&mut self, intensity: f32) {
        let max_bin = (self.resolution() - 1) as f64;
        let intensity = intensity as f64;
        for (i, m) in self.0.iter_mut().enumerate() {
            let identity = i as f64 / max_bin;
            *m = lerp(identity, *m as f64, intensity) as f32;
        }
    }

    /// Output intensity for `value`, looked up by its nearest bin.
    #[inline]
    pub fn lookup(&self, value: f32) -> f32 {
        self.0[bin_index(value, self.resolution())]
    }

    /// Replace every sample of `plane` by its mapped value.
    pub fn apply(&self, plane: &mut Plane, ctx: &ProgressContext) -> Result<()> {
        let (width, height) = (plane.width(), plane.height());
        try_par_rows(plane.pixels_mut(), width, height, ctx, |_, row| {
            for v in row.iter_mut() {
                *v = self.lookup(*v);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(values: &[f64]) -> DistributionTable {
        DistributionTable::from_cumulative(values.to_vec())
    }

    #[test]
    fn test_identity_endpoints() {
        let map = TransportMap::identity(5);
        assert_eq!(map.values(), &[0.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn test_matching_identical_distributions_is_identity_on_support() {
        let cdf = table(&[0.2, 0.4, 0.6, 0.8, 1.0]);
        let map = TransportMap::from_distributions(&cdf, &cdf);
        assert_eq!(map.values(), TransportMap::identity(5).values());
    }

    #[test]
    fn test_matching_pushes_mass_toward_target() {
        // All source mass in bin 0, target mass all in bin 4
        let source = table(&[1.0, 1.0, 1.0, 1.0, 1.0]);
        let target = table(&[0.0, 0.0, 0.0, 0.0, 1.0]);
        let map = TransportMap::from_distributions(&source, &target);
        assert_eq!(map.values(), &[1.0; 5]);
    }

    #[test]
    fn test_protect_highlights_only_above_start() {
        let mut map = TransportMap(vec![0.0; 101]);
        map.protect_highlights(1.0);
        for (i, &m) in map.values().iter().enumerate() {
            let x = i as f32 / 100.0;
            if x <= 0.7 {
                assert_eq!(m, 0.0, "bin {i} must be untouched");
            }
            if x >= 0.95 {
                assert!((m - x).abs() < 1e-6, "bin {i} must be fully protected");
            }
        }
    }

    #[test]
    fn test_blend_zero_is_identity() {
        let mut map = TransportMap(vec![1.0; 11]);
        map.blend_with_identity(0.0);
        assert_eq!(map, TransportMap::identity(11));
    }

    #[test]
    fn test_blend_half() {
        let mut map = TransportMap(vec![1.0, 1.0, 1.0]);
        map.blend_with_identity(0.5);
        assert_eq!(map.values(), &[0.5, 0.75, 1.0]);
    }

    #[test]
    fn test_apply_uses_nearest_bin() {
        let map = TransportMap(vec![0.1, 0.2, 0.3, 0.4, 0.5]);
        let mut plane = Plane::new(4, 1, vec![0.0, 0.3, 0.9, 1.5]);
        map.apply(&mut plane, &ProgressContext::default()).unwrap();
        assert_eq!(plane.pixels(), &[0.1, 0.2, 0.5, 0.5]);
    }
}
