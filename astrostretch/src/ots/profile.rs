//! Target intensity distributions per object class.
//!
//! Each profile is a sum of lobes evaluated at normalized intensity `x`:
//! a Gaussian background peak near the background target, one or two
//! power-shaped body lobes on fixed sub-intervals and, for some classes, a
//! flat highlight shelf. Lobe bounds may refer to the background target.

use crate::config::ObjectType;
use crate::math::DistributionTable;

/// Interval endpoint, either fixed or the configured background target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    At(f64),
    Background,
}

impl Bound {
    #[inline]
    fn resolve(self, background: f64) -> f64 {
        match self {
            Bound::At(v) => v,
            Bound::Background => background,
        }
    }
}

/// One additive component of a target density.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lobe {
    /// `weight * exp(-0.5 * ((x - background * center) / sigma)^2)`, unnormalized.
    Peak { weight: f64, center: f64, sigma: f64 },
    /// `weight * (x - lo)^rise * (hi - x)^fall` on `[lo, hi]`, zero elsewhere.
    Body {
        weight: f64,
        lo: Bound,
        hi: Bound,
        rise: f64,
        fall: f64,
    },
    /// `weight` on `[lo, hi]`, zero elsewhere.
    Shelf { weight: f64, lo: f64, hi: f64 },
}

impl Lobe {
    #[inline]
    pub fn density(&self, x: f64, background: f64) -> f64 {
        match *self {
            Lobe::Peak {
                weight,
                center,
                sigma,
            } => {
                let z = (x - background * center) / sigma;
                weight * (-0.5 * z * z).exp()
            }
            Lobe::Body {
                weight,
                lo,
                hi,
                rise,
                fall,
            } => {
                let (lo, hi) = (lo.resolve(background), hi.resolve(background));
                if x >= lo && x <= hi {
                    weight * (x - lo).powf(rise) * (hi - x).powf(fall)
                } else {
                    0.0
                }
            }
            Lobe::Shelf { weight, lo, hi } => {
                if x >= lo && x <= hi {
                    weight
                } else {
                    0.0
                }
            }
        }
    }
}

const NEBULA: &[Lobe] = &[
    Lobe::Peak {
        weight: 0.3,
        center: 1.0,
        sigma: 0.03,
    },
    Lobe::Body {
        weight: 0.5,
        lo: Bound::Background,
        hi: Bound::At(0.7),
        rise: 1.0,
        fall: 2.0,
    },
    Lobe::Body {
        weight: 0.2,
        lo: Bound::At(0.6),
        hi: Bound::At(0.95),
        rise: 0.5,
        fall: 3.0,
    },
];

const GALAXY: &[Lobe] = &[
    Lobe::Peak {
        weight: 0.25,
        center: 1.0,
        sigma: 0.025,
    },
    Lobe::Body {
        weight: 0.35,
        lo: Bound::Background,
        hi: Bound::At(0.5),
        rise: 1.5,
        fall: 1.5,
    },
    Lobe::Body {
        weight: 0.25,
        lo: Bound::At(0.4),
        hi: Bound::At(0.75),
        rise: 2.0,
        fall: 1.0,
    },
    Lobe::Shelf {
        weight: 0.15,
        lo: 0.7,
        hi: 0.9,
    },
];

const STAR_CLUSTER: &[Lobe] = &[
    Lobe::Peak {
        weight: 0.20,
        center: 0.8,
        sigma: 0.02,
    },
    Lobe::Body {
        weight: 0.50,
        lo: Bound::At(0.15),
        hi: Bound::At(0.70),
        rise: 0.5,
        fall: 1.0,
    },
    Lobe::Body {
        weight: 0.30,
        lo: Bound::At(0.60),
        hi: Bound::At(0.95),
        rise: 1.0,
        fall: 4.0,
    },
];

const DARK_NEBULA: &[Lobe] = &[
    Lobe::Peak {
        weight: 0.15,
        center: 1.3,
        sigma: 0.04,
    },
    Lobe::Body {
        weight: 0.40,
        lo: Bound::At(0.05),
        hi: Bound::Background,
        rise: 2.0,
        fall: 1.0,
    },
    Lobe::Body {
        weight: 0.30,
        lo: Bound::Background,
        hi: Bound::At(0.55),
        rise: 1.0,
        fall: 1.5,
    },
    Lobe::Shelf {
        weight: 0.15,
        lo: 0.5,
        hi: 0.85,
    },
];

const UNIFORM: &[Lobe] = &[Lobe::Shelf {
    weight: 1.0,
    lo: 0.0,
    hi: 1.0,
}];

/// Lobes making up the target density of `object_type`.
pub fn lobes(object_type: ObjectType) -> &'static [Lobe] {
    match object_type {
        ObjectType::Nebula => NEBULA,
        ObjectType::Galaxy => GALAXY,
        ObjectType::StarCluster => STAR_CLUSTER,
        ObjectType::DarkNebula => DARK_NEBULA,
        ObjectType::Custom => UNIFORM,
    }
}

/// Unnormalized target density at normalized intensity `x`.
pub fn target_density(object_type: ObjectType, background: f64, x: f64) -> f64 {
    lobes(object_type)
        .iter()
        .map(|lobe| lobe.density(x, background))
        .sum()
}

/// Target CDF sampled at `resolution` evenly spaced intensities in [0, 1].
pub fn target_cdf(object_type: ObjectType, background: f32, resolution: usize) -> DistributionTable {
    assert!(resolution >= 2, "resolution must be at least 2");
    let background = background as f64;
    let max_bin = (resolution - 1) as f64;
    let pdf = (0..resolution)
        .map(|i| target_density(object_type, background, i as f64 / max_bin))
        .collect();
    DistributionTable::from_density(pdf)
}
