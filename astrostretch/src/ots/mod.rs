//! Optimal Transport Stretch.
//!
//! Rearranges the image histogram toward a synthetic target distribution
//! shaped for an object class:
//!
//! 1. Build the empirical CDF of the working plane (65536 bins).
//! 2. Synthesize the target CDF from the object profile ([`profile`]).
//! 3. Match quantiles to get a monotone transport map ([`TransportMap`]).
//! 4. Blend highlights back toward identity, then blend the whole map with
//!    identity by the stretch intensity.
//! 5. Apply the map and merge color.

pub mod profile;
pub mod transport;


use std::time::Instant;

pub use profile::{Bound, Lobe, target_cdf, target_density};
pub use transport::TransportMap;

use crate::config::{ObjectType, OtsConfig};
use crate::error::Result;
use crate::image::Image;
use crate::luminance::{extract_luminance, reconstruct_color, uses_luminance};
use crate::math::{DISTRIBUTION_RESOLUTION, DistributionTable, compute_cdf, inverse_cdf};
use crate::plane::Plane;
use crate::progress::{ProgressContext, StretchStage};

/// Summary of an OTS run.
#[derive(Debug, Clone, PartialEq)]
pub struct OtsReport {
    pub object_type: ObjectType,
    /// True when luma was stretched and merged by ratio.
    pub used_luminance: bool,
    /// Working-plane median before the stretch (bin center).
    pub source_median: f32,
    /// Where the final map sends the source median.
    pub mapped_median: f32,
    /// Final map value of the darkest and brightest bins.
    pub map_range: (f32, f32),
}

/// Build the final transport map for `plane`.
pub fn build_transport_map(
    plane: &Plane,
    config: &OtsConfig,
    ctx: &ProgressContext,
) -> Result<TransportMap> {
    ctx.stage(StretchStage::Distribution, 0, 2)?;
    let source = compute_cdf(plane, DISTRIBUTION_RESOLUTION);
    transport_map_for(&source, config, ctx)
}

fn transport_map_for(
    source: &DistributionTable,
    config: &OtsConfig,
    ctx: &ProgressContext,
) -> Result<TransportMap> {
    ctx.stage(StretchStage::Distribution, 1, 2)?;
    let target = target_cdf(
        config.object_type,
        config.background_target,
        DISTRIBUTION_RESOLUTION,
    );

    ctx.stage(StretchStage::Transport, 0, 2)?;
    let mut map = TransportMap::from_distributions(source, &target);
    debug_assert!(map.is_monotone());

    if config.protect_highlights > 0.0 {
        map.protect_highlights(config.protect_highlights);
    }
    map.blend_with_identity(config.stretch_intensity);
    Ok(map)
}

/// Stretch `image` in place.
///
/// With color preservation on a color image the luma is stretched and the
/// channels rescaled by the luminance ratio; otherwise the map derived from
/// channel 0 is applied to every channel independently.
///
/// `config` is validated first; an out-of-range field fails before any
/// pixel is touched.
pub fn stretch(image: &mut Image, config: &OtsConfig, ctx: &ProgressContext) -> Result<OtsReport> {
    config.validate()?;
    let start = Instant::now();
    let used_luminance = uses_luminance(image, config.preserve_color);

    ctx.stage(StretchStage::Luminance, 0, 1)?;
    let planes = extract_luminance(image, config.preserve_color, ctx)?;

    ctx.stage(StretchStage::Distribution, 0, 2)?;
    let source_cdf = compute_cdf(&planes.working, DISTRIBUTION_RESOLUTION);
    let map = transport_map_for(&source_cdf, config, ctx)?;

    let median_bin = inverse_cdf(&source_cdf, 0.5);
    let source_median = median_bin as f32 / (DISTRIBUTION_RESOLUTION - 1) as f32;
    let report = OtsReport {
        object_type: config.object_type,
        used_luminance,
        source_median,
        mapped_median: map.values()[median_bin],
        map_range: (map.values()[0], map.values()[map.resolution() - 1]),
    };

    ctx.stage(StretchStage::Transport, 1, 2)?;
    if used_luminance {
        let mut working = planes.working;
        map.apply(&mut working, ctx)?;
        ctx.stage(StretchStage::ColorMerge, 0, 1)?;
        reconstruct_color(image, &planes.original, &working, true, ctx)?;
    } else {
        let channels = image.channels();
        for (c, plane) in image.planes_mut().iter_mut().enumerate() {
            ctx.stage(StretchStage::Transport, c, channels)?;
            map.apply(plane, ctx)?;
        }
    }

    tracing::info!(
        "OTS ({}) done in {:.1?}: median {:.4} -> {:.4}, luminance={}",
        config.object_type,
        start.elapsed(),
        report.source_median,
        report.mapped_median,
        used_luminance
    );

    Ok(report)
}
