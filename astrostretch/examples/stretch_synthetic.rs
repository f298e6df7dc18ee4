//! Example: Stretch a synthetic linear frame with every engine setting
//!
//! Generates a seeded RGB sky frame, runs OTS for each object type and SAS
//! for each preset, and logs the engine reports. Pass a directory to also
//! write a daily-rolling log file there.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p astrostretch --features synthetic --example stretch_synthetic -- [log_dir]
//! ```

use std::path::PathBuf;

use anyhow::Context;
use astrostretch::logging::setup_logging;
use astrostretch::luminance::extract_luminance;
use astrostretch::math::percentile;
use astrostretch::testing::{SkyConfig, synthetic_rgb};
use astrostretch::{
    Config, ConfigFormat, EngineReport, Image, ObjectType, OtsConfig, ProgressContext, SasConfig,
    SasPreset, execute_with_report,
};
use strum::IntoEnumIterator;

fn main() -> anyhow::Result<()> {
    let log_dir = std::env::args().nth(1).map(PathBuf::from);
    setup_logging("info", log_dir.as_deref()).context("Failed to initialize logging")?;

    let image = synthetic_rgb(&SkyConfig {
        width: 512,
        height: 384,
        num_stars: 150,
        ..Default::default()
    });
    log_levels("input", &image)?;

    let ctx = ProgressContext::default();

    for object_type in ObjectType::iter() {
        let config = Config::ots(OtsConfig {
            object_type,
            ..Default::default()
        });
        let (output, report) = execute_with_report(&image, &config, &ctx)?;
        if let EngineReport::Ots(ots) = &report.engine {
            tracing::info!(
                "OTS {object_type}: median {:.4} -> {:.4} in {:.1?}",
                ots.source_median,
                ots.mapped_median,
                report.elapsed
            );
        }
        log_levels(&format!("ots/{object_type}"), &output)?;
    }

    for preset in SasPreset::iter() {
        let config = Config::sas(SasConfig::from_preset(preset));
        let (output, report) = execute_with_report(&image, &config, &ctx)?;
        if let EngineReport::Sas(sas) = &report.engine {
            tracing::info!(
                "SAS {preset}: noise sigma {:.6}, gains {:?} in {:.1?}",
                sas.noise_sigma,
                sas.scale_gains,
                report.elapsed
            );
        }
        log_levels(&format!("sas/{preset}"), &output)?;
    }

    let config = Config::sas(SasConfig::galaxy());
    tracing::info!(
        "Galaxy preset as JSON:\n{}",
        config.to_text(ConfigFormat::Json)?
    );

    Ok(())
}

fn log_levels(label: &str, image: &Image) -> anyhow::Result<()> {
    let luma = extract_luminance(image, true, &ProgressContext::default())?.working;
    tracing::info!(
        "{label}: luma p05 {:.4}, p50 {:.4}, p99 {:.4}",
        percentile(&luma, 0.05),
        percentile(&luma, 0.5),
        percentile(&luma, 0.99)
    );
    Ok(())
}
