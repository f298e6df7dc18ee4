//! Unified stretch entry point.
//!
//! Provides `execute()` and its variants as the main API: validate the
//! configuration, dispatch to the selected engine and return the stretched
//! image. The input is never modified; each call is a pure function of the
//! image and the configuration.

use std::time::{Duration, Instant};

use crate::config::{Algorithm, Config};
use crate::error::Result;
use crate::image::{Image, PixelBuffer};
use crate::ots::{self, OtsReport};
use crate::progress::ProgressContext;
use crate::sas::{self, SasReport};

/// Engine-specific details of a finished stretch.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineReport {
    Ots(OtsReport),
    Sas(SasReport),
}

/// Summary of one `execute` call.
#[derive(Debug, Clone, PartialEq)]
pub struct StretchReport {
    pub algorithm: Algorithm,
    pub elapsed: Duration,
    pub engine: EngineReport,
}

/// Stretch `image` with `config`.
///
/// # Errors
///
/// Returns an error if:
/// - A configuration field is outside its documented range
/// - The progress context requests cancellation
///
/// Validation happens before any pixel is touched.
///
/// # Examples
///
/// ```ignore
/// use astrostretch::{Config, Image, ProgressContext, SasConfig, execute};
///
/// let image = Image::from_gray(width, height, pixels)?;
///
/// // Default OTS nebula stretch
/// let stretched = execute(&image, &Config::default(), &ProgressContext::default())?;
///
/// // SAS with the galaxy preset
/// let config = Config::sas(SasConfig::galaxy());
/// let stretched = execute(&image, &config, &ProgressContext::default())?;
/// ```
pub fn execute(image: &Image, config: &Config, ctx: &ProgressContext) -> Result<Image> {
    execute_with_report(image, config, ctx).map(|(image, _)| image)
}

/// Like [`execute`], also returning what the engine measured.
pub fn execute_with_report(
    image: &Image,
    config: &Config,
    ctx: &ProgressContext,
) -> Result<(Image, StretchReport)> {
    config.validate()?;

    let start = Instant::now();
    let mut output = image.clone();
    let engine = match config.algorithm {
        Algorithm::Ots => EngineReport::Ots(ots::stretch(&mut output, &config.ots, ctx)?),
        Algorithm::Sas => EngineReport::Sas(sas::stretch(&mut output, &config.sas, ctx)?),
    };

    let report = StretchReport {
        algorithm: config.algorithm,
        elapsed: start.elapsed(),
        engine,
    };
    tracing::info!(
        "{} stretch of {}x{}x{} image finished in {:.1?}",
        report.algorithm,
        image.width(),
        image.height(),
        image.channels(),
        report.elapsed
    );
    Ok((output, report))
}

/// Stretch a host buffer, returning a buffer of the same shape and sample format.
///
/// Complex buffers are rejected before the configuration is inspected.
pub fn execute_buffer(
    buffer: &PixelBuffer,
    config: &Config,
    ctx: &ProgressContext,
) -> Result<PixelBuffer> {
    let image = Image::from_buffer(buffer)?;
    let stretched = execute(&image, config, ctx)?;
    stretched.to_buffer(buffer.data.format())
}
