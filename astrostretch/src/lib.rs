//! Astrostretch - Nonlinear stretching of linear astronomical images.
//!
//! This library provides two independent stretch algorithms:
//! - Optimal Transport Stretch (OTS): histogram matching toward a target
//!   distribution shaped for an object class
//! - Starlet Arctan Stretch (SAS): multiscale wavelet gain shaping with noise
//!   shrinkage and arctangent dynamic-range compression
//!
//! Both work on a single normalized intensity plane. Color images are either
//! stretched through their luminance and merged back by ratio, or stretched
//! per channel.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use astrostretch::{Config, Image, ProgressContext, SasConfig, execute};
//!
//! let image = Image::from_planes(vec![red, green, blue])?;
//!
//! // Optimal Transport Stretch with the default nebula profile
//! let stretched = execute(&image, &Config::default(), &ProgressContext::default())?;
//!
//! // Starlet Arctan Stretch with a preset
//! let config = Config::sas(SasConfig::emission_nebula());
//! let stretched = execute(&image, &config, &ProgressContext::default())?;
//! ```

pub(crate) mod common;
mod config;
mod error;
mod image;
pub mod logging;
pub mod luminance;
pub mod math;
pub mod ots;
mod plane;
mod progress;
pub mod sas;
mod stretch;

#[cfg(any(test, feature = "synthetic"))]
pub mod testing;

pub mod prelude;

// ============================================================================
// Core image types
// ============================================================================

pub use image::{Image, ImageDimensions, PixelBuffer, PixelData, SampleFormat};
pub use plane::Plane;

// ============================================================================
// Configuration
// ============================================================================

pub use config::{
    Algorithm, Config, ConfigFormat, FormatError, ObjectType, OtsConfig, SasConfig, SasPreset,
};

// ============================================================================
// Errors and progress
// ============================================================================

pub use error::{Error, Result};
pub use progress::{CancelToken, ProgressCallback, ProgressContext, StretchProgress, StretchStage};

// ============================================================================
// Main API
// ============================================================================

pub use ots::OtsReport;
pub use sas::SasReport;
pub use stretch::{EngineReport, StretchReport, execute, execute_buffer, execute_with_report};
