//! Prelude module for convenient imports.
//!
//! # Usage
//!
//! ```rust,ignore
//! use astrostretch::prelude::*;
//! ```

// Core image types
pub use crate::{Image, ImageDimensions, PixelBuffer, PixelData, Plane, SampleFormat};

// Configuration
pub use crate::{Algorithm, Config, ObjectType, OtsConfig, SasConfig, SasPreset};

// Main API
pub use crate::{
    CancelToken, Error, ProgressContext, StretchReport, StretchStage, execute, execute_buffer,
    execute_with_report,
};
