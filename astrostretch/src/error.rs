//! Error types for stretch operations.

use thiserror::Error;

use crate::image::{ImageDimensions, SampleFormat};
use crate::progress::StretchStage;

/// Errors that can occur while validating or executing a stretch.
///
/// Numerically degenerate inputs (flat histograms, black pixels, a zero
/// background percentile) are not errors; the engines fall back to a no-op
/// for the affected step instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Unsupported sample type: {format} images cannot be stretched")]
    UnsupportedSampleType { format: SampleFormat },

    #[error("Invalid parameter '{name}': {value} is outside [{min}, {max}]")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Unsupported channel count {0}: expected 1 (grayscale) or at least 3 (color)")]
    UnsupportedChannelCount(usize),

    #[error("Pixel data length mismatch: expected {expected} samples for {dimensions:?}, got {actual}")]
    DimensionMismatch {
        dimensions: ImageDimensions,
        expected: usize,
        actual: usize,
    },

    #[error("Image has no pixels")]
    EmptyImage,

    #[error("Stretch cancelled during {stage} stage")]
    Cancelled { stage: StretchStage },
}

pub type Result<T> = std::result::Result<T, Error>;
