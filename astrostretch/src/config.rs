//! Stretch configuration.
//!
//! A single immutable `Config` value selects the algorithm and carries the
//! parameters for both engines. It is validated once at entry; the engines
//! assume every field is within range.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

use crate::error::{Error, Result};

/// Stretch algorithm selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display)]
pub enum Algorithm {
    /// Optimal Transport Stretch: histogram matching toward an object profile.
    #[default]
    #[serde(rename = "OTS")]
    Ots,
    /// Starlet Arctan Stretch: multiscale gain shaping with arctan compression.
    #[serde(rename = "SAS")]
    Sas,
}

/// Object class that shapes the OTS target distribution.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "camelCase")]
pub enum ObjectType {
    #[default]
    Nebula,
    Galaxy,
    StarCluster,
    DarkNebula,
    /// Uniform target distribution.
    Custom,
}

/// Optimal Transport Stretch parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OtsConfig {
    pub object_type: ObjectType,
    /// Center of the background peak in the target distribution. Range: 0.05-0.30.
    pub background_target: f32,
    /// Blend between identity (0) and the full transport map (1).
    pub stretch_intensity: f32,
    /// How strongly bins above 0.7 are pulled back toward identity. Range: 0-1.
    pub protect_highlights: f32,
    /// Stretch the luminance and rescale color channels by its ratio.
    /// When false each channel is mapped independently.
    pub preserve_color: bool,
}

impl Default for OtsConfig {
    fn default() -> Self {
        Self {
            object_type: ObjectType::Nebula,
            background_target: 0.15,
            stretch_intensity: 0.75,
            protect_highlights: 0.3,
            preserve_color: true,
        }
    }
}

impl OtsConfig {
    pub fn validate(&self) -> Result<()> {
        check_range("ots.backgroundTarget", self.background_target, 0.05, 0.30)?;
        check_range("ots.stretchIntensity", self.stretch_intensity, 0.0, 1.0)?;
        check_range("ots.protectHighlights", self.protect_highlights, 0.0, 1.0)?;
        Ok(())
    }
}

/// Named SAS parameter presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "camelCase")]
pub enum SasPreset {
    EmissionNebula,
    Galaxy,
    StarCluster,
    FaintExtended,
}

/// Starlet Arctan Stretch parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SasConfig {
    /// Number of wavelet detail scales. Range: 4-8.
    pub num_scales: u32,
    /// Pivot of the arctan compression and target of the 5th percentile. Range: 0.05-0.25.
    pub background_target: f32,
    /// Gain for scales 0-1 (stars, noise). Range: 0.5-2.0.
    pub fine_scale_gain: f32,
    /// Gain around scales 2-3 (fine structure). Range: 1.0-5.0.
    pub mid_scale_gain: f32,
    /// Gain for scales 4+ (diffuse nebulosity). Range: 1.0-8.0.
    pub coarse_scale_gain: f32,
    /// Arctan compression strength. Range: 1-20.
    pub compression_alpha: f32,
    /// Gain attenuation over bright regions. Range: 0-1.
    pub highlight_protection: f32,
    /// Soft-threshold factor for the two finest scales. Range: 0-0.01.
    pub noise_threshold: f32,
    /// Pull the residual scale toward half the background target.
    pub flatten_background: bool,
    /// Rescale color channels by the luminance ratio. When false the
    /// processed luminance is written to every channel (desaturating).
    pub preserve_color: bool,
}

impl Default for SasConfig {
    fn default() -> Self {
        Self {
            num_scales: 6,
            background_target: 0.12,
            fine_scale_gain: 0.8,
            mid_scale_gain: 2.5,
            coarse_scale_gain: 4.0,
            compression_alpha: 8.0,
            highlight_protection: 0.5,
            noise_threshold: 0.001,
            flatten_background: true,
            preserve_color: true,
        }
    }
}

impl SasConfig {
    /// Preset: bright emission nebula with strong coarse structure.
    pub fn emission_nebula() -> Self {
        Self {
            num_scales: 6,
            fine_scale_gain: 0.7,
            mid_scale_gain: 2.5,
            coarse_scale_gain: 5.0,
            compression_alpha: 10.0,
            highlight_protection: 0.5,
            background_target: 0.12,
            noise_threshold: 0.001,
            ..Default::default()
        }
    }

    /// Preset: galaxy with a bright core to protect.
    pub fn galaxy() -> Self {
        Self {
            num_scales: 6,
            fine_scale_gain: 0.9,
            mid_scale_gain: 1.8,
            coarse_scale_gain: 3.0,
            compression_alpha: 6.0,
            highlight_protection: 0.7,
            background_target: 0.10,
            noise_threshold: 0.0005,
            ..Default::default()
        }
    }

    /// Preset: star cluster, keeps fine scales crisp.
    pub fn star_cluster() -> Self {
        Self {
            num_scales: 5,
            fine_scale_gain: 1.2,
            mid_scale_gain: 1.5,
            coarse_scale_gain: 2.0,
            compression_alpha: 5.0,
            highlight_protection: 0.3,
            background_target: 0.08,
            noise_threshold: 0.001,
            ..Default::default()
        }
    }

    /// Preset: faint extended emission, aggressive coarse gain.
    pub fn faint_extended() -> Self {
        Self {
            num_scales: 7,
            fine_scale_gain: 0.5,
            mid_scale_gain: 3.5,
            coarse_scale_gain: 7.0,
            compression_alpha: 15.0,
            highlight_protection: 0.6,
            background_target: 0.15,
            noise_threshold: 0.002,
            ..Default::default()
        }
    }

    pub fn from_preset(preset: SasPreset) -> Self {
        match preset {
            SasPreset::EmissionNebula => Self::emission_nebula(),
            SasPreset::Galaxy => Self::galaxy(),
            SasPreset::StarCluster => Self::star_cluster(),
            SasPreset::FaintExtended => Self::faint_extended(),
        }
    }

    /// Gain applied to each detail scale, finest first.
    pub fn scale_gains(&self) -> Vec<f32> {
        (0..self.num_scales)
            .map(|j| crate::sas::scale_gain(j as f64, self) as f32)
            .collect()
    }

    pub fn validate(&self) -> Result<()> {
        check_range("sas.numScales", self.num_scales as f32, 4.0, 8.0)?;
        check_range("sas.backgroundTarget", self.background_target, 0.05, 0.25)?;
        check_range("sas.fineScaleGain", self.fine_scale_gain, 0.5, 2.0)?;
        check_range("sas.midScaleGain", self.mid_scale_gain, 1.0, 5.0)?;
        check_range("sas.coarseScaleGain", self.coarse_scale_gain, 1.0, 8.0)?;
        check_range("sas.compressionAlpha", self.compression_alpha, 1.0, 20.0)?;
        check_range(
            "sas.highlightProtection",
            self.highlight_protection,
            0.0,
            1.0,
        )?;
        check_range("sas.noiseThreshold", self.noise_threshold, 0.0, 0.01)?;
        Ok(())
    }
}

/// Complete parameter set for one stretch.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub algorithm: Algorithm,
    pub ots: OtsConfig,
    pub sas: SasConfig,
}

impl Config {
    pub fn ots(ots: OtsConfig) -> Self {
        Self {
            algorithm: Algorithm::Ots,
            ots,
            ..Default::default()
        }
    }

    pub fn sas(sas: SasConfig) -> Self {
        Self {
            algorithm: Algorithm::Sas,
            sas,
            ..Default::default()
        }
    }

    /// Validate every field of both engines against its documented range.
    ///
    /// Inactive engine parameters are validated too, so a stored parameter
    /// set is either entirely valid or rejected.
    pub fn validate(&self) -> Result<()> {
        self.ots.validate()?;
        self.sas.validate()?;
        Ok(())
    }

    pub fn to_text(&self, format: ConfigFormat) -> std::result::Result<String, FormatError> {
        Ok(match format {
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Yaml => serde_yml::to_string(self)?,
        })
    }

    /// Parse a parameter set. Missing fields take their defaults; the result
    /// is not validated.
    pub fn from_text(text: &str, format: ConfigFormat) -> std::result::Result<Self, FormatError> {
        Ok(match format {
            ConfigFormat::Json => serde_json::from_str(text)?,
            ConfigFormat::Yaml => serde_yml::from_str(text)?,
        })
    }
}

/// Text format of a serialized `Config`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
}

#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("YAML serialization failed")]
    Yaml(#[from] serde_yml::Error),
    #[error("JSON serialization failed")]
    Json(#[from] serde_json::Error),
}

/// NaN fails the check because both comparisons are false.
fn check_range(name: &'static str, value: f32, min: f32, max: f32) -> Result<()> {
    if value >= min && value <= max {
        Ok(())
    } else {
        Err(Error::InvalidParameter {
            name,
            value: value as f64,
            min: min as f64,
            max: max as f64,
        })
    }
}
