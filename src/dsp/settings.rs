//! Serializable equalizer parameters
//!
//! Plain-data snapshots of band parameters, used to configure an
//! [`Equalizer`](super::Equalizer) in one call or store a preset.

use super::eq::{
    DEFAULT_BAND_BANDWIDTH_OCTAVES, DEFAULT_BAND_FREQUENCY_HZ, DEFAULT_BAND_GAIN_DB,
    DEFAULT_BAND_TYPE,
};
use super::filter::{BandFilter, FilterType};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Parameters of a single band
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BandSettings {
    pub filter_type: FilterType,
    /// Center/corner frequency in Hz
    pub frequency_hz: f32,
    /// Bandwidth in octaves
    pub bandwidth_octaves: f32,
    /// Gain in dB (only used by parametric bands)
    pub gain_db: f32,
    pub enabled: bool,
}

impl Default for BandSettings {
    fn default() -> Self {
        Self {
            filter_type: DEFAULT_BAND_TYPE,
            frequency_hz: DEFAULT_BAND_FREQUENCY_HZ,
            bandwidth_octaves: DEFAULT_BAND_BANDWIDTH_OCTAVES,
            gain_db: DEFAULT_BAND_GAIN_DB,
            enabled: true,
        }
    }
}

impl BandSettings {
    pub fn new(filter_type: FilterType, frequency_hz: f32, bandwidth_octaves: f32, gain_db: f32) -> Self {
        Self {
            filter_type,
            frequency_hz,
            bandwidth_octaves,
            gain_db,
            enabled: true,
        }
    }

    /// Create a parametric (bell) band
    pub fn parametric(frequency_hz: f32, bandwidth_octaves: f32, gain_db: f32) -> Self {
        Self::new(FilterType::ParametricEq, frequency_hz, bandwidth_octaves, gain_db)
    }

    /// Create a low-pass band
    pub fn lowpass(frequency_hz: f32, bandwidth_octaves: f32) -> Self {
        Self::new(FilterType::Lowpass, frequency_hz, bandwidth_octaves, 0.0)
    }

    /// Create a high-pass band
    pub fn highpass(frequency_hz: f32, bandwidth_octaves: f32) -> Self {
        Self::new(FilterType::Highpass, frequency_hz, bandwidth_octaves, 0.0)
    }

    /// Same settings with the band bypassed
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

impl From<&BandFilter> for BandSettings {
    fn from(band: &BandFilter) -> Self {
        Self {
            filter_type: band.filter_type(),
            frequency_hz: band.frequency_hz(),
            bandwidth_octaves: band.bandwidth_octaves(),
            gain_db: band.gain_db(),
            enabled: band.is_enabled(),
        }
    }
}

/// Parameters of every band, in cascade order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EqualizerSettings {
    pub bands: Vec<BandSettings>,
}

impl EqualizerSettings {
    pub fn new(bands: Vec<BandSettings>) -> Self {
        Self { bands }
    }

    /// `band_count` flat bands, matching a freshly initialized equalizer
    pub fn flat(band_count: usize) -> Self {
        Self {
            bands: vec![BandSettings::default(); band_count],
        }
    }

    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn from_json(json: &serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(json.clone())?)
    }
}
