//! Multi-band Equalizer
//!
//! A serial cascade of [`BandFilter`]s. Band 0 processes the input frame,
//! each following band processes the previous band's output.

use super::filter::{BandFilter, FilterType};
use super::settings::{BandSettings, EqualizerSettings};
use crate::error::{EqError, Result};
use tracing::{debug, trace};

/// Maximum number of channels per frame (size of the inter-band scratch buffer)
pub const MAX_CHANNELS: usize = 8;

/// Default band shape after `init`
pub const DEFAULT_BAND_TYPE: FilterType = FilterType::ParametricEq;

/// Default band frequency after `init`
pub const DEFAULT_BAND_FREQUENCY_HZ: f32 = 500.0;

/// Default band bandwidth (octaves) after `init`
pub const DEFAULT_BAND_BANDWIDTH_OCTAVES: f32 = 1.0;

/// Default band gain after `init`
pub const DEFAULT_BAND_GAIN_DB: f32 = 0.0;

/// Cascaded multi-band equalizer
///
/// `Equalizer::default()` has no bands; every setter on it is a no-op and
/// `process_frame` passes audio through.
#[derive(Debug, Clone, Default)]
pub struct Equalizer {
    bands: Vec<BandFilter>,
    channel_count: usize,
    sample_rate: f32,
}

impl Equalizer {
    /// Create an equalizer with `band_count` flat bands
    pub fn new(sample_rate_hz: f32, band_count: usize, channel_count: usize) -> Result<Self> {
        let mut eq = Self::default();
        eq.init(sample_rate_hz, band_count, channel_count)?;
        Ok(eq)
    }

    /// (Re)allocate all bands as flat parametric bands
    ///
    /// Fails if `channel_count` exceeds [`MAX_CHANNELS`]; the equalizer is
    /// left unchanged in that case.
    pub fn init(&mut self, sample_rate_hz: f32, band_count: usize, channel_count: usize) -> Result<()> {
        if channel_count > MAX_CHANNELS {
            return Err(EqError::TooManyChannels {
                requested: channel_count,
                max: MAX_CHANNELS,
            });
        }

        self.sample_rate = sample_rate_hz;
        self.channel_count = channel_count;
        self.bands.clear();
        self.bands.resize_with(band_count, || {
            let mut band = BandFilter::default();
            band.init(
                sample_rate_hz,
                channel_count,
                DEFAULT_BAND_TYPE,
                DEFAULT_BAND_FREQUENCY_HZ,
                DEFAULT_BAND_BANDWIDTH_OCTAVES,
                DEFAULT_BAND_GAIN_DB,
            );
            band
        });

        debug!(sample_rate_hz, band_count, channel_count, "equalizer initialized");
        Ok(())
    }

    /// Process one frame through every band in index order
    ///
    /// Uses the first `channel_count` samples of `input` and writes the first
    /// `channel_count` samples of `output`.
    pub fn process_frame(&mut self, input: &[f32], output: &mut [f32]) {
        let channels = self.channel_count.min(input.len()).min(output.len());
        let mut scratch = [0.0_f32; MAX_CHANNELS];
        scratch[..channels].copy_from_slice(&input[..channels]);

        for band in &mut self.bands {
            band.process_frame(&scratch[..channels], &mut output[..channels]);
            scratch[..channels].copy_from_slice(&output[..channels]);
        }

        if self.bands.is_empty() {
            output[..channels].copy_from_slice(&scratch[..channels]);
        }
    }

    /// Process interleaved audio in place, one frame at a time
    ///
    /// A trailing partial frame is left untouched.
    pub fn process_interleaved(&mut self, samples: &mut [f32]) {
        if self.channel_count == 0 {
            return;
        }
        let mut frame = [0.0_f32; MAX_CHANNELS];
        for chunk in samples.chunks_exact_mut(self.channel_count) {
            frame[..chunk.len()].copy_from_slice(chunk);
            self.process_frame(&frame[..chunk.len()], chunk);
        }
    }

    /// Clear the state of every band
    pub fn reset(&mut self) {
        for band in &mut self.bands {
            band.reset();
        }
    }

    pub fn set_band_enabled(&mut self, band_index: usize, enabled: bool) {
        if let Some(band) = self.band_for_update(band_index) {
            band.set_enabled(enabled);
        }
    }

    pub fn set_band_params(
        &mut self,
        band_index: usize,
        frequency_hz: f32,
        bandwidth_octaves: f32,
        gain_db: f32,
        filter_type: FilterType,
    ) {
        if let Some(band) = self.band_for_update(band_index) {
            band.set_params(filter_type, frequency_hz, bandwidth_octaves, gain_db);
        }
    }

    pub fn set_band_type(&mut self, band_index: usize, filter_type: FilterType) {
        if let Some(band) = self.band_for_update(band_index) {
            band.set_type(filter_type);
        }
    }

    pub fn set_band_frequency(&mut self, band_index: usize, frequency_hz: f32) {
        if let Some(band) = self.band_for_update(band_index) {
            band.set_frequency(frequency_hz);
        }
    }

    pub fn set_band_bandwidth(&mut self, band_index: usize, bandwidth_octaves: f32) {
        if let Some(band) = self.band_for_update(band_index) {
            band.set_bandwidth(bandwidth_octaves);
        }
    }

    pub fn set_band_gain_db(&mut self, band_index: usize, gain_db: f32) {
        if let Some(band) = self.band_for_update(band_index) {
            band.set_gain_db(gain_db);
        }
    }

    /// Configure every band from a settings snapshot
    ///
    /// The settings must describe exactly `band_count` bands. Unchanged
    /// values leave the corresponding band untouched.
    pub fn apply_settings(&mut self, settings: &EqualizerSettings) -> Result<()> {
        if settings.bands.len() != self.bands.len() {
            return Err(EqError::BandCountMismatch {
                expected: self.bands.len(),
                actual: settings.bands.len(),
            });
        }

        for (band, s) in self.bands.iter_mut().zip(&settings.bands) {
            band.set_params(s.filter_type, s.frequency_hz, s.bandwidth_octaves, s.gain_db);
            band.set_enabled(s.enabled);
        }

        debug!(band_count = self.bands.len(), "equalizer settings applied");
        Ok(())
    }

    /// Snapshot the current band parameters
    pub fn settings(&self) -> EqualizerSettings {
        EqualizerSettings {
            bands: self.bands.iter().map(BandSettings::from).collect(),
        }
    }

    pub fn band_count(&self) -> usize {
        self.bands.len()
    }

    pub fn channel_count(&self) -> usize {
        self.channel_count
    }

    pub fn sample_rate_hz(&self) -> f32 {
        self.sample_rate
    }

    /// Get a band by index
    pub fn band(&self, band_index: usize) -> Option<&BandFilter> {
        self.bands.get(band_index)
    }

    /// Get all bands in cascade order
    pub fn bands(&self) -> &[BandFilter] {
        &self.bands
    }

    fn band_for_update(&mut self, band_index: usize) -> Option<&mut BandFilter> {
        let band_count = self.bands.len();
        let band = self.bands.get_mut(band_index);
        if band.is_none() {
            trace!(band_index, band_count, "ignoring update for missing band");
        }
        band
    }
}
