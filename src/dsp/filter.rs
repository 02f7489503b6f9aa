//! Multichannel biquad band
//!
//! Wraps one [`BiquadStage`] per channel so coefficients are derived once
//! and shared by every channel, while each channel keeps its own delay line.

use super::biquad::{BiquadCoefficients, BiquadStage};
use serde::{Deserialize, Serialize};
use std::f32::consts::{LN_2, PI};

/// Lowest frequency accepted by `init` and `set_params`
pub const MIN_FREQUENCY_HZ: f32 = 20.0;

/// Lowest frequency accepted by `set_frequency`
pub const MIN_SET_FREQUENCY_HZ: f32 = 0.0;

/// Frequency used by [`BandFilter::new`]
pub const DEFAULT_FREQUENCY_HZ: f32 = 20000.0;

/// Bandwidth in octaves used by [`BandFilter::new`]
pub const DEFAULT_BANDWIDTH_OCTAVES: f32 = 2.0;

/// Filter shape for a band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterType {
    /// Remove above frequency
    Lowpass,
    /// Remove below frequency
    Highpass,
    /// Keep a band around frequency
    Bandpass,
    /// Remove a band around frequency
    Notch,
    /// Bell curve boost/cut
    #[default]
    ParametricEq,
    /// Flat magnitude, phase shift around frequency
    AllPass,
}

impl FilterType {
    /// Whether `gain_db` has any influence on this shape
    pub fn uses_gain(self) -> bool {
        matches!(self, FilterType::ParametricEq)
    }
}

/// Coefficients before normalization by `b0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawCoefficients {
    pub a0: f32,
    pub a1: f32,
    pub a2: f32,
    pub b0: f32,
    pub b1: f32,
    pub b2: f32,
}

impl RawCoefficients {
    /// Derive coefficients from perceptual parameters.
    ///
    /// Bandwidth is in octaves and folds into alpha through a plain sine:
    /// `alpha = sin(w) * sin(ln2 / 2 * bw * w / sin(w))`.
    pub fn design(
        filter_type: FilterType,
        sample_rate_hz: f32,
        frequency_hz: f32,
        bandwidth_octaves: f32,
        gain_db: f32,
    ) -> Self {
        let omega = 2.0 * PI * frequency_hz / sample_rate_hz;
        let sn = omega.sin();
        let cs = omega.cos();

        // w / sin(w) -> 1 as w -> 0
        let ratio = if sn == 0.0 { 1.0 } else { omega / sn };
        let alpha = sn * (0.5 * LN_2 * bandwidth_octaves * ratio).sin();

        match filter_type {
            FilterType::Lowpass => Self {
                a0: (1.0 - cs) / 2.0,
                a1: 1.0 - cs,
                a2: (1.0 - cs) / 2.0,
                b0: 1.0 + alpha,
                b1: -2.0 * cs,
                b2: 1.0 - alpha,
            },
            FilterType::Highpass => Self {
                a0: (1.0 + cs) / 2.0,
                a1: -(1.0 + cs),
                a2: (1.0 + cs) / 2.0,
                b0: 1.0 + alpha,
                b1: -2.0 * cs,
                b2: 1.0 - alpha,
            },
            FilterType::Bandpass => Self {
                a0: alpha,
                a1: 0.0,
                a2: -alpha,
                b0: 1.0 + alpha,
                b1: -2.0 * cs,
                b2: 1.0 - alpha,
            },
            FilterType::Notch => Self {
                a0: 1.0,
                a1: -2.0 * cs,
                a2: 1.0,
                b0: 1.0 + alpha,
                b1: -2.0 * cs,
                b2: 1.0 - alpha,
            },
            FilterType::ParametricEq => {
                let amp = 10.0_f32.powf(gain_db / 40.0);
                Self {
                    a0: 1.0 + alpha * amp,
                    a1: -2.0 * cs,
                    a2: 1.0 - alpha * amp,
                    b0: 1.0 + alpha / amp,
                    b1: -2.0 * cs,
                    b2: 1.0 - alpha / amp,
                }
            }
            FilterType::AllPass => Self {
                a0: 1.0 - alpha,
                a1: -2.0 * cs,
                a2: 1.0 + alpha,
                b0: 1.0 + alpha,
                b1: -2.0 * cs,
                b2: 1.0 - alpha,
            },
        }
    }

    /// Divide everything by `b0`
    pub fn normalize(&self) -> BiquadCoefficients {
        BiquadCoefficients {
            a0: self.a0 / self.b0,
            a1: self.a1 / self.b0,
            a2: self.a2 / self.b0,
            b1: self.b1 / self.b0,
            b2: self.b2 / self.b0,
        }
    }
}

/// A biquad band applied identically to every channel of a frame
#[derive(Debug, Clone)]
pub struct BandFilter {
    filter_type: FilterType,
    /// One stage per channel; empty until `init`
    stages: Vec<BiquadStage>,
    coeffs: BiquadCoefficients,
    sample_rate: f32,
    frequency: f32,
    bandwidth: f32,
    gain_db: f32,
    enabled: bool,
}

impl Default for BandFilter {
    fn default() -> Self {
        Self {
            filter_type: FilterType::Lowpass,
            stages: Vec::new(),
            coeffs: BiquadCoefficients::IDENTITY,
            sample_rate: 0.0,
            frequency: 0.0,
            bandwidth: 0.0,
            gain_db: 0.0,
            enabled: true,
        }
    }
}

impl BandFilter {
    /// Create an initialized filter at 20 kHz, 2 octaves, 0 dB
    pub fn new(sample_rate_hz: f32, channel_count: usize, filter_type: FilterType) -> Self {
        let mut filter = Self::default();
        filter.init(
            sample_rate_hz,
            channel_count,
            filter_type,
            DEFAULT_FREQUENCY_HZ,
            DEFAULT_BANDWIDTH_OCTAVES,
            0.0,
        );
        filter
    }

    /// (Re)initialize the filter. Clears all channel state.
    pub fn init(
        &mut self,
        sample_rate_hz: f32,
        channel_count: usize,
        filter_type: FilterType,
        frequency_hz: f32,
        bandwidth_octaves: f32,
        gain_db: f32,
    ) {
        self.sample_rate = sample_rate_hz;
        self.filter_type = filter_type;
        self.frequency = frequency_hz.max(MIN_FREQUENCY_HZ);
        self.bandwidth = bandwidth_octaves;
        self.gain_db = gain_db;

        self.stages.clear();
        self.stages.resize_with(channel_count, BiquadStage::new);
        self.reset();
        self.update_coefficients();
    }

    /// Process one frame. Only the first `channel_count` samples are used.
    ///
    /// A disabled filter copies input to output untouched.
    #[inline]
    pub fn process_frame(&mut self, input: &[f32], output: &mut [f32]) {
        if self.enabled {
            for ((stage, &x), y) in self.stages.iter_mut().zip(input).zip(output.iter_mut()) {
                *y = stage.process(x);
            }
        } else {
            for (y, &x) in output.iter_mut().zip(input).take(self.stages.len()) {
                *y = x;
            }
        }
    }

    /// Clear the delay line of every channel
    pub fn reset(&mut self) {
        for stage in &mut self.stages {
            stage.reset();
        }
    }

    /// Set all parameters at once; recomputes only if something relevant changed
    pub fn set_params(
        &mut self,
        filter_type: FilterType,
        frequency_hz: f32,
        bandwidth_octaves: f32,
        gain_db: f32,
    ) {
        if !self.is_initialized() {
            return;
        }

        let frequency = frequency_hz.max(MIN_FREQUENCY_HZ);
        let changed = filter_type != self.filter_type
            || frequency != self.frequency
            || bandwidth_octaves != self.bandwidth
            || (filter_type.uses_gain() && gain_db != self.gain_db);

        self.filter_type = filter_type;
        self.frequency = frequency;
        self.bandwidth = bandwidth_octaves;
        self.gain_db = gain_db;

        if changed {
            self.update_coefficients();
        }
    }

    pub fn set_type(&mut self, filter_type: FilterType) {
        if !self.is_initialized() || self.filter_type == filter_type {
            return;
        }
        self.filter_type = filter_type;
        self.update_coefficients();
    }

    /// Set the frequency. Unlike `init`, only negative values are clamped.
    pub fn set_frequency(&mut self, frequency_hz: f32) {
        let frequency = frequency_hz.max(MIN_SET_FREQUENCY_HZ);
        if !self.is_initialized() || self.frequency == frequency {
            return;
        }
        self.frequency = frequency;
        self.update_coefficients();
    }

    pub fn set_bandwidth(&mut self, bandwidth_octaves: f32) {
        if !self.is_initialized() || self.bandwidth == bandwidth_octaves {
            return;
        }
        self.bandwidth = bandwidth_octaves;
        self.update_coefficients();
    }

    /// Store the gain; coefficients only change for gain-sensitive shapes
    pub fn set_gain_db(&mut self, gain_db: f32) {
        if !self.is_initialized() || self.gain_db == gain_db {
            return;
        }
        self.gain_db = gain_db;
        if self.filter_type.uses_gain() {
            self.update_coefficients();
        }
    }

    /// Enable or bypass the filter
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_initialized(&self) -> bool {
        !self.stages.is_empty()
    }

    pub fn filter_type(&self) -> FilterType {
        self.filter_type
    }

    pub fn frequency_hz(&self) -> f32 {
        self.frequency
    }

    pub fn bandwidth_octaves(&self) -> f32 {
        self.bandwidth
    }

    pub fn gain_db(&self) -> f32 {
        self.gain_db
    }

    pub fn sample_rate_hz(&self) -> f32 {
        self.sample_rate
    }

    pub fn channel_count(&self) -> usize {
        self.stages.len()
    }

    /// Coefficients currently shared by every channel
    pub fn coefficients(&self) -> BiquadCoefficients {
        self.coeffs
    }

    /// Whether every channel's delay line is cleared
    pub fn is_quiescent(&self) -> bool {
        self.stages.iter().all(BiquadStage::is_quiescent)
    }

    fn update_coefficients(&mut self) {
        self.coeffs = RawCoefficients::design(
            self.filter_type,
            self.sample_rate,
            self.frequency,
            self.bandwidth,
            self.gain_db,
        )
        .normalize();

        for stage in &mut self.stages {
            stage.set_coefficients(self.coeffs);
        }
    }
}
