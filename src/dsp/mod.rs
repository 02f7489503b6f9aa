//! DSP building blocks
//!
//! Leaf to root: a single biquad section, a multichannel band built from
//! one section per channel, and the equalizer that cascades bands.

mod biquad;
pub mod control;
mod eq;
mod filter;
mod settings;

pub use biquad::{underflow_clamp, BiquadCoefficients, BiquadStage};
pub use control::{split, split_default, BandCommand, EqualizerController, EqualizerProcessor};
pub use eq::{
    Equalizer, DEFAULT_BAND_BANDWIDTH_OCTAVES, DEFAULT_BAND_FREQUENCY_HZ, DEFAULT_BAND_GAIN_DB,
    DEFAULT_BAND_TYPE, MAX_CHANNELS,
};
pub use filter::{
    BandFilter, FilterType, RawCoefficients, DEFAULT_BANDWIDTH_OCTAVES, DEFAULT_FREQUENCY_HZ,
    MIN_FREQUENCY_HZ, MIN_SET_FREQUENCY_HZ,
};
pub use settings::{BandSettings, EqualizerSettings};
