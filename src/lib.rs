//! Biquad EQ - Cascaded Parametric Equalizer
//!
//! Multi-band equalizer for multichannel audio built from second-order IIR
//! sections. Audio is processed one frame (one sample per channel) at a time
//! with no allocation on the processing path.
//!
//! # Architecture
//!
//! - [`dsp::BiquadStage`]: one direct-form-I biquad and its delay line
//! - [`dsp::BandFilter`]: one stage per channel sharing coefficients derived
//!   from filter type, frequency, bandwidth and gain
//! - [`dsp::Equalizer`]: a fixed-order cascade of bands
//! - [`dsp::control`]: controller/processor split for changing parameters
//!   from another thread

pub mod dsp;
pub mod error;

pub use dsp::{BandFilter, Equalizer, FilterType};
pub use error::{EqError, Result};
