//! Cross-thread parameter control
//!
//! The equalizer itself is not synchronized. To change parameters from a
//! control thread while an audio thread is processing, split it into an
//! [`EqualizerController`] and an [`EqualizerProcessor`]. The controller
//! queues [`BandCommand`]s on a bounded lock-free channel; the processor
//! applies them on the audio thread before each frame, so every mutation of
//! the filters happens on the thread that runs them.
//!
//! Neither side blocks. A full queue is reported to the controller rather
//! than stalling it, and the processor only drains what is already queued.

use super::eq::Equalizer;
use super::filter::FilterType;
use crate::error::{EqError, Result};
use crossbeam::channel::{bounded, Receiver, Sender, TrySendError};
use tracing::warn;

/// Queue length used by [`split_default`]
pub const DEFAULT_COMMAND_CAPACITY: usize = 256;

/// A parameter change addressed to one band
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BandCommand {
    SetEnabled {
        band: usize,
        enabled: bool,
    },
    SetParams {
        band: usize,
        filter_type: FilterType,
        frequency_hz: f32,
        bandwidth_octaves: f32,
        gain_db: f32,
    },
    SetType {
        band: usize,
        filter_type: FilterType,
    },
    SetFrequency {
        band: usize,
        frequency_hz: f32,
    },
    SetBandwidth {
        band: usize,
        bandwidth_octaves: f32,
    },
    SetGainDb {
        band: usize,
        gain_db: f32,
    },
}

impl BandCommand {
    /// Index of the band this command targets
    pub fn band(&self) -> usize {
        match *self {
            BandCommand::SetEnabled { band, .. }
            | BandCommand::SetParams { band, .. }
            | BandCommand::SetType { band, .. }
            | BandCommand::SetFrequency { band, .. }
            | BandCommand::SetBandwidth { band, .. }
            | BandCommand::SetGainDb { band, .. } => band,
        }
    }

    /// Apply the command through the equalizer's index-addressed setters
    pub fn apply(self, eq: &mut Equalizer) {
        match self {
            BandCommand::SetEnabled { band, enabled } => eq.set_band_enabled(band, enabled),
            BandCommand::SetParams {
                band,
                filter_type,
                frequency_hz,
                bandwidth_octaves,
                gain_db,
            } => eq.set_band_params(band, frequency_hz, bandwidth_octaves, gain_db, filter_type),
            BandCommand::SetType { band, filter_type } => eq.set_band_type(band, filter_type),
            BandCommand::SetFrequency { band, frequency_hz } => {
                eq.set_band_frequency(band, frequency_hz)
            }
            BandCommand::SetBandwidth {
                band,
                bandwidth_octaves,
            } => eq.set_band_bandwidth(band, bandwidth_octaves),
            BandCommand::SetGainDb { band, gain_db } => eq.set_band_gain_db(band, gain_db),
        }
    }
}

/// Split an equalizer into its control and audio halves
///
/// `capacity` is the number of commands that can be pending at once
/// (at least 1).
pub fn split(equalizer: Equalizer, capacity: usize) -> (EqualizerController, EqualizerProcessor) {
    let capacity = capacity.max(1);
    let (tx, rx) = bounded(capacity);
    let controller = EqualizerController {
        tx,
        band_count: equalizer.band_count(),
    };
    let processor = EqualizerProcessor {
        equalizer,
        rx,
        capacity,
    };
    (controller, processor)
}

/// [`split`] with [`DEFAULT_COMMAND_CAPACITY`]
pub fn split_default(equalizer: Equalizer) -> (EqualizerController, EqualizerProcessor) {
    split(equalizer, DEFAULT_COMMAND_CAPACITY)
}

/// Control-thread handle. Cheap to clone.
#[derive(Debug, Clone)]
pub struct EqualizerController {
    tx: Sender<BandCommand>,
    band_count: usize,
}

impl EqualizerController {
    pub fn band_count(&self) -> usize {
        self.band_count
    }

    pub fn set_band_enabled(&self, band: usize, enabled: bool) -> Result<()> {
        self.send(BandCommand::SetEnabled { band, enabled })
    }

    pub fn set_band_params(
        &self,
        band: usize,
        frequency_hz: f32,
        bandwidth_octaves: f32,
        gain_db: f32,
        filter_type: FilterType,
    ) -> Result<()> {
        self.send(BandCommand::SetParams {
            band,
            filter_type,
            frequency_hz,
            bandwidth_octaves,
            gain_db,
        })
    }

    pub fn set_band_type(&self, band: usize, filter_type: FilterType) -> Result<()> {
        self.send(BandCommand::SetType { band, filter_type })
    }

    pub fn set_band_frequency(&self, band: usize, frequency_hz: f32) -> Result<()> {
        self.send(BandCommand::SetFrequency { band, frequency_hz })
    }

    pub fn set_band_bandwidth(&self, band: usize, bandwidth_octaves: f32) -> Result<()> {
        self.send(BandCommand::SetBandwidth {
            band,
            bandwidth_octaves,
        })
    }

    pub fn set_band_gain_db(&self, band: usize, gain_db: f32) -> Result<()> {
        self.send(BandCommand::SetGainDb { band, gain_db })
    }

    /// Queue a command for the processor
    pub fn send(&self, command: BandCommand) -> Result<()> {
        let band = command.band();
        if band >= self.band_count {
            return Err(EqError::BandOutOfRange {
                index: band,
                band_count: self.band_count,
            });
        }

        match self.tx.try_send(command) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                warn!(band, "equalizer command queue full, dropping update");
                Err(EqError::QueueFull)
            }
            Err(TrySendError::Disconnected(_)) => Err(EqError::Disconnected),
        }
    }
}

/// Audio-thread half. Owns the equalizer.
#[derive(Debug)]
pub struct EqualizerProcessor {
    equalizer: Equalizer,
    rx: Receiver<BandCommand>,
    capacity: usize,
}

impl EqualizerProcessor {
    /// Apply queued commands, then process one frame
    pub fn process_frame(&mut self, input: &[f32], output: &mut [f32]) {
        self.apply_pending();
        self.equalizer.process_frame(input, output);
    }

    /// Apply queued commands, then process interleaved audio in place
    pub fn process_interleaved(&mut self, samples: &mut [f32]) {
        self.apply_pending();
        self.equalizer.process_interleaved(samples);
    }

    /// Apply queued commands, at most one queue's worth per call.
    /// Returns how many were applied.
    pub fn apply_pending(&mut self) -> usize {
        let mut applied = 0;
        for command in self.rx.try_iter().take(self.capacity) {
            command.apply(&mut self.equalizer);
            applied += 1;
        }
        applied
    }

    pub fn reset(&mut self) {
        self.equalizer.reset();
    }

    pub fn equalizer(&self) -> &Equalizer {
        &self.equalizer
    }

    /// Take back the equalizer; commands still queued are dropped
    pub fn into_inner(self) -> Equalizer {
        self.equalizer
    }
}
