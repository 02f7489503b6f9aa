//! Error handling for the equalizer
//!
//! The processing core never fails. Errors only surface from construction
//! and from the cross-thread control surface.

use thiserror::Error;

/// Result type alias for equalizer operations
pub type Result<T> = std::result::Result<T, EqError>;

/// Main error type for equalizer operations
#[derive(Error, Debug)]
pub enum EqError {
    // Construction Errors
    #[error("Too many channels: {requested} (maximum {max})")]
    TooManyChannels { requested: usize, max: usize },

    // Addressing Errors
    #[error("Band index {index} out of range (equalizer has {band_count} bands)")]
    BandOutOfRange { index: usize, band_count: usize },

    #[error("Band count mismatch: equalizer has {expected} bands, settings carry {actual}")]
    BandCountMismatch { expected: usize, actual: usize },

    // Control Handoff Errors
    #[error("Command queue full: processor is not draining commands")]
    QueueFull,

    #[error("Processor disconnected")]
    Disconnected,

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl EqError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            EqError::TooManyChannels { .. } => "TOO_MANY_CHANNELS",
            EqError::BandOutOfRange { .. } => "BAND_OUT_OF_RANGE",
            EqError::BandCountMismatch { .. } => "BAND_COUNT_MISMATCH",
            EqError::QueueFull => "QUEUE_FULL",
            EqError::Disconnected => "DISCONNECTED",
            EqError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if retrying the same call later can succeed
    pub fn is_recoverable(&self) -> bool {
        matches!(self, EqError::QueueFull)
    }
}
