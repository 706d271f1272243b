//! Error types for the phrase gate.
//!
//! Errors only exist on the control side (building a [`GateConfig`](crate::GateConfig),
//! preparing a plugin). The per-cycle gate is total and has no error path.

use std::fmt;

/// Errors that can occur while configuring or preparing the gate.
#[derive(Debug, Clone, PartialEq)]
pub enum PluginError {
    /// MIDI channel number outside 1-16.
    InvalidChannel(i64),
    /// Phrase length outside the supported beat range.
    InvalidPhraseLength(i64),
    /// Sample rate that is zero, negative, or not finite.
    InvalidSampleRate(f64),
}

impl fmt::Display for PluginError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidChannel(channel) => {
                write!(f, "Invalid MIDI channel {} (expected 1-16)", channel)
            }
            Self::InvalidPhraseLength(beats) => write!(
                f,
                "Invalid phrase length {} beats (expected {}-{})",
                beats,
                crate::gate::MIN_PHRASE_BEATS,
                crate::gate::MAX_PHRASE_BEATS
            ),
            Self::InvalidSampleRate(rate) => write!(f, "Invalid sample rate: {} Hz", rate),
        }
    }
}

impl std::error::Error for PluginError {}

/// Result type for phrase gate operations.
pub type PluginResult<T> = Result<T, PluginError>;
