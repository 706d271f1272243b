//! Plugin lifecycle traits.
//!
//! The lifecycle has two phases:
//!
//! - **[`Plugin`]** (unprepared state): holds parameters, created before the
//!   sample rate is known. Turns into a processor via [`Plugin::prepare()`].
//!
//! - **[`MidiProcessor`]** (prepared state): processes one cycle of MIDI at a
//!   time with a valid sample rate. Returns to the unprepared state via
//!   [`MidiProcessor::unprepare()`] when the host changes configuration.
//!
//! A host adapter (VST3, AU, CLAP, or the [`OfflineHost`](crate::host::OfflineHost)
//! used in tests) owns one of the two and delegates to it.

use crate::error::{PluginError, PluginResult};
use crate::midi::{MidiBuffer, MidiEvent};
use crate::parameter_types::Parameters;
use crate::process_context::ProcessContext;

// =============================================================================
// HasParameters Trait (Shared Parameter Access)
// =============================================================================

/// Trait for types that hold parameters.
///
/// Shared between [`Plugin`] and [`MidiProcessor`]. Use
/// `#[derive(HasParameters)]` with a `#[parameters]` field annotation:
///
/// ```ignore
/// #[derive(Default, HasParameters)]
/// pub struct GatePlugin {
///     #[parameters]
///     parameters: GateParameters,
/// }
/// ```
pub trait HasParameters: Send + 'static {
    /// The parameter collection type.
    type Parameters: Parameters;

    /// Returns a reference to the parameters.
    fn parameters(&self) -> &Self::Parameters;

    /// Returns a mutable reference to the parameters.
    fn parameters_mut(&mut self) -> &mut Self::Parameters;
}

// =============================================================================
// AudioSetup
// =============================================================================

/// Audio configuration handed to [`Plugin::prepare()`].
#[derive(Clone, Debug, PartialEq)]
pub struct AudioSetup {
    /// Sample rate in Hz (e.g., 44100.0, 48000.0, 96000.0)
    pub sample_rate: f64,
    /// Maximum number of samples per cycle
    pub max_buffer_size: usize,
}

impl AudioSetup {
    /// Create a setup.
    pub fn new(sample_rate: f64, max_buffer_size: usize) -> Self {
        Self {
            sample_rate,
            max_buffer_size,
        }
    }

    /// Check that the sample rate is positive and finite.
    pub fn validate(&self) -> PluginResult<()> {
        if self.sample_rate.is_finite() && self.sample_rate > 0.0 {
            Ok(())
        } else {
            Err(PluginError::InvalidSampleRate(self.sample_rate))
        }
    }
}

// =============================================================================
// MidiProcessor Trait
// =============================================================================

/// The prepared processor, ready for per-cycle MIDI processing.
///
/// # Thread Safety
///
/// [`process_midi`](Self::process_midi) runs on the audio thread and must be
/// real-time safe: no allocations, no locks, no I/O, no unbounded loops.
pub trait MidiProcessor: HasParameters {
    /// The unprepared plugin type that created this processor.
    type Plugin: Plugin<Processor = Self, Parameters = Self::Parameters>;

    /// Return to the unprepared state, keeping parameters.
    fn unprepare(self) -> Self::Plugin
    where
        Self: Sized;

    /// Process one cycle of MIDI.
    ///
    /// # Arguments
    /// * `input` - Incoming events for this cycle, sorted by `sample_offset`
    /// * `output` - Buffer the kept or produced events are appended to
    /// * `context` - Sample rate and transport for this cycle
    fn process_midi(&mut self, input: &[MidiEvent], output: &mut MidiBuffer, context: &ProcessContext);

    /// Called when processing starts (`true`) or stops (`false`).
    ///
    /// Default does nothing.
    fn set_active(&mut self, _active: bool) {}

    /// Samples of output produced after input stops. Default is 0.
    fn tail_samples(&self) -> u32 {
        0
    }
}

// =============================================================================
// Plugin Trait
// =============================================================================

/// The unprepared plugin - holds parameters before the sample rate is known.
pub trait Plugin: HasParameters + Default {
    /// The prepared processor type created by [`Plugin::prepare()`].
    type Processor: MidiProcessor<Plugin = Self, Parameters = Self::Parameters>;

    /// Transform this plugin into a prepared processor.
    ///
    /// Fails if the setup is unusable (for example a zero sample rate).
    fn prepare(self, setup: AudioSetup) -> PluginResult<Self::Processor>;

    /// Whether the plugin takes MIDI input. Default is `true`.
    fn accepts_midi(&self) -> bool {
        true
    }

    /// Whether the plugin emits MIDI output. Default is `true`.
    fn produces_midi(&self) -> bool {
        true
    }

    /// Whether the plugin is a pure MIDI effect (no audio buses).
    ///
    /// Default is `true`.
    fn is_midi_effect(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audio_setup_rejects_bad_sample_rates() {
        assert!(AudioSetup::new(48000.0, 512).validate().is_ok());
        assert_eq!(
            AudioSetup::new(0.0, 512).validate(),
            Err(PluginError::InvalidSampleRate(0.0))
        );
        assert!(AudioSetup::new(f64::NAN, 512).validate().is_err());
        assert!(AudioSetup::new(-44100.0, 512).validate().is_err());
    }
}
