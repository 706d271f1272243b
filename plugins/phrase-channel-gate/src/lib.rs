//! Phrase Channel Gate - a MIDI effect that switches parts on the downbeat.
//!
//! Feed the plugin a multi-channel MIDI stream (one part per channel) and it
//! lets note-ons from a single channel through. Picking another channel while
//! the transport runs arms the switch; the new part enters on the next phrase
//! boundary instead of mid-phrase. While stopped, the switch is immediate.
//!
//! # Parameters
//!
//! | Id            | Name             | Range | Default |
//! |---------------|------------------|-------|---------|
//! | `channel`     | Channel          | 1-16  | 1       |
//! | `phraseBeats` | Beats per phrase | 4-16  | 8       |
//!
//! Note-offs, controllers, pitch bend, pressure and program changes pass on
//! every channel so that held notes are always released.

use log::debug;
use phrasegate::prelude::*;
use phrasegate::core::{
    DEFAULT_CHANNEL, DEFAULT_PHRASE_BEATS, MAX_CHANNEL, MAX_PHRASE_BEATS, MIN_CHANNEL, MIN_PHRASE_BEATS,
};

// =============================================================================
// Plugin Configuration
// =============================================================================

/// Plugin metadata handed to format adapters.
pub static CONFIG: PluginConfig = PluginConfig::midi_effect("PhraseChannelGate")
    .with_vendor("phrasegate")
    .with_version(env!("CARGO_PKG_VERSION"));

// =============================================================================
// Parameters
// =============================================================================

/// Host-automatable gate settings.
#[derive(Parameters)]
pub struct GateParameters {
    /// Channel whose note-ons pass once the next phrase starts.
    #[parameter(id = "channel")]
    pub channel: IntParameter,

    /// Phrase length in beats.
    #[parameter(id = "phraseBeats")]
    pub phrase_beats: IntParameter,
}

impl Default for GateParameters {
    fn default() -> Self {
        let mut parameters = Self {
            channel: IntParameter::new(
                "Channel",
                i64::from(DEFAULT_CHANNEL),
                i64::from(MIN_CHANNEL)..=i64::from(MAX_CHANNEL),
            ),
            phrase_beats: IntParameter::new(
                "Beats per phrase",
                i64::from(DEFAULT_PHRASE_BEATS),
                i64::from(MIN_PHRASE_BEATS)..=i64::from(MAX_PHRASE_BEATS),
            )
            .with_units("beats"),
        };
        parameters.assign_ids();
        parameters
    }
}

impl GateParameters {
    /// Snapshot both settings for one cycle.
    ///
    /// Each atomic is read exactly once so the whole cycle sees one
    /// consistent pair even while the host is writing.
    pub fn config(&self) -> GateConfig {
        GateConfig::clamped(self.channel.get(), self.phrase_beats.get())
    }
}

// =============================================================================
// Plugin (Unprepared State)
// =============================================================================

/// The gate before the host has announced a sample rate.
#[derive(Default, HasParameters)]
pub struct PhraseGatePlugin {
    #[parameters]
    parameters: GateParameters,
}

impl Plugin for PhraseGatePlugin {
    type Processor = PhraseGateProcessor;

    fn prepare(self, setup: AudioSetup) -> PluginResult<PhraseGateProcessor> {
        setup.validate()?;

        let mut gate = PhraseChannelGate::new();
        gate.reset(self.parameters.config());
        debug!(
            "{} prepared at {} Hz (channel {}, {} beats per phrase)",
            CONFIG.name,
            setup.sample_rate,
            self.parameters.channel.get(),
            self.parameters.phrase_beats.get()
        );

        Ok(PhraseGateProcessor {
            parameters: self.parameters,
            gate,
            setup,
        })
    }
}

// =============================================================================
// Processor (Prepared State)
// =============================================================================

/// The gate while the host is running it.
#[derive(HasParameters)]
pub struct PhraseGateProcessor {
    #[parameters]
    parameters: GateParameters,
    gate: PhraseChannelGate,
    setup: AudioSetup,
}

impl PhraseGateProcessor {
    /// The underlying gate, for inspection.
    pub fn gate(&self) -> &PhraseChannelGate {
        &self.gate
    }

    /// The setup this processor was prepared with.
    pub fn setup(&self) -> &AudioSetup {
        &self.setup
    }
}

impl MidiProcessor for PhraseGateProcessor {
    type Plugin = PhraseGatePlugin;

    fn unprepare(self) -> PhraseGatePlugin {
        PhraseGatePlugin {
            parameters: self.parameters,
        }
    }

    fn process_midi(&mut self, input: &[MidiEvent], output: &mut MidiBuffer, context: &ProcessContext) {
        let config = self.parameters.config();
        self.gate.process_cycle(context, config, input, output);
    }

    fn set_active(&mut self, active: bool) {
        // A fresh activation starts from the current selection
        self.gate.reset(self.parameters.config());
        debug!("{} {}", CONFIG.name, if active { "activated" } else { "deactivated" });
    }
}
