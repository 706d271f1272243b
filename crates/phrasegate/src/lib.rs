//! # phrasegate
//!
//! Phrase-rotating MIDI channel gate for Rust plugins.
//!
//! A gate passes note-ons from one selected MIDI channel and defers changes
//! of that selection to the next musical phrase boundary, so a performer can
//! pre-select the next part and have it enter exactly on the downbeat.
//!
//! ## Architecture
//!
//! ```text
//! Your Plugin (implements Plugin, holds Parameters)
//!        ↓ prepare(AudioSetup)
//! Your Processor (implements MidiProcessor, owns a PhraseChannelGate)
//!        ↓
//! Host adapter (or OfflineHost in tests and offline rendering)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use phrasegate::prelude::*;
//!
//! #[derive(Parameters)]
//! pub struct GateParameters {
//!     #[parameter(id = "channel")]
//!     pub channel: IntParameter,
//!     #[parameter(id = "phraseBeats")]
//!     pub phrase_beats: IntParameter,
//! }
//!
//! impl MidiProcessor for GateProcessor {
//!     type Plugin = GatePlugin;
//!     fn unprepare(self) -> GatePlugin { /* ... */ }
//!     fn process_midi(&mut self, input: &[MidiEvent], output: &mut MidiBuffer, context: &ProcessContext) {
//!         let config = GateConfig::clamped(self.parameters.channel.get(), self.parameters.phrase_beats.get());
//!         self.gate.process_cycle(context, config, input, output);
//!     }
//! }
//! ```

// Re-export sub-crates
pub use phrasegate_core as core;

// Re-export derive macros when feature is enabled
#[cfg(feature = "derive")]
pub use phrasegate_macros::{HasParameters, Parameters};

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use phrasegate::prelude::*;
/// ```
pub mod prelude {
    pub use phrasegate_core::{
        // Traits
        HasParameters, MidiProcessor, ParameterRef, Parameters, Plugin,
        // Lifecycle
        AudioSetup, OfflineHost, PluginConfig,
        // Gate
        BeatClock, CycleGate, GateConfig, GateState, PhraseChannelGate,
        // Parameter types
        IntParameter, NoParameters, ParameterFlags, ParameterId, ParameterInfo,
        // Error types
        PluginError, PluginResult,
        // MIDI types
        ChannelPressure, ControlChange, MidiBuffer, MidiChannel, MidiEvent, MidiEventKind,
        MidiNote, NoteId, NoteOff, NoteOn, PitchBend, PolyPressure, ProgramChange,
        // Process context and transport
        ProcessContext, SamplePosition, Transport,
    };

    // Derive macros share their trait's name
    #[cfg(feature = "derive")]
    pub use phrasegate_macros::{HasParameters, Parameters};
}
