//! # phrasegate-core
//!
//! Phrase-aware MIDI channel gating and the plugin abstractions around it.
//!
//! The gate passes note-on events from exactly one MIDI channel at a time.
//! The selected channel may change at any moment, but the change only takes
//! effect on the next musical phrase boundary, derived from the host's tempo
//! and playhead. When the transport is stopped the selection applies at once.
//!
//! ## Main Types
//!
//! - [`PhraseChannelGate`] - Per-cycle gating decision and persistent state
//! - [`BeatClock`] - Sample-position to beat and phrase arithmetic
//! - [`Plugin`] / [`MidiProcessor`] - Two-phase plugin lifecycle
//! - [`Parameters`] / [`IntParameter`] - Lock-free parameter storage
//! - [`OfflineHost`] - In-process host for tests and offline rendering
//!
//! ## Types
//!
//! - [`MidiEvent`] - Sample-accurate MIDI event
//! - [`MidiBuffer`] - Fixed-capacity output event buffer
//! - [`Transport`] - Host transport snapshot for one cycle
//! - [`ProcessContext`] - Sample rate, cycle length and transport
//! - [`PluginError`] - Error types

pub mod beat_clock;
pub mod config;
pub mod error;
pub mod gate;
pub mod host;
pub mod midi;
pub mod parameter_info;
pub mod parameter_types;
pub mod plugin;
pub mod process_context;
pub mod types;

// Re-exports for convenience
pub use beat_clock::{
    beats_to_phrase_position, phrase_index, phrase_index_at, samples_to_beats, BeatClock,
    PHRASE_EPSILON,
};
pub use config::PluginConfig;
pub use error::{PluginError, PluginResult};
pub use gate::{
    CycleGate, GateConfig, GateState, PhraseChannelGate, DEFAULT_CHANNEL, DEFAULT_PHRASE_BEATS,
    DEFAULT_TEMPO_BPM, MAX_CHANNEL, MAX_PHRASE_BEATS, MIN_CHANNEL, MIN_PHRASE_BEATS,
};
pub use host::OfflineHost;
pub use midi::{
    channel_number, wire_channel, ChannelPressure, ControlChange, MidiBuffer, MidiChannel,
    MidiEvent, MidiEventKind, MidiNote, NoteId, NoteOff, NoteOn, PitchBend, PolyPressure,
    ProgramChange, MAX_MIDI_EVENTS, MIDI_CHANNEL_COUNT,
};
pub use parameter_info::{ParameterFlags, ParameterInfo};
pub use parameter_types::{IntParameter, NoParameters, ParameterRef, Parameters};
pub use plugin::{AudioSetup, HasParameters, MidiProcessor, Plugin};
pub use process_context::{ProcessContext, Transport};
pub use types::{ParameterId, ParameterValue, SamplePosition};
pub use phrasegate_utils::parameter_id;
