//! Phrase-rotating MIDI channel gate.
//!
//! The gate lets exactly one MIDI channel's note-ons through at a time. Which
//! channel that is may only change on a phrase boundary: when the user picks a
//! new channel mid-phrase, the old one stays in force until the transport
//! crosses into the next phrase.
//!
//! Every other message (note-off, CC, pitch bend, pressure, program change)
//! always passes regardless of channel, so a note started before a channel
//! switch can still be released.
//!
//! # States
//!
//! - **Stopped** (or no usable transport): the effective channel is the
//!   selected channel, every cycle.
//! - **Playing**: the effective channel is carried over from the previous
//!   cycle and snaps to the selected channel when a phrase boundary is crossed
//!   between two cycle starts. Note-ons that land after a boundary inside the
//!   current cycle are tested against the selected channel directly.
//!
//! # Real-Time Safety
//!
//! [`PhraseChannelGate::process_cycle`] does not allocate, lock, log or fail.

use crate::beat_clock::{is_valid_tempo, BeatClock};
use crate::error::{PluginError, PluginResult};
use crate::midi::{MidiBuffer, MidiEvent, MIDI_CHANNEL_COUNT};
use crate::process_context::ProcessContext;
use crate::types::SamplePosition;

/// Lowest selectable channel number.
pub const MIN_CHANNEL: u8 = 1;
/// Highest selectable channel number.
pub const MAX_CHANNEL: u8 = MIDI_CHANNEL_COUNT;
/// Channel selected on a fresh instance.
pub const DEFAULT_CHANNEL: u8 = 1;

/// Shortest phrase in beats.
pub const MIN_PHRASE_BEATS: u32 = 4;
/// Longest phrase in beats.
pub const MAX_PHRASE_BEATS: u32 = 16;
/// Phrase length on a fresh instance.
pub const DEFAULT_PHRASE_BEATS: u32 = 8;

/// Tempo assumed until the host reports one.
pub const DEFAULT_TEMPO_BPM: f64 = 120.0;

// =============================================================================
// GateConfig
// =============================================================================

/// User-facing gate settings, captured once per cycle.
///
/// Both fields are always in range: the only ways to build one are the
/// validating [`GateConfig::new`] and the saturating [`GateConfig::clamped`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateConfig {
    selected_channel: u8,
    phrase_length_beats: u32,
}

impl GateConfig {
    /// Build a config, rejecting out-of-range values.
    pub fn new(selected_channel: i64, phrase_length_beats: i64) -> PluginResult<Self> {
        if !(i64::from(MIN_CHANNEL)..=i64::from(MAX_CHANNEL)).contains(&selected_channel) {
            return Err(PluginError::InvalidChannel(selected_channel));
        }
        if !(i64::from(MIN_PHRASE_BEATS)..=i64::from(MAX_PHRASE_BEATS)).contains(&phrase_length_beats) {
            return Err(PluginError::InvalidPhraseLength(phrase_length_beats));
        }
        Ok(Self {
            selected_channel: selected_channel as u8,
            phrase_length_beats: phrase_length_beats as u32,
        })
    }

    /// Build a config, clamping each value into range.
    ///
    /// Used on the audio thread where there is nobody to report an error to.
    pub fn clamped(selected_channel: i64, phrase_length_beats: i64) -> Self {
        Self {
            selected_channel: selected_channel.clamp(i64::from(MIN_CHANNEL), i64::from(MAX_CHANNEL)) as u8,
            phrase_length_beats: phrase_length_beats
                .clamp(i64::from(MIN_PHRASE_BEATS), i64::from(MAX_PHRASE_BEATS))
                as u32,
        }
    }

    /// Selected channel number (1-16).
    #[inline]
    pub fn selected_channel(&self) -> u8 {
        self.selected_channel
    }

    /// Phrase length in beats (4-16).
    #[inline]
    pub fn phrase_length_beats(&self) -> u32 {
        self.phrase_length_beats
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            selected_channel: DEFAULT_CHANNEL,
            phrase_length_beats: DEFAULT_PHRASE_BEATS,
        }
    }
}

// =============================================================================
// GateState
// =============================================================================

/// State carried from one cycle to the next.
///
/// Only the gate mutates it. Every constructor keeps the channel in 1-16 and
/// the tempo usable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateState {
    last_cycle_start_samples: SamplePosition,
    current_effective_channel: u8,
    tempo_bpm: f64,
}

impl GateState {
    /// Fresh state with `channel` in force.
    pub fn new(channel: u8) -> Self {
        Self::resume(0, channel, DEFAULT_TEMPO_BPM)
    }

    /// State picked up mid-run, e.g. from a previous session.
    ///
    /// `channel` is clamped into 1-16; an unusable tempo falls back to
    /// [`DEFAULT_TEMPO_BPM`].
    pub fn resume(last_cycle_start_samples: SamplePosition, channel: u8, tempo_bpm: f64) -> Self {
        Self {
            last_cycle_start_samples,
            current_effective_channel: channel.clamp(MIN_CHANNEL, MAX_CHANNEL),
            tempo_bpm: if is_valid_tempo(tempo_bpm) { tempo_bpm } else { DEFAULT_TEMPO_BPM },
        }
    }

    /// Absolute position of the previous cycle's start.
    #[inline]
    pub fn last_cycle_start_samples(&self) -> SamplePosition {
        self.last_cycle_start_samples
    }

    /// Channel number (1-16) in force at the start of the latest cycle.
    #[inline]
    pub fn current_effective_channel(&self) -> u8 {
        self.current_effective_channel
    }

    /// Last usable tempo reported by the host.
    #[inline]
    pub fn tempo_bpm(&self) -> f64 {
        self.tempo_bpm
    }
}

impl Default for GateState {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL)
    }
}

// =============================================================================
// CycleGate
// =============================================================================

/// Per-event decision rule for one cycle, produced by
/// [`PhraseChannelGate::begin_cycle`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleGate {
    cycle_start: SamplePosition,
    effective_channel: u8,
    selected_channel: u8,
    /// `None` while stopped or without a usable tempo.
    clock: Option<BeatClock>,
    cycle_start_phrase: i64,
}

impl CycleGate {
    /// Channel in force at the start of the cycle.
    #[inline]
    pub fn effective_channel(&self) -> u8 {
        self.effective_channel
    }

    /// True if phrase positions are being tracked this cycle.
    #[inline]
    pub fn is_tracking(&self) -> bool {
        self.clock.is_some()
    }

    /// Channel a note-on at `sample_offset` must match.
    #[inline]
    pub fn channel_at(&self, sample_offset: u32) -> u8 {
        match self.clock {
            Some(clock) => {
                let event_time = self.cycle_start + SamplePosition::from(sample_offset);
                if clock.phrase_index(event_time) > self.cycle_start_phrase {
                    self.selected_channel
                } else {
                    self.effective_channel
                }
            }
            None => self.effective_channel,
        }
    }

    /// Whether `event` reaches the output.
    #[inline]
    pub fn should_pass(&self, event: &MidiEvent) -> bool {
        if !event.is_note_on() {
            return true;
        }
        event.channel_number() == self.channel_at(event.sample_offset)
    }
}

// =============================================================================
// PhraseChannelGate
// =============================================================================

/// The phrase-rotating channel gate.
///
/// Owns its [`GateState`]; configuration is passed in fresh every cycle.
#[derive(Debug, Clone, Default)]
pub struct PhraseChannelGate {
    state: GateState,
}

impl PhraseChannelGate {
    /// A gate in its initial state.
    pub fn new() -> Self {
        Self::default()
    }

    /// A gate resuming from `state`.
    pub fn with_state(state: GateState) -> Self {
        Self { state }
    }

    /// Current carried-over state.
    #[inline]
    pub fn state(&self) -> &GateState {
        &self.state
    }

    /// Return to the initial state with `config`'s channel in force.
    pub fn reset(&mut self, config: GateConfig) {
        self.state = GateState::new(config.selected_channel());
    }

    /// Start a cycle: decide the channel in force at the cycle start and
    /// record the cycle start for the next call.
    ///
    /// The returned [`CycleGate`] holds everything needed to judge this
    /// cycle's events; the gate state is already updated for the next cycle.
    pub fn begin_cycle(&mut self, context: &ProcessContext, config: GateConfig) -> CycleGate {
        let transport = context.transport;
        let selected = config.selected_channel();
        let cycle_start = transport.project_time_samples.unwrap_or(0);

        let tempo = transport.tempo.unwrap_or(self.state.tempo_bpm);
        let clock = if transport.is_playing && transport.project_time_samples.is_some() {
            BeatClock::new(tempo, context.sample_rate, config.phrase_length_beats())
        } else {
            None
        };
        if transport.tempo.is_some_and(is_valid_tempo) {
            self.state.tempo_bpm = tempo;
        }

        let effective = match clock {
            Some(clock) if !clock.crosses_boundary(self.state.last_cycle_start_samples, cycle_start) => {
                self.state.current_effective_channel
            }
            _ => selected,
        };

        self.state.current_effective_channel = effective;
        self.state.last_cycle_start_samples = cycle_start;

        CycleGate {
            cycle_start,
            effective_channel: effective,
            selected_channel: selected,
            clock,
            cycle_start_phrase: clock.map_or(0, |clock| clock.phrase_index(cycle_start)),
        }
    }

    /// Filter one cycle of events into `output`.
    ///
    /// Appends the kept events to `output` in input order with their offsets
    /// untouched. If `output` fills up, the remaining events are dropped and
    /// [`MidiBuffer::has_overflowed`] reports it.
    pub fn process_cycle(
        &mut self,
        context: &ProcessContext,
        config: GateConfig,
        input: &[MidiEvent],
        output: &mut MidiBuffer,
    ) {
        let gate = self.begin_cycle(context, config);
        for event in input.iter().filter(|event| gate.should_pass(event)) {
            output.push(*event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::midi::wire_channel;
    use crate::process_context::Transport;

    const SR: f64 = 48000.0;

    fn note_on(offset: u32, channel_number: u8) -> MidiEvent {
        MidiEvent::note_on(offset, wire_channel(channel_number).unwrap(), 60, 0.8)
    }

    fn config(channel: i64, beats: i64) -> GateConfig {
        GateConfig::new(channel, beats).unwrap()
    }

    fn playing(position: SamplePosition) -> ProcessContext {
        ProcessContext::new(SR, 512, Transport::playing(120.0, position))
    }

    fn run(
        gate: &mut PhraseChannelGate,
        context: &ProcessContext,
        config: GateConfig,
        input: &[MidiEvent],
    ) -> Vec<MidiEvent> {
        let mut output = MidiBuffer::new();
        gate.process_cycle(context, config, input, &mut output);
        output.as_slice().to_vec()
    }

    #[test]
    fn config_rejects_out_of_range_values() {
        assert_eq!(GateConfig::new(0, 8), Err(PluginError::InvalidChannel(0)));
        assert_eq!(GateConfig::new(17, 8), Err(PluginError::InvalidChannel(17)));
        assert_eq!(GateConfig::new(1, 0), Err(PluginError::InvalidPhraseLength(0)));
        assert_eq!(GateConfig::new(1, 3), Err(PluginError::InvalidPhraseLength(3)));
        assert_eq!(GateConfig::new(1, 17), Err(PluginError::InvalidPhraseLength(17)));
        assert!(GateConfig::new(16, 16).is_ok());
        assert!(GateConfig::new(1, 4).is_ok());
    }

    #[test]
    fn clamped_config_never_reaches_zero_beats() {
        let config = GateConfig::clamped(-3, 0);
        assert_eq!(config.selected_channel(), 1);
        assert_eq!(config.phrase_length_beats(), MIN_PHRASE_BEATS);
        assert_eq!(GateConfig::clamped(99, 99).phrase_length_beats(), MAX_PHRASE_BEATS);
    }

    #[test]
    fn non_note_on_events_always_pass() {
        let mut gate = PhraseChannelGate::new();
        let input = [
            MidiEvent::note_off(0, 9, 60, 0.0),
            MidiEvent::control_change(3, 4, 64, 1.0),
            MidiEvent::pitch_bend(5, 15, -0.5),
            MidiEvent::program_change(7, 2, 12),
            MidiEvent::note_on(9, 6, 64, 0.0),
        ];
        for context in [playing(10_000), ProcessContext::with_empty_transport(SR, 512)] {
            assert_eq!(run(&mut gate, &context, config(1, 4), &input), input.to_vec());
        }
    }

    #[test]
    fn malformed_wire_channel_never_matches() {
        let mut gate = PhraseChannelGate::new();
        let context = ProcessContext::new(SR, 512, Transport::stopped(120.0, 0));
        // Wire channel 20 would alias channel 5 if the high bits were dropped
        let input = [MidiEvent::note_on(0, 20, 60, 0.8), note_on(1, 5)];

        assert_eq!(run(&mut gate, &context, config(5, 4), &input), vec![note_on(1, 5)]);
    }

    #[test]
    fn stopped_transport_tests_against_selected_channel() {
        let mut gate = PhraseChannelGate::with_state(GateState::new(9));
        let context = ProcessContext::new(SR, 512, Transport::stopped(120.0, 95_000));
        let input = [note_on(0, 3), note_on(1, 9), note_on(2000, 3)];

        let output = run(&mut gate, &context, config(3, 4), &input);

        assert_eq!(output, vec![note_on(0, 3), note_on(2000, 3)]);
        assert_eq!(gate.state().current_effective_channel(), 3);
        assert_eq!(gate.state().last_cycle_start_samples(), 95_000);
    }

    #[test]
    fn missing_transport_behaves_like_stopped() {
        let mut gate = PhraseChannelGate::with_state(GateState::new(7));
        let context = ProcessContext::with_empty_transport(SR, 512);

        let output = run(&mut gate, &context, config(2, 8), &[note_on(0, 7), note_on(4, 2)]);

        assert_eq!(output, vec![note_on(4, 2)]);
        assert_eq!(gate.state().current_effective_channel(), 2);
        assert_eq!(gate.state().last_cycle_start_samples(), 0);
    }

    #[test]
    fn effective_channel_persists_within_a_phrase() {
        let mut gate = PhraseChannelGate::with_state(GateState::resume(10_000, 4, 120.0));

        // The user switched to channel 6, but no boundary has been crossed.
        let output = run(&mut gate, &playing(10_512), config(6, 4), &[note_on(0, 6), note_on(8, 4)]);

        assert_eq!(output, vec![note_on(8, 4)]);
        assert_eq!(gate.state().current_effective_channel(), 4);
        assert_eq!(gate.state().last_cycle_start_samples(), 10_512);
    }

    #[test]
    fn boundary_between_cycles_snaps_to_selected() {
        // 100 BPM at 44.1 kHz: 26460 samples per beat, 211680 per 8-beat phrase.
        let mut gate = PhraseChannelGate::with_state(GateState::resume(211_000, 2, 100.0));
        let context = ProcessContext::new(44100.0, 512, Transport::playing(100.0, 211_680));

        let cycle = gate.begin_cycle(&context, config(5, 8));

        assert_eq!(cycle.effective_channel(), 5);
        assert_eq!(gate.state().current_effective_channel(), 5);
    }

    #[test]
    fn interior_boundary_uses_selected_channel() {
        // 96000 samples per 4-beat phrase; the boundary (with bias) is at 95904.
        let mut gate = PhraseChannelGate::with_state(GateState::resume(94_000, 1, 120.0));
        let input = [note_on(0, 1), note_on(100, 3), note_on(1000, 1), note_on(1001, 3)];

        let output = run(&mut gate, &playing(95_000), config(3, 4), &input);

        // Before the boundary channel 1 is in force, after it channel 3.
        assert_eq!(output, vec![note_on(0, 1), note_on(1001, 3)]);
        // State still reflects the cycle start; the next cycle picks up the snap.
        assert_eq!(gate.state().current_effective_channel(), 1);

        let next = gate.begin_cycle(&playing(96_000), config(3, 4));
        assert_eq!(next.effective_channel(), 3);
    }

    #[test]
    fn cycle_starting_inside_bias_window_is_already_new_phrase() {
        // Cycle start 95999 is within 96 samples of the 96000 boundary, so
        // the crossing is seen between cycles rather than inside this one.
        let mut gate = PhraseChannelGate::with_state(GateState::resume(95_487, 1, 120.0));

        let output = run(&mut gate, &playing(95_999), config(3, 4), &[note_on(2, 3), note_on(2, 1)]);

        assert_eq!(output, vec![note_on(2, 3)]);
        assert_eq!(gate.state().current_effective_channel(), 3);
    }

    #[test]
    fn phrase_length_is_read_each_cycle() {
        let mut gate = PhraseChannelGate::with_state(GateState::resume(90_000, 1, 120.0));

        // With 16-beat phrases (384000 samples) 100000 is still phrase 0.
        assert_eq!(gate.begin_cycle(&playing(100_000), config(2, 16)).effective_channel(), 1);
        // With 4-beat phrases the same step crosses into phrase 1.
        gate = PhraseChannelGate::with_state(GateState::resume(90_000, 1, 120.0));
        assert_eq!(gate.begin_cycle(&playing(100_000), config(2, 4)).effective_channel(), 2);
    }

    #[test]
    fn jumping_backwards_does_not_snap() {
        let mut gate = PhraseChannelGate::with_state(GateState::resume(200_000, 4, 120.0));

        let cycle = gate.begin_cycle(&playing(0), config(9, 4));

        assert_eq!(cycle.effective_channel(), 4);
    }

    #[test]
    fn unusable_tempo_disables_tracking() {
        let mut gate = PhraseChannelGate::with_state(GateState::new(4));
        let context = ProcessContext::new(SR, 512, Transport::playing(0.0, 50_000));

        let cycle = gate.begin_cycle(&context, config(6, 4));

        assert!(!cycle.is_tracking());
        assert_eq!(cycle.effective_channel(), 6);
        assert_eq!(gate.state().tempo_bpm(), DEFAULT_TEMPO_BPM);
    }

    #[test]
    fn missing_tempo_falls_back_to_last_known() {
        let mut gate = PhraseChannelGate::new();
        gate.begin_cycle(&ProcessContext::new(SR, 512, Transport::playing(90.0, 0)), config(1, 4));
        assert_eq!(gate.state().tempo_bpm(), 90.0);

        let context = ProcessContext::new(
            SR,
            512,
            Transport {
                tempo: None,
                project_time_samples: Some(512),
                is_playing: true,
            },
        );
        assert!(gate.begin_cycle(&context, config(1, 4)).is_tracking());
        assert_eq!(gate.state().tempo_bpm(), 90.0);
    }

    #[test]
    fn output_preserves_order_and_offsets() {
        let mut gate = PhraseChannelGate::new();
        let input = [
            note_on(0, 1),
            MidiEvent::control_change(1, 0, 1, 0.5),
            note_on(2, 2),
            note_on(2, 1),
            MidiEvent::note_off(300, 1, 60, 0.0),
        ];

        let output = run(&mut gate, &playing(512), config(1, 8), &input);

        assert_eq!(output, vec![input[0], input[1], input[3], input[4]]);
    }

    #[test]
    fn state_keeps_channel_and_tempo_legal() {
        let state = GateState::resume(10_000, 40, f64::NAN);
        assert_eq!(state.current_effective_channel(), MAX_CHANNEL);
        assert_eq!(state.tempo_bpm(), DEFAULT_TEMPO_BPM);
        assert_eq!(GateState::resume(0, 0, 90.0).current_effective_channel(), MIN_CHANNEL);

        // Carried through a playing cycle, channel 16 is what remains in force.
        let mut gate = PhraseChannelGate::with_state(state);
        let input: Vec<_> = (1..=16).map(|channel| note_on(0, channel)).collect();
        let output = run(&mut gate, &playing(10_512), config(3, 4), &input);

        assert_eq!(output, vec![note_on(0, 16)]);
        assert_eq!(gate.state().current_effective_channel(), 16);
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut gate = PhraseChannelGate::with_state(GateState::resume(1234, 9, 133.0));

        gate.reset(config(3, 8));

        assert_eq!(gate.state(), &GateState::new(3));
    }
}
