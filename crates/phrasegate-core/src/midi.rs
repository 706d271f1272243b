//! MIDI event types for the phrase gate.
//!
//! Events carry a sample-accurate `sample_offset` relative to the start of the
//! current processing cycle. Channels use the wire encoding (0-15); user-facing
//! channel numbers (1-16) are obtained with [`channel_number`].

// =============================================================================
// Basic MIDI Types
// =============================================================================

/// MIDI channel as encoded on the wire (0-15).
pub type MidiChannel = u8;

/// MIDI note number (0-127, where 60 = middle C).
pub type MidiNote = u8;

/// Unique identifier for tracking note on/off pairs.
/// Use -1 when note ID is not available.
pub type NoteId = i32;

/// Number of MIDI channels.
pub const MIDI_CHANNEL_COUNT: u8 = 16;

/// Convert a wire channel (0-15) to a channel number (1-16).
///
/// A malformed wire channel above 15 yields a number above 16, which no
/// channel selection can match.
#[inline]
pub const fn channel_number(channel: MidiChannel) -> u8 {
    channel.saturating_add(1)
}

/// Convert a channel number (1-16) to a wire channel (0-15).
///
/// Returns `None` for numbers outside 1-16.
#[inline]
pub const fn wire_channel(number: u8) -> Option<MidiChannel> {
    if number >= 1 && number <= MIDI_CHANNEL_COUNT {
        Some(number - 1)
    } else {
        None
    }
}

/// A MIDI note-on event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteOn {
    /// MIDI channel (0-15).
    pub channel: MidiChannel,
    /// Note number (0-127).
    pub pitch: MidiNote,
    /// Velocity (0.0 to 1.0, where 0.0 is silent).
    pub velocity: f32,
    /// Unique note ID for tracking this note instance.
    pub note_id: NoteId,
}

/// A MIDI note-off event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteOff {
    /// MIDI channel (0-15).
    pub channel: MidiChannel,
    /// Note number (0-127).
    pub pitch: MidiNote,
    /// Release velocity (0.0 to 1.0).
    pub velocity: f32,
    /// Unique note ID matching the original note-on.
    pub note_id: NoteId,
}

/// Polyphonic key pressure (aftertouch per note).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolyPressure {
    /// MIDI channel (0-15).
    pub channel: MidiChannel,
    /// Note number (0-127).
    pub pitch: MidiNote,
    /// Pressure amount (0.0 to 1.0).
    pub pressure: f32,
}

/// Control Change (CC) message.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlChange {
    /// MIDI channel (0-15).
    pub channel: MidiChannel,
    /// Controller number (0-127).
    pub controller: u8,
    /// Controller value (0.0 to 1.0, normalized from 0-127).
    pub value: f32,
}

/// Pitch bend message.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchBend {
    /// MIDI channel (0-15).
    pub channel: MidiChannel,
    /// Pitch bend value (-1.0 to 1.0, where 0.0 is center).
    pub value: f32,
}

/// Channel pressure (channel aftertouch).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelPressure {
    /// MIDI channel (0-15).
    pub channel: MidiChannel,
    /// Pressure amount (0.0 to 1.0).
    pub pressure: f32,
}

/// Program change message.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgramChange {
    /// MIDI channel (0-15).
    pub channel: MidiChannel,
    /// Program number (0-127).
    pub program: u8,
}

// =============================================================================
// MIDI Event Enum
// =============================================================================

/// MIDI event types.
///
/// All variants are plain data, so events are `Copy` and can be moved between
/// buffers on the audio thread without allocating.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MidiEventKind {
    /// Note on event.
    NoteOn(NoteOn),
    /// Note off event.
    NoteOff(NoteOff),
    /// Polyphonic key pressure (per-note aftertouch).
    PolyPressure(PolyPressure),
    /// Control change (CC).
    ControlChange(ControlChange),
    /// Pitch bend.
    PitchBend(PitchBend),
    /// Channel pressure (channel aftertouch).
    ChannelPressure(ChannelPressure),
    /// Program change.
    ProgramChange(ProgramChange),
}

impl MidiEventKind {
    /// Wire channel (0-15) of the event.
    #[inline]
    pub fn channel(&self) -> MidiChannel {
        match self {
            Self::NoteOn(e) => e.channel,
            Self::NoteOff(e) => e.channel,
            Self::PolyPressure(e) => e.channel,
            Self::ControlChange(e) => e.channel,
            Self::PitchBend(e) => e.channel,
            Self::ChannelPressure(e) => e.channel,
            Self::ProgramChange(e) => e.channel,
        }
    }

    /// Channel number (1-16) of the event.
    #[inline]
    pub fn channel_number(&self) -> u8 {
        channel_number(self.channel())
    }

    /// True for a sounding note-on.
    ///
    /// A note-on with zero velocity is a note-off in running-status MIDI and
    /// does not count.
    #[inline]
    pub fn is_note_on(&self) -> bool {
        matches!(self, Self::NoteOn(note_on) if note_on.velocity > 0.0)
    }
}

/// A sample-accurate MIDI event.
///
/// The `sample_offset` field specifies when within the current cycle this
/// event occurs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MidiEvent {
    /// Sample offset within the current cycle (0 = start of cycle).
    pub sample_offset: u32,
    /// The MIDI event data.
    pub event: MidiEventKind,
}

impl Default for MidiEvent {
    /// A silent note-off on channel 0, used for buffer initialization.
    fn default() -> Self {
        Self::note_off(0, 0, 0, 0.0)
    }
}

impl MidiEvent {
    /// Create a note-on event.
    pub const fn note_on(sample_offset: u32, channel: MidiChannel, pitch: MidiNote, velocity: f32) -> Self {
        Self {
            sample_offset,
            event: MidiEventKind::NoteOn(NoteOn {
                channel,
                pitch,
                velocity,
                note_id: -1,
            }),
        }
    }

    /// Create a note-off event.
    pub const fn note_off(sample_offset: u32, channel: MidiChannel, pitch: MidiNote, velocity: f32) -> Self {
        Self {
            sample_offset,
            event: MidiEventKind::NoteOff(NoteOff {
                channel,
                pitch,
                velocity,
                note_id: -1,
            }),
        }
    }

    /// Create a control change event.
    pub const fn control_change(sample_offset: u32, channel: MidiChannel, controller: u8, value: f32) -> Self {
        Self {
            sample_offset,
            event: MidiEventKind::ControlChange(ControlChange {
                channel,
                controller,
                value,
            }),
        }
    }

    /// Create a pitch bend event.
    pub const fn pitch_bend(sample_offset: u32, channel: MidiChannel, value: f32) -> Self {
        Self {
            sample_offset,
            event: MidiEventKind::PitchBend(PitchBend { channel, value }),
        }
    }

    /// Create a program change event.
    pub const fn program_change(sample_offset: u32, channel: MidiChannel, program: u8) -> Self {
        Self {
            sample_offset,
            event: MidiEventKind::ProgramChange(ProgramChange { channel, program }),
        }
    }

    /// See [`MidiEventKind::is_note_on`].
    #[inline]
    pub fn is_note_on(&self) -> bool {
        self.event.is_note_on()
    }

    /// See [`MidiEventKind::channel_number`].
    #[inline]
    pub fn channel_number(&self) -> u8 {
        self.event.channel_number()
    }
}

// =============================================================================
// MidiBuffer
// =============================================================================

/// Maximum number of MIDI events per cycle.
pub const MAX_MIDI_EVENTS: usize = 1024;

/// A buffer for collecting MIDI events during processing.
///
/// Uses a fixed-size array to avoid heap allocation on the audio thread.
/// Events should be added in chronological order (by sample_offset).
#[derive(Debug)]
pub struct MidiBuffer {
    events: [MidiEvent; MAX_MIDI_EVENTS],
    len: usize,
    /// Set when a push fails due to buffer exhaustion
    overflowed: bool,
}

impl MidiBuffer {
    /// Create a new empty MIDI buffer.
    pub fn new() -> Self {
        Self {
            events: [MidiEvent::default(); MAX_MIDI_EVENTS],
            len: 0,
            overflowed: false,
        }
    }

    /// Clear all events from the buffer.
    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
        self.overflowed = false;
    }

    /// Returns the number of events in the buffer.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns true if any push failed since the last clear.
    #[inline]
    pub fn has_overflowed(&self) -> bool {
        self.overflowed
    }

    /// Push an event to the buffer.
    ///
    /// Returns `true` if the event was added, `false` if the buffer is full.
    #[inline]
    pub fn push(&mut self, event: MidiEvent) -> bool {
        if self.len < MAX_MIDI_EVENTS {
            self.events[self.len] = event;
            self.len += 1;
            true
        } else {
            self.overflowed = true;
            false
        }
    }

    /// Iterate over events in the buffer.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &MidiEvent> {
        self.events[..self.len].iter()
    }

    /// Get the events as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[MidiEvent] {
        &self.events[..self.len]
    }
}

impl Default for MidiBuffer {
    fn default() -> Self {
        Self::new()
    }
}
