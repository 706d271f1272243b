//! Sample-to-phrase conversion.
//!
//! Pure functions that turn an absolute sample position into beats and then
//! into a phrase index. Two positions are in the same phrase iff their phrase
//! indices are equal. A boundary was crossed between `a <= b` iff
//! `phrase_index(a) < phrase_index(b)`.
//!
//! Phrase positions are biased by [`PHRASE_EPSILON`] (in phrase units) before
//! flooring so that a position landing exactly on a boundary, or a hair before
//! it because of floating-point error, belongs to the new phrase. The bias is
//! applied in exactly one place, [`beats_to_phrase_position`], so every
//! comparison sees the same tie-break.
//!
//! Because the bias is a fraction of a phrase, the window it covers in samples
//! grows with phrase length and shrinks with tempo. At 120 BPM, 48 kHz and
//! 4-beat phrases it is 96 samples.

use crate::types::SamplePosition;

/// Tie-break bias added to every fractional phrase position.
pub const PHRASE_EPSILON: f64 = 0.001;

/// Convert an absolute sample position to beats.
///
/// `beats = position / ((60 / tempo_bpm) * sample_rate)`
///
/// Returns `None` when tempo or sample rate is not a positive finite number;
/// callers treat that as "no musical position".
#[inline]
pub fn samples_to_beats(
    sample_position: SamplePosition,
    tempo_bpm: f64,
    sample_rate: f64,
) -> Option<f64> {
    samples_per_beat(tempo_bpm, sample_rate).map(|spb| sample_position as f64 / spb)
}

/// True if `tempo_bpm` can be used for beat conversion.
#[inline]
pub fn is_valid_tempo(tempo_bpm: f64) -> bool {
    tempo_bpm.is_finite() && tempo_bpm > 0.0
}

fn samples_per_beat(tempo_bpm: f64, sample_rate: f64) -> Option<f64> {
    if !is_valid_tempo(tempo_bpm) || !(sample_rate.is_finite() && sample_rate > 0.0) {
        return None;
    }
    Some((60.0 / tempo_bpm) * sample_rate)
}

/// Convert beats to a fractional phrase position, including the tie-break bias.
///
/// `phrase_length_beats` of zero is treated as one; configuration already
/// keeps it in 4-16.
#[inline]
pub fn beats_to_phrase_position(beats: f64, phrase_length_beats: u32) -> f64 {
    beats / f64::from(phrase_length_beats.max(1)) + PHRASE_EPSILON
}

/// Floor a fractional phrase position to its phrase index.
#[inline]
pub fn phrase_index(phrase_position: f64) -> i64 {
    phrase_position.floor() as i64
}

/// Phrase index of an absolute sample position.
///
/// Shorthand for the three steps above. `None` under the same conditions as
/// [`samples_to_beats`].
#[inline]
pub fn phrase_index_at(
    sample_position: SamplePosition,
    tempo_bpm: f64,
    sample_rate: f64,
    phrase_length_beats: u32,
) -> Option<i64> {
    samples_to_beats(sample_position, tempo_bpm, sample_rate)
        .map(|beats| phrase_index(beats_to_phrase_position(beats, phrase_length_beats)))
}

/// Phrase clock frozen for one processing cycle.
///
/// Captures tempo, sample rate and phrase length once so that every position
/// examined during the cycle is measured against the same values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeatClock {
    samples_per_beat: f64,
    phrase_length_beats: u32,
}

impl BeatClock {
    /// Build a clock, or `None` if tempo or sample rate is unusable.
    pub fn new(tempo_bpm: f64, sample_rate: f64, phrase_length_beats: u32) -> Option<Self> {
        Some(Self {
            samples_per_beat: samples_per_beat(tempo_bpm, sample_rate)?,
            phrase_length_beats,
        })
    }

    /// Samples in one beat.
    #[inline]
    pub fn samples_per_beat(&self) -> f64 {
        self.samples_per_beat
    }

    /// Phrase length in beats.
    #[inline]
    pub fn phrase_length_beats(&self) -> u32 {
        self.phrase_length_beats
    }

    /// Beats at an absolute sample position.
    #[inline]
    pub fn beats(&self, sample_position: SamplePosition) -> f64 {
        sample_position as f64 / self.samples_per_beat
    }

    /// Phrase index at an absolute sample position.
    #[inline]
    pub fn phrase_index(&self, sample_position: SamplePosition) -> i64 {
        phrase_index(beats_to_phrase_position(
            self.beats(sample_position),
            self.phrase_length_beats,
        ))
    }

    /// True if a phrase boundary lies in `(from, to]` (after the bias).
    #[inline]
    pub fn crosses_boundary(&self, from: SamplePosition, to: SamplePosition) -> bool {
        self.phrase_index(from) < self.phrase_index(to)
    }
}
