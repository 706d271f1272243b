//! Transport and process context for the phrase gate.
//!
//! [`Transport`] is the host's snapshot of playback state for one processing
//! cycle. [`ProcessContext`] bundles it with the sample rate and cycle length.

use crate::types::SamplePosition;

// =============================================================================
// Transport Struct
// =============================================================================

/// Host transport snapshot for a single processing cycle.
///
/// Timing fields are `Option<T>` because not every host provides them (and some
/// provide no transport at all). `is_playing` is always valid.
///
/// The gate copies this in once per cycle and never holds on to it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Transport {
    /// Current tempo in BPM (beats per minute).
    pub tempo: Option<f64>,

    /// Project time in samples from the start of the timeline.
    ///
    /// Increments monotonically during playback, may jump on loop or locate.
    pub project_time_samples: Option<SamplePosition>,

    /// True if transport is currently playing.
    pub is_playing: bool,
}

impl Transport {
    /// A playing transport at `position` samples and `tempo` BPM.
    #[inline]
    pub fn playing(tempo: f64, position: SamplePosition) -> Self {
        Self {
            tempo: Some(tempo),
            project_time_samples: Some(position),
            is_playing: true,
        }
    }

    /// A stopped transport parked at `position` samples.
    #[inline]
    pub fn stopped(tempo: f64, position: SamplePosition) -> Self {
        Self {
            tempo: Some(tempo),
            project_time_samples: Some(position),
            is_playing: false,
        }
    }
}

// =============================================================================
// ProcessContext Struct
// =============================================================================

/// Complete processing context for a single cycle.
///
/// `ProcessContext` is `Copy` and valid only within one cycle. Do not store it.
#[derive(Debug, Clone, Copy)]
pub struct ProcessContext {
    /// Current sample rate in Hz. Stable within a cycle.
    pub sample_rate: f64,

    /// Number of samples in this cycle.
    pub num_samples: usize,

    /// Host transport and timing information.
    pub transport: Transport,
}

impl ProcessContext {
    /// Creates a new ProcessContext.
    #[inline]
    pub fn new(sample_rate: f64, num_samples: usize, transport: Transport) -> Self {
        Self {
            sample_rate,
            num_samples,
            transport,
        }
    }

    /// Creates a context with default (empty) transport.
    ///
    /// Used when the host doesn't provide transport information.
    #[inline]
    pub fn with_empty_transport(sample_rate: f64, num_samples: usize) -> Self {
        Self::new(sample_rate, num_samples, Transport::default())
    }
}

impl Default for ProcessContext {
    fn default() -> Self {
        Self::with_empty_transport(44100.0, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_constructors() {
        let playing = Transport::playing(120.0, 512);
        assert!(playing.is_playing);
        assert_eq!(playing.tempo, Some(120.0));
        assert_eq!(playing.project_time_samples, Some(512));

        let stopped = Transport::stopped(90.0, 0);
        assert!(!stopped.is_playing);
        assert_eq!(stopped.project_time_samples, Some(0));
    }

    #[test]
    fn empty_transport_has_no_timing() {
        let context = ProcessContext::with_empty_transport(44100.0, 64);
        assert_eq!(context.transport, Transport::default());
        assert_eq!(context.transport.tempo, None);
        assert_eq!(context.transport.project_time_samples, None);
        assert!(!context.transport.is_playing);
    }
}
