//! In-process host for driving a plugin without a DAW.
//!
//! [`OfflineHost`] plays the role a format wrapper plays inside a real host:
//! it owns the plugin through its two lifecycle phases, builds the
//! [`ProcessContext`] for every cycle and advances a simulated transport
//! between cycles. Tests and offline rendering use it to feed a plugin long
//! runs of cycles with exact, reproducible transport positions.
//!
//! ```ignore
//! let mut host = OfflineHost::new(PhraseGatePlugin::default());
//! host.prepare(AudioSetup::new(48000.0, 512))?;
//! host.play();
//! let kept = host.run_block(&events).as_slice();
//! ```

use log::{debug, error, warn};

use crate::error::PluginResult;
use crate::midi::{MidiBuffer, MidiEvent, MAX_MIDI_EVENTS};
use crate::plugin::{AudioSetup, HasParameters, MidiProcessor, Plugin};
use crate::process_context::{ProcessContext, Transport};
use crate::types::SamplePosition;

/// Sample rate used until [`OfflineHost::prepare`] is called.
pub const DEFAULT_SAMPLE_RATE: f64 = 48000.0;
/// Cycle length used until [`OfflineHost::prepare`] is called.
pub const DEFAULT_BLOCK_SIZE: usize = 512;

enum Instance<P: Plugin> {
    Unprepared(P),
    Prepared(P::Processor),
}

/// Drives a [`Plugin`] cycle by cycle against a simulated transport.
pub struct OfflineHost<P: Plugin> {
    instance: Instance<P>,
    setup: AudioSetup,
    tempo: Option<f64>,
    position: SamplePosition,
    playing: bool,
    provides_transport: bool,
    output: Box<MidiBuffer>,
}

impl<P: Plugin> OfflineHost<P> {
    /// Wrap an unprepared plugin. The transport starts stopped at 0, 120 BPM.
    pub fn new(plugin: P) -> Self {
        Self {
            instance: Instance::Unprepared(plugin),
            setup: AudioSetup::new(DEFAULT_SAMPLE_RATE, DEFAULT_BLOCK_SIZE),
            tempo: Some(120.0),
            position: 0,
            playing: false,
            provides_transport: true,
            output: Box::default(),
        }
    }

    /// Prepare (or re-prepare) the plugin for `setup`.
    ///
    /// An already prepared processor is deactivated and unprepared first, so
    /// parameter values survive a sample-rate change.
    ///
    /// The setup is validated before anything is consumed. A plugin that
    /// still rejects it in [`Plugin::prepare`] is lost along with its
    /// parameter values; the host then holds `P::default()`, unprepared.
    pub fn prepare(&mut self, setup: AudioSetup) -> PluginResult<()> {
        setup.validate()?;

        let was_prepared = self.is_prepared();
        let plugin = match std::mem::replace(&mut self.instance, Instance::Unprepared(P::default())) {
            Instance::Unprepared(plugin) => plugin,
            Instance::Prepared(mut processor) => {
                processor.set_active(false);
                processor.unprepare()
            }
        };

        match plugin.prepare(setup.clone()) {
            Ok(mut processor) => {
                debug!(
                    "Prepared plugin at {} Hz, {} samples per cycle",
                    setup.sample_rate, setup.max_buffer_size
                );
                processor.set_active(true);
                self.instance = Instance::Prepared(processor);
                self.setup = setup;
                Ok(())
            }
            Err(e) => {
                error!("Failed to prepare plugin: {}", e);
                if was_prepared {
                    warn!("Previous parameter values were discarded; plugin reset to defaults");
                }
                Err(e)
            }
        }
    }

    /// Return the plugin to its unprepared state.
    pub fn unprepare(&mut self) {
        if let Instance::Prepared(mut processor) =
            std::mem::replace(&mut self.instance, Instance::Unprepared(P::default()))
        {
            processor.set_active(false);
            self.instance = Instance::Unprepared(processor.unprepare());
            debug!("Plugin unprepared");
        }
    }

    /// True once [`prepare`](Self::prepare) has succeeded.
    pub fn is_prepared(&self) -> bool {
        matches!(self.instance, Instance::Prepared(_))
    }

    /// The plugin's parameters, in either phase.
    pub fn parameters(&self) -> &P::Parameters {
        match &self.instance {
            Instance::Unprepared(plugin) => plugin.parameters(),
            Instance::Prepared(processor) => processor.parameters(),
        }
    }

    /// Current audio setup.
    pub fn setup(&self) -> &AudioSetup {
        &self.setup
    }

    // =========================================================================
    // Transport control
    // =========================================================================

    /// Start the transport.
    pub fn play(&mut self) {
        self.playing = true;
    }

    /// Stop the transport. The position is kept.
    pub fn stop(&mut self) {
        self.playing = false;
    }

    /// Move the playhead.
    pub fn locate(&mut self, position: SamplePosition) {
        self.position = position;
    }

    /// Set the reported tempo. `None` simulates a host that omits it.
    pub fn set_tempo(&mut self, tempo: Option<f64>) {
        self.tempo = tempo;
    }

    /// Simulate a host that supplies no transport information at all.
    pub fn set_provides_transport(&mut self, provides: bool) {
        self.provides_transport = provides;
    }

    /// Current playhead position in samples.
    pub fn position(&self) -> SamplePosition {
        self.position
    }

    /// Transport snapshot the next cycle will see.
    pub fn transport(&self) -> Transport {
        if !self.provides_transport {
            return Transport::default();
        }
        Transport {
            tempo: self.tempo,
            project_time_samples: Some(self.position),
            is_playing: self.playing,
        }
    }

    // =========================================================================
    // Processing
    // =========================================================================

    /// Run one cycle of `max_buffer_size` samples and return the output.
    ///
    /// Events must be sorted by offset; at most [`MAX_MIDI_EVENTS`] are
    /// delivered. While playing, the playhead advances by one cycle afterwards.
    pub fn run_block(&mut self, input: &[MidiEvent]) -> &MidiBuffer {
        self.output.clear();

        let num_samples = self.setup.max_buffer_size;
        let context = ProcessContext::new(self.setup.sample_rate, num_samples, self.transport());

        match &mut self.instance {
            Instance::Prepared(processor) => {
                if input.len() > MAX_MIDI_EVENTS {
                    warn!(
                        "MIDI input buffer overflow: {} events max, {} were dropped",
                        MAX_MIDI_EVENTS,
                        input.len() - MAX_MIDI_EVENTS
                    );
                }
                let input = &input[..input.len().min(MAX_MIDI_EVENTS)];
                processor.process_midi(input, &mut self.output, &context);

                if self.output.has_overflowed() {
                    warn!(
                        "MIDI output buffer overflow: {} events reached capacity, some events were dropped",
                        self.output.len()
                    );
                }
            }
            Instance::Unprepared(_) => {
                warn!("Cycle requested before prepare; {} events dropped", input.len());
            }
        }

        if self.playing {
            self.position += num_samples as SamplePosition;
        }

        &self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PluginError;
    use crate::parameter_types::NoParameters;

    /// Records the transport of every cycle and passes events through.
    #[derive(Default)]
    struct Recorder {
        parameters: NoParameters,
    }

    struct RecorderProcessor {
        parameters: NoParameters,
        seen: Vec<Transport>,
        active: bool,
    }

    impl HasParameters for Recorder {
        type Parameters = NoParameters;
        fn parameters(&self) -> &NoParameters {
            &self.parameters
        }
        fn parameters_mut(&mut self) -> &mut NoParameters {
            &mut self.parameters
        }
    }

    impl HasParameters for RecorderProcessor {
        type Parameters = NoParameters;
        fn parameters(&self) -> &NoParameters {
            &self.parameters
        }
        fn parameters_mut(&mut self) -> &mut NoParameters {
            &mut self.parameters
        }
    }

    impl Plugin for Recorder {
        type Processor = RecorderProcessor;

        fn prepare(self, setup: AudioSetup) -> PluginResult<RecorderProcessor> {
            setup.validate()?;
            if setup.sample_rate > 192000.0 {
                return Err(PluginError::InvalidSampleRate(setup.sample_rate));
            }
            Ok(RecorderProcessor {
                parameters: self.parameters,
                seen: Vec::new(),
                active: false,
            })
        }
    }

    impl MidiProcessor for RecorderProcessor {
        type Plugin = Recorder;

        fn unprepare(self) -> Recorder {
            Recorder {
                parameters: self.parameters,
            }
        }

        fn process_midi(&mut self, input: &[MidiEvent], output: &mut MidiBuffer, context: &ProcessContext) {
            self.seen.push(context.transport);
            for event in input {
                output.push(*event);
            }
        }

        fn set_active(&mut self, active: bool) {
            self.active = active;
        }
    }

    fn recorded(host: &OfflineHost<Recorder>) -> &[Transport] {
        match &host.instance {
            Instance::Prepared(processor) => &processor.seen,
            Instance::Unprepared(_) => &[],
        }
    }

    #[test]
    fn unprepared_host_drops_events() {
        let mut host = OfflineHost::new(Recorder::default());
        assert!(!host.is_prepared());
        assert!(host.run_block(&[MidiEvent::note_on(0, 0, 60, 1.0)]).is_empty());
    }

    #[test]
    fn prepare_rejects_zero_sample_rate() {
        let mut host = OfflineHost::new(Recorder::default());
        assert!(host.prepare(AudioSetup::new(0.0, 512)).is_err());
        assert!(!host.is_prepared());
    }

    #[test]
    fn rejected_reprepare_leaves_host_unprepared() {
        let mut host = OfflineHost::new(Recorder::default());
        host.prepare(AudioSetup::new(48000.0, 64)).unwrap();

        assert_eq!(
            host.prepare(AudioSetup::new(384000.0, 64)),
            Err(PluginError::InvalidSampleRate(384000.0))
        );
        assert!(!host.is_prepared());
        assert_eq!(host.setup().sample_rate, 48000.0);

        host.prepare(AudioSetup::new(44100.0, 64)).unwrap();
        assert!(host.is_prepared());
    }

    #[test]
    fn playhead_advances_only_while_playing() {
        let mut host = OfflineHost::new(Recorder::default());
        host.prepare(AudioSetup::new(44100.0, 256)).unwrap();

        host.run_block(&[]);
        host.play();
        host.run_block(&[]);
        host.run_block(&[]);
        host.stop();
        host.run_block(&[]);

        let positions: Vec<_> = recorded(&host)
            .iter()
            .map(|t| (t.project_time_samples, t.is_playing))
            .collect();
        assert_eq!(
            positions,
            vec![
                (Some(0), false),
                (Some(0), true),
                (Some(256), true),
                (Some(512), false),
            ]
        );
        assert_eq!(host.position(), 512);
    }

    #[test]
    fn host_without_transport_sends_empty_snapshot() {
        let mut host = OfflineHost::new(Recorder::default());
        host.prepare(AudioSetup::new(48000.0, 64)).unwrap();
        host.set_provides_transport(false);
        host.play();

        host.run_block(&[]);

        assert_eq!(recorded(&host), &[Transport::default()]);
    }

    #[test]
    fn reprepare_reactivates_processor() {
        let mut host = OfflineHost::new(Recorder::default());
        host.prepare(AudioSetup::new(48000.0, 64)).unwrap();
        host.prepare(AudioSetup::new(96000.0, 128)).unwrap();

        assert_eq!(host.setup().sample_rate, 96000.0);
        match &host.instance {
            Instance::Prepared(processor) => assert!(processor.active),
            Instance::Unprepared(_) => panic!("expected a prepared processor"),
        }

        host.unprepare();
        assert!(!host.is_prepared());
    }

    #[test]
    fn events_pass_through_in_order() {
        let mut host = OfflineHost::new(Recorder::default());
        host.prepare(AudioSetup::new(48000.0, 64)).unwrap();
        let input = [
            MidiEvent::note_on(0, 0, 60, 1.0),
            MidiEvent::control_change(10, 1, 7, 0.5),
        ];

        assert_eq!(host.run_block(&input).as_slice(), &input);
    }
}
