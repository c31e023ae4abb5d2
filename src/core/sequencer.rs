//! Looping melody playback over an abstract audio output.
//!
//! The sequencer owns every voice it starts and every loop timer it queues.
//! `stop()` is synchronous: when it returns, nothing is sounding and nothing
//! is left to fire. The host drives it cooperatively by calling
//! [`AudioSequencer::pump`] from its frame loop.

use super::constants::{
    ENVELOPE_ATTACK_SEC, ENVELOPE_FLOOR, ENVELOPE_PEAK, LEAD_IN_SEC,
};
use super::melody::{MelodyScore, NoteEvent};
use super::timers::TimerQueue;
use smallvec::{smallvec, SmallVec};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AudioError {
    /// No audio output device or API is present.
    #[error("audio output unavailable: {0}")]
    Unavailable(String),
    /// The output exists but is suspended and could not be resumed.
    #[error("audio output suspended: {0}")]
    Suspended(String),
    /// A node for a single tone could not be created or wired.
    #[error("audio node error: {0}")]
    Node(String),
    /// Disconnecting a voice failed.
    #[error("voice release failed: {0}")]
    Release(String),
}

/// Run state reported by an [`AudioOutput`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputState {
    Running,
    Suspended,
    Closed,
}

/// One automation event applied to a tone's gain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EnvelopeStep {
    SetValue { value: f32, at: f64 },
    LinearRamp { value: f32, until: f64 },
    ExponentialRamp { value: f32, until: f64 },
}

/// A sine tone bound to an absolute window on the output clock.
#[derive(Clone, Debug, PartialEq)]
pub struct ScheduledTone {
    pub frequency_hz: f32,
    pub start_sec: f64,
    pub stop_sec: f64,
    pub envelope: SmallVec<[EnvelopeStep; 3]>,
}

impl ScheduledTone {
    /// Bell-like tone for `note` within a pass starting at `pass_start`.
    pub fn for_note(note: &NoteEvent, pass_start: f64) -> Self {
        let start = pass_start + note.onset_sec as f64;
        let stop = start + note.duration_sec as f64;
        Self {
            frequency_hz: note.frequency_hz,
            start_sec: start,
            stop_sec: stop,
            envelope: smallvec![
                EnvelopeStep::SetValue {
                    value: 0.0,
                    at: start
                },
                EnvelopeStep::LinearRamp {
                    value: ENVELOPE_PEAK,
                    until: start + ENVELOPE_ATTACK_SEC,
                },
                EnvelopeStep::ExponentialRamp {
                    value: ENVELOPE_FLOOR,
                    until: stop,
                },
            ],
        }
    }

    /// Gain the envelope produces at absolute time `t`, following the same
    /// interpolation rules the output applies to its automation events.
    pub fn gain_at(&self, t: f64) -> f32 {
        let mut value = 0.0_f32;
        let mut since = f64::NEG_INFINITY;
        for step in &self.envelope {
            match *step {
                EnvelopeStep::SetValue { value: v, at } => {
                    if t < at {
                        return value;
                    }
                    value = v;
                    since = at;
                }
                EnvelopeStep::LinearRamp { value: v, until } => {
                    if t < until {
                        let k = ((t - since) / (until - since)).clamp(0.0, 1.0) as f32;
                        return value + (v - value) * k;
                    }
                    value = v;
                    since = until;
                }
                EnvelopeStep::ExponentialRamp { value: v, until } => {
                    if t < until {
                        let k = ((t - since) / (until - since)).clamp(0.0, 1.0) as f32;
                        return value * (v / value).powf(k);
                    }
                    value = v;
                    since = until;
                }
            }
        }
        value
    }
}

/// Handle to one sounding tone (oscillator plus its gain node).
pub trait Voice {
    /// Stop and disconnect the tone's nodes.
    fn release(&mut self) -> Result<(), AudioError>;
}

/// The audio device seam. The web front-end implements it over WebAudio;
/// tests implement it with a scripted clock.
pub trait AudioOutput {
    type Voice: Voice;

    /// Open the device if needed. Repeated calls are cheap.
    fn acquire(&mut self) -> Result<(), AudioError>;

    fn state(&self) -> OutputState;

    /// Output clock in seconds.
    fn current_time(&self) -> f64;

    /// Create, wire and schedule the nodes for `tone`.
    fn start_tone(&mut self, tone: &ScheduledTone) -> Result<Self::Voice, AudioError>;
}

/// Playback state. Every `play()` opens a new epoch; stale resume
/// completions and loop timers from older epochs are ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transport {
    Idle,
    Resuming { epoch: u64 },
    Playing { epoch: u64 },
}

/// Result of [`AudioSequencer::play`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayOutcome {
    /// The first pass is scheduled.
    Started,
    /// The output is suspended. The caller must resume it and then report
    /// through [`AudioSequencer::resume_finished`] with this epoch.
    AwaitingResume(u64),
    /// No usable output; nothing was scheduled.
    Unavailable,
}

#[derive(Clone, Copy, Debug)]
struct LoopTask {
    epoch: u64,
}

struct LiveVoice<V> {
    handle: V,
    ends_at: f64,
}

pub struct AudioSequencer<O: AudioOutput> {
    output: O,
    score: MelodyScore,
    loop_period: f64,
    transport: Transport,
    epoch: u64,
    voices: Vec<LiveVoice<O::Voice>>,
    timers: TimerQueue<LoopTask>,
}

impl<O: AudioOutput> AudioSequencer<O> {
    pub fn new(output: O, score: MelodyScore) -> Self {
        let loop_period = score.loop_period_sec();
        Self {
            output,
            score,
            loop_period,
            transport: Transport::Idle,
            epoch: 0,
            voices: Vec::new(),
            timers: TimerQueue::new(),
        }
    }

    /// Start a new playback epoch, stopping any previous one first.
    pub fn play(&mut self) -> PlayOutcome {
        self.stop();
        if let Err(e) = self.output.acquire() {
            log::error!("[audio] cannot start playback: {}", e);
            return PlayOutcome::Unavailable;
        }
        self.epoch += 1;
        let epoch = self.epoch;
        match self.output.state() {
            OutputState::Running => {
                self.transport = Transport::Playing { epoch };
                self.schedule_pass(epoch);
                log::info!("[audio] playing (epoch {})", epoch);
                PlayOutcome::Started
            }
            OutputState::Suspended => {
                self.transport = Transport::Resuming { epoch };
                log::info!("[audio] output suspended; waiting for resume (epoch {})", epoch);
                PlayOutcome::AwaitingResume(epoch)
            }
            OutputState::Closed => {
                log::error!("[audio] cannot start playback: output is closed");
                PlayOutcome::Unavailable
            }
        }
    }

    /// Complete a resume started for `epoch`. Returns `true` if playback began.
    ///
    /// If `stop()` or another `play()` happened in the meantime the
    /// completion is stale and nothing is scheduled.
    pub fn resume_finished(&mut self, epoch: u64, result: Result<(), AudioError>) -> bool {
        if self.transport != (Transport::Resuming { epoch }) {
            log::debug!("[audio] ignoring stale resume for epoch {}", epoch);
            return false;
        }
        match result {
            Ok(()) => {
                self.transport = Transport::Playing { epoch };
                self.schedule_pass(epoch);
                log::info!("[audio] resumed; playing (epoch {})", epoch);
                true
            }
            Err(e) => {
                log::error!("[audio] resume failed, playback not started: {}", e);
                self.transport = Transport::Idle;
                false
            }
        }
    }

    /// Silence everything and cancel pending loop passes. Safe when idle.
    pub fn stop(&mut self) {
        self.transport = Transport::Idle;
        let count = self.voices.len();
        for mut voice in self.voices.drain(..) {
            if let Err(e) = voice.handle.release() {
                log::warn!("[audio] {}", e);
            }
        }
        self.timers.cancel_all();
        if count > 0 {
            log::info!("[audio] stopped; released {} voices", count);
        }
    }

    /// Fire due loop passes and release voices whose window has ended.
    /// Returns the number of passes scheduled.
    pub fn pump(&mut self) -> usize {
        let now = self.output.current_time();
        self.release_finished(now);
        let mut passes = 0;
        while let Some((_, task)) = self.timers.pop_due(now) {
            if self.transport == (Transport::Playing { epoch: task.epoch }) {
                self.schedule_pass(task.epoch);
                passes += 1;
            }
        }
        passes
    }

    /// Playback requested and not stopped (including while resuming).
    pub fn is_playing(&self) -> bool {
        self.transport != Transport::Idle
    }

    pub fn transport(&self) -> Transport {
        self.transport
    }

    pub fn live_voice_count(&self) -> usize {
        self.voices.len()
    }

    pub fn pending_timer_count(&self) -> usize {
        self.timers.len()
    }

    pub fn loop_period_sec(&self) -> f64 {
        self.loop_period
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    fn schedule_pass(&mut self, epoch: u64) {
        let now = self.output.current_time();
        let pass_start = now + LEAD_IN_SEC;
        for note in self.score.notes() {
            let tone = ScheduledTone::for_note(note, pass_start);
            match self.output.start_tone(&tone) {
                Ok(handle) => self.voices.push(LiveVoice {
                    handle,
                    ends_at: tone.stop_sec,
                }),
                Err(e) => log::warn!("[audio] skipping note {:.2} Hz: {}", note.frequency_hz, e),
            }
        }
        self.timers.schedule(now + self.loop_period, LoopTask { epoch });
        log::debug!(
            "[audio] pass scheduled at {:.3}s ({} live voices)",
            pass_start,
            self.voices.len()
        );
    }

    fn release_finished(&mut self, now: f64) {
        self.voices.retain_mut(|voice| {
            if voice.ends_at > now {
                return true;
            }
            if let Err(e) = voice.handle.release() {
                log::warn!("[audio] {}", e);
            }
            false
        });
    }
}

impl<O: AudioOutput> Drop for AudioSequencer<O> {
    fn drop(&mut self) {
        self.stop();
    }
}
