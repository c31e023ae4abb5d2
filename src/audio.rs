use crate::core::{
    AudioError, AudioOutput, AudioSequencer, EnvelopeStep, MelodyScore, OutputState, PlayOutcome,
    ScheduledTone, Voice,
};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

pub type SharedSequencer = Rc<RefCell<AudioSequencer<WebAudioOutput>>>;

fn js_err(e: JsValue) -> String {
    format!("{:?}", e)
}

/// WebAudio-backed output. The `AudioContext` is created lazily on the first
/// `play()`, which browsers require to follow a user gesture.
#[derive(Default)]
pub struct WebAudioOutput {
    ctx: Option<web::AudioContext>,
}

impl WebAudioOutput {
    pub fn context(&self) -> Option<web::AudioContext> {
        self.ctx.clone()
    }
}

/// Oscillator plus its envelope gain, both released together.
pub struct WebVoice {
    osc: web::OscillatorNode,
    gain: web::GainNode,
}

impl Voice for WebVoice {
    fn release(&mut self) -> Result<(), AudioError> {
        // Disconnect both nodes even if the first one fails
        let osc = self.osc.disconnect().map_err(js_err);
        let gain = self.gain.disconnect().map_err(js_err);
        match (osc, gain) {
            (Ok(()), Ok(())) => Ok(()),
            (Err(e), _) | (_, Err(e)) => Err(AudioError::Release(e)),
        }
    }
}

impl AudioOutput for WebAudioOutput {
    type Voice = WebVoice;

    fn acquire(&mut self) -> Result<(), AudioError> {
        if self.ctx.is_none() {
            let ctx = web::AudioContext::new()
                .map_err(|e| AudioError::Unavailable(js_err(e)))?;
            log::info!("[audio] AudioContext created ({} Hz)", ctx.sample_rate());
            self.ctx = Some(ctx);
        }
        Ok(())
    }

    fn state(&self) -> OutputState {
        match self.ctx.as_ref().map(|c| c.state()) {
            Some(web::AudioContextState::Running) => OutputState::Running,
            Some(web::AudioContextState::Suspended) => OutputState::Suspended,
            _ => OutputState::Closed,
        }
    }

    fn current_time(&self) -> f64 {
        self.ctx.as_ref().map(|c| c.current_time()).unwrap_or(0.0)
    }

    fn start_tone(&mut self, tone: &ScheduledTone) -> Result<WebVoice, AudioError> {
        let ctx = self
            .ctx
            .as_ref()
            .ok_or_else(|| AudioError::Unavailable("no AudioContext".into()))?;
        let node_err = |e: JsValue| AudioError::Node(js_err(e));

        let osc = web::OscillatorNode::new(ctx).map_err(node_err)?;
        osc.set_type(web::OscillatorType::Sine);
        osc.frequency().set_value(tone.frequency_hz);

        let gain = web::GainNode::new(ctx).map_err(node_err)?;
        let param = gain.gain();
        for step in &tone.envelope {
            match *step {
                EnvelopeStep::SetValue { value, at } => {
                    param.set_value_at_time(value, at).map_err(node_err)?;
                }
                EnvelopeStep::LinearRamp { value, until } => {
                    param
                        .linear_ramp_to_value_at_time(value, until)
                        .map_err(node_err)?;
                }
                EnvelopeStep::ExponentialRamp { value, until } => {
                    param
                        .exponential_ramp_to_value_at_time(value, until)
                        .map_err(node_err)?;
                }
            }
        }

        osc.connect_with_audio_node(&gain).map_err(node_err)?;
        gain.connect_with_audio_node(&ctx.destination())
            .map_err(node_err)?;
        osc.start_with_when(tone.start_sec).map_err(node_err)?;
        osc.stop_with_when(tone.stop_sec).map_err(node_err)?;
        Ok(WebVoice { osc, gain })
    }
}

pub fn create_sequencer() -> SharedSequencer {
    Rc::new(RefCell::new(AudioSequencer::new(
        WebAudioOutput::default(),
        MelodyScore::happy_birthday(),
    )))
}

async fn resume_output(ctx: web::AudioContext) -> Result<(), AudioError> {
    let promise: js_sys::Promise = ctx
        .resume()
        .map_err(|e| AudioError::Suspended(js_err(e)))?;
    JsFuture::from(promise)
        .await
        .map(|_| ())
        .map_err(|e| AudioError::Suspended(js_err(e)))
}

/// Start or stop the melody. A suspended context is resumed asynchronously;
/// the sequencer discards the completion if playback was stopped meanwhile.
pub fn toggle_music(sequencer: &SharedSequencer) {
    let mut seq = sequencer.borrow_mut();
    if seq.is_playing() {
        seq.stop();
        return;
    }
    if let PlayOutcome::AwaitingResume(epoch) = seq.play() {
        let Some(ctx) = seq.output().context() else {
            return;
        };
        drop(seq);
        let sequencer = sequencer.clone();
        spawn_local(async move {
            let result = resume_output(ctx).await;
            sequencer.borrow_mut().resume_finished(epoch, result);
        });
    }
}
