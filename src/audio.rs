//! Synthesized feedback tones (Web Audio oscillator + exponential gain decay).

use web_sys::{AudioContext, AudioContextState, GainNode, OscillatorType};

use crate::error::{Result, ShowError};
use crate::rng::Random;

const START_GAIN: f32 = 0.3;
const END_GAIN: f32 = 0.01;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
}

impl Waveform {
    fn oscillator_type(self) -> OscillatorType {
        match self {
            Waveform::Sine => OscillatorType::Sine,
            Waveform::Square => OscillatorType::Square,
        }
    }
}

/// One beep. `delay_s` offsets the start on the audio clock so composite cues
/// don't need timers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tone {
    pub freq_hz: f64,
    pub waveform: Waveform,
    pub duration_s: f64,
    pub delay_s: f64,
}

impl Tone {
    pub const fn new(freq_hz: f64, waveform: Waveform, duration_s: f64) -> Self {
        Self {
            freq_hz,
            waveform,
            duration_s,
            delay_s: 0.0,
        }
    }

    pub fn delayed(self, delay_s: f64) -> Self {
        Self { delay_s, ..self }
    }
}

/// Five quick high sine pips, 50ms apart, each at a random pitch in [800, 1200).
pub fn sparkle(rng: &mut impl Random) -> [Tone; 5] {
    std::array::from_fn(|i| {
        Tone::new(rng.range(800.0, 1200.0), Waveform::Sine, 0.1).delayed(i as f64 * 0.05)
    })
}

/// Web Audio output. Browsers start the context suspended until a user gesture,
/// so `resume_if_suspended` is wired to the first click.
pub struct TonePlayer {
    ctx: AudioContext,
}

impl TonePlayer {
    pub fn new() -> Result<Self> {
        let ctx = AudioContext::new().map_err(|e| ShowError::Audio(format!("{:?}", e)))?;
        Ok(Self { ctx })
    }

    pub fn resume_if_suspended(&self) {
        if self.ctx.state() == AudioContextState::Suspended {
            log::debug!("resuming suspended audio context");
            let _ = self.ctx.resume();
        }
    }

    /// Fire-and-forget; audio failures never interrupt the show.
    pub fn play(&self, tone: &Tone) {
        if let Err(e) = self.schedule(tone) {
            log::debug!("tone {:.0}Hz dropped: {:?}", tone.freq_hz, e);
        }
    }

    pub fn play_all(&self, tones: &[Tone]) {
        for t in tones {
            self.play(t);
        }
    }

    fn schedule(&self, tone: &Tone) -> std::result::Result<(), wasm_bindgen::JsValue> {
        let start = self.ctx.current_time() + tone.delay_s;
        let end = start + tone.duration_s;

        let osc = self.ctx.create_oscillator()?;
        let gain: GainNode = self.ctx.create_gain()?;
        osc.connect_with_audio_node(&gain)?;
        gain.connect_with_audio_node(&self.ctx.destination())?;

        osc.set_type(tone.waveform.oscillator_type());
        osc.frequency().set_value(tone.freq_hz as f32);
        gain.gain().set_value_at_time(START_GAIN, start)?;
        gain.gain().exponential_ramp_to_value_at_time(END_GAIN, end)?;

        osc.start_with_when(start)?;
        osc.stop_with_when(end)?;
        Ok(())
    }
}
