//! Scene timeline: six scenes shown strictly in order, advanced by timers and
//! three one-shot clicks.
//!
//! The sequencer is pure: it never touches the DOM. Callers feed it clicks
//! (`trigger`) and the frame clock (`advance`) and apply the returned [`Cue`]s.
//! Every timed step sits in one queue ordered by (due time, insertion order),
//! so steps that land on the same millisecond always run in the order they
//! were scheduled.

use crate::audio::{Tone, Waveform};
use crate::cake::CANDLE_COUNT;
use crate::config::ShowConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Scene {
    Heart,
    Countdown,
    Birthday,
    Cake,
    Smile,
    Letter,
}

impl Scene {
    pub const ALL: [Scene; 6] = [
        Scene::Heart,
        Scene::Countdown,
        Scene::Birthday,
        Scene::Cake,
        Scene::Smile,
        Scene::Letter,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Scene> {
        Self::ALL.get(index).copied()
    }

    /// DOM id of the scene's container.
    pub fn element_id(self) -> &'static str {
        match self {
            Scene::Heart => "heart-scene",
            Scene::Countdown => "countdown-scene",
            Scene::Birthday => "birthday-scene",
            Scene::Cake => "cake-scene",
            Scene::Smile => "smile-scene",
            Scene::Letter => "letter-scene",
        }
    }
}

/// User clicks that move the show along.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trigger {
    Start,
    BlowCandles,
    OpenEnvelope,
}

/// What opens a transition once its source scene is current.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gate {
    /// Armed as soon as the source scene is shown.
    OnEnter,
    /// The countdown reached zero.
    CountdownDone,
    Trigger(Trigger),
}

#[derive(Clone, Copy)]
pub struct Transition {
    pub from: Option<Scene>,
    pub gate: Gate,
    pub delay_ms: fn(&ShowConfig) -> f64,
    pub to: Scene,
}

pub const TRANSITIONS: [Transition; 6] = [
    Transition {
        from: None,
        gate: Gate::Trigger(Trigger::Start),
        delay_ms: |_| 0.0,
        to: Scene::Heart,
    },
    Transition {
        from: Some(Scene::Heart),
        gate: Gate::OnEnter,
        delay_ms: |c| c.heart_hold_ms,
        to: Scene::Countdown,
    },
    Transition {
        from: Some(Scene::Countdown),
        gate: Gate::CountdownDone,
        delay_ms: |_| 0.0,
        to: Scene::Birthday,
    },
    Transition {
        from: Some(Scene::Birthday),
        gate: Gate::OnEnter,
        delay_ms: |c| c.birthday_hold_ms,
        to: Scene::Cake,
    },
    Transition {
        from: Some(Scene::Cake),
        gate: Gate::Trigger(Trigger::BlowCandles),
        delay_ms: |c| c.blow_to_smile_ms,
        to: Scene::Smile,
    },
    Transition {
        from: Some(Scene::Smile),
        gate: Gate::OnEnter,
        delay_ms: |c| c.smile_hold_ms,
        to: Scene::Letter,
    },
];

pub const START_TONE: Tone = Tone::new(440.0, Waveform::Sine, 0.5);
pub const VOLLEY_TONE: Tone = Tone::new(800.0, Waveform::Sine, 0.5);
pub const ENVELOPE_TONE: Tone = Tone::new(600.0, Waveform::Sine, 0.3);

pub fn countdown_tone(value: u32) -> Tone {
    Tone::new(200.0 + value as f64 * 100.0, Waveform::Square, 0.3)
}

pub fn candle_tone(index: usize) -> Tone {
    Tone::new(400.0 - index as f64 * 10.0, Waveform::Sine, 0.1)
}

/// Instructions for the host, in the order they should be applied.
#[derive(Clone, Debug, PartialEq)]
pub enum Cue {
    HideStartControl,
    ShowScene(Scene),
    PlayTone(Tone),
    /// Display the value and restart the pulse animation.
    CountdownValue(u32),
    LaunchFirework,
    ExtinguishCandle(usize),
    CandlesBlown(usize),
    OpenEnvelope,
    RevealLetter,
}

#[derive(Clone, Debug)]
enum Step {
    Enter(Scene),
    CountdownTick(u32),
    Emit(Cue),
}

#[derive(Clone, Debug)]
struct Scheduled {
    due_ms: f64,
    seq: u64,
    step: Step,
}

pub struct Sequencer {
    config: ShowConfig,
    current: Option<Scene>,
    shown: Vec<Scene>,
    queue: Vec<Scheduled>,
    next_seq: u64,
    started: bool,
    candles_blown: bool,
    envelope_opened: bool,
}

impl Sequencer {
    pub fn new(config: ShowConfig) -> Self {
        Self {
            config,
            current: None,
            shown: Vec::with_capacity(Scene::ALL.len()),
            queue: Vec::new(),
            next_seq: 0,
            started: false,
            candles_blown: false,
            envelope_opened: false,
        }
    }

    pub fn current(&self) -> Option<Scene> {
        self.current
    }

    /// Every scene shown so far, in order.
    pub fn history(&self) -> &[Scene] {
        &self.shown
    }

    pub fn candles_blown(&self) -> bool {
        self.candles_blown
    }

    pub fn envelope_opened(&self) -> bool {
        self.envelope_opened
    }

    pub fn pending_steps(&self) -> usize {
        self.queue.len()
    }

    /// Handle a click. Start and the candle blow work once; the envelope can be
    /// reopened for another volley. Triggers only act while their scene is up,
    /// anything else is ignored and yields no cues.
    pub fn trigger(&mut self, trigger: Trigger, now_ms: f64) -> Vec<Cue> {
        let mut cues = Vec::new();
        match trigger {
            Trigger::Start => {
                if self.started {
                    log::debug!("start ignored: already running");
                    return cues;
                }
                self.started = true;
                cues.push(Cue::HideStartControl);
                cues.push(Cue::PlayTone(START_TONE));
            }
            Trigger::BlowCandles => {
                if self.candles_blown || self.current != Some(Scene::Cake) {
                    log::debug!("candle blow ignored (scene {:?})", self.current);
                    return cues;
                }
                self.candles_blown = true;
                for i in 0..CANDLE_COUNT {
                    let at = now_ms + i as f64 * self.config.candle_stagger_ms;
                    self.schedule(at, Step::Emit(Cue::ExtinguishCandle(i)));
                    self.schedule(at, Step::Emit(Cue::PlayTone(candle_tone(i))));
                }
                cues.push(Cue::CandlesBlown(CANDLE_COUNT));
            }
            Trigger::OpenEnvelope => {
                if self.current != Some(Scene::Letter) {
                    log::debug!("envelope click ignored (scene {:?})", self.current);
                    return cues;
                }
                self.envelope_opened = true;
                cues.push(Cue::OpenEnvelope);
                cues.push(Cue::PlayTone(ENVELOPE_TONE));
                let reveal = now_ms + self.config.letter_reveal_delay_ms;
                self.schedule(reveal, Step::Emit(Cue::RevealLetter));
                for i in 0..self.config.celebration_count {
                    let at = reveal + i as f64 * self.config.celebration_interval_ms;
                    self.schedule(at, Step::Emit(Cue::LaunchFirework));
                }
            }
        }
        log::info!("trigger {:?}", trigger);
        self.open_gate(Gate::Trigger(trigger), now_ms);
        cues.extend(self.advance(now_ms));
        cues
    }

    /// Run every step due at or before `now_ms`.
    pub fn advance(&mut self, now_ms: f64) -> Vec<Cue> {
        let mut cues = Vec::new();
        while let Some(next) = self.pop_due(now_ms) {
            self.run(next, &mut cues);
        }
        cues
    }

    fn schedule(&mut self, due_ms: f64, step: Step) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Scheduled { due_ms, seq, step });
    }

    fn pop_due(&mut self, now_ms: f64) -> Option<Scheduled> {
        let idx = self
            .queue
            .iter()
            .enumerate()
            .filter(|(_, s)| s.due_ms <= now_ms)
            .min_by(|(_, a), (_, b)| a.due_ms.total_cmp(&b.due_ms).then(a.seq.cmp(&b.seq)))
            .map(|(i, _)| i)?;
        Some(self.queue.swap_remove(idx))
    }

    fn run(&mut self, item: Scheduled, cues: &mut Vec<Cue>) {
        let at = item.due_ms;
        match item.step {
            Step::Enter(scene) => self.enter(scene, at, cues),
            Step::CountdownTick(value) => {
                cues.push(Cue::CountdownValue(value));
                cues.push(Cue::PlayTone(countdown_tone(value)));
                if value == 0 {
                    self.open_gate(Gate::CountdownDone, at);
                }
            }
            Step::Emit(cue) => cues.push(cue),
        }
    }

    fn open_gate(&mut self, gate: Gate, at: f64) {
        let edge = TRANSITIONS
            .iter()
            .find(|t| t.from == self.current && t.gate == gate)
            .copied();
        if let Some(t) = edge {
            let due = at + (t.delay_ms)(&self.config);
            self.schedule(due, Step::Enter(t.to));
        }
    }

    fn enter(&mut self, scene: Scene, at: f64, cues: &mut Vec<Cue>) {
        if self.current.is_some_and(|cur| scene <= cur) {
            log::warn!("refusing backward transition {:?} -> {:?}", self.current, scene);
            return;
        }
        log::info!("showing scene {} ({})", scene.index(), scene.element_id());
        self.current = Some(scene);
        self.shown.push(scene);
        cues.push(Cue::ShowScene(scene));

        match scene {
            Scene::Countdown => {
                let from = self.config.countdown_from;
                for (n, value) in (0..=from).rev().enumerate() {
                    let due = at + (n as f64 + 1.0) * self.config.countdown_tick_ms;
                    self.schedule(due, Step::CountdownTick(value));
                }
            }
            Scene::Birthday => {
                cues.push(Cue::PlayTone(VOLLEY_TONE));
                for k in 1..=self.config.volley_count {
                    let due = at + k as f64 * self.config.volley_interval_ms;
                    self.schedule(due, Step::Emit(Cue::LaunchFirework));
                }
            }
            _ => {}
        }
        self.open_gate(Gate::OnEnter, at);
    }
}
