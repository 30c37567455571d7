//! Browser host for the show: owns every model plus the web handles, wires
//! clicks and resize, and drives one tick per animation frame.
//!
//! State lives in a thread-local slot. Each callback (frame, click, resize)
//! borrows it for its own duration only; callbacks never nest, so the
//! `RefCell` is never contended.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, MouseEvent, window};

use crate::ambient::{AmbientEmitter, MoteNodes};
use crate::audio::{self, TonePlayer};
use crate::cake::{self, Candle};
use crate::config::ShowConfig;
use crate::dom;
use crate::error::{Result, ShowError};
use crate::fireworks::FireworkDisplay;
use crate::heart::HeartLayout;
use crate::rng::XorShift64;
use crate::scene::{Cue, Sequencer, Trigger};
use crate::starfield::Starfield;

struct Surface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl Surface {
    fn attach(doc: &Document, id: &'static str, z_index: i32) -> Result<Self> {
        let canvas = dom::ensure_canvas(doc, id, z_index)?;
        let ctx = canvas
            .get_context("2d")?
            .ok_or(ShowError::NoCanvasContext(id))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| ShowError::NoCanvasContext(id))?;
        Ok(Self { canvas, ctx })
    }

    fn fit(&self, width: f64, height: f64) {
        self.canvas.set_width(width as u32);
        self.canvas.set_height(height as u32);
    }
}

struct Show {
    doc: Document,
    rng: XorShift64,
    star_surface: Surface,
    firework_surface: Surface,
    starfield: Starfield,
    fireworks: FireworkDisplay,
    sequencer: Sequencer,
    ambient: AmbientEmitter,
    ambient_nodes: MoteNodes<Element>,
    audio: Option<TonePlayer>,
    candles: Vec<Candle>,
    candle_nodes: Vec<Element>,
}

thread_local! {
    static SHOW: RefCell<Option<Show>> = const { RefCell::new(None) };
}

fn with_show(f: impl FnOnce(&mut Show)) {
    SHOW.with(|cell| {
        if let Some(show) = cell.borrow_mut().as_mut() {
            f(show);
        }
    });
}

fn now_ms() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

fn viewport() -> (f64, f64) {
    let Some(win) = window() else {
        return (0.0, 0.0);
    };
    let w = win.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let h = win.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    (w, h)
}

/// Build the page decorations, hook up input and start the frame loop.
/// Calling it again while a show is running does nothing.
pub fn start(config: ShowConfig) -> Result<()> {
    config.validate()?;
    if SHOW.with(|cell| cell.borrow().is_some()) {
        log::warn!("show already running");
        return Ok(());
    }

    let win = window().ok_or(ShowError::NoWindow)?;
    let doc = win.document().ok_or(ShowError::NoDocument)?;
    let mut rng = XorShift64::from_host();

    let star_surface = Surface::attach(&doc, dom::STAR_CANVAS_ID, 0)?;
    let firework_surface = Surface::attach(&doc, dom::FIREWORKS_CANVAS_ID, 5)?;
    let (w, h) = viewport();
    star_surface.fit(w, h);
    firework_surface.fit(w, h);

    match dom::require(&doc, dom::HEART_CONTAINER_ID) {
        Ok(container) => HeartLayout::generate(&mut rng).mount(&doc, &container)?,
        Err(e) => log::warn!("{}; no heart", e),
    }

    let candles = cake::candles();
    let candle_nodes = match dom::require(&doc, dom::CAKE_ID) {
        Ok(cake_el) => cake::mount_candles(&doc, &cake_el, &candles)?,
        Err(e) => {
            log::warn!("{}; no candles", e);
            Vec::new()
        }
    };

    let audio = match TonePlayer::new() {
        Ok(player) => Some(player),
        Err(e) => {
            log::warn!("{}; continuing without sound", e);
            None
        }
    };

    let show = Show {
        starfield: Starfield::new(&mut rng, w, h, config.star_count, config.shooting_star_chance),
        fireworks: FireworkDisplay::new(w, h, config.secondary_burst_delay_ms),
        sequencer: Sequencer::new(config.clone()),
        ambient: AmbientEmitter::new(config.ambient_interval_ms, config.ambient_lifetime_ms),
        ambient_nodes: MoteNodes::default(),
        doc: doc.clone(),
        rng,
        star_surface,
        firework_surface,
        audio,
        candles,
        candle_nodes,
    };
    log::info!(
        "show ready: {}x{} viewport, {} stars",
        w,
        h,
        show.starfield.stars().len()
    );
    SHOW.with(|cell| cell.replace(Some(show)));

    bind_trigger(&doc, dom::START_BUTTON_ID, Trigger::Start)?;
    bind_trigger(&doc, dom::BLOW_INSTRUCTION_ID, Trigger::BlowCandles)?;
    bind_trigger(&doc, dom::ENVELOPE_ID, Trigger::OpenEnvelope)?;

    // Browsers keep audio suspended until a user gesture.
    {
        let closure = Closure::wrap(Box::new(move |_evt: MouseEvent| {
            with_show(|show| {
                if let Some(audio) = &show.audio {
                    audio.resume_if_suspended();
                }
            });
        }) as Box<dyn FnMut(_)>);
        doc.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
            with_show(|show| show.resize());
        }) as Box<dyn FnMut(_)>);
        win.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    start_frame_loop();
    Ok(())
}

fn bind_trigger(doc: &Document, id: &'static str, trigger: Trigger) -> Result<()> {
    let target = match dom::require(doc, id) {
        Ok(el) => el,
        Err(e) => {
            log::warn!("{}; {:?} can never fire", e, trigger);
            return Ok(());
        }
    };
    let closure = Closure::wrap(Box::new(move |_evt: MouseEvent| {
        with_show(|show| show.on_trigger(trigger));
    }) as Box<dyn FnMut(_)>);
    target.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn start_frame_loop() {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        with_show(|show| show.tick(ts));
        if let (Some(w), Some(cb)) = (window(), f.borrow().as_ref()) {
            let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut(f64)>));
    if let (Some(w), Some(cb)) = (window(), g.borrow().as_ref()) {
        let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

impl Show {
    fn on_trigger(&mut self, trigger: Trigger) {
        let now = now_ms();
        let cues = self.sequencer.trigger(trigger, now);
        self.apply(cues);
    }

    fn resize(&mut self) {
        let (w, h) = viewport();
        self.star_surface.fit(w, h);
        self.firework_surface.fit(w, h);
        self.starfield.resize(w, h);
        self.fireworks.resize(w, h);
        log::debug!("resized to {}x{}", w, h);
    }

    fn tick(&mut self, now: f64) {
        let cues = self.sequencer.advance(now);
        self.apply(cues);

        self.starfield.update(&mut self.rng);
        self.starfield.draw(&self.star_surface.ctx);

        let bursts = self.fireworks.update(&mut self.rng, now);
        for _ in 0..bursts {
            let tones = audio::sparkle(&mut self.rng);
            if let Some(player) = &self.audio {
                player.play_all(&tones);
            }
        }
        self.fireworks.draw(&self.firework_surface.ctx);

        self.tick_ambient(now);
    }

    fn tick_ambient(&mut self, now: f64) {
        let active = self.sequencer.current().is_some();
        let step = self.ambient.update(&mut self.rng, now, active);
        for node in self.ambient_nodes.expire(step.expired) {
            node.remove();
        }
        if let Some(mote) = step.spawned {
            let node = self.spawn_mote_node(&mote.style());
            if node.is_none() {
                log::warn!("could not mount ambient mote");
            }
            self.ambient_nodes.push(node);
        }
    }

    fn spawn_mote_node(&self, style: &str) -> Option<Element> {
        let body = self.doc.body()?;
        let el = self.doc.create_element("div").ok()?;
        el.set_class_name("particle");
        el.set_attribute("style", style).ok()?;
        body.append_child(&el).ok()?;
        Some(el)
    }

    fn apply(&mut self, cues: Vec<Cue>) {
        for cue in cues {
            match cue {
                Cue::HideStartControl => {
                    dom::add_class(&self.doc, dom::START_BUTTON_ID, "hidden");
                }
                Cue::ShowScene(scene) => dom::show_scene(&self.doc, scene),
                Cue::PlayTone(tone) => {
                    if let Some(player) = &self.audio {
                        player.play(&tone);
                    }
                }
                Cue::CountdownValue(v) => dom::show_countdown_value(&self.doc, v),
                Cue::LaunchFirework => self.fireworks.launch(&mut self.rng),
                Cue::ExtinguishCandle(i) => self.extinguish(i),
                Cue::CandlesBlown(n) => {
                    if let Some(el) = dom::find(&self.doc, dom::BLOW_INSTRUCTION_ID) {
                        el.set_text_content(Some(&format!("{} Candles Blown Out!", n)));
                    }
                }
                Cue::OpenEnvelope => dom::add_class(&self.doc, dom::ENVELOPE_ID, "open"),
                Cue::RevealLetter => dom::add_class(&self.doc, dom::LETTER_ID, "show"),
            }
        }
    }

    fn extinguish(&mut self, index: usize) {
        let Some(candle) = self.candles.get_mut(index) else {
            return;
        };
        candle.extinguished = true;
        if let Some(node) = self.candle_nodes.get(index) {
            node.class_list().add_1("extinguished").ok();
        }
        let puffs = cake::smoke_puffs(candle, &mut self.rng);
        if let Some(cake_el) = dom::find(&self.doc, dom::CAKE_ID) {
            if let Err(e) = cake::mount_smoke(&self.doc, &cake_el, &puffs) {
                log::debug!("smoke for candle {} skipped: {}", index, e);
            }
        }
    }
}
