//! Firework rockets and explosion particles. Collections grow by append and
//! shrink by filtered removal once per frame.

use std::collections::VecDeque;
use std::f64::consts::{FRAC_PI_2, TAU};
use std::fmt;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::rng::Random;

pub const PRIMARY_BURST: usize = 80;
pub const SECONDARY_BURST: usize = 40;
/// Secondary particles land within +/- this many px of the apex on each axis.
pub const SECONDARY_SPREAD: f64 = 25.0;
pub const TRAIL_LEN: usize = 5;

const ROCKET_SPEED: f64 = 8.0;
const ROCKET_GRAVITY: f64 = 0.1;
const PARTICLE_GRAVITY: f64 = 0.05;
const PARTICLE_DRAG: f64 = 0.98;
const PARTICLE_MIN_SPEED: f64 = 2.0;
const PARTICLE_MAX_SPEED: f64 = 8.0;

/// Fully saturated color in the show's magenta/violet band.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsl {
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
}

impl Hsl {
    pub const fn new(hue: f64, saturation: f64, lightness: f64) -> Self {
        Self {
            hue,
            saturation,
            lightness,
        }
    }

    /// Random hue in [280, 340), 100% saturation, 50% lightness.
    pub fn random_violet(rng: &mut impl Random) -> Self {
        Self::new(rng.range(280.0, 340.0), 100.0, 50.0)
    }
}

impl fmt::Display for Hsl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hsl({},{}%,{}%)",
            self.hue, self.saturation, self.lightness
        )
    }
}

#[derive(Clone, Debug)]
pub struct Firework {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub target_y: f64,
    pub color: Hsl,
    pub trail: VecDeque<(f64, f64)>,
    pub dead: bool,
}

impl Firework {
    pub fn new(x: f64, y: f64, target_y: f64, color: Hsl) -> Self {
        let angle = -FRAC_PI_2;
        Self {
            x,
            y,
            vx: angle.cos() * ROCKET_SPEED,
            vy: angle.sin() * ROCKET_SPEED,
            target_y,
            color,
            trail: VecDeque::with_capacity(TRAIL_LEN + 1),
            dead: false,
        }
    }

    /// Advance one frame. Returns true on the frame the rocket bursts.
    fn update(&mut self) -> bool {
        self.trail.push_back((self.x, self.y));
        if self.trail.len() > TRAIL_LEN {
            self.trail.pop_front();
        }
        self.x += self.vx;
        self.y += self.vy;
        self.vy += ROCKET_GRAVITY;

        if self.y <= self.target_y || self.vy >= 0.0 {
            self.dead = true;
        }
        self.dead
    }

    fn draw(&self, ctx: &CanvasRenderingContext2d) {
        ctx.set_stroke_style(&JsValue::from_str(&self.color.to_string()));
        ctx.set_line_width(3.0);
        ctx.begin_path();
        let (sx, sy) = self.trail.front().copied().unwrap_or((self.x, self.y));
        ctx.move_to(sx, sy);
        for &(px, py) in &self.trail {
            ctx.line_to(px, py);
        }
        ctx.line_to(self.x, self.y);
        ctx.stroke();

        ctx.set_fill_style(&JsValue::from_str("#fff"));
        ctx.begin_path();
        ctx.arc(self.x, self.y, 3.0, 0.0, TAU).ok();
        ctx.fill();
    }
}

#[derive(Clone, Debug)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub life: f64,
    pub decay: f64,
    pub color: Hsl,
}

impl Particle {
    pub fn new(rng: &mut impl Random, x: f64, y: f64, color: Hsl) -> Self {
        let angle = rng.next_f64() * TAU;
        let speed = rng.range(PARTICLE_MIN_SPEED, PARTICLE_MAX_SPEED);
        Self {
            x,
            y,
            vx: angle.cos() * speed,
            vy: angle.sin() * speed,
            life: 1.0,
            decay: rng.range(0.01, 0.025),
            color,
        }
    }

    pub fn speed(&self) -> f64 {
        self.vx.hypot(self.vy)
    }

    fn update(&mut self) {
        self.vy += PARTICLE_GRAVITY;
        self.x += self.vx;
        self.y += self.vy;
        self.life -= self.decay;
        self.vx *= PARTICLE_DRAG;
        self.vy *= PARTICLE_DRAG;
    }

    fn draw(&self, ctx: &CanvasRenderingContext2d, color: &str) {
        ctx.set_global_alpha(self.life.max(0.0));
        ctx.set_fill_style(&JsValue::from_str(color));
        ctx.begin_path();
        ctx.arc(self.x, self.y, 3.0, 0.0, TAU).ok();
        ctx.fill();
        ctx.set_shadow_blur(10.0);
        ctx.set_shadow_color(color);
        ctx.fill();
        ctx.set_shadow_blur(0.0);
        ctx.set_global_alpha(1.0);
    }
}

/// Second wave of an explosion waiting for its delay to elapse.
#[derive(Clone, Copy, Debug)]
struct PendingBurst {
    due_ms: f64,
    x: f64,
    y: f64,
}

pub struct FireworkDisplay {
    width: f64,
    height: f64,
    secondary_delay_ms: f64,
    fireworks: Vec<Firework>,
    particles: Vec<Particle>,
    pending: Vec<PendingBurst>,
}

impl FireworkDisplay {
    pub fn new(width: f64, height: f64, secondary_delay_ms: f64) -> Self {
        Self {
            width,
            height,
            secondary_delay_ms,
            fireworks: Vec::new(),
            particles: Vec::new(),
            pending: Vec::new(),
        }
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn fireworks(&self) -> &[Firework] {
        &self.fireworks
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn pending_bursts(&self) -> usize {
        self.pending.len()
    }

    /// Queue a rocket from the bottom edge at a random column.
    pub fn launch(&mut self, rng: &mut impl Random) {
        let x = rng.next_f64() * self.width;
        let target_y = rng.next_f64() * self.height * 0.4 + 50.0;
        let color = Hsl::random_violet(rng);
        self.fireworks
            .push(Firework::new(x, self.height, target_y, color));
    }

    /// Burst at `(x, y)`: the primary ring now, the secondary wave after the
    /// configured delay.
    pub fn explode(&mut self, rng: &mut impl Random, now_ms: f64, x: f64, y: f64, color: Hsl) {
        self.particles
            .extend((0..PRIMARY_BURST).map(|_| Particle::new(rng, x, y, color)));
        self.pending.push(PendingBurst {
            due_ms: now_ms + self.secondary_delay_ms,
            x,
            y,
        });
    }

    fn release_due_bursts(&mut self, rng: &mut impl Random, now_ms: f64) {
        let (due, waiting): (Vec<PendingBurst>, Vec<PendingBurst>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|b| b.due_ms <= now_ms);
        self.pending = waiting;
        for burst in due {
            for _ in 0..SECONDARY_BURST {
                let px = burst.x + rng.jitter(SECONDARY_SPREAD);
                let py = burst.y + rng.jitter(SECONDARY_SPREAD);
                let color = Hsl::random_violet(rng);
                self.particles.push(Particle::new(rng, px, py, color));
            }
        }
    }

    /// One simulation step. Returns how many rockets burst this frame so the
    /// caller can cue a sparkle for each.
    pub fn update(&mut self, rng: &mut impl Random, now_ms: f64) -> usize {
        self.release_due_bursts(rng, now_ms);

        self.fireworks.retain(|f| !f.dead);
        self.particles.retain(|p| p.life > 0.0);

        let mut bursts = Vec::new();
        for f in &mut self.fireworks {
            if f.update() {
                bursts.push((f.x, f.y, f.color));
            }
        }
        for &(x, y, color) in &bursts {
            self.explode(rng, now_ms, x, y, color);
        }
        for p in &mut self.particles {
            p.update();
        }
        bursts.len()
    }

    pub fn draw(&self, ctx: &CanvasRenderingContext2d) {
        ctx.clear_rect(0.0, 0.0, self.width, self.height);
        for f in &self.fireworks {
            f.draw(ctx);
        }
        for p in &self.particles {
            p.draw(ctx, &p.color.to_string());
        }
    }
}
