//! Background starfield: a fixed arena of twinkling stars plus a tiny pool of
//! reusable shooting stars. Runs every frame for the lifetime of the page.

use std::f64::consts::{FRAC_PI_4, TAU};

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::rng::Random;

pub const SHOOTING_STAR_POOL: usize = 3;

const MIN_BRIGHTNESS: f64 = 0.3;
const MAX_BRIGHTNESS: f64 = 1.0;
const SHOOTING_STAR_FADE: f64 = 0.02;

#[derive(Clone, Debug)]
pub struct Star {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub size: f64,
    pub brightness: f64,
    pub twinkle: f64,
}

impl Star {
    fn spawn(rng: &mut impl Random, width: f64, height: f64) -> Self {
        Self {
            x: rng.next_f64() * width,
            y: rng.next_f64() * height,
            size: rng.next_f64() * 2.0,
            vx: (rng.next_f64() - 0.5) * 0.2,
            vy: (rng.next_f64() - 0.5) * 0.2,
            brightness: rng.next_f64(),
            twinkle: 0.01 + rng.next_f64() * 0.03,
        }
    }

    fn update(&mut self, width: f64, height: f64) {
        self.x += self.vx;
        self.y += self.vy;
        self.brightness += self.twinkle;
        if self.brightness > MAX_BRIGHTNESS || self.brightness < MIN_BRIGHTNESS {
            self.twinkle = -self.twinkle;
        }
        // Wrap to the opposite edge.
        if self.x < 0.0 {
            self.x = width;
        } else if self.x > width {
            self.x = 0.0;
        }
        if self.y < 0.0 {
            self.y = height;
        } else if self.y > height {
            self.y = 0.0;
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ShootingStar {
    pub x: f64,
    pub y: f64,
    pub length: f64,
    pub speed: f64,
    pub angle: f64,
    pub life: f64,
    pub active: bool,
}

impl ShootingStar {
    fn reset(&mut self, rng: &mut impl Random, width: f64) {
        self.x = rng.next_f64() * width;
        self.y = 0.0;
        self.length = rng.next_f64() * 80.0 + 20.0;
        self.speed = rng.next_f64() * 10.0 + 5.0;
        self.angle = rng.next_f64() * FRAC_PI_4 + FRAC_PI_4;
        self.life = 1.0;
        self.active = false;
    }

    fn activate(&mut self, rng: &mut impl Random, width: f64) {
        self.reset(rng, width);
        self.active = true;
    }

    fn update(&mut self, width: f64, height: f64) {
        if !self.active {
            return;
        }
        self.x += self.angle.cos() * self.speed;
        self.y += self.angle.sin() * self.speed;
        self.life -= SHOOTING_STAR_FADE;
        if self.life <= 0.0 || self.x > width || self.y > height {
            self.active = false;
        }
    }

    fn tail(&self) -> (f64, f64) {
        (
            self.x - self.angle.cos() * self.length,
            self.y - self.angle.sin() * self.length,
        )
    }
}

pub struct Starfield {
    width: f64,
    height: f64,
    stars: Vec<Star>,
    shooting: [ShootingStar; SHOOTING_STAR_POOL],
    launch_chance: f64,
}

impl Starfield {
    pub fn new(
        rng: &mut impl Random,
        width: f64,
        height: f64,
        star_count: usize,
        launch_chance: f64,
    ) -> Self {
        let stars = (0..star_count)
            .map(|_| Star::spawn(rng, width, height))
            .collect();
        let mut shooting: [ShootingStar; SHOOTING_STAR_POOL] = Default::default();
        for s in shooting.iter_mut() {
            s.reset(rng, width);
        }
        Self {
            width,
            height,
            stars,
            shooting,
            launch_chance,
        }
    }

    /// Stars keep their coordinates; anything now outside wraps on its next step.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn shooting_stars(&self) -> &[ShootingStar] {
        &self.shooting
    }

    pub fn active_shooting_stars(&self) -> usize {
        self.shooting.iter().filter(|s| s.active).count()
    }

    /// Launch the first idle shooting star, if any slot is free. Returns its slot.
    pub fn activate_shooting_star(&mut self, rng: &mut impl Random) -> Option<usize> {
        let slot = self.shooting.iter().position(|s| !s.active)?;
        self.shooting[slot].activate(rng, self.width);
        Some(slot)
    }

    pub fn update(&mut self, rng: &mut impl Random) {
        let (w, h) = (self.width, self.height);
        for star in &mut self.stars {
            star.update(w, h);
        }
        if rng.chance(self.launch_chance) {
            self.activate_shooting_star(rng);
        }
        for s in &mut self.shooting {
            s.update(w, h);
        }
    }

    pub fn draw(&self, ctx: &CanvasRenderingContext2d) {
        // Translucent black instead of a clear leaves a short motion trail.
        ctx.set_fill_style(&JsValue::from_str("rgba(0, 0, 0, 0.1)"));
        ctx.fill_rect(0.0, 0.0, self.width, self.height);

        for star in &self.stars {
            ctx.set_fill_style(&JsValue::from_str(&format!(
                "rgba(255, 255, 255, {})",
                star.brightness.clamp(0.0, 1.0)
            )));
            ctx.begin_path();
            ctx.arc(star.x, star.y, star.size, 0.0, TAU).ok();
            ctx.fill();
            // glow pass
            ctx.set_shadow_blur(10.0);
            ctx.set_shadow_color("white");
            ctx.fill();
            ctx.set_shadow_blur(0.0);
        }

        ctx.set_line_width(2.0);
        for s in self.shooting.iter().filter(|s| s.active) {
            let (tx, ty) = s.tail();
            let gradient = ctx.create_linear_gradient(s.x, s.y, tx, ty);
            gradient
                .add_color_stop(0.0, &format!("rgba(255, 255, 255, {})", s.life.max(0.0)))
                .ok();
            gradient.add_color_stop(1.0, "transparent").ok();
            ctx.set_stroke_style(&gradient);
            ctx.begin_path();
            ctx.move_to(s.x, s.y);
            ctx.line_to(tx, ty);
            ctx.stroke();
        }
    }
}
