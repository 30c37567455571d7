//! LED heart: concentric glowing rings plus a cloud of dots sampled on the
//! classic parametric heart curve. Built once; CSS does the animating.

use std::f64::consts::TAU;

use web_sys::{Document, Element};

use crate::error::Result;
use crate::rng::Random;

pub const RING_COUNT: u32 = 15;
pub const PARTICLE_COUNT: usize = 200;
pub const CENTER: (f64, f64) = (300.0, 300.0);

const RING_STEP_PX: f64 = 40.0;
const CURVE_SCALE: f64 = 12.0;
const MAX_RADIUS_FACTOR: f64 = 0.8;

#[derive(Clone, Debug, PartialEq)]
pub struct Ring {
    pub diameter_px: f64,
    pub hue: f64,
    pub delay_s: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct HeartDot {
    pub left_px: f64,
    pub top_px: f64,
    pub delay_s: f64,
    pub edge_hue: f64,
}

impl HeartDot {
    pub fn background(&self) -> String {
        format!(
            "radial-gradient(circle, #fff 0%, #ff00ff 50%, hsl({}, 100%, 30%) 100%)",
            self.edge_hue
        )
    }
}

/// Unit heart curve at parameter `t`; y grows downward like screen space.
pub fn heart_curve(t: f64) -> (f64, f64) {
    let x = 16.0 * t.sin().powi(3);
    let y = -(13.0 * t.cos() - 5.0 * (2.0 * t).cos() - 2.0 * (3.0 * t).cos() - (4.0 * t).cos());
    (x, y)
}

pub struct HeartLayout {
    pub rings: Vec<Ring>,
    pub dots: Vec<HeartDot>,
}

impl HeartLayout {
    pub fn generate(rng: &mut impl Random) -> Self {
        let rings = (1..=RING_COUNT)
            .map(|r| Ring {
                diameter_px: r as f64 * RING_STEP_PX,
                hue: 280.0 + r as f64 * 10.0,
                delay_s: r as f64 * 0.1,
            })
            .collect();

        let dots = (0..PARTICLE_COUNT)
            .map(|_| {
                let t = rng.next_f64() * TAU;
                let scale = rng.next_f64() * MAX_RADIUS_FACTOR * CURVE_SCALE;
                let (hx, hy) = heart_curve(t);
                HeartDot {
                    left_px: hx * scale + CENTER.0,
                    top_px: hy * scale + CENTER.1,
                    delay_s: rng.next_f64() * 2.0,
                    edge_hue: 280.0 + rng.next_f64() * 40.0,
                }
            })
            .collect();

        Self { rings, dots }
    }

    /// Append rings and dots to `container`.
    pub fn mount(&self, doc: &Document, container: &Element) -> Result<()> {
        for ring in &self.rings {
            let el = doc.create_element("div")?;
            el.set_class_name("led-ring");
            el.set_attribute(
                "style",
                &format!(
                    "width:{d}px; height:{d}px; color:hsl({h}, 100%, 50%); animation-delay:{s}s;",
                    d = ring.diameter_px,
                    h = ring.hue,
                    s = ring.delay_s
                ),
            )?;
            container.append_child(&el)?;
        }
        for dot in &self.dots {
            let el = doc.create_element("div")?;
            el.set_class_name("led-particle");
            el.set_attribute(
                "style",
                &format!(
                    "left:{}px; top:{}px; animation-delay:{}s; background:{};",
                    dot.left_px,
                    dot.top_px,
                    dot.delay_s,
                    dot.background()
                ),
            )?;
            container.append_child(&el)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::XorShift64;

    #[test]
    fn curve_hits_known_points() {
        // t = 0: bottom cusp sits above centre in screen space (y = -5)
        let (x, y) = heart_curve(0.0);
        assert!(x.abs() < 1e-9);
        assert!((y + 5.0).abs() < 1e-9);
        // t = pi/2: widest point
        let (x, _) = heart_curve(std::f64::consts::FRAC_PI_2);
        assert!((x - 16.0).abs() < 1e-9);
    }

    #[test]
    fn rings_grow_with_hue_progression() {
        let mut rng = XorShift64::seeded(1);
        let layout = HeartLayout::generate(&mut rng);
        assert_eq!(layout.rings.len(), RING_COUNT as usize);
        assert_eq!(layout.rings[0].diameter_px, 40.0);
        assert_eq!(layout.rings[14].diameter_px, 600.0);
        assert_eq!(layout.rings[0].hue, 290.0);
        assert!((layout.rings[14].delay_s - 1.5).abs() < 1e-9);
    }

    #[test]
    fn dots_stay_inside_scaled_heart_box() {
        let mut rng = XorShift64::seeded(2);
        let layout = HeartLayout::generate(&mut rng);
        assert_eq!(layout.dots.len(), PARTICLE_COUNT);
        let max = MAX_RADIUS_FACTOR * CURVE_SCALE;
        for d in &layout.dots {
            assert!((d.left_px - CENTER.0).abs() <= 16.0 * max + 1e-9);
            assert!((d.top_px - CENTER.1).abs() <= 17.0 * max + 1e-9);
            assert!((0.0..2.0).contains(&d.delay_s));
            assert!((280.0..320.0).contains(&d.edge_hue));
        }
    }
}
