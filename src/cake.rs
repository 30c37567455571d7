//! Three-tier cake with 19 candles, and the smoke puffs left when they go out.

use web_sys::{Document, Element};

use crate::error::Result;
use crate::rng::Random;

pub const CANDLE_COUNT: usize = 19;
pub const SMOKE_PER_CANDLE: usize = 3;

/// Cake tier a candle stands on, bottom (0) to top (2).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tier {
    Bottom,
    Middle,
    Top,
}

impl Tier {
    pub fn from_index(layer: u8) -> Self {
        match layer {
            2 => Tier::Top,
            1 => Tier::Middle,
            _ => Tier::Bottom,
        }
    }

    pub fn bottom_px(self) -> f64 {
        match self {
            Tier::Top => 210.0,
            Tier::Middle => 140.0,
            Tier::Bottom => 70.0,
        }
    }
}

/// (left %, tier index) for each candle, in blow-out order.
#[rustfmt::skip]
const PLACEMENTS: [(f64, u8); CANDLE_COUNT] = [
    (20.0, 2), (50.0, 2), (80.0, 2),
    (35.0, 1), (65.0, 1),
    (20.0, 0), (40.0, 0), (60.0, 0), (80.0, 0),
    (10.0, 0), (30.0, 0), (50.0, 0), (70.0, 0), (90.0, 0),
    (50.0, 2), (25.0, 1), (75.0, 1), (50.0, 0), (15.0, 2),
];

#[derive(Clone, Debug, PartialEq)]
pub struct Candle {
    pub index: usize,
    pub left_pct: f64,
    pub tier: Tier,
    pub extinguished: bool,
}

impl Candle {
    pub fn bottom_px(&self) -> f64 {
        self.tier.bottom_px()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SmokePuff {
    pub left_pct: f64,
    pub bottom_px: f64,
    pub delay_s: f64,
}

pub fn candles() -> Vec<Candle> {
    PLACEMENTS
        .iter()
        .enumerate()
        .map(|(index, &(left_pct, layer))| Candle {
            index,
            left_pct,
            tier: Tier::from_index(layer),
            extinguished: false,
        })
        .collect()
}

/// Smoke rising from just above a candle's flame, nudged up to 5% sideways.
pub fn smoke_puffs(candle: &Candle, rng: &mut impl Random) -> [SmokePuff; SMOKE_PER_CANDLE] {
    std::array::from_fn(|j| SmokePuff {
        left_pct: candle.left_pct + rng.jitter(5.0),
        bottom_px: candle.bottom_px() + 60.0,
        delay_s: j as f64 * 0.2,
    })
}

/// Creates candle elements under `cake` and returns them indexed like `candles`.
pub fn mount_candles(doc: &Document, cake: &Element, candles: &[Candle]) -> Result<Vec<Element>> {
    let mut out = Vec::with_capacity(candles.len());
    for c in candles {
        let el = doc.create_element("div")?;
        el.set_class_name("candle");
        el.set_attribute(
            "style",
            &format!("left:{}%; bottom:{}px;", c.left_pct, c.bottom_px()),
        )?;
        el.set_attribute("data-index", &c.index.to_string())?;
        cake.append_child(&el)?;
        out.push(el);
    }
    Ok(out)
}

pub fn mount_smoke(doc: &Document, cake: &Element, puffs: &[SmokePuff]) -> Result<()> {
    for p in puffs {
        let el = doc.create_element("div")?;
        el.set_class_name("smoke");
        el.set_attribute(
            "style",
            &format!(
                "left:{}%; bottom:{}px; animation-delay:{}s;",
                p.left_pct, p.bottom_px, p.delay_s
            ),
        )?;
        cake.append_child(&el)?;
    }
    Ok(())
}
