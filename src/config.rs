//! Tunables for the show. `ShowConfig::default()` is the canonical pacing; a
//! host page can override any subset through JSON when `serde_json` is enabled.

use crate::error::{Result, ShowError};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ShowConfig {
    // --- Starfield ---
    pub star_count: usize,
    /// Per-frame probability that an idle shooting star is launched.
    pub shooting_star_chance: f64,

    // --- Scene timeline (ms) ---
    pub heart_hold_ms: f64,
    pub countdown_from: u32,
    pub countdown_tick_ms: f64,
    pub birthday_hold_ms: f64,
    pub volley_count: u32,
    pub volley_interval_ms: f64,
    pub candle_stagger_ms: f64,
    pub blow_to_smile_ms: f64,
    pub smile_hold_ms: f64,
    pub letter_reveal_delay_ms: f64,
    pub celebration_count: u32,
    pub celebration_interval_ms: f64,

    // --- Fireworks ---
    pub secondary_burst_delay_ms: f64,

    // --- Ambient floating particles ---
    pub ambient_interval_ms: f64,
    pub ambient_lifetime_ms: f64,
}

impl Default for ShowConfig {
    fn default() -> Self {
        Self {
            star_count: 300,
            shooting_star_chance: 0.02,
            heart_hold_ms: 4000.0,
            countdown_from: 5,
            countdown_tick_ms: 1000.0,
            birthday_hold_ms: 4000.0,
            volley_count: 21,
            volley_interval_ms: 300.0,
            candle_stagger_ms: 100.0,
            blow_to_smile_ms: 2500.0,
            smile_hold_ms: 6000.0,
            letter_reveal_delay_ms: 500.0,
            celebration_count: 10,
            celebration_interval_ms: 200.0,
            secondary_burst_delay_ms: 200.0,
            ambient_interval_ms: 500.0,
            ambient_lifetime_ms: 3000.0,
        }
    }
}

impl ShowConfig {
    /// Reject settings that would stall or spin the timeline.
    pub fn validate(&self) -> Result<()> {
        if self.countdown_tick_ms <= 0.0 {
            return Err(ShowError::InvalidConfig("countdown_tick_ms must be positive"));
        }
        if self.volley_interval_ms <= 0.0 || self.celebration_interval_ms <= 0.0 {
            return Err(ShowError::InvalidConfig("firework intervals must be positive"));
        }
        if self.ambient_interval_ms <= 0.0 {
            return Err(ShowError::InvalidConfig("ambient_interval_ms must be positive"));
        }
        if !(0.0..=1.0).contains(&self.shooting_star_chance) {
            return Err(ShowError::InvalidConfig("shooting_star_chance must be within [0, 1]"));
        }
        Ok(())
    }

    #[cfg(feature = "serde_json")]
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: ShowConfig = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }
}
