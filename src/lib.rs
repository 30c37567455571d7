//! Birthday Show core crate.
//!
//! A single-page celebration rendered from Rust: a twinkling starfield, an LED
//! heart, a countdown, fireworks, a cake whose candles blow out on click and a
//! letter reveal. The animation models (`starfield`, `fireworks`, `heart`,
//! `cake`, `ambient`, `scene`) are plain Rust and run natively under
//! `cargo test`; `show` is the browser host that drives them from
//! `requestAnimationFrame` and click handlers.

use wasm_bindgen::prelude::*;

pub mod ambient;
pub mod audio;
pub mod cake;
pub mod config;
pub mod dom;
pub mod error;
pub mod fireworks;
pub mod heart;
pub mod logging;
pub mod rng;
pub mod scene;
pub mod starfield;
mod show;

pub use config::ShowConfig;
pub use error::ShowError;
pub use scene::{Cue, Scene, Sequencer, Trigger};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    logging::init(level);
}

// -----------------------------------------------------------------------------
// Entrypoints
// -----------------------------------------------------------------------------

/// Start the show with the default pacing.
#[wasm_bindgen]
pub fn start_show() -> Result<(), JsValue> {
    show::start(ShowConfig::default()).map_err(JsValue::from)
}

/// Start the show with a JSON config; omitted fields keep their defaults.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn start_show_with_config(json: &str) -> Result<(), JsValue> {
    let config = ShowConfig::from_json(json)?;
    show::start(config).map_err(JsValue::from)
}
