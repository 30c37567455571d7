//! Setup-time errors. The frame loop itself never fails; it skips what is missing.

use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum ShowError {
    #[error("no window")]
    NoWindow,
    #[error("no document")]
    NoDocument,
    #[error("element #{0} not found")]
    MissingElement(&'static str),
    #[error("canvas #{0} has no 2d context")]
    NoCanvasContext(&'static str),
    #[error("audio unavailable: {0}")]
    Audio(String),
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
    #[cfg(feature = "serde_json")]
    #[error("config parse failed: {0}")]
    ConfigParse(#[from] serde_json::Error),
    #[error("js error: {0}")]
    Js(String),
}

impl From<JsValue> for ShowError {
    fn from(value: JsValue) -> Self {
        ShowError::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}

impl From<ShowError> for JsValue {
    fn from(err: ShowError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ShowError>;
