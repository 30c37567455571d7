//! Thin DOM helpers. Per-frame helpers tolerate missing elements: a lookup
//! miss is logged at debug level and the operation becomes a no-op. Setup
//! uses `require`, which reports the miss as `ShowError::MissingElement`.

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlCanvasElement, HtmlElement};

use crate::error::{Result, ShowError};
use crate::scene::Scene;

pub const START_BUTTON_ID: &str = "start-btn";
pub const BLOW_INSTRUCTION_ID: &str = "blow-instruction";
pub const ENVELOPE_ID: &str = "envelope";
pub const LETTER_ID: &str = "letter";
pub const COUNTDOWN_NUMBER_ID: &str = "countdown-num";
pub const HEART_CONTAINER_ID: &str = "heart-container";
pub const CAKE_ID: &str = "cake";
pub const STAR_CANVAS_ID: &str = "star-canvas";
pub const FIREWORKS_CANVAS_ID: &str = "fireworks-canvas";

pub fn find(doc: &Document, id: &str) -> Option<Element> {
    let el = doc.get_element_by_id(id);
    if el.is_none() {
        log::debug!("#{} missing, skipping", id);
    }
    el
}

/// Lookup for elements setup cannot do without; the caller decides whether
/// the miss is fatal.
pub fn require(doc: &Document, id: &'static str) -> Result<Element> {
    doc.get_element_by_id(id).ok_or(ShowError::MissingElement(id))
}

pub fn find_html(doc: &Document, id: &str) -> Option<HtmlElement> {
    find(doc, id).and_then(|el| el.dyn_into::<HtmlElement>().ok())
}

pub fn add_class(doc: &Document, id: &str, class: &str) {
    if let Some(el) = find(doc, id) {
        el.class_list().add_1(class).ok();
    }
}

/// Reading `offsetWidth` forces a synchronous layout so a following class or
/// animation change restarts its CSS transition.
fn force_reflow(el: &HtmlElement) {
    let _ = el.offset_width();
}

/// Hide every scene, then reveal `scene` and flag it active.
pub fn show_scene(doc: &Document, scene: Scene) {
    for other in Scene::ALL {
        if let Some(el) = doc
            .get_element_by_id(other.element_id())
            .and_then(|e| e.dyn_into::<HtmlElement>().ok())
        {
            el.class_list().remove_1("active").ok();
            el.style().set_property("display", "none").ok();
        }
    }
    if let Some(target) = find_html(doc, scene.element_id()) {
        target.style().set_property("display", "flex").ok();
        force_reflow(&target);
        target.class_list().add_1("active").ok();
    }
}

pub fn show_countdown_value(doc: &Document, value: u32) {
    if let Some(num) = find_html(doc, COUNTDOWN_NUMBER_ID) {
        num.set_text_content(Some(&value.to_string()));
        let style = num.style();
        style.set_property("animation", "none").ok();
        force_reflow(&num);
        style
            .set_property("animation", "count-pulse 1s ease-in-out")
            .ok();
    }
}

/// Reuse the canvas with `id`, or create a fixed full-viewport one.
pub fn ensure_canvas(doc: &Document, id: &str, z_index: i32) -> Result<HtmlCanvasElement> {
    if let Some(el) = doc.get_element_by_id(id) {
        return el
            .dyn_into()
            .map_err(|_| ShowError::Js(format!("#{} is not a canvas", id)));
    }
    let c: HtmlCanvasElement = doc
        .create_element("canvas")?
        .dyn_into()
        .map_err(|_| ShowError::Js("created element is not a canvas".into()))?;
    c.set_id(id);
    c.set_attribute(
        "style",
        &format!(
            "position:fixed; left:0; top:0; width:100%; height:100%; pointer-events:none; z-index:{};",
            z_index
        ),
    )?;
    if let Some(body) = doc.body() {
        body.append_child(&c)?;
    }
    Ok(c)
}
