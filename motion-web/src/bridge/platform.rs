//! Platform detection from the browser environment

use wasm_bindgen::JsValue;

use crate::config::Platform;

/// Read user agent, touch support and viewport width from `window`
///
/// Outside a browser window (workers, tests) this falls back to desktop.
pub fn detect_platform() -> Platform {
    let Some(window) = web_sys::window() else {
        return Platform::Desktop;
    };
    let navigator = window.navigator();

    let user_agent = navigator.user_agent().unwrap_or_default();
    let has_touch = js_sys::Reflect::has(window.as_ref(), &JsValue::from_str("ontouchstart")).unwrap_or(false)
        || navigator.max_touch_points() > 0;
    let viewport_width = window
        .inner_width()
        .ok()
        .and_then(|w| w.as_f64())
        .unwrap_or(f64::INFINITY);

    let platform = Platform::detect(&user_agent, has_touch, viewport_width);
    tracing::info!(
        platform = platform.as_str(),
        has_touch,
        viewport_width,
        "platform detected"
    );
    platform
}
