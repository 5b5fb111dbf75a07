use wasm_bindgen::prelude::*;

use crate::{ImageConfig, Scenario};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();

    let level = ImageConfig::default()
        .log_level
        .to_level_filter()
        .to_level()
        .unwrap_or(log::Level::Info);
    if let Err(e) = console_log::init_with_level(level) {
        web_sys::console::log_1(&format!("Logger already initialized: {}", e).into());
    }
    log::info!("🖼️ lazyimg WASM ready");
}

/// Play a JSON scenario and return the report as JSON.
#[wasm_bindgen]
pub fn run_scenario(json: &str) -> Result<String, JsValue> {
    let scenario = Scenario::from_json_str(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let report = scenario.run().map_err(|e| JsValue::from_str(&e.to_string()))?;
    serde_json::to_string(&report).map_err(|e| JsValue::from_str(&e.to_string()))
}
