// Shared helpers for the dashboard components.

/// Currency label shown in the tooltip and notices. Integral values
/// render without decimals, anything else gets two.
pub fn format_currency(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("£{}", value as i64)
    } else {
        format!("£{value:.2}")
    }
}

pub fn clog(msg: &str) {
    web_sys::console::log_1(&wasm_bindgen::JsValue::from_str(msg));
}
