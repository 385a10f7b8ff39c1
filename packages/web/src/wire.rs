use serde::{Deserialize, Serialize};
use serde_json::Value;
use wasm_bindgen::JsValue;

/// What gets written into `window.history.state` for every entry we own.
///
/// `id` scopes entries to one session so a restored tab never confuses its
/// own entries with those of another document on the same origin. Foreign
/// state (hash links, third-party `pushState` calls) fails to deserialize and
/// is handled as an outside navigation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct WireState {
    pub id: String,
    pub key: String,
    #[serde(default)]
    pub state: Value,
}

impl WireState {
    pub fn to_js(&self) -> JsValue {
        serde_wasm_bindgen::to_value(self).unwrap_or(JsValue::NULL)
    }

    pub fn from_js(value: &JsValue) -> Option<Self> {
        serde_wasm_bindgen::from_value(value.clone()).ok()
    }
}
