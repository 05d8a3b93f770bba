//! Palette persistence in `window.localStorage`.

use lc_core::{KeyValueStore, StyleError};
use wasm_bindgen::JsValue;

pub struct BrowserStore {
    storage: web_sys::Storage,
}

impl BrowserStore {
    /// Open the page's local storage. Fails outside a window context or
    /// when storage is disabled.
    pub fn open() -> Result<Self, StyleError> {
        let window = web_sys::window().ok_or_else(|| StyleError::Store("no window".into()))?;
        let storage = window
            .local_storage()
            .map_err(js_error)?
            .ok_or_else(|| StyleError::Store("localStorage disabled".into()))?;
        Ok(Self { storage })
    }
}

fn js_error(err: JsValue) -> StyleError {
    StyleError::Store(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

impl KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> Result<Option<String>, StyleError> {
        self.storage.get_item(key).map_err(js_error)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StyleError> {
        self.storage.set_item(key, value).map_err(js_error)
    }
}
