// localStorage mirror of the persisted document: one entry per top-level key.

use crate::constants::{
    STORAGE_BUTTON_MAPPING, STORAGE_CALIBRATION, STORAGE_LIBRARY, STORAGE_VIEWER_CONFIG,
};
use crate::dom;
use panogaze_core::{PersistedState, ViewerConfig};

const PERSISTED_KEYS: [&str; 3] = [STORAGE_LIBRARY, STORAGE_CALIBRATION, STORAGE_BUTTON_MAPPING];

/// Load whatever keys are stored. Each key is imported on its own so one bad
/// entry does not discard the others.
pub fn load_persisted() -> PersistedState {
    let mut state = PersistedState::default();
    for key in PERSISTED_KEYS {
        let Some(raw) = dom::storage_get(key) else {
            continue;
        };
        let mut doc = serde_json::Map::new();
        match serde_json::from_str::<serde_json::Value>(&raw) {
            Ok(v) => {
                doc.insert(key.to_string(), v);
            }
            Err(e) => {
                log::warn!("[storage] ignoring unreadable {}: {}", key, e);
                continue;
            }
        }
        let text = serde_json::Value::Object(doc).to_string();
        if let Err(e) = state.import_json(&text) {
            log::warn!("[storage] ignoring invalid {}: {}", key, e);
        }
    }
    state
}

pub fn save_persisted(state: &PersistedState) {
    let value = match serde_json::to_value(state) {
        Ok(v) => v,
        Err(e) => {
            log::error!("[storage] serialize error: {}", e);
            return;
        }
    };
    for key in PERSISTED_KEYS {
        if let Some(v) = value.get(key) {
            dom::storage_set(key, &v.to_string());
        }
    }
}

pub fn load_config() -> ViewerConfig {
    dom::storage_get(STORAGE_VIEWER_CONFIG)
        .and_then(|raw| match ViewerConfig::from_json(&raw) {
            Ok(c) => Some(c),
            Err(e) => {
                log::warn!("[storage] ignoring invalid viewer config: {}", e);
                None
            }
        })
        .unwrap_or_default()
}

pub fn save_config(config: &ViewerConfig) {
    match serde_json::to_string(config) {
        Ok(text) => dom::storage_set(STORAGE_VIEWER_CONFIG, &text),
        Err(e) => log::error!("[storage] serialize config error: {}", e),
    }
}
