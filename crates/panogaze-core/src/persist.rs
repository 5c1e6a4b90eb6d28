//! Persisted state: library items, calibration profile and input-button
//! mapping, round-tripped as one JSON document.

use crate::hit::ActionKind;
use crate::layout::VideoFormat;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryItem {
    pub id: String,
    pub title: String,
    pub source: String,
    #[serde(default)]
    pub format: VideoFormat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle_source: Option<String>,
}

/// Physical screen class the flat plane is sized for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScreenType {
    Phone,
    #[default]
    Tablet,
    Desktop,
    Headset,
}

impl ScreenType {
    pub fn base_scale(self) -> f32 {
        match self {
            ScreenType::Phone => 1.6,
            ScreenType::Tablet => 2.0,
            ScreenType::Desktop => 2.4,
            ScreenType::Headset => 3.2,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CalibrationProfile {
    pub ipd_offset: f32,
    pub vertical_offset: f32,
    pub scale: f32,
    pub screen_type: ScreenType,
}

impl Default for CalibrationProfile {
    fn default() -> Self {
        Self {
            ipd_offset: 0.03,
            vertical_offset: 0.0,
            scale: 1.0,
            screen_type: ScreenType::default(),
        }
    }
}

/// Key (as reported by `KeyboardEvent.key`) to action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ButtonMapping {
    pub bindings: BTreeMap<String, ActionKind>,
}

impl Default for ButtonMapping {
    fn default() -> Self {
        let bindings = [
            ("r", ActionKind::Recenter),
            (" ", ActionKind::TogglePlay),
            ("g", ActionKind::ToggleRhythm),
            ("v", ActionKind::ToggleStereo),
            ("+", ActionKind::ZoomIn),
            ("=", ActionKind::ZoomIn),
            ("-", ActionKind::ZoomOut),
            ("Escape", ActionKind::DismissDefinition),
        ]
        .into_iter()
        .map(|(k, a)| (k.to_string(), a))
        .collect();
        Self { bindings }
    }
}

impl ButtonMapping {
    /// Single-character keys match case-insensitively.
    pub fn action_for(&self, key: &str) -> Option<ActionKind> {
        if let Some(a) = self.bindings.get(key) {
            return Some(*a);
        }
        if key.chars().count() == 1 {
            return self.bindings.get(&key.to_lowercase()).copied();
        }
        None
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("import document is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("import document must be a JSON object")]
    NotAnObject,
}

/// Which keys an import replaced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub library: bool,
    pub calibration_profile: bool,
    pub button_mapping: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportDocument {
    library: Option<Vec<LibraryItem>>,
    calibration_profile: Option<CalibrationProfile>,
    button_mapping: Option<ButtonMapping>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedState {
    pub library: Vec<LibraryItem>,
    pub calibration_profile: CalibrationProfile,
    pub button_mapping: ButtonMapping,
}

impl PersistedState {
    pub fn export_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Replace exactly the top-level keys present in `text`. The whole
    /// document is validated first; on error nothing changes.
    pub fn import_json(&mut self, text: &str) -> Result<ImportSummary, ImportError> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        if !value.is_object() {
            return Err(ImportError::NotAnObject);
        }
        let doc: ImportDocument = serde_json::from_value(value)?;
        let summary = ImportSummary {
            library: doc.library.is_some(),
            calibration_profile: doc.calibration_profile.is_some(),
            button_mapping: doc.button_mapping.is_some(),
        };
        if let Some(library) = doc.library {
            self.library = library;
        }
        if let Some(profile) = doc.calibration_profile {
            self.calibration_profile = profile;
        }
        if let Some(mapping) = doc.button_mapping {
            self.button_mapping = mapping;
        }
        log::info!("[persist] imported {:?}", summary);
        Ok(summary)
    }

    pub fn item(&self, id: &str) -> Option<&LibraryItem> {
        self.library.iter().find(|i| i.id == id)
    }
}
