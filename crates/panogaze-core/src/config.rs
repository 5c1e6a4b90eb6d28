use crate::constants::{DWELL_DURATION_MS, GAZE_PROBE_INTERVAL_MS, MIN_PROBE_INTERVAL_MS};
use crate::orientation::{DragAxis, InputMode};
use serde::{Deserialize, Serialize};

/// Viewer settings supplied by the settings UI.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewerConfig {
    pub input_mode: InputMode,
    pub drag_axis: DragAxis,
    /// Fall back to touch silently when the sensor is denied.
    pub touch_fallback: bool,
    pub dwell_ms: f64,
    pub probe_interval_ms: i32,
    /// Split-screen VR display.
    pub stereo_display: bool,
    pub rhythm_mode: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            input_mode: InputMode::Touch,
            drag_axis: DragAxis::YawOnly,
            touch_fallback: true,
            dwell_ms: DWELL_DURATION_MS,
            probe_interval_ms: GAZE_PROBE_INTERVAL_MS,
            stereo_display: false,
            rhythm_mode: false,
        }
    }
}

impl ViewerConfig {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Gaze probe period actually scheduled.
    pub fn probe_interval(&self) -> i32 {
        self.probe_interval_ms.max(MIN_PROBE_INTERVAL_MS)
    }
}
