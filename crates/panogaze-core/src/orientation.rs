//! Orientation fusion and recentering.
//!
//! Raw device-orientation samples and pointer-drag deltas are folded into a
//! single two-axis [`HeadRotation`]. Both the renderer and the gaze probe read
//! the same [`OrientationFusion`] every tick, so they always agree on what is
//! "forward".

use crate::constants::{PITCH_LIMIT_DEG, TOUCH_SENSITIVITY_DEG_PER_PX};
use serde::{Deserialize, Serialize};

/// Applied rotation that drives both the camera and the hit-test projection.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HeadRotation {
    pub pitch_deg: f32,
    pub yaw_deg: f32,
}

impl HeadRotation {
    pub const ZERO: Self = Self {
        pitch_deg: 0.0,
        yaw_deg: 0.0,
    };

    pub fn new(pitch_deg: f32, yaw_deg: f32) -> Self {
        Self {
            pitch_deg: clamp_pitch(pitch_deg),
            yaw_deg: wrap_yaw(yaw_deg),
        }
    }
}

/// Raw device-orientation reading. Platforms that deny or do not support an
/// axis report `None` for it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OrientationSample {
    pub alpha: Option<f32>,
    pub beta: Option<f32>,
    pub gamma: Option<f32>,
}

impl OrientationSample {
    pub fn new(alpha: f32, beta: f32, gamma: f32) -> Self {
        Self {
            alpha: Some(alpha),
            beta: Some(beta),
            gamma: Some(gamma),
        }
    }

    fn complete(&self) -> Option<CalibrationBase> {
        let alpha = self.alpha.filter(|v| v.is_finite())?;
        let beta = self.beta.filter(|v| v.is_finite())?;
        let gamma = self.gamma.filter(|v| v.is_finite())?;
        Some(CalibrationBase { alpha, beta, gamma })
    }
}

/// Raw reading captured at the last recenter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CalibrationBase {
    pub alpha: f32,
    pub beta: f32,
    pub gamma: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InputMode {
    Sensor,
    #[default]
    Touch,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DragAxis {
    #[default]
    YawOnly,
    Free,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SensorPermission {
    #[default]
    Unknown,
    Granted,
    Denied,
}

/// Accumulator for pointer-drag rotation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TouchRotation {
    pub yaw_deg: f32,
    pub pitch_deg: f32,
}

/// Wrap any angle into (-180, 180].
#[inline]
pub fn wrap_yaw(deg: f32) -> f32 {
    if !deg.is_finite() {
        return 0.0;
    }
    let d = deg.rem_euclid(360.0);
    if d > 180.0 {
        d - 360.0
    } else {
        d
    }
}

#[inline]
pub fn clamp_pitch(deg: f32) -> f32 {
    if !deg.is_finite() {
        return 0.0;
    }
    deg.clamp(-PITCH_LIMIT_DEG, PITCH_LIMIT_DEG)
}

#[derive(Clone, Debug, Default)]
pub struct OrientationFusion {
    base: Option<CalibrationBase>,
    latest: Option<CalibrationBase>,
    landscape: bool,
    sensor: HeadRotation,
    touch: TouchRotation,
    drag_axis: DragAxis,
    permission: SensorPermission,
}

impl OrientationFusion {
    pub fn new(drag_axis: DragAxis) -> Self {
        Self {
            drag_axis,
            ..Default::default()
        }
    }

    pub fn set_drag_axis(&mut self, axis: DragAxis) {
        self.drag_axis = axis;
        if axis == DragAxis::YawOnly {
            self.touch.pitch_deg = 0.0;
        }
    }

    pub fn drag_axis(&self) -> DragAxis {
        self.drag_axis
    }

    pub fn set_permission(&mut self, permission: SensorPermission) {
        if permission == SensorPermission::Denied {
            log::warn!("[orientation] sensor permission denied");
        }
        self.permission = permission;
    }

    pub fn permission(&self) -> SensorPermission {
        self.permission
    }

    /// Only an unanswered permission is worth asking for; a repeat request
    /// outside a user gesture would be refused and overwrite a grant.
    pub fn needs_permission_request(&self) -> bool {
        self.permission == SensorPermission::Unknown
    }

    /// Mode actually used for reads: a denied sensor falls back to touch when
    /// the configuration allows it.
    pub fn effective_mode(&self, configured: InputMode, touch_fallback: bool) -> InputMode {
        match configured {
            InputMode::Sensor if self.permission == SensorPermission::Denied && touch_fallback => {
                InputMode::Touch
            }
            m => m,
        }
    }

    pub fn calibration_base(&self) -> Option<CalibrationBase> {
        self.base
    }

    /// Feed one raw device-orientation sample. Incomplete samples keep the
    /// rotation at its last known value.
    pub fn on_sensor_sample(&mut self, sample: OrientationSample, landscape: bool) {
        let Some(raw) = sample.complete() else {
            return;
        };
        self.latest = Some(raw);
        self.landscape = landscape;
        let base = *self.base.get_or_insert(raw);
        self.sensor = Self::relative(raw, base, landscape);
    }

    fn relative(raw: CalibrationBase, base: CalibrationBase, landscape: bool) -> HeadRotation {
        let pitch = if landscape {
            raw.gamma - base.gamma
        } else {
            raw.beta - base.beta
        };
        HeadRotation::new(pitch, raw.alpha - base.alpha)
    }

    /// Accumulate a pointer drag in pixels.
    pub fn on_drag(&mut self, dx_px: f32, dy_px: f32) {
        if !dx_px.is_finite() || !dy_px.is_finite() {
            return;
        }
        self.touch.yaw_deg = wrap_yaw(self.touch.yaw_deg + dx_px * TOUCH_SENSITIVITY_DEG_PER_PX);
        if self.drag_axis == DragAxis::Free {
            self.touch.pitch_deg =
                clamp_pitch(self.touch.pitch_deg + dy_px * TOUCH_SENSITIVITY_DEG_PER_PX);
        }
    }

    pub fn current_rotation(&self, mode: InputMode) -> HeadRotation {
        match mode {
            InputMode::Sensor => self.sensor,
            InputMode::Touch => HeadRotation {
                pitch_deg: self.touch.pitch_deg,
                yaw_deg: self.touch.yaw_deg,
            },
        }
    }

    /// Redefine "forward" as the current view: the latest raw sample becomes
    /// the calibration base and the touch accumulator is zeroed.
    pub fn recenter(&mut self) {
        if let Some(raw) = self.latest {
            self.base = Some(raw);
        }
        self.sensor = HeadRotation::ZERO;
        self.touch = TouchRotation::default();
        log::info!("[orientation] recentered");
    }

    /// Forget calibration and accumulated drag at the end of a playback session.
    pub fn end_session(&mut self) {
        self.base = None;
        self.latest = None;
        self.sensor = HeadRotation::ZERO;
        self.touch = TouchRotation::default();
    }
}
