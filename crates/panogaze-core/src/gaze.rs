//! Dwell state machine and tap/drag discrimination.

use crate::constants::DRAG_THRESHOLD_PX;
use crate::hit::{HitTarget, TargetId};
use glam::Vec2;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DwellState {
    #[default]
    Idle,
    Hovering {
        target: TargetId,
        started_ms: f64,
        progress: f32,
    },
}

impl DwellState {
    pub fn progress(&self) -> f32 {
        match self {
            DwellState::Idle => 0.0,
            DwellState::Hovering { progress, .. } => *progress,
        }
    }

    pub fn target(&self) -> Option<TargetId> {
        match self {
            DwellState::Idle => None,
            DwellState::Hovering { target, .. } => Some(*target),
        }
    }
}

/// Runs the dwell timer for whatever the probe sees each tick.
///
/// After an activation the tracker returns to `Idle` and latches the fired
/// target; it does not start a new episode until the probe leaves that
/// target, so one continuous dwell fires at most once.
#[derive(Clone, Debug)]
pub struct DwellTracker {
    state: DwellState,
    latched: Option<TargetId>,
    dwell_ms: f64,
}

impl DwellTracker {
    pub fn new(dwell_ms: f64) -> Self {
        Self {
            state: DwellState::Idle,
            latched: None,
            dwell_ms: dwell_ms.max(1.0),
        }
    }

    pub fn state(&self) -> DwellState {
        self.state
    }

    pub fn progress(&self) -> f32 {
        self.state.progress()
    }

    pub fn set_dwell_ms(&mut self, dwell_ms: f64) {
        self.dwell_ms = dwell_ms.max(1.0);
    }

    pub fn reset(&mut self) {
        self.state = DwellState::Idle;
        self.latched = None;
    }

    /// Suppress dwell on `target` until the probe leaves it; used when a tap
    /// already activated it.
    pub fn latch(&mut self, target: TargetId) {
        self.state = DwellState::Idle;
        self.latched = Some(target);
    }

    /// Advance with the current probe result. `armed` says whether the hovered
    /// target may fire right now; an unarmed target keeps hovering at full
    /// progress without firing. Returns the target to activate, if any.
    pub fn update(&mut self, hit: Option<&HitTarget>, now_ms: f64, armed: bool) -> Option<HitTarget> {
        let Some(hit) = hit else {
            self.state = DwellState::Idle;
            self.latched = None;
            return None;
        };
        let id = hit.id();
        if self.latched == Some(id) {
            return None;
        }
        self.latched = None;

        let started_ms = match self.state {
            DwellState::Hovering {
                target, started_ms, ..
            } if target == id => started_ms,
            _ => now_ms,
        };
        let elapsed = (now_ms - started_ms).max(0.0);
        let progress = (elapsed / self.dwell_ms).clamp(0.0, 1.0) as f32;
        self.state = DwellState::Hovering {
            target: id,
            started_ms,
            progress,
        };

        if progress >= 1.0 && armed {
            log::debug!("[gaze] dwell complete on {:?}", id);
            self.latch(id);
            return Some(hit.clone());
        }
        None
    }
}

/// How a pointer interaction ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerRelease {
    Tap,
    Drag,
    Scrub,
}

/// Tracks one pointer press to tell taps from drags and progress-bar scrubs.
#[derive(Clone, Copy, Debug, Default)]
pub struct PointerGesture {
    down_at: Option<Vec2>,
    last: Vec2,
    max_travel: f32,
    scrubbing: bool,
}

impl PointerGesture {
    pub fn begin(&mut self, pos: Vec2, on_scrub_bar: bool) {
        self.down_at = Some(pos);
        self.last = pos;
        self.max_travel = 0.0;
        self.scrubbing = on_scrub_bar;
    }

    pub fn is_active(&self) -> bool {
        self.down_at.is_some()
    }

    pub fn is_scrubbing(&self) -> bool {
        self.scrubbing
    }

    /// Record a move; returns the delta since the previous position while
    /// pressed.
    pub fn moved(&mut self, pos: Vec2) -> Option<Vec2> {
        let start = self.down_at?;
        let delta = pos - self.last;
        self.last = pos;
        self.max_travel = self.max_travel.max(pos.distance(start));
        Some(delta)
    }

    pub fn end(&mut self, pos: Vec2) -> Option<PointerRelease> {
        let start = self.down_at.take()?;
        self.max_travel = self.max_travel.max(pos.distance(start));
        let release = if self.scrubbing {
            PointerRelease::Scrub
        } else if self.max_travel > DRAG_THRESHOLD_PX {
            PointerRelease::Drag
        } else {
            PointerRelease::Tap
        };
        self.scrubbing = false;
        Some(release)
    }
}
