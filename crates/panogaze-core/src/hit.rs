//! Hit-region registry and the fixed-point probe.
//!
//! Interactive targets register a shape and a z-order each gaze tick. A query
//! casts the camera ray through the probe point, walks target classes in
//! priority order (action, note, word) and returns the front-most region of
//! the first class the ray hits.
//!
//! Controls and subtitle words live on a world-anchored interaction panel in
//! front of the calibrated forward direction, so turning the head brings them
//! under the probe. Notes are spheres in their lanes.

use crate::camera::{ray_sphere, Camera};
use crate::constants::{PANEL_CENTER_Y, PANEL_DISTANCE, PANEL_HEIGHT, PANEL_WIDTH};
use crate::layout::{eye_viewports, Viewport};
use crate::notes::NoteId;
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Discrete controls reachable by gaze, click or a mapped key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionKind {
    Recenter,
    TogglePlay,
    ToggleRhythm,
    ToggleStereo,
    ZoomIn,
    ZoomOut,
    DismissDefinition,
}

/// One subtitle word plus the sentence it came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordToken {
    pub cue_index: usize,
    pub token_index: usize,
    pub word: String,
    pub sentence: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HitTarget {
    Action(ActionKind),
    Word(WordToken),
    Note(NoteId),
}

/// Stable identity of a target across ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TargetId {
    Action(ActionKind),
    Word { cue: usize, token: usize },
    Note(NoteId),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TargetClass {
    Action,
    Note,
    Word,
}

impl TargetClass {
    pub const PRIORITY: [TargetClass; 3] = [TargetClass::Action, TargetClass::Note, TargetClass::Word];
}

impl HitTarget {
    pub fn id(&self) -> TargetId {
        match self {
            HitTarget::Action(kind) => TargetId::Action(*kind),
            HitTarget::Word(w) => TargetId::Word {
                cue: w.cue_index,
                token: w.token_index,
            },
            HitTarget::Note(id) => TargetId::Note(*id),
        }
    }

    pub fn class(&self) -> TargetClass {
        match self {
            HitTarget::Action(_) => TargetClass::Action,
            HitTarget::Word(_) => TargetClass::Word,
            HitTarget::Note(_) => TargetClass::Note,
        }
    }
}

/// Axis-aligned rectangle in panel-normalized coordinates (origin top-left).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanelRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl PanelRect {
    pub const fn from_array(r: [f32; 4]) -> Self {
        Self {
            x: r[0],
            y: r[1],
            w: r[2],
            h: r[3],
        }
    }

    #[inline]
    pub fn contains(&self, uv: Vec2) -> bool {
        uv.x >= self.x && uv.x <= self.x + self.w && uv.y >= self.y && uv.y <= self.y + self.h
    }
}

/// World position of a panel-normalized point.
pub fn panel_to_world(uv: Vec2) -> Vec3 {
    Vec3::new(
        (uv.x - 0.5) * PANEL_WIDTH,
        PANEL_CENTER_Y + (0.5 - uv.y) * PANEL_HEIGHT,
        -PANEL_DISTANCE,
    )
}

/// Where a ray crosses the panel plane, as `(panel_uv, distance)`. The uv may
/// fall outside 0..1; callers test it against their rects.
pub fn ray_panel(ray_origin: Vec3, ray_dir: Vec3) -> Option<(Vec2, f32)> {
    if ray_dir.z >= -1e-6 {
        return None;
    }
    let t = (-PANEL_DISTANCE - ray_origin.z) / ray_dir.z;
    if t < 0.0 {
        return None;
    }
    let p = ray_origin + ray_dir * t;
    let uv = Vec2::new(
        p.x / PANEL_WIDTH + 0.5,
        0.5 - (p.y - PANEL_CENTER_Y) / PANEL_HEIGHT,
    );
    Some((uv, t))
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HitShape {
    /// Control or word on the interaction panel.
    Panel(PanelRect),
    /// World-anchored element, tested along the camera ray.
    Sphere { center: Vec3, radius: f32 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct HitRegion {
    pub target: HitTarget,
    pub shape: HitShape,
    pub z: i32,
}

/// Viewport-normalized rect covering a panel rect as seen by `camera`, or
/// `None` if any corner is behind it.
pub fn panel_rect_on_screen(camera: &Camera, rect: PanelRect) -> Option<PanelRect> {
    let tl = camera.project(panel_to_world(Vec2::new(rect.x, rect.y)))?;
    let br = camera.project(panel_to_world(Vec2::new(rect.x + rect.w, rect.y + rect.h)))?;
    Some(PanelRect {
        x: tl.x,
        y: tl.y,
        w: br.x - tl.x,
        h: br.y - tl.y,
    })
}

/// Where the probe samples: a pixel inside the viewport it belongs to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Probe {
    pub point_px: Vec2,
    pub viewport: Viewport,
}

impl Probe {
    pub fn uv(&self) -> Vec2 {
        self.viewport.to_uv(self.point_px)
    }
}

/// Screen centre for single view; the left eye's centre (25% width, 50%
/// height) in stereo, since both eyes show the same scene.
pub fn probe_point(width: u32, height: u32, stereo_display: bool) -> Probe {
    let views = eye_viewports(width, height, stereo_display);
    let viewport = views[0].1;
    Probe {
        point_px: viewport.center(),
        viewport,
    }
}

/// Which classes a query may return.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QueryFilter {
    pub rhythm_mode: bool,
}

impl QueryFilter {
    fn allows(&self, class: TargetClass) -> bool {
        match class {
            TargetClass::Action => true,
            TargetClass::Note => self.rhythm_mode,
            TargetClass::Word => !self.rhythm_mode,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct HitRegistry {
    regions: Vec<HitRegion>,
}

impl HitRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.regions.clear();
    }

    pub fn register(&mut self, target: HitTarget, shape: HitShape, z: i32) {
        self.regions.push(HitRegion { target, shape, z });
    }

    pub fn regions(&self) -> &[HitRegion] {
        &self.regions
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Front-most target under the probe. Within a class the highest z wins,
    /// then the nearest along the ray, then the earliest registration.
    pub fn query(&self, probe: &Probe, camera: &Camera, filter: QueryFilter) -> Option<&HitTarget> {
        let uv = probe.uv();
        if !uv.x.is_finite() || !uv.y.is_finite() {
            return None;
        }
        let (ro, rd) = camera.ray_through(uv);
        let panel = ray_panel(ro, rd);
        for class in TargetClass::PRIORITY {
            if !filter.allows(class) {
                continue;
            }
            let mut best: Option<(&HitRegion, f32)> = None;
            for region in self.regions.iter().filter(|r| r.target.class() == class) {
                let dist = match region.shape {
                    HitShape::Panel(rect) => panel.filter(|(p, _)| rect.contains(*p)).map(|(_, t)| t),
                    HitShape::Sphere { center, radius } => ray_sphere(ro, rd, center, radius),
                };
                let Some(dist) = dist else {
                    continue;
                };
                match best {
                    Some((b, bd)) if b.z > region.z || (b.z == region.z && bd <= dist) => {}
                    _ => best = Some((region, dist)),
                }
            }
            if let Some((region, _)) = best {
                return Some(&region.target);
            }
        }
        None
    }
}
