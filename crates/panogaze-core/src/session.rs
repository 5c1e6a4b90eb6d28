//! Playback session context.
//!
//! `Session` owns everything one playback session shares between the render
//! tick, the gaze tick and the input listeners: orientation fusion, the hit
//! registry, dwell tracking, the note spawner, the consumed-note set, the
//! definition state and the score. The front-end holds it behind a single
//! `Rc<RefCell<_>>` and hands `&mut Session` to each callback.

use crate::camera::Camera;
use crate::config::ViewerConfig;
use crate::constants::{
    DISMISS_RECT, NOTE_HIT_RADIUS, NOTE_HIT_SCORE, RECENTER_RECT, Z_ACTION, Z_NOTE, Z_WORD,
    ZOOM_MAX, ZOOM_MIN, ZOOM_STEP,
};
use crate::gaze::{DwellTracker, PointerRelease};
use crate::geometry::{flat_placement, FlatPlacement};
use crate::hit::{
    probe_point, ActionKind, HitRegistry, HitShape, HitTarget, PanelRect, Probe, QueryFilter,
    WordToken,
};
use crate::layout::{eye_viewports, Eye, StereoLayout, VideoFormat, Viewport};
use crate::notes::{FrameReport, GameNote, NoteId, NoteSpawner};
use crate::orientation::{HeadRotation, InputMode, OrientationFusion};
use crate::persist::{ImportError, ImportSummary, PersistedState};
use crate::subtitles::{layout_tokens, Cue, SubtitleTrack};
use crate::translate::{Definition, LookupState};
use fnv::FnvHashSet;
use glam::Vec2;
use smallvec::SmallVec;

/// Outcome of a fired target, for the front-end to act on.
#[derive(Clone, Debug, PartialEq)]
pub enum Activation {
    /// Core-side effects are already applied; the front-end mirrors them
    /// (play/pause, overlay, renderer layout).
    Action(ActionKind),
    /// Start a translation lookup and pause playback.
    LookupWord { word: String, sentence: String },
    NoteHit { id: NoteId, score: u32, combo: u32 },
}

pub struct Session {
    config: ViewerConfig,
    fusion: OrientationFusion,
    registry: HitRegistry,
    dwell: DwellTracker,
    spawner: NoteSpawner,
    consumed: FnvHashSet<NoteId>,
    lookup: LookupState,
    score: u32,
    combo: u32,
    zoom: f32,
    persisted: PersistedState,
    subtitles: SubtitleTrack,
    media_time: f64,
    screen: (u32, u32),
    content: (u32, u32),
    format: VideoFormat,
}

impl Session {
    pub fn new(config: ViewerConfig, persisted: PersistedState, seed: u64) -> Self {
        Self {
            fusion: OrientationFusion::new(config.drag_axis),
            registry: HitRegistry::new(),
            dwell: DwellTracker::new(config.dwell_ms),
            spawner: NoteSpawner::new(seed),
            consumed: FnvHashSet::default(),
            lookup: LookupState::Idle,
            score: 0,
            combo: 0,
            zoom: 1.0,
            persisted,
            subtitles: SubtitleTrack::default(),
            media_time: 0.0,
            screen: (1, 1),
            content: (0, 0),
            format: VideoFormat::default(),
            config,
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Apply new settings. Returns true when the gaze probe cadence changed
    /// and the probe timer has to be rescheduled.
    pub fn set_config(&mut self, config: ViewerConfig) -> bool {
        self.fusion.set_drag_axis(config.drag_axis);
        self.dwell.set_dwell_ms(config.dwell_ms);
        if config.rhythm_mode != self.config.rhythm_mode {
            self.reset_rhythm();
        }
        let reschedule = config.probe_interval() != self.config.probe_interval();
        self.config = config;
        reschedule
    }

    pub fn fusion(&self) -> &OrientationFusion {
        &self.fusion
    }

    pub fn fusion_mut(&mut self) -> &mut OrientationFusion {
        &mut self.fusion
    }

    pub fn input_mode(&self) -> InputMode {
        self.fusion
            .effective_mode(self.config.input_mode, self.config.touch_fallback)
    }

    /// The rotation both the renderer and the probe use this tick.
    pub fn rotation(&self) -> HeadRotation {
        self.fusion.current_rotation(self.input_mode())
    }

    pub fn recenter(&mut self) {
        self.fusion.recenter();
    }

    pub fn set_screen_size(&mut self, width: u32, height: u32) {
        self.screen = (width.max(1), height.max(1));
    }

    pub fn screen_size(&self) -> (u32, u32) {
        self.screen
    }

    pub fn set_content_size(&mut self, width: u32, height: u32) {
        self.content = (width, height);
    }

    pub fn set_media_time(&mut self, seconds: f64) {
        if seconds.is_finite() {
            self.media_time = seconds;
        }
    }

    pub fn media_time(&self) -> f64 {
        self.media_time
    }

    /// Switch to a new source. Per-source state (notes, dwell, zoom, the
    /// definition) starts over; calibration and score survive.
    pub fn set_source(&mut self, format: VideoFormat) {
        log::info!("[session] source format {}", format);
        self.format = format;
        self.content = (0, 0);
        self.zoom = 1.0;
        self.lookup = LookupState::Idle;
        self.dwell.reset();
        self.reset_rhythm();
    }

    pub fn format(&self) -> VideoFormat {
        self.format
    }

    pub fn layout(&self) -> StereoLayout {
        self.format.layout()
    }

    pub fn set_subtitles(&mut self, track: SubtitleTrack) {
        log::info!("[session] {} subtitle cues", track.cues().len());
        self.subtitles = track;
    }

    pub fn active_cue(&self) -> Option<(usize, &Cue)> {
        self.subtitles.active_cue(self.media_time)
    }

    pub fn eye_viewports(&self) -> SmallVec<[(Eye, Viewport); 2]> {
        eye_viewports(self.screen.0, self.screen.1, self.config.stereo_display)
    }

    pub fn camera_for(&self, viewport: &Viewport) -> Camera {
        Camera::new(self.rotation(), viewport.aspect())
    }

    /// Flat-plane placement for one eye; unused for panoramic sources.
    pub fn flat_placement(&self, eye: Eye) -> FlatPlacement {
        let layout = self.layout();
        let aspect = layout.eye_aspect(self.content.0, self.content.1);
        flat_placement(layout, &self.persisted.calibration_profile, self.zoom, eye, aspect)
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn adjust_zoom(&mut self, delta: f32) {
        self.zoom = (self.zoom + delta).clamp(ZOOM_MIN, ZOOM_MAX);
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn notes(&self) -> &[GameNote] {
        self.spawner.notes()
    }

    pub fn is_consumed(&self, id: NoteId) -> bool {
        self.consumed.contains(&id)
    }

    pub fn lookup(&self) -> &LookupState {
        &self.lookup
    }

    pub fn dwell_progress(&self) -> f32 {
        self.dwell.progress()
    }

    pub fn registry(&self) -> &HitRegistry {
        &self.registry
    }

    pub fn persisted(&self) -> &PersistedState {
        &self.persisted
    }

    pub fn import_state(&mut self, text: &str) -> Result<ImportSummary, ImportError> {
        self.persisted.import_json(text)
    }

    pub fn export_state(&self) -> Result<String, serde_json::Error> {
        self.persisted.export_json()
    }

    /// Fixed gaze probe for the current screen.
    pub fn probe(&self) -> Probe {
        probe_point(self.screen.0, self.screen.1, self.config.stereo_display)
    }

    /// Probe at an arbitrary pixel, inside whichever eye viewport holds it.
    pub fn probe_at(&self, point_px: Vec2) -> Probe {
        let views = self.eye_viewports();
        let viewport = views
            .iter()
            .map(|(_, v)| *v)
            .find(|v| point_px.x >= v.x && point_px.x < v.x + v.width)
            .unwrap_or(views[0].1);
        Probe { point_px, viewport }
    }

    /// Rebuild the hit regions from the current state: panel controls, then
    /// live notes in rhythm mode or the active cue's words otherwise.
    pub fn sync_regions(&mut self) {
        self.registry.clear();
        self.registry.register(
            HitTarget::Action(ActionKind::Recenter),
            HitShape::Panel(PanelRect::from_array(RECENTER_RECT)),
            Z_ACTION,
        );
        if self.lookup.shown().is_some() {
            self.registry.register(
                HitTarget::Action(ActionKind::DismissDefinition),
                HitShape::Panel(PanelRect::from_array(DISMISS_RECT)),
                Z_ACTION,
            );
        }

        if self.config.rhythm_mode {
            for note in self.spawner.notes() {
                if note.is_hit || self.consumed.contains(&note.id) {
                    continue;
                }
                self.registry.register(
                    HitTarget::Note(note.id),
                    HitShape::Sphere {
                        center: note.world_position(),
                        radius: NOTE_HIT_RADIUS,
                    },
                    Z_NOTE,
                );
            }
        } else if let Some((cue_index, cue)) = self.subtitles.active_cue(self.media_time) {
            for token_box in layout_tokens(&cue.tokens) {
                let token = WordToken {
                    cue_index,
                    token_index: token_box.index,
                    word: cue.tokens[token_box.index].clone(),
                    sentence: cue.text.clone(),
                };
                self.registry.register(
                    HitTarget::Word(token),
                    HitShape::Panel(token_box.rect),
                    Z_WORD,
                );
            }
        }
    }

    fn query_filter(&self) -> QueryFilter {
        QueryFilter {
            rhythm_mode: self.config.rhythm_mode,
        }
    }

    /// Front-most target at `probe` using the registry as last synced.
    pub fn hit_at(&self, probe: &Probe) -> Option<HitTarget> {
        let camera = self.camera_for(&probe.viewport);
        self.registry
            .query(probe, &camera, self.query_filter())
            .cloned()
    }

    /// Whether `target` may fire right now.
    fn armed(&self, target: &HitTarget) -> bool {
        match target {
            HitTarget::Action(_) => true,
            HitTarget::Note(id) => !self.consumed.contains(id),
            HitTarget::Word(w) => !self.config.rhythm_mode && !self.lookup.blocks_word(&w.word),
        }
    }

    /// One gaze tick: sync regions, probe, advance the dwell timer and fire
    /// at most one activation.
    pub fn gaze_tick(&mut self, now_ms: f64) -> Option<Activation> {
        self.sync_regions();
        let hit = self.hit_at(&self.probe());
        let armed = hit.as_ref().map(|t| self.armed(t)).unwrap_or(false);
        let fired = self.dwell.update(hit.as_ref(), now_ms, armed)?;
        self.activate(fired)
    }

    /// Pointer-up. Only a tap activates, through the same classification the
    /// probe uses, and it latches the dwell so the same episode cannot fire
    /// again.
    pub fn pointer_release(&mut self, release: PointerRelease, point_px: Vec2) -> Option<Activation> {
        if release != PointerRelease::Tap {
            return None;
        }
        self.sync_regions();
        let target = self.hit_at(&self.probe_at(point_px))?;
        if !self.armed(&target) {
            return None;
        }
        self.dwell.latch(target.id());
        self.activate(target)
    }

    /// Mapped key press.
    pub fn key_press(&mut self, key: &str) -> Option<Activation> {
        let kind = self.persisted.button_mapping.action_for(key)?;
        self.activate(HitTarget::Action(kind))
    }

    /// Dispatch a fired target to its handler.
    pub fn activate(&mut self, target: HitTarget) -> Option<Activation> {
        match target {
            HitTarget::Action(kind) => {
                self.apply_action(kind);
                Some(Activation::Action(kind))
            }
            HitTarget::Word(token) => self.begin_lookup(token),
            HitTarget::Note(id) => self.hit_note(id),
        }
    }

    fn apply_action(&mut self, kind: ActionKind) {
        log::info!("[session] action {:?}", kind);
        match kind {
            ActionKind::Recenter => self.recenter(),
            ActionKind::TogglePlay => {}
            ActionKind::ToggleRhythm => {
                self.config.rhythm_mode = !self.config.rhythm_mode;
                self.reset_rhythm();
                self.dwell.reset();
            }
            ActionKind::ToggleStereo => {
                self.config.stereo_display = !self.config.stereo_display;
            }
            ActionKind::ZoomIn => self.adjust_zoom(ZOOM_STEP),
            ActionKind::ZoomOut => self.adjust_zoom(-ZOOM_STEP),
            ActionKind::DismissDefinition => self.dismiss_definition(),
        }
    }

    fn begin_lookup(&mut self, token: WordToken) -> Option<Activation> {
        if self.config.rhythm_mode || self.lookup.blocks_word(&token.word) {
            log::debug!("[gaze] word {:?} suppressed", token.word);
            return None;
        }
        self.lookup = LookupState::Pending {
            word: token.word.clone(),
        };
        Some(Activation::LookupWord {
            word: token.word,
            sentence: token.sentence,
        })
    }

    /// Deliver a lookup result. Results for anything but the pending word are
    /// stale and dropped.
    pub fn finish_lookup(&mut self, definition: Definition) -> bool {
        match &self.lookup {
            LookupState::Pending { word } if *word == definition.word => {
                self.lookup = LookupState::Shown(definition);
                true
            }
            _ => {
                log::debug!("[translate] dropping stale result for {:?}", definition.word);
                false
            }
        }
    }

    pub fn dismiss_definition(&mut self) {
        self.lookup = LookupState::Idle;
        self.dwell.reset();
    }

    /// Scores only live, unhit notes; ids the spawner has already dropped
    /// never score again.
    fn hit_note(&mut self, id: NoteId) -> Option<Activation> {
        if self.consumed.contains(&id) || !self.spawner.mark_hit(id) {
            return None;
        }
        self.consumed.insert(id);
        self.score = self.score.saturating_add(NOTE_HIT_SCORE);
        self.combo = self.combo.saturating_add(1);
        Some(Activation::NoteHit {
            id,
            score: self.score,
            combo: self.combo,
        })
    }

    fn reset_rhythm(&mut self) {
        self.spawner.clear();
        self.consumed.clear();
        self.combo = 0;
    }

    /// One render frame of the rhythm layer. Notes only move while playing
    /// in rhythm mode; `spectrum` is `None` when analysis is unavailable.
    pub fn frame_tick(&mut self, spectrum: Option<&[u8]>, playing: bool, now_ms: f64) -> FrameReport {
        if !self.config.rhythm_mode || !playing {
            return FrameReport::default();
        }
        let report = self.spawner.tick(spectrum, now_ms, &self.consumed);
        let live: FnvHashSet<NoteId> = self.spawner.notes().iter().map(|n| n.id).collect();
        self.consumed.retain(|id| live.contains(id));
        if report.missed > 0 {
            self.combo = 0;
        }
        report
    }

    /// End of playback: forget calibration, notes, dwell and the definition.
    pub fn end(&mut self) {
        log::info!("[session] ended with score {}", self.score);
        self.fusion.end_session();
        self.dwell.reset();
        self.lookup = LookupState::Idle;
        self.registry.clear();
        self.subtitles = SubtitleTrack::default();
        self.media_time = 0.0;
        self.score = 0;
        self.reset_rhythm();
    }
}
