// Session context: gaze and tap activations, scoring, word gating, actions.

use glam::{Vec2, Vec3};
use panogaze_core::constants::{
    MIN_PROBE_INTERVAL_MS, NOTE_HIT_SCORE, SPAWN_COOLDOWN_FRAMES, TOUCH_SENSITIVITY_DEG_PER_PX,
    ZOOM_STEP,
};
use panogaze_core::*;

const LOUD: [u8; 32] = [250; 32];
const DWELL: f64 = 1000.0;

fn session(rhythm_mode: bool) -> Session {
    let config = ViewerConfig {
        rhythm_mode,
        drag_axis: DragAxis::Free,
        dwell_ms: DWELL,
        ..Default::default()
    };
    let mut s = Session::new(config, PersistedState::default(), 7);
    s.set_screen_size(800, 800);
    s
}

/// Drag the touch rotation so the probe looks straight at `world`.
fn look_at(s: &mut Session, world: Vec3) {
    let yaw = (-world.x).atan2(-world.z).to_degrees();
    let pitch = (world.y / world.length()).asin().to_degrees();
    s.fusion_mut().on_drag(
        yaw / TOUCH_SENSITIVITY_DEG_PER_PX,
        pitch / TOUCH_SENSITIVITY_DEG_PER_PX,
    );
}

fn spawn_note(s: &mut Session) -> GameNote {
    s.frame_tick(Some(&LOUD), true, 0.0);
    s.notes()[0].clone()
}

fn with_subtitles(s: &mut Session) {
    s.set_subtitles(SubtitleTrack::new(vec![Cue::new(0.0, 10.0, "Hello, world!")]));
    s.set_media_time(1.0);
}

fn word_centre(s: &mut Session, text: &str) -> Vec3 {
    s.sync_regions();
    let region = s
        .registry()
        .regions()
        .iter()
        .find(|r| matches!(&r.target, HitTarget::Word(w) if w.word == text))
        .unwrap()
        .clone();
    let HitShape::Panel(rect) = region.shape else {
        panic!("word is not on the panel");
    };
    panel_to_world(Vec2::new(rect.x + rect.w * 0.5, rect.y + rect.h * 0.5))
}

fn word_target(text: &str, index: usize) -> HitTarget {
    HitTarget::Word(WordToken {
        cue_index: 0,
        token_index: index,
        word: text.to_string(),
        sentence: "Hello, world!".to_string(),
    })
}

#[test]
fn dwell_on_note_scores_once() {
    let mut s = session(true);
    let note = spawn_note(&mut s);
    look_at(&mut s, note.world_position());

    assert!(s.gaze_tick(0.0).is_none());
    let fired = s.gaze_tick(DWELL);
    assert_eq!(
        fired,
        Some(Activation::NoteHit {
            id: note.id,
            score: NOTE_HIT_SCORE,
            combo: 1
        })
    );
    assert!(s.is_consumed(note.id));

    // Click on the same spot and dwell on: no second score.
    assert!(s.pointer_release(PointerRelease::Tap, Vec2::new(400.0, 400.0)).is_none());
    assert!(s.gaze_tick(DWELL * 3.0).is_none());
    assert!(s.activate(HitTarget::Note(note.id)).is_none());
    assert_eq!(s.score(), NOTE_HIT_SCORE);
}

#[test]
fn tap_on_note_then_dwell_scores_once() {
    let mut s = session(true);
    let note = spawn_note(&mut s);
    let cam = s.camera_for(&s.eye_viewports()[0].1);
    let uv = cam.project(note.world_position()).unwrap();

    let tapped = s.pointer_release(PointerRelease::Tap, uv * 800.0);
    assert!(matches!(tapped, Some(Activation::NoteHit { id, .. }) if id == note.id));
    assert!(s.pointer_release(PointerRelease::Tap, uv * 800.0).is_none());
    assert_eq!(s.score(), NOTE_HIT_SCORE);
}

#[test]
fn despawned_note_never_scores_again() {
    let mut s = session(true);
    let note = spawn_note(&mut s);
    assert!(s.activate(HitTarget::Note(note.id)).is_some());
    assert_eq!(s.score(), NOTE_HIT_SCORE);

    s.frame_tick(None, true, 16.0);
    assert!(s.notes().iter().all(|n| n.id != note.id));
    assert!(s.activate(HitTarget::Note(note.id)).is_none());
    assert_eq!(s.score(), NOTE_HIT_SCORE);
    assert_eq!(s.combo(), 1);
}

#[test]
fn unknown_note_ids_do_not_score() {
    let mut s = session(true);
    assert!(s.activate(HitTarget::Note(42)).is_none());
    assert_eq!(s.score(), 0);
}

#[test]
fn drag_and_scrub_releases_never_activate() {
    let mut s = session(true);
    let note = spawn_note(&mut s);
    let cam = s.camera_for(&s.eye_viewports()[0].1);
    let px = cam.project(note.world_position()).unwrap() * 800.0;
    assert!(s.pointer_release(PointerRelease::Drag, px).is_none());
    assert!(s.pointer_release(PointerRelease::Scrub, px).is_none());
    assert_eq!(s.score(), 0);
}

#[test]
fn missed_note_resets_combo() {
    let mut s = session(true);
    let note = spawn_note(&mut s);
    s.activate(HitTarget::Note(note.id));
    assert_eq!(s.combo(), 1);

    for i in 0..SPAWN_COOLDOWN_FRAMES {
        s.frame_tick(Some(&LOUD), true, i as f64);
    }
    assert_eq!(s.notes().len(), 1);
    let mut missed = 0;
    for i in 0..400 {
        missed += s.frame_tick(None, true, i as f64).missed;
    }
    assert!(missed > 0);
    assert_eq!(s.combo(), 0);
    assert_eq!(s.score(), NOTE_HIT_SCORE);
}

#[test]
fn notes_freeze_while_paused_or_outside_rhythm_mode() {
    let mut s = session(true);
    let note = spawn_note(&mut s);
    s.frame_tick(Some(&LOUD), false, 1.0);
    assert_eq!(s.notes()[0].depth_z, note.depth_z);

    let mut reading = session(false);
    reading.frame_tick(Some(&LOUD), true, 0.0);
    assert!(reading.notes().is_empty());
}

#[test]
fn dwell_on_word_requests_lookup() {
    let mut s = session(false);
    with_subtitles(&mut s);
    let hello = word_centre(&mut s, "Hello");
    look_at(&mut s, hello);

    assert!(s.gaze_tick(0.0).is_none());
    assert!(s.dwell_progress() == 0.0);
    assert!(s.gaze_tick(DWELL * 0.5).is_none());
    assert!((s.dwell_progress() - 0.5).abs() < 1e-6);
    let fired = s.gaze_tick(DWELL);
    assert_eq!(
        fired,
        Some(Activation::LookupWord {
            word: "Hello".to_string(),
            sentence: "Hello, world!".to_string()
        })
    );
    assert!(s.lookup().is_pending());
    assert!(s.gaze_tick(DWELL * 4.0).is_none());
}

#[test]
fn pending_lookup_blocks_every_word() {
    let mut s = session(false);
    with_subtitles(&mut s);
    assert!(s.activate(word_target("Hello", 0)).is_some());
    assert!(s.activate(word_target("world", 1)).is_none());

    let world = word_centre(&mut s, "world");
    look_at(&mut s, world);
    s.gaze_tick(0.0);
    assert!(s.gaze_tick(DWELL * 2.0).is_none());
}

#[test]
fn shown_definition_blocks_only_its_own_word() {
    let mut s = session(false);
    with_subtitles(&mut s);
    s.activate(word_target("Hello", 0));
    assert!(s.finish_lookup(Definition::fallback("Hello")));
    assert!(s.lookup().shown().is_some());

    assert!(s.activate(word_target("Hello", 0)).is_none());
    let replaced = s.activate(word_target("world", 1));
    assert!(matches!(replaced, Some(Activation::LookupWord { ref word, .. }) if word == "world"));
    assert!(s.lookup().is_pending());
}

#[test]
fn stale_lookup_results_are_dropped() {
    let mut s = session(false);
    with_subtitles(&mut s);
    assert!(!s.finish_lookup(Definition::fallback("Hello")));
    s.activate(word_target("world", 1));
    assert!(!s.finish_lookup(Definition::fallback("Hello")));
    assert!(s.lookup().is_pending());
}

#[test]
fn words_are_suppressed_in_rhythm_mode() {
    let mut s = session(true);
    with_subtitles(&mut s);
    assert!(s.activate(word_target("Hello", 0)).is_none());
    s.sync_regions();
    assert!(s
        .registry()
        .regions()
        .iter()
        .all(|r| !matches!(r.target, HitTarget::Word(_))));
}

#[test]
fn dismiss_control_appears_with_a_definition() {
    let mut s = session(false);
    with_subtitles(&mut s);
    let has_dismiss = |s: &Session| {
        s.registry()
            .regions()
            .iter()
            .any(|r| r.target == HitTarget::Action(ActionKind::DismissDefinition))
    };
    s.sync_regions();
    assert!(!has_dismiss(&s));

    s.activate(word_target("Hello", 0));
    s.finish_lookup(Definition::fallback("Hello"));
    s.sync_regions();
    assert!(has_dismiss(&s));

    assert_eq!(
        s.key_press("Escape"),
        Some(Activation::Action(ActionKind::DismissDefinition))
    );
    assert_eq!(s.lookup(), &LookupState::Idle);
}

#[test]
fn recenter_key_zeroes_rotation() {
    let mut s = session(false);
    s.fusion_mut().on_drag(120.0, -40.0);
    assert_ne!(s.rotation(), HeadRotation::ZERO);
    assert_eq!(s.key_press("R"), Some(Activation::Action(ActionKind::Recenter)));
    assert_eq!(s.rotation(), HeadRotation::ZERO);
    assert!(s.key_press("q").is_none());
}

#[test]
fn zoom_keys_step_and_clamp() {
    let mut s = session(false);
    s.key_press("+");
    assert!((s.zoom() - (1.0 + ZOOM_STEP)).abs() < 1e-6);
    for _ in 0..100 {
        s.key_press("-");
    }
    assert_eq!(s.zoom(), panogaze_core::constants::ZOOM_MIN);
}

#[test]
fn toggling_rhythm_mode_clears_notes() {
    let mut s = session(true);
    spawn_note(&mut s);
    assert_eq!(
        s.key_press("g"),
        Some(Activation::Action(ActionKind::ToggleRhythm))
    );
    assert!(!s.config().rhythm_mode);
    assert!(s.notes().is_empty());
}

#[test]
fn stereo_toggle_moves_the_probe() {
    let mut s = session(false);
    assert_eq!(s.probe().point_px, Vec2::new(400.0, 400.0));
    s.key_press("v");
    assert!(s.config().stereo_display);
    assert_eq!(s.probe().point_px, Vec2::new(200.0, 400.0));
    assert_eq!(s.eye_viewports().len(), 2);
}

#[test]
fn new_source_resets_per_source_state() {
    let mut s = session(true);
    let note = spawn_note(&mut s);
    s.activate(HitTarget::Note(note.id));
    s.adjust_zoom(0.5);
    s.set_source(VideoFormat::Pano180Sbs);
    assert!(s.notes().is_empty());
    assert_eq!(s.zoom(), 1.0);
    assert_eq!(s.score(), NOTE_HIT_SCORE);
    assert!(s.layout().is_panoramic());
}

#[test]
fn reopening_the_same_format_forgets_the_old_frame_size() {
    let mut s = session(false);
    let fresh = s.flat_placement(Eye::Single).half_extent;
    s.set_content_size(1000, 1000);
    assert_ne!(s.flat_placement(Eye::Single).half_extent, fresh);

    s.set_source(VideoFormat::Flat);
    assert_eq!(s.flat_placement(Eye::Single).half_extent, fresh);
}

#[test]
fn cadence_change_asks_for_a_new_timer() {
    let mut s = session(false);
    let mut config = s.config().clone();
    config.dwell_ms = 500.0;
    assert!(!s.set_config(config.clone()));

    config.probe_interval_ms = 50;
    assert!(s.set_config(config.clone()));
    assert_eq!(s.config().probe_interval(), 50);

    config.probe_interval_ms = 1;
    assert!(s.set_config(config.clone()));
    assert_eq!(s.config().probe_interval(), MIN_PROBE_INTERVAL_MS);
    config.probe_interval_ms = 0;
    assert!(!s.set_config(config));
}

#[test]
fn end_clears_session_state() {
    let mut s = session(true);
    s.fusion_mut()
        .on_sensor_sample(OrientationSample::new(10.0, 0.0, 0.0), false);
    let note = spawn_note(&mut s);
    s.activate(HitTarget::Note(note.id));
    s.end();
    assert!(s.fusion().calibration_base().is_none());
    assert!(s.notes().is_empty());
    assert!(!s.is_consumed(note.id));
    assert_eq!(s.score(), 0);
    assert_eq!(s.dwell_progress(), 0.0);
}

#[test]
fn import_keeps_unlisted_keys() {
    let mut s = session(false);
    s.import_state(r#"{"calibrationProfile": {"ipdOffset": 0.06}}"#)
        .unwrap();
    assert_eq!(s.persisted().calibration_profile.ipd_offset, 0.06);
    assert_eq!(s.persisted().button_mapping, ButtonMapping::default());
    let left = s.flat_placement(Eye::Left);
    assert_eq!(left.center.x, -0.06);
}
