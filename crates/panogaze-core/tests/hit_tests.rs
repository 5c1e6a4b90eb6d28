// Hit registry: class priority, z ordering, mode filtering and panel rays.

use glam::{Vec2, Vec3};
use panogaze_core::constants::{Z_ACTION, Z_NOTE, Z_WORD};
use panogaze_core::*;

const CENTRE: PanelRect = PanelRect {
    x: 0.4,
    y: 0.4,
    w: 0.2,
    h: 0.2,
};

fn word(token_index: usize, text: &str) -> HitTarget {
    HitTarget::Word(WordToken {
        cue_index: 0,
        token_index,
        word: text.to_string(),
        sentence: String::new(),
    })
}

fn forward_camera() -> Camera {
    Camera::new(HeadRotation::ZERO, 1.0)
}

fn centre_probe() -> Probe {
    probe_point(800, 800, false)
}

fn full_registry() -> HitRegistry {
    let mut r = HitRegistry::new();
    r.register(word(0, "hola"), HitShape::Panel(CENTRE), Z_WORD);
    r.register(
        HitTarget::Note(7),
        HitShape::Sphere {
            center: Vec3::new(0.0, 0.0, -5.0),
            radius: 0.5,
        },
        Z_NOTE,
    );
    r.register(
        HitTarget::Action(ActionKind::Recenter),
        HitShape::Panel(CENTRE),
        Z_ACTION,
    );
    r
}

#[test]
fn action_beats_note_and_word() {
    let r = full_registry();
    let cam = forward_camera();
    for rhythm_mode in [false, true] {
        let hit = r.query(&centre_probe(), &cam, QueryFilter { rhythm_mode });
        assert_eq!(hit, Some(&HitTarget::Action(ActionKind::Recenter)));
    }
}

#[test]
fn notes_only_in_rhythm_mode_and_words_only_outside_it() {
    let mut r = full_registry();
    r.clear();
    r.register(word(0, "hola"), HitShape::Panel(CENTRE), Z_WORD);
    r.register(
        HitTarget::Note(7),
        HitShape::Sphere {
            center: Vec3::new(0.0, 0.0, -5.0),
            radius: 0.5,
        },
        Z_NOTE,
    );
    let cam = forward_camera();
    let rhythm = r.query(&centre_probe(), &cam, QueryFilter { rhythm_mode: true });
    assert_eq!(rhythm, Some(&HitTarget::Note(7)));
    let reading = r.query(&centre_probe(), &cam, QueryFilter { rhythm_mode: false });
    assert_eq!(reading, Some(&word(0, "hola")));
}

#[test]
fn higher_z_wins_within_a_class() {
    let mut r = HitRegistry::new();
    r.register(word(0, "low"), HitShape::Panel(CENTRE), Z_WORD);
    r.register(word(1, "high"), HitShape::Panel(CENTRE), Z_WORD + 1);
    let hit = r.query(&centre_probe(), &forward_camera(), QueryFilter::default());
    assert_eq!(hit, Some(&word(1, "high")));
}

#[test]
fn earliest_registration_breaks_ties() {
    let mut r = HitRegistry::new();
    r.register(word(0, "first"), HitShape::Panel(CENTRE), Z_WORD);
    r.register(word(1, "second"), HitShape::Panel(CENTRE), Z_WORD);
    let hit = r.query(&centre_probe(), &forward_camera(), QueryFilter::default());
    assert_eq!(hit, Some(&word(0, "first")));
}

#[test]
fn nearer_note_wins_at_equal_z() {
    let mut r = HitRegistry::new();
    for (id, z) in [(1, -20.0), (2, -6.0)] {
        r.register(
            HitTarget::Note(id),
            HitShape::Sphere {
                center: Vec3::new(0.0, 0.0, z),
                radius: 0.5,
            },
            Z_NOTE,
        );
    }
    let hit = r.query(&centre_probe(), &forward_camera(), QueryFilter { rhythm_mode: true });
    assert_eq!(hit, Some(&HitTarget::Note(2)));
}

#[test]
fn empty_point_is_no_hit() {
    let mut r = HitRegistry::new();
    r.register(
        word(0, "corner"),
        HitShape::Panel(PanelRect {
            x: 0.0,
            y: 0.0,
            w: 0.1,
            h: 0.1,
        }),
        Z_WORD,
    );
    assert!(r
        .query(&centre_probe(), &forward_camera(), QueryFilter::default())
        .is_none());
}

#[test]
fn turning_the_head_brings_panel_targets_under_the_probe() {
    let mut r = HitRegistry::new();
    let left = PanelRect {
        x: 0.1,
        y: 0.4,
        w: 0.2,
        h: 0.2,
    };
    r.register(word(0, "izquierda"), HitShape::Panel(left), Z_WORD);

    let probe = centre_probe();
    assert!(r.query(&probe, &forward_camera(), QueryFilter::default()).is_none());

    // Panel x 0.2 sits (0.2 - 0.5) * width to the left at the panel distance.
    let turned = Camera::new(HeadRotation::new(0.0, 20.0), 1.0);
    let hit = r.query(&probe, &turned, QueryFilter::default());
    assert_eq!(hit, Some(&word(0, "izquierda")));
}

#[test]
fn panel_behind_the_viewer_is_not_hit() {
    let mut r = HitRegistry::new();
    r.register(word(0, "hola"), HitShape::Panel(CENTRE), Z_WORD);
    let behind = Camera::new(HeadRotation::new(0.0, 180.0), 1.0);
    assert!(r
        .query(&centre_probe(), &behind, QueryFilter::default())
        .is_none());
}

#[test]
fn stereo_probe_sits_in_left_eye_centre() {
    let p = probe_point(1600, 900, true);
    assert_eq!(p.point_px, Vec2::new(400.0, 450.0));
    assert_eq!(p.uv(), Vec2::new(0.5, 0.5));
    let single = probe_point(1600, 900, false);
    assert_eq!(single.point_px, Vec2::new(800.0, 450.0));
}

#[test]
fn panel_round_trips_through_world() {
    let uv = Vec2::new(0.3, 0.8);
    let world = panel_to_world(uv);
    let (back, t) = ray_panel(Vec3::ZERO, world.normalize()).unwrap();
    assert!((back - uv).length() < 1e-4);
    assert!((t - world.length()).abs() < 1e-3);
}

#[test]
fn panel_rect_projects_onto_screen() {
    let cam = forward_camera();
    let on_screen = panel_rect_on_screen(&cam, CENTRE).unwrap();
    // Centred rect stays centred.
    assert!((on_screen.x + on_screen.w * 0.5 - 0.5).abs() < 1e-4);
    assert!((on_screen.y + on_screen.h * 0.5 - 0.5).abs() < 1e-4);
    assert!(on_screen.w > 0.0 && on_screen.h > 0.0);
}
