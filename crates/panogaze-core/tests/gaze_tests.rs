// Dwell state machine and tap/drag discrimination.

use glam::Vec2;
use panogaze_core::*;

fn recenter() -> HitTarget {
    HitTarget::Action(ActionKind::Recenter)
}

fn word(token_index: usize, text: &str) -> HitTarget {
    HitTarget::Word(WordToken {
        cue_index: 0,
        token_index,
        word: text.to_string(),
        sentence: "hello brave world".to_string(),
    })
}

#[test]
fn progress_is_monotone_while_hovering() {
    let mut d = DwellTracker::new(1000.0);
    let t = recenter();
    let mut last = -1.0;
    for step in 0..10 {
        let fired = d.update(Some(&t), step as f64 * 100.0, true);
        assert!(fired.is_none());
        assert!(d.progress() >= last);
        last = d.progress();
    }
    assert!((d.progress() - 0.9).abs() < 1e-6);
}

#[test]
fn exactly_one_activation_per_episode() {
    let mut d = DwellTracker::new(1000.0);
    let t = recenter();
    let mut fired = 0;
    for step in 0..60 {
        if d.update(Some(&t), step as f64 * 100.0, true).is_some() {
            fired += 1;
            assert_eq!(d.progress(), 0.0);
            assert_eq!(d.state(), DwellState::Idle);
        }
    }
    assert_eq!(fired, 1);
}

#[test]
fn target_change_resets_progress() {
    let mut d = DwellTracker::new(1000.0);
    let a = word(0, "hello");
    let b = word(1, "brave");
    d.update(Some(&a), 0.0, true);
    d.update(Some(&a), 600.0, true);
    assert!((d.progress() - 0.6).abs() < 1e-6);

    d.update(Some(&b), 700.0, true);
    assert_eq!(d.progress(), 0.0);
    assert_eq!(d.state().target(), Some(b.id()));
    d.update(Some(&b), 1200.0, true);
    assert!((d.progress() - 0.5).abs() < 1e-6);
}

#[test]
fn leaving_all_targets_goes_idle_immediately() {
    let mut d = DwellTracker::new(1000.0);
    let t = recenter();
    d.update(Some(&t), 0.0, true);
    d.update(Some(&t), 900.0, true);
    d.update(None, 950.0, true);
    assert_eq!(d.state(), DwellState::Idle);

    // Coming back starts a fresh episode.
    d.update(Some(&t), 1000.0, true);
    assert!(d.update(Some(&t), 1500.0, true).is_none());
    assert!(d.update(Some(&t), 2000.0, true).is_some());
}

#[test]
fn latched_target_needs_to_be_left_before_refiring() {
    let mut d = DwellTracker::new(500.0);
    let t = recenter();
    d.update(Some(&t), 0.0, true);
    assert!(d.update(Some(&t), 500.0, true).is_some());
    assert!(d.update(Some(&t), 5000.0, true).is_none());

    // A different target is a new episode.
    let other = word(2, "world");
    d.update(Some(&other), 5100.0, true);
    assert!(d.update(Some(&other), 5600.0, true).is_some());
}

#[test]
fn unarmed_target_holds_at_full_progress() {
    let mut d = DwellTracker::new(500.0);
    let t = word(0, "hello");
    d.update(Some(&t), 0.0, false);
    assert!(d.update(Some(&t), 800.0, false).is_none());
    assert_eq!(d.progress(), 1.0);
    assert!(d.update(Some(&t), 900.0, true).is_some());
}

#[test]
fn manual_latch_blocks_dwell() {
    let mut d = DwellTracker::new(500.0);
    let t = recenter();
    d.latch(t.id());
    d.update(Some(&t), 0.0, true);
    assert!(d.update(Some(&t), 1000.0, true).is_none());
    assert_eq!(d.progress(), 0.0);
}

#[test]
fn short_press_is_a_tap() {
    let mut g = PointerGesture::default();
    g.begin(Vec2::new(100.0, 100.0), false);
    assert_eq!(g.moved(Vec2::new(103.0, 101.0)), Some(Vec2::new(3.0, 1.0)));
    assert_eq!(g.end(Vec2::new(104.0, 100.0)), Some(PointerRelease::Tap));
    assert!(!g.is_active());
}

#[test]
fn travel_beyond_threshold_is_a_drag() {
    let mut g = PointerGesture::default();
    g.begin(Vec2::new(100.0, 100.0), false);
    g.moved(Vec2::new(130.0, 100.0));
    // Returning to the start still counts as a drag.
    assert_eq!(g.end(Vec2::new(100.0, 100.0)), Some(PointerRelease::Drag));
}

#[test]
fn press_on_progress_bar_is_a_scrub() {
    let mut g = PointerGesture::default();
    g.begin(Vec2::new(10.0, 590.0), true);
    assert!(g.is_scrubbing());
    assert_eq!(g.end(Vec2::new(10.0, 590.0)), Some(PointerRelease::Scrub));
    assert!(!g.is_scrubbing());
}

#[test]
fn release_without_press_is_ignored() {
    let mut g = PointerGesture::default();
    assert_eq!(g.moved(Vec2::new(1.0, 1.0)), None);
    assert_eq!(g.end(Vec2::new(1.0, 1.0)), None);
}
