// Host-side tests for pure input functions.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod input {
    include!("../src/input.rs");
}

use input::*;

#[test]
fn modifier_keys_are_ignored() {
    for key in ["Shift", "Control", "Alt", "Meta", "CapsLock", "Dead", "Unidentified", ""] {
        assert!(is_modifier_key(key), "{:?}", key);
    }
    for key in ["r", "R", " ", "Escape", "+"] {
        assert!(!is_modifier_key(key), "{:?}", key);
    }
}

#[test]
fn chords_belong_to_the_browser() {
    assert!(!is_browser_chord(false, false, false));
    assert!(is_browser_chord(true, false, false));
    assert!(is_browser_chord(false, true, false));
    assert!(is_browser_chord(false, false, true));
}

#[test]
fn enter_toggles_fullscreen_only() {
    assert!(is_fullscreen_key("Enter"));
    assert!(!is_fullscreen_key("Escape"));
    assert!(!is_fullscreen_key("f"));
}

#[test]
fn space_and_arrows_would_scroll() {
    assert!(scrolls_page(" "));
    assert!(scrolls_page("ArrowDown"));
    assert!(!scrolls_page("r"));
    assert!(!scrolls_page("Escape"));
}

#[test]
fn scrub_fraction_clamps_to_bar() {
    assert_eq!(scrub_fraction(150.0, 100.0, 200.0), 0.25);
    assert_eq!(scrub_fraction(50.0, 100.0, 200.0), 0.0);
    assert_eq!(scrub_fraction(400.0, 100.0, 200.0), 1.0);
}

#[test]
fn scrub_fraction_degenerate_bar_is_zero() {
    assert_eq!(scrub_fraction(150.0, 100.0, 0.0), 0.0);
    assert_eq!(scrub_fraction(150.0, 100.0, f64::NAN), 0.0);
    assert_eq!(scrub_fraction(f64::NAN, 100.0, 200.0), 0.0);
}

#[test]
fn seek_needs_a_known_duration() {
    assert_eq!(seek_time(0.5, 120.0), Some(60.0));
    assert_eq!(seek_time(1.5, 120.0), Some(120.0));
    assert_eq!(seek_time(0.5, f64::NAN), None);
    assert_eq!(seek_time(0.5, f64::INFINITY), None);
    assert_eq!(seek_time(0.5, 0.0), None);
}
