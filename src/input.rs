// Pure input helpers: key filtering and scrub-bar math. No web-sys here so the
// host tests can include this file directly.

/// Keys that never map to an action on their own.
#[inline]
pub fn is_modifier_key(key: &str) -> bool {
    matches!(
        key,
        "Shift" | "Control" | "Alt" | "Meta" | "CapsLock" | "Dead" | "Unidentified" | ""
    )
}

/// Chords the browser (or OS) owns, e.g. Ctrl+R or Cmd+Plus.
#[inline]
pub fn is_browser_chord(ctrl: bool, meta: bool, alt: bool) -> bool {
    ctrl || meta || alt
}

/// Key that toggles fullscreen instead of going through the button mapping.
#[inline]
pub fn is_fullscreen_key(key: &str) -> bool {
    key == "Enter"
}

/// Keys whose default action scrolls the page underneath the viewer.
#[inline]
pub fn scrolls_page(key: &str) -> bool {
    matches!(
        key,
        " " | "ArrowUp" | "ArrowDown" | "ArrowLeft" | "ArrowRight" | "PageUp" | "PageDown"
    )
}

/// Position along a horizontal bar as a 0..=1 fraction.
#[inline]
pub fn scrub_fraction(client_x: f64, bar_left: f64, bar_width: f64) -> f64 {
    if bar_width.is_nan() || bar_width <= 0.0 || !client_x.is_finite() {
        return 0.0;
    }
    ((client_x - bar_left) / bar_width).clamp(0.0, 1.0)
}

/// Seek target for a scrub fraction, or `None` while the duration is unknown
/// (NaN before metadata, infinite for live streams).
#[inline]
pub fn seek_time(fraction: f64, duration: f64) -> Option<f64> {
    if !duration.is_finite() || duration <= 0.0 {
        return None;
    }
    Some(fraction.clamp(0.0, 1.0) * duration)
}
