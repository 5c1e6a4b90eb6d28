// Format tags, stereo texture windows and eye viewports.

use panogaze_core::*;

fn layout(tag: &str) -> StereoLayout {
    VideoFormat::from_tag(tag).layout()
}

#[test]
fn side_by_side_splits_horizontally() {
    let l = layout("360-sbs");
    assert_eq!(texture_window(l, Eye::Left).u, [0.0, 0.5]);
    assert_eq!(texture_window(l, Eye::Right).u, [0.5, 1.0]);
    assert_eq!(texture_window(l, Eye::Left).v, [0.0, 1.0]);
    assert_eq!(texture_window(l, Eye::Right).v, [0.0, 1.0]);
}

#[test]
fn top_bottom_puts_left_eye_on_top() {
    let l = layout("180-tb");
    assert_eq!(texture_window(l, Eye::Left).v, [0.5, 1.0]);
    assert_eq!(texture_window(l, Eye::Right).v, [0.0, 0.5]);
    assert_eq!(texture_window(l, Eye::Left).u, [0.0, 1.0]);
}

#[test]
fn mono_uses_full_texture_for_every_eye() {
    let l = layout("360");
    for eye in [Eye::Left, Eye::Right, Eye::Single] {
        assert_eq!(texture_window(l, eye), UvWindow::FULL);
    }
}

#[test]
fn single_view_reads_like_left_eye() {
    for tag in ["3d-sbs", "3d-tb", "180-sbs", "360-tb"] {
        let l = layout(tag);
        assert_eq!(texture_window(l, Eye::Single), texture_window(l, Eye::Left), "{tag}");
    }
}

#[test]
fn window_offset_scale_maps_corners() {
    let w = texture_window(layout("3d-sbs"), Eye::Right);
    assert_eq!(w.offset_scale(), [0.5, 0.0, 0.5, 1.0]);
    assert_eq!(w.map([0.0, 0.0]), [0.5, 0.0]);
    assert_eq!(w.map([1.0, 1.0]), [1.0, 1.0]);
}

#[test]
fn tags_parse_into_layouts() {
    let l = layout("360-tb");
    assert_eq!(l.panoramic, Some(PanoramicSpan::Full360));
    assert_eq!(l.split, StereoSplit::TopBottom);
    assert!(l.is_stereo());

    let l = layout("180");
    assert_eq!(l.panoramic, Some(PanoramicSpan::Half180));
    assert!(!l.is_stereo());

    let l = layout("3d-sbs");
    assert!(!l.is_panoramic());
    assert_eq!(l.split, StereoSplit::SideBySide);
}

#[test]
fn unknown_tag_plays_as_flat() {
    assert_eq!(VideoFormat::from_tag("fisheye-9000"), VideoFormat::Flat);
    assert_eq!(VideoFormat::from_tag(" 360-SBS "), VideoFormat::Pano360Sbs);
}

#[test]
fn format_serializes_as_its_tag() {
    let f: VideoFormat = serde_json::from_str("\"180-sbs\"").unwrap();
    assert_eq!(f, VideoFormat::Pano180Sbs);
    assert_eq!(serde_json::to_string(&f).unwrap(), "\"180-sbs\"");
    assert_eq!(f.to_string(), "180-sbs");
}

#[test]
fn stereo_display_splits_screen_in_halves() {
    let views = eye_viewports(1600, 900, true);
    assert_eq!(views.len(), 2);
    assert_eq!(views[0].0, Eye::Left);
    assert_eq!(views[0].1.width, 800.0);
    assert_eq!(views[1].0, Eye::Right);
    assert_eq!(views[1].1.x, 800.0);

    let single = eye_viewports(1600, 900, false);
    assert_eq!(single.len(), 1);
    assert_eq!(single[0].0, Eye::Single);
    assert_eq!(single[0].1.width, 1600.0);
}

#[test]
fn eye_aspect_accounts_for_packing() {
    let sbs = layout("3d-sbs");
    assert!((sbs.eye_aspect(3840, 1080) - 16.0 / 9.0).abs() < 1e-5);
    let tb = layout("3d-tb");
    assert!((tb.eye_aspect(1920, 2160) - 16.0 / 9.0).abs() < 1e-5);
    assert!((tb.eye_aspect(0, 0) - 16.0 / 9.0).abs() < 1e-5);
}
