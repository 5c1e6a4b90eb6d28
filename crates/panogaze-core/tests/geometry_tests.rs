// Projection surfaces and camera: hemisphere extent, 360° seam, flat placement.

use glam::{Vec2, Vec3};
use panogaze_core::constants::{SPHERE_HEIGHT_SEGMENTS, SPHERE_RADIUS, SPHERE_WIDTH_SEGMENTS};
use panogaze_core::*;

fn forward_for(yaw_deg: f32, pitch_deg: f32) -> Vec3 {
    Camera::new(HeadRotation::new(pitch_deg, yaw_deg), 1.0).forward()
}

#[test]
fn hemisphere_stays_in_front_half() {
    let mesh = build_default_sphere(PanoramicSpan::Half180);
    for v in &mesh.vertices {
        assert!(v.position[2] <= 1e-2, "vertex behind viewer: {:?}", v.position);
    }
}

#[test]
fn hemisphere_centre_faces_forward() {
    let mesh = build_default_sphere(PanoramicSpan::Half180);
    let row = SPHERE_WIDTH_SEGMENTS + 1;
    let idx = (SPHERE_HEIGHT_SEGMENTS / 2) * row + SPHERE_WIDTH_SEGMENTS / 2;
    let v = mesh.vertices[idx as usize];
    assert_eq!(v.uv, [0.5, 0.5]);
    let p = Vec3::from_array(v.position);
    assert!((p - Vec3::new(0.0, 0.0, -SPHERE_RADIUS)).length() < 1e-2);
}

#[test]
fn sphere_index_count_matches_segments() {
    let mesh = build_sphere(PanoramicSpan::Full360, 1.0, 8, 4);
    assert_eq!(mesh.vertices.len(), 9 * 5);
    assert_eq!(mesh.indices.len(), 8 * 4 * 6);
    assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
}

#[test]
fn full_sphere_seam_duplicates_first_column() {
    let mesh = build_sphere(PanoramicSpan::Full360, 1.0, 8, 4);
    for row in 0..5 {
        let first = mesh.vertices[row * 9];
        let last = mesh.vertices[row * 9 + 8];
        let d = Vec3::from_array(first.position) - Vec3::from_array(last.position);
        assert!(d.length() < 1e-5);
        assert_eq!(first.uv[0], 0.0);
        assert_eq!(last.uv[0], 1.0);
    }
}

#[test]
fn full_sphere_wraps_at_back() {
    let a = sample_uv(PanoramicSpan::Full360, forward_for(179.0, 0.0)).unwrap();
    let b = sample_uv(PanoramicSpan::Full360, forward_for(-179.0, 0.0)).unwrap();
    let du = (a.x - b.x).abs();
    let wrapped = du.min(1.0 - du);
    assert!(wrapped < 1.0 / SPHERE_WIDTH_SEGMENTS as f32, "du {du}");
}

#[test]
fn looking_forward_samples_texture_centre() {
    for span in [PanoramicSpan::Half180, PanoramicSpan::Full360] {
        let uv = sample_uv(span, forward_for(0.0, 0.0)).unwrap();
        assert!((uv - Vec2::new(0.5, 0.5)).length() < 1e-4);
    }
}

#[test]
fn turning_left_samples_left_of_centre() {
    let uv = sample_uv(PanoramicSpan::Full360, forward_for(90.0, 0.0)).unwrap();
    assert!((uv.x - 0.25).abs() < 1e-3);
    let up = sample_uv(PanoramicSpan::Full360, forward_for(0.0, 45.0)).unwrap();
    assert!((up.y - 0.75).abs() < 1e-3);
}

#[test]
fn half_sphere_has_nothing_behind() {
    assert!(sample_uv(PanoramicSpan::Half180, forward_for(180.0, 0.0)).is_none());
    assert!(sample_uv(PanoramicSpan::Half180, forward_for(135.0, 0.0)).is_none());
    let edge = sample_uv(PanoramicSpan::Half180, forward_for(89.0, 0.0)).unwrap();
    assert!(edge.x > 0.0 && edge.x < 0.5);
}

#[test]
fn flat_offsets_are_mirrored_per_eye() {
    let layout = VideoFormat::FlatSbs.layout();
    let profile = CalibrationProfile {
        ipd_offset: 0.05,
        vertical_offset: 0.1,
        ..Default::default()
    };
    let left = flat_placement(layout, &profile, 1.0, Eye::Left, 16.0 / 9.0);
    let right = flat_placement(layout, &profile, 1.0, Eye::Right, 16.0 / 9.0);
    let single = flat_placement(layout, &profile, 1.0, Eye::Single, 16.0 / 9.0);
    assert_eq!(left.center.x, -right.center.x);
    assert_eq!(left.center.x, -0.05);
    assert_eq!(left.center.y, right.center.y);
    assert_eq!(left.center.y, 0.1);
    assert_eq!(left.half_extent, right.half_extent);
    assert_eq!(single.center.x, 0.0);
}

#[test]
fn flat_depth_depends_on_content_type() {
    let profile = CalibrationProfile::default();
    let mono = flat_placement(VideoFormat::Flat.layout(), &profile, 1.0, Eye::Single, 1.0);
    let stereo = flat_placement(VideoFormat::FlatTb.layout(), &profile, 1.0, Eye::Single, 1.0);
    assert!(mono.center.z < 0.0);
    assert!(stereo.center.z < mono.center.z);
}

#[test]
fn flat_scale_combines_screen_profile_and_zoom() {
    let profile = CalibrationProfile {
        scale: 1.5,
        screen_type: ScreenType::Phone,
        ..Default::default()
    };
    let p = flat_placement(VideoFormat::Flat.layout(), &profile, 2.0, Eye::Single, 2.0);
    let expected = ScreenType::Phone.base_scale() * 1.5 * 2.0;
    assert!((p.half_extent.y - expected * 0.5).abs() < 1e-5);
    assert!((p.half_extent.x - expected).abs() < 1e-5);

    let clamped = flat_placement(VideoFormat::Flat.layout(), &profile, 50.0, Eye::Single, 2.0);
    let max = flat_placement(VideoFormat::Flat.layout(), &profile, 3.0, Eye::Single, 2.0);
    assert_eq!(clamped, max);
}

#[test]
fn camera_ray_and_projection_agree() {
    let cam = Camera::new(HeadRotation::new(10.0, 30.0), 1.5);
    let (_, dir) = cam.ray_through(Vec2::new(0.5, 0.5));
    assert!((dir - cam.forward()).length() < 1e-4);

    let world = Vec3::new(-1.0, 0.5, -4.0);
    let uv = cam.project(world).unwrap();
    let (_, dir) = cam.ray_through(uv);
    assert!((dir - world.normalize()).length() < 1e-3);
    assert!(cam.project(-cam.forward() * 5.0).is_none());
}
