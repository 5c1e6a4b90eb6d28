//! Projection surfaces: the inward-facing sphere/hemisphere for panoramic
//! sources and the calibrated plane for flat video.

use crate::constants::{
    FLAT_DEPTH_MONO, FLAT_DEPTH_STEREO, HEMISPHERE_YAW_DEG, SPHERE_HEIGHT_SEGMENTS,
    SPHERE_RADIUS, SPHERE_WIDTH_SEGMENTS, ZOOM_MAX, ZOOM_MIN,
};
use crate::layout::{Eye, PanoramicSpan, StereoLayout, StereoSplit};
use crate::persist::CalibrationProfile;
use glam::{Mat4, Quat, Vec2, Vec3};

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PanoVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub vertices: Vec<PanoVertex>,
    pub indices: Vec<u32>,
}

/// Direction on the content frame for a longitude/latitude pair, before the
/// fixed yaw. Longitude grows toward +Z, mirroring the outward-facing
/// convention so the texture reads left-to-right from inside.
#[inline]
fn content_direction(lon: f32, lat: f32) -> Vec3 {
    Vec3::new(lon.cos() * lat.cos(), lat.sin(), lon.sin() * lat.cos())
}

#[inline]
fn hemisphere_yaw() -> Quat {
    Quat::from_rotation_y(HEMISPHERE_YAW_DEG.to_radians())
}

/// Build the projection sphere for a panoramic span. The surface is centred on
/// -Z (content centre straight ahead); a 180° span covers longitudes within
/// ±90° of it and a 360° span closes with a duplicated seam column.
pub fn build_sphere(span: PanoramicSpan, radius: f32, width_segments: u32, height_segments: u32) -> Mesh {
    let ws = width_segments.max(3);
    let hs = height_segments.max(2);
    let lon_span = span.degrees().to_radians();
    let yaw = hemisphere_yaw();

    let mut vertices = Vec::with_capacity(((ws + 1) * (hs + 1)) as usize);
    for iy in 0..=hs {
        let v = iy as f32 / hs as f32;
        let lat = (v - 0.5) * std::f32::consts::PI;
        for ix in 0..=ws {
            let u = ix as f32 / ws as f32;
            let lon = (u - 0.5) * lon_span;
            let dir = yaw * content_direction(lon, lat);
            vertices.push(PanoVertex {
                position: (dir * radius).to_array(),
                uv: [u, v],
            });
        }
    }

    let row = ws + 1;
    let mut indices = Vec::with_capacity((ws * hs * 6) as usize);
    for iy in 0..hs {
        for ix in 0..ws {
            let a = iy * row + ix;
            let b = a + 1;
            let c = a + row;
            let d = c + 1;
            // counter-clockwise as seen from the origin
            indices.extend_from_slice(&[a, b, c, b, d, c]);
        }
    }
    Mesh { vertices, indices }
}

pub fn build_default_sphere(span: PanoramicSpan) -> Mesh {
    build_sphere(span, SPHERE_RADIUS, SPHERE_WIDTH_SEGMENTS, SPHERE_HEIGHT_SEGMENTS)
}

/// Texture coordinate a view direction lands on, or `None` when the
/// direction falls outside the span (the back half of a 180° source).
pub fn sample_uv(span: PanoramicSpan, dir: Vec3) -> Option<Vec2> {
    let d = hemisphere_yaw().inverse() * dir.normalize_or_zero();
    if d == Vec3::ZERO {
        return None;
    }
    let lon = d.z.atan2(d.x);
    let lat = d.y.clamp(-1.0, 1.0).asin();
    let half = span.degrees().to_radians() * 0.5;
    if lon.abs() > half + 1e-5 {
        return None;
    }
    let u = match span {
        PanoramicSpan::Full360 => (lon / (2.0 * half) + 0.5).rem_euclid(1.0),
        PanoramicSpan::Half180 => lon / (2.0 * half) + 0.5,
    };
    Some(Vec2::new(u, lat / std::f32::consts::PI + 0.5))
}

/// Unit quad in the XY plane, used for flat video.
pub fn build_plane() -> Mesh {
    let vertices = vec![
        PanoVertex {
            position: [-1.0, -1.0, 0.0],
            uv: [0.0, 0.0],
        },
        PanoVertex {
            position: [1.0, -1.0, 0.0],
            uv: [1.0, 0.0],
        },
        PanoVertex {
            position: [-1.0, 1.0, 0.0],
            uv: [0.0, 1.0],
        },
        PanoVertex {
            position: [1.0, 1.0, 0.0],
            uv: [1.0, 1.0],
        },
    ];
    Mesh {
        vertices,
        indices: vec![0, 1, 2, 2, 1, 3],
    }
}

/// Placement of the flat-video plane for one eye.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlatPlacement {
    pub center: Vec3,
    pub half_extent: Vec2,
}

impl FlatPlacement {
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            self.half_extent.extend(1.0),
            Quat::IDENTITY,
            self.center,
        )
    }
}

pub fn flat_depth(layout: StereoLayout) -> f32 {
    match layout.split {
        StereoSplit::None => FLAT_DEPTH_MONO,
        _ => FLAT_DEPTH_STEREO,
    }
}

/// Size and position the flat plane: depth from the content type, scale from
/// screen type × profile × zoom, and the profile's eye offsets. Left and right
/// get mirrored horizontal offsets and the same vertical offset.
pub fn flat_placement(
    layout: StereoLayout,
    profile: &CalibrationProfile,
    zoom: f32,
    eye: Eye,
    content_aspect: f32,
) -> FlatPlacement {
    let zoom = zoom.clamp(ZOOM_MIN, ZOOM_MAX);
    let scale = profile.screen_type.base_scale() * profile.scale * zoom;
    let aspect = if content_aspect.is_finite() && content_aspect > 0.0 {
        content_aspect
    } else {
        crate::constants::FLAT_DEFAULT_ASPECT
    };
    let eye_x = match eye {
        Eye::Left => -profile.ipd_offset,
        Eye::Right => profile.ipd_offset,
        Eye::Single => 0.0,
    };
    FlatPlacement {
        center: Vec3::new(eye_x, profile.vertical_offset, flat_depth(layout)),
        half_extent: Vec2::new(aspect * 0.5 * scale, 0.5 * scale),
    }
}
