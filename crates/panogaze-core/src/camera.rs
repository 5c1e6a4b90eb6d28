//! Head camera shared by the renderer and the gaze probe.
//!
//! The camera sits at the origin. Rotation is applied yaw-then-pitch (yaw about
//! world up, pitch about the camera's local horizontal axis) so there is no roll
//! coupling, and the hit-test rays are built from the very same quaternion.

use crate::constants::{CAMERA_FOVY_DEG, CAMERA_ZFAR, CAMERA_ZNEAR};
use crate::orientation::HeadRotation;
use glam::{Mat4, Quat, Vec2, Vec3, Vec4};

/// Orientation of the head camera for a fused rotation.
#[inline]
pub fn view_rotation(rotation: HeadRotation) -> Quat {
    Quat::from_rotation_y(rotation.yaw_deg.to_radians())
        * Quat::from_rotation_x(rotation.pitch_deg.to_radians())
}

/// Perspective camera at the world origin.
#[derive(Clone, Debug)]
pub struct Camera {
    pub orientation: Quat,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn new(rotation: HeadRotation, aspect: f32) -> Self {
        Self {
            orientation: view_rotation(rotation),
            aspect: if aspect.is_finite() && aspect > 0.0 {
                aspect
            } else {
                1.0
            },
            fovy_radians: CAMERA_FOVY_DEG.to_radians(),
            znear: CAMERA_ZNEAR,
            zfar: CAMERA_ZFAR,
        }
    }

    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    /// World to view space. The eye is the origin, so this is the inverse
    /// orientation only.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_quat(self.orientation.inverse())
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::NEG_Z
    }

    /// World-space ray through a viewport-normalized point (origin top-left).
    ///
    /// Returns `(ray_origin, ray_direction)`.
    pub fn ray_through(&self, uv: Vec2) -> (Vec3, Vec3) {
        let ndc_x = 2.0 * uv.x - 1.0;
        let ndc_y = 1.0 - 2.0 * uv.y;
        let inv = self.view_proj().inverse();
        let p_far = inv * Vec4::new(ndc_x, ndc_y, 1.0, 1.0);
        let p1: Vec3 = p_far.truncate() / p_far.w;
        (Vec3::ZERO, p1.normalize_or_zero())
    }

    /// Viewport-normalized position of a world point, or `None` if it is
    /// behind the camera.
    pub fn project(&self, world: Vec3) -> Option<Vec2> {
        let clip = self.view_proj() * world.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        Some(Vec2::new((ndc.x + 1.0) * 0.5, (1.0 - ndc.y) * 0.5))
    }
}

/// Distance along a normalized ray to the first intersection with a sphere.
#[inline]
pub fn ray_sphere(ray_origin: Vec3, ray_dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray_origin - center;
    let b = oc.dot(ray_dir);
    let c = oc.dot(oc) - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let t = -b - disc.sqrt();
    (t >= 0.0).then_some(t)
}
