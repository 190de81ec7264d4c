use glam::{Mat3, Vec2, Vec3};

use crate::constants::{SWAY_PITCH_AMPLITUDE, SWAY_PITCH_SPEED, SWAY_YAW_AMPLITUDE, SWAY_YAW_SPEED};
use crate::math::yaw_pitch;

/// Pinhole camera rebuilt every frame from the clock.
///
/// Screen right maps to `right`, screen up to `up`; rays leave `eye` through
/// an image plane `focal_length` units along `forward`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub right: Vec3,
    pub up: Vec3,
    pub forward: Vec3,
    pub focal_length: f32,
    /// Extra rotation applied to every ray direction (slow sway).
    pub sway: Mat3,
}

impl Camera {
    /// Camera at `eye` looking at `target`.
    pub fn look_at(eye: Vec3, target: Vec3, focal_length: f32) -> Self {
        let forward = (target - eye).try_normalize().unwrap_or(Vec3::Z);
        let mut right = Vec3::Y.cross(forward);
        if right.length_squared() < 1.0e-12 {
            right = Vec3::X;
        }
        let right = right.normalize();
        let up = forward.cross(right);
        Self {
            eye,
            right,
            up,
            forward,
            focal_length,
            sway: Mat3::IDENTITY,
        }
    }

    /// Camera orbiting the origin at `distance`, starting on -Z, rotated by
    /// `orbit_angle` about +Y.
    pub fn orbiting(distance: f32, orbit_angle: f32, focal_length: f32) -> Self {
        let eye = Mat3::from_rotation_y(orbit_angle) * Vec3::new(0.0, 0.0, -distance);
        Self::look_at(eye, Vec3::ZERO, focal_length)
    }

    /// Adds the slow procedural sway driven by `time`.
    pub fn with_sway(mut self, time: f32) -> Self {
        let yaw = (time * SWAY_YAW_SPEED).sin() * SWAY_YAW_AMPLITUDE;
        let pitch = (time * SWAY_PITCH_SPEED).cos() * SWAY_PITCH_AMPLITUDE;
        self.sway = yaw_pitch(yaw, pitch);
        self
    }

    /// Unit ray direction through `ndc` (both axes in [-1, 1]).
    ///
    /// The horizontal axis is widened by `aspect` so pixels stay square.
    #[inline]
    pub fn ray_direction(&self, ndc: Vec2, aspect: f32) -> Vec3 {
        let local =
            self.forward * self.focal_length + self.right * (ndc.x * aspect) + self.up * ndc.y;
        (self.sway * local).normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn look_at_builds_orthonormal_basis() {
        let cam = Camera::look_at(Vec3::new(0.0, 0.0, -5.0), Vec3::ZERO, 1.0);
        assert!((cam.forward - Vec3::Z).length() < 1e-6);
        assert!((cam.right - Vec3::X).length() < 1e-6);
        assert!((cam.up - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn center_ray_points_at_target() {
        let cam = Camera::orbiting(5.0, 0.0, 1.0);
        let dir = cam.ray_direction(Vec2::ZERO, 16.0 / 9.0);
        assert!((dir - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn vertical_look_does_not_produce_nan() {
        let cam = Camera::look_at(Vec3::new(0.0, 5.0, 0.0), Vec3::ZERO, 1.0);
        assert!(cam.right.is_finite());
        assert!(cam.ray_direction(Vec2::new(0.5, -0.5), 1.0).is_finite());
    }

    #[test]
    fn sway_stays_small() {
        let cam = Camera::orbiting(2.0, 0.0, 1.0).with_sway(12.3);
        let dir = cam.ray_direction(Vec2::ZERO, 1.0);
        assert!(dir.dot(Vec3::Z) > 0.98);
    }
}
