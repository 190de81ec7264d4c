//! Signed distance primitives and combinators.
//!
//! All functions are pure and take value types, so a scene built from them can
//! be shared across render threads without synchronization.

use glam::{Vec2, Vec3};

/// A signed distance field: negative inside, positive outside.
pub trait Sdf: Send + Sync {
    fn distance(&self, p: Vec3) -> f32;
}

impl<F> Sdf for F
where
    F: Fn(Vec3) -> f32 + Send + Sync,
{
    #[inline]
    fn distance(&self, p: Vec3) -> f32 {
        self(p)
    }
}

#[inline]
pub fn sd_sphere(p: Vec3, radius: f32) -> f32 {
    p.length() - radius
}

#[inline]
pub fn sd_box(p: Vec3, half_extents: Vec3) -> f32 {
    let q = p.abs() - half_extents;
    q.max(Vec3::ZERO).length() + q.max_element().min(0.0)
}

/// Torus lying in the XZ plane.
#[inline]
pub fn sd_torus(p: Vec3, major_radius: f32, minor_radius: f32) -> f32 {
    let q = Vec2::new(Vec2::new(p.x, p.z).length() - major_radius, p.y);
    q.length() - minor_radius
}

/// Polynomial smooth minimum with blend radius `k`.
///
/// Stays within `[min(a, b) - k / 4, min(a, b)]` and collapses to `min` as
/// `k` goes to zero.
#[inline]
pub fn smooth_union(a: f32, b: f32, k: f32) -> f32 {
    if k <= f32::EPSILON {
        return a.min(b);
    }
    let h = (0.5 + 0.5 * (b - a) / k).clamp(0.0, 1.0);
    let blended = b + (a - b) * h - k * h * (1.0 - h);
    // Rounding can leave the blend a few ulps above the hard minimum.
    blended.min(a.min(b))
}

/// Infinite repetition with the given cell size, centered on the origin cell.
#[inline]
pub fn op_repeat(p: Vec3, cell: Vec3) -> Vec3 {
    (p + 0.5 * cell).rem_euclid(cell) - 0.5 * cell
}

/// Rotates the XZ plane by an angle proportional to `p.y`.
#[inline]
pub fn op_twist_y(p: Vec3, strength: f32) -> Vec3 {
    let (s, c) = (strength * p.y).sin_cos();
    Vec3::new(c * p.x - s * p.z, p.y, s * p.x + c * p.z)
}
