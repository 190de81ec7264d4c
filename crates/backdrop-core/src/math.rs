use glam::{Mat3, Vec3};

#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if edge1 <= edge0 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[inline]
pub fn mix(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
pub fn fract(v: f32) -> f32 {
    v - v.floor()
}

/// Cheap sine hash in [0, 1).
#[inline]
pub fn hash1(n: f32) -> f32 {
    fract(n.sin() * 43_758.547)
}

/// Trilinear value noise in [0, 1] with a smoothstep fade.
pub fn noise3(x: Vec3) -> f32 {
    let p = x.floor();
    let f = x - p;
    let f = f * f * (Vec3::splat(3.0) - 2.0 * f);

    let n = p.x + p.y * 57.0 + p.z * 113.0;
    let x00 = mix(hash1(n), hash1(n + 1.0), f.x);
    let x10 = mix(hash1(n + 57.0), hash1(n + 58.0), f.x);
    let x01 = mix(hash1(n + 113.0), hash1(n + 114.0), f.x);
    let x11 = mix(hash1(n + 170.0), hash1(n + 171.0), f.x);
    mix(mix(x00, x10, f.y), mix(x01, x11, f.y), f.z)
}

/// Five octaves of [`noise3`]; result stays in [0, 1).
pub fn fbm(mut x: Vec3) -> f32 {
    let shift = Vec3::splat(100.0);
    let mut value = 0.0;
    let mut amplitude = 0.5;
    for _ in 0..5 {
        value += amplitude * noise3(x);
        x = x * 2.0 + shift;
        amplitude *= 0.5;
    }
    value
}

/// Rotation about Y by `yaw` followed by X by `pitch`.
#[inline]
pub fn yaw_pitch(yaw: f32, pitch: f32) -> Mat3 {
    Mat3::from_rotation_y(yaw) * Mat3::from_rotation_x(pitch)
}

/// `1 - exp(-x * k)` per channel.
#[inline]
pub fn exposure(color: Vec3, k: f32) -> Vec3 {
    Vec3::ONE - (-color * k).exp()
}
