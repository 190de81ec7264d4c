//! Closed-form primitive animation.
//!
//! A primitive's center is a function of its index, the clock and the pointer
//! only. Nothing here is stateful: the frame driver re-evaluates every center
//! from scratch each frame.

use std::f32::consts::TAU;
use std::str::FromStr;

use glam::{Mat3, Vec2, Vec3};
use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::constants::POINTER_Z_WOBBLE;
use crate::error::ConfigError;
use crate::math::{smoothstep, yaw_pitch};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementPattern {
    Orbital,
    #[default]
    Wave,
    #[serde(alias = "chaos")]
    Chaotic,
    #[serde(alias = "pulse")]
    Pulsing,
}

impl MovementPattern {
    pub const ALL: [MovementPattern; 4] = [
        MovementPattern::Orbital,
        MovementPattern::Wave,
        MovementPattern::Chaotic,
        MovementPattern::Pulsing,
    ];

    /// Unscaled offset of a primitive at local time `t` with phase `o` and
    /// orbit radius `r`.
    pub fn offset(self, t: f32, o: f32, r: f32) -> Vec3 {
        match self {
            MovementPattern::Orbital => {
                let angle = t + o;
                Vec3::new(angle.cos() * r, angle.sin() * r, (t * 0.5 + o).sin() * 0.3)
            }
            MovementPattern::Wave => Vec3::new(
                (t + o).sin() * r,
                (t * 0.7 + o).cos() * r,
                (t * 0.5 + o * 2.0).sin() * 0.5,
            ),
            MovementPattern::Chaotic => {
                let n1 = (t * 1.1 + o).sin() * (t * 0.9 + o * 2.0).cos();
                let n2 = (t * 0.8 + o * 3.0).sin() * (t * 1.2 + o).cos();
                let n3 = (t * 0.7 + o * 0.5).sin() * (t * 0.6 + o * 4.0).cos();
                Vec3::new(n1 * r, n2 * r, n3 * 0.6)
            }
            MovementPattern::Pulsing => {
                let pulse = (t.sin() * 0.5 + 0.5) * r;
                Vec3::new(o.cos() * pulse, o.sin() * pulse, (t * 0.5 + o).cos() * 0.3)
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MovementPattern::Orbital => "orbital",
            MovementPattern::Wave => "wave",
            MovementPattern::Chaotic => "chaotic",
            MovementPattern::Pulsing => "pulsing",
        }
    }
}

impl FromStr for MovementPattern {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "orbital" => Ok(Self::Orbital),
            "wave" => Ok(Self::Wave),
            "chaotic" | "chaos" => Ok(Self::Chaotic),
            "pulsing" | "pulse" => Ok(Self::Pulsing),
            _ => Err(ConfigError::InvalidRange {
                field: "movementPattern",
                reason: "expected orbital, wave, chaotic or pulsing",
            }),
        }
    }
}

/// Per-index variation so primitives drift out of lockstep.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PrimitiveTraits {
    pub phase: f32,
    pub speed: f32,
    pub scale: f32,
    pub orbit_radius: f32,
    pub size: f32,
}

impl PrimitiveTraits {
    /// Deterministic traits for primitive `index` under `seed`.
    pub fn for_index(index: u32, seed: u64) -> Self {
        let mix = seed ^ (index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
        let mut rng = StdRng::seed_from_u64(mix);
        Self {
            phase: rng.gen::<f32>() * TAU,
            speed: 0.5 + rng.gen::<f32>() * 0.5,
            scale: 0.7 + rng.gen::<f32>() * 0.6,
            orbit_radius: 0.6 + rng.gen::<f32>() * 0.8,
            size: 0.7 + rng.gen::<f32>() * 0.6,
        }
    }
}

/// Spin applied to primitive `index` when individual rotation is enabled.
#[inline]
pub fn individual_rotation(index: u32, t: f32) -> Mat3 {
    let spin = t * (0.2 + index as f32 * 0.05);
    yaw_pitch(spin, spin * 0.7)
}

/// Pushes `pos` away from the pointer in the XY plane.
///
/// `pointer_world` is the pointer already mapped into scene units. Influence
/// falls to zero at `radius`.
pub fn repel(pos: Vec3, pointer_world: Vec2, radius: f32, strength: f32, wobble_phase: f32) -> Vec3 {
    let away = pos.truncate() - pointer_world;
    let dist = away.length();
    let influence = 1.0 - smoothstep(0.0, radius, dist);
    if influence <= 0.0 {
        return pos;
    }
    let push = if dist > 1.0e-6 {
        away / dist * influence * strength
    } else {
        Vec2::ZERO
    };
    Vec3::new(
        pos.x + push.x,
        pos.y + push.y,
        pos.z + influence * POINTER_Z_WOBBLE * wobble_phase.sin(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn traits_are_deterministic_and_distinct() {
        let a = PrimitiveTraits::for_index(3, 7);
        let b = PrimitiveTraits::for_index(3, 7);
        let c = PrimitiveTraits::for_index(4, 7);
        assert_eq!(a, b);
        assert_ne!(a.phase, c.phase);
        assert!((0.5..=1.0).contains(&a.speed));
        assert!((0.6..=1.4).contains(&a.orbit_radius));
    }

    #[test]
    fn patterns_differ_for_the_same_inputs() {
        let offsets: Vec<Vec3> = MovementPattern::ALL
            .iter()
            .map(|p| p.offset(1.3, 0.4, 1.0))
            .collect();
        for i in 0..offsets.len() {
            for j in (i + 1)..offsets.len() {
                assert!((offsets[i] - offsets[j]).length() > 1e-3);
            }
        }
    }

    #[test]
    fn pattern_names_round_trip_with_aliases() {
        for p in MovementPattern::ALL {
            assert_eq!(p.as_str().parse::<MovementPattern>().unwrap(), p);
        }
        assert_eq!("chaos".parse::<MovementPattern>().unwrap(), MovementPattern::Chaotic);
        assert_eq!("Pulse".parse::<MovementPattern>().unwrap(), MovementPattern::Pulsing);
        assert!("spiral".parse::<MovementPattern>().is_err());
    }

    #[test]
    fn repel_has_no_effect_outside_radius() {
        let pos = Vec3::new(3.0, 0.0, 0.2);
        assert_eq!(repel(pos, Vec2::ZERO, 2.0, 0.5, 1.0), pos);
    }

    #[test]
    fn repel_pushes_away_from_pointer() {
        let pos = Vec3::new(0.5, 0.0, 0.0);
        let moved = repel(pos, Vec2::ZERO, 2.0, 0.5, 0.0);
        assert!(moved.x > pos.x);
        assert_eq!(moved.y, 0.0);
    }

    #[test]
    fn repel_on_top_of_pointer_stays_finite() {
        let pos = Vec3::new(1.0, 1.0, 0.0);
        let moved = repel(pos, Vec2::new(1.0, 1.0), 2.0, 0.5, 1.0);
        assert!(moved.is_finite());
        assert_eq!(moved.truncate(), pos.truncate());
    }
}
