//! Per-frame scene snapshots.
//!
//! A [`SceneFunction`] is built once per frame from the clock, the smoothed
//! pointer and the config, then evaluated read-only by every pixel.

use glam::{Mat3, Vec2, Vec3};
use smallvec::SmallVec;

use crate::config::{SceneConfig, SceneKind, ShapeKind};
use crate::constants::EMPTY_SCENE_DISTANCE;
use crate::math::{fbm, noise3};
use crate::motion::{individual_rotation, repel, PrimitiveTraits};
use crate::sdf::{op_repeat, op_twist_y, sd_box, sd_sphere, sd_torus, smooth_union, Sdf};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Primitive {
    pub shape: ShapeKind,
    pub center: Vec3,
    /// Sphere radius, box half-extent or torus major radius.
    pub size: f32,
    /// World-to-local rotation.
    pub orientation: Mat3,
}

impl Primitive {
    pub fn sphere(center: Vec3, radius: f32) -> Self {
        Self {
            shape: ShapeKind::Sphere,
            center,
            size: radius,
            orientation: Mat3::IDENTITY,
        }
    }

    #[inline]
    pub fn distance(&self, p: Vec3) -> f32 {
        let local = self.orientation * (p - self.center);
        match self.shape {
            ShapeKind::Sphere => sd_sphere(local, self.size),
            ShapeKind::Box => sd_box(local, Vec3::splat(self.size * 0.8)),
            ShapeKind::Torus => sd_torus(local, self.size, self.size * 0.35),
        }
    }
}

/// Animated primitives blended with a smooth union.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldScene {
    primitives: SmallVec<[Primitive; 16]>,
    smoothness: f32,
}

impl FieldScene {
    pub fn from_primitives(primitives: impl IntoIterator<Item = Primitive>, smoothness: f32) -> Self {
        Self {
            primitives: primitives.into_iter().collect(),
            smoothness,
        }
    }

    /// Evaluates every primitive center for this frame.
    ///
    /// `movement_scale` is the effective scale after pointer proximity has
    /// been applied by the frame driver.
    pub fn animate(config: &SceneConfig, time: f32, pointer: Vec2, movement_scale: f32) -> Self {
        let pointer_world = pointer * config.pointer_world_scale;
        let primitives = (0..config.sphere_count).map(|index| {
            let traits = PrimitiveTraits::for_index(index, config.seed);
            let t = time * config.movement_speed * traits.speed;
            let mut offset = config
                .movement_pattern
                .offset(t, traits.phase, traits.orbit_radius);

            let mut orientation = Mat3::IDENTITY;
            if config.individual_rotation {
                let rotation = individual_rotation(index, t);
                offset = rotation * offset;
                orientation = rotation.transpose();
            }
            if config.mouse_proximity_effect {
                offset = repel(
                    offset,
                    pointer_world,
                    config.pointer_radius,
                    config.pointer_strength,
                    t * 2.0 + traits.phase,
                );
            }

            Primitive {
                shape: config.shape_for(index),
                center: offset * movement_scale * traits.scale,
                size: config.primitive_size * traits.size,
                orientation,
            }
        });
        Self::from_primitives(primitives, config.smoothness)
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn smoothness(&self) -> f32 {
        self.smoothness
    }
}

impl Sdf for FieldScene {
    fn distance(&self, p: Vec3) -> f32 {
        let mut iter = self.primitives.iter();
        let Some(first) = iter.next() else {
            return EMPTY_SCENE_DISTANCE;
        };
        iter.fold(first.distance(p), |acc, prim| {
            smooth_union(acc, prim.distance(p), self.smoothness)
        })
    }
}

/// Organic blob: a twisted, noise-displaced sphere merged with a torus, a
/// lattice of small orbiting spheres and a sphere that follows the pointer.
///
/// The displacement makes this a distance estimate rather than an exact
/// bound, so it should be marched with some step damping.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MorphScene {
    time: f32,
    drift: Vec3,
    twist: f32,
    core_radius: f32,
    displacement: f32,
    lattice_cell: Vec3,
    lattice_blend: f32,
    torus_offset: Vec3,
    torus_thickness: f32,
    pointer_center: Vec3,
}

impl MorphScene {
    pub fn animate(time: f32, pointer: Vec2) -> Self {
        let morph = (time * 0.3).sin() * 0.5 + 0.5;
        Self {
            time,
            drift: Vec3::new((time * 0.5).sin() * 0.3, (time * 0.4).cos() * 0.2, 0.0),
            twist: ((time * 0.2).sin() * 0.5 + 0.5) * 0.5,
            core_radius: (1.0 + noise3(Vec3::new(time * 0.2, 0.0, 0.0)) * 0.2) * 0.8,
            displacement: 0.2 + morph * 0.1,
            lattice_cell: Vec3::new(4.0 + (time * 0.5).sin() * 0.5, 4.0, 4.0),
            lattice_blend: 0.5 + (time * 0.2).sin() * 0.3,
            torus_offset: Vec3::new((time * 0.3).cos() * 0.5, (time * 0.3).sin() * 0.5, 0.0),
            torus_thickness: 0.1 + (time * 0.7).sin() * 0.05,
            pointer_center: Vec3::new(pointer.x * 0.3, pointer.y * 0.3, 0.5),
        }
    }
}

impl Sdf for MorphScene {
    fn distance(&self, p: Vec3) -> f32 {
        let q = op_twist_y(p + self.drift, self.twist);
        let core = sd_sphere(q, self.core_radius)
            - fbm(q * 2.0 + Vec3::splat(self.time * 0.1)) * self.displacement;

        let lattice = sd_sphere(op_repeat(p, self.lattice_cell), 0.3);
        let torus = sd_torus(p + self.torus_offset, 1.5, self.torus_thickness);
        let follower = sd_sphere(p - self.pointer_center, 0.3);

        let mut d = smooth_union(core, lattice, self.lattice_blend);
        d = smooth_union(d, torus, 0.8);
        d = smooth_union(d, follower, 1.0);
        d * 0.8
    }
}

/// The scene evaluated for one frame.
#[derive(Clone, Debug, PartialEq)]
pub enum SceneFunction {
    Field(FieldScene),
    Morph(MorphScene),
}

impl SceneFunction {
    pub fn build(config: &SceneConfig, time: f32, pointer: Vec2, movement_scale: f32) -> Self {
        match config.scene {
            SceneKind::Field => {
                SceneFunction::Field(FieldScene::animate(config, time, pointer, movement_scale))
            }
            SceneKind::Morph => SceneFunction::Morph(MorphScene::animate(time, pointer)),
        }
    }
}

impl Sdf for SceneFunction {
    #[inline]
    fn distance(&self, p: Vec3) -> f32 {
        match self {
            SceneFunction::Field(field) => field.distance(p),
            SceneFunction::Morph(morph) => morph.distance(p),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::MovementPattern;

    fn still_config(count: u32) -> SceneConfig {
        SceneConfig {
            sphere_count: count,
            individual_rotation: false,
            mouse_proximity_effect: false,
            ..SceneConfig::default()
        }
    }

    #[test]
    fn empty_field_is_infinitely_far() {
        let field = FieldScene::animate(&still_config(0), 1.0, Vec2::ZERO, 1.0);
        assert!(field.primitives().is_empty());
        assert_eq!(field.distance(Vec3::ZERO), f32::INFINITY);
    }

    #[test]
    fn zero_movement_scale_centers_everything() {
        let field = FieldScene::animate(&still_config(4), 3.7, Vec2::ZERO, 0.0);
        for prim in field.primitives() {
            assert_eq!(prim.center, Vec3::ZERO);
        }
    }

    #[test]
    fn primitives_desynchronize() {
        let config = still_config(5);
        let field = FieldScene::animate(&config, 2.0, Vec2::ZERO, 1.0);
        let centers: Vec<Vec3> = field.primitives().iter().map(|p| p.center).collect();
        for i in 0..centers.len() {
            for j in (i + 1)..centers.len() {
                assert!((centers[i] - centers[j]).length() > 1e-3);
            }
        }
    }

    #[test]
    fn pattern_choice_changes_centers() {
        let mut config = still_config(3);
        config.movement_pattern = MovementPattern::Orbital;
        let orbital = FieldScene::animate(&config, 1.5, Vec2::ZERO, 1.0);
        config.movement_pattern = MovementPattern::Chaotic;
        let chaotic = FieldScene::animate(&config, 1.5, Vec2::ZERO, 1.0);
        assert_ne!(orbital.primitives()[0].center, chaotic.primitives()[0].center);
    }

    #[test]
    fn rotated_box_keeps_its_extent() {
        let mut prim = Primitive::sphere(Vec3::ZERO, 0.5);
        prim.shape = ShapeKind::Box;
        prim.orientation = Mat3::from_rotation_y(0.7);
        // A box contains its inscribed sphere whatever the rotation.
        for dir in [Vec3::X, Vec3::Y, Vec3::Z, Vec3::NEG_X] {
            assert!(prim.distance(dir * 0.39) < 0.0);
        }
    }

    #[test]
    fn morph_scene_is_finite_and_has_a_surface() {
        let morph = MorphScene::animate(0.0, Vec2::ZERO);
        assert!(morph.distance(Vec3::ZERO) < 0.0);
        let far = morph.distance(Vec3::new(0.0, 2.0, -10.0));
        assert!(far.is_finite() && far > 0.0);
    }
}
