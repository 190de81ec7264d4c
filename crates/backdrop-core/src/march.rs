use glam::Vec3;

use crate::config::MarchConfig;
use crate::sdf::Sdf;

/// Budget and tolerances of a single sphere-traced ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarchSettings {
    pub max_steps: u32,
    pub surface_epsilon: f32,
    pub max_distance: f32,
    /// Fraction of the distance estimate taken per step, in (0, 1].
    pub step_damping: f32,
    pub start_distance: f32,
}

impl From<&MarchConfig> for MarchSettings {
    fn from(config: &MarchConfig) -> Self {
        Self {
            max_steps: config.max_steps,
            surface_epsilon: config.surface_epsilon,
            max_distance: config.max_distance,
            step_damping: config.step_damping,
            start_distance: 0.0,
        }
    }
}

impl Default for MarchSettings {
    fn default() -> Self {
        Self::from(&MarchConfig::default())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarchResult {
    pub hit: bool,
    /// Distance traveled along the ray; `max_distance` on a miss.
    pub distance: f32,
    pub steps: u32,
}

/// One distance evaluation along the ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarchSample {
    pub distance: f32,
    pub traveled: f32,
}

/// Sphere-traces `scene` from `origin` along unit `direction`.
///
/// `origin` is expected to lie in free space.
#[inline]
pub fn march<S: Sdf + ?Sized>(
    origin: Vec3,
    direction: Vec3,
    scene: &S,
    settings: &MarchSettings,
) -> MarchResult {
    march_observed(origin, direction, scene, settings, |_| {})
}

/// Like [`march`], handing every sample to `observer` before stepping.
pub fn march_observed<S, F>(
    origin: Vec3,
    direction: Vec3,
    scene: &S,
    settings: &MarchSettings,
    mut observer: F,
) -> MarchResult
where
    S: Sdf + ?Sized,
    F: FnMut(MarchSample),
{
    let miss = |steps| MarchResult {
        hit: false,
        distance: settings.max_distance,
        steps,
    };

    let mut traveled = settings.start_distance;
    for step in 0..settings.max_steps {
        if traveled > settings.max_distance {
            return miss(step);
        }
        let d = scene.distance(origin + direction * traveled);
        observer(MarchSample {
            distance: d,
            traveled,
        });
        if d < settings.surface_epsilon {
            return MarchResult {
                hit: true,
                distance: traveled,
                steps: step + 1,
            };
        }
        traveled += d * settings.step_damping;
    }
    miss(settings.max_steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdf::sd_sphere;

    #[test]
    fn hits_sphere_at_expected_distance() {
        let scene = |p: Vec3| sd_sphere(p, 1.0);
        let settings = MarchSettings::default();
        let result = march(Vec3::new(0.0, 0.0, -5.0), Vec3::Z, &scene, &settings);
        assert!(result.hit);
        assert!((result.distance - 4.0).abs() <= settings.surface_epsilon);
        assert!(result.steps <= settings.max_steps);
    }

    #[test]
    fn empty_scene_misses_immediately() {
        let scene = |_: Vec3| f32::INFINITY;
        let result = march(Vec3::ZERO, Vec3::Z, &scene, &MarchSettings::default());
        assert!(!result.hit);
        assert_eq!(result.distance, 100.0);
        assert!(result.steps <= 1);
    }

    #[test]
    fn grazing_ray_exhausts_budget_without_hitting() {
        // A ray tangent to the sphere converges toward it forever.
        let scene = |p: Vec3| sd_sphere(p, 1.0);
        let settings = MarchSettings {
            max_steps: 8,
            ..MarchSettings::default()
        };
        let result = march(Vec3::new(1.0 + 1e-2, 0.0, -50.0), Vec3::Z, &scene, &settings);
        assert!(!result.hit);
        assert!(result.steps <= settings.max_steps);
        assert_eq!(result.distance, settings.max_distance);
    }

    #[test]
    fn damping_takes_more_steps() {
        let scene = |p: Vec3| sd_sphere(p, 1.0);
        let full = march(Vec3::new(0.0, 0.0, -5.0), Vec3::Z, &scene, &MarchSettings::default());
        let damped = march(
            Vec3::new(0.0, 0.0, -5.0),
            Vec3::Z,
            &scene,
            &MarchSettings {
                step_damping: 0.5,
                ..MarchSettings::default()
            },
        );
        assert!(damped.hit);
        assert!(damped.steps > full.steps);
    }

    #[test]
    fn observer_sees_every_sample() {
        let scene = |p: Vec3| sd_sphere(p, 1.0);
        let mut seen = 0;
        let result = march_observed(
            Vec3::new(0.0, 0.0, -5.0),
            Vec3::Z,
            &scene,
            &MarchSettings::default(),
            |sample| {
                assert!(sample.traveled >= 0.0);
                seen += 1;
            },
        );
        assert_eq!(seen, result.steps);
    }
}
