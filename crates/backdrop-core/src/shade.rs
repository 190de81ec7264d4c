//! Surface lighting for ray hits.
//!
//! Blinn-Phong with a fresnel rim, optional soft shadows and ambient
//! occlusion, a contrast curve and finally distance fog toward the background
//! color. Edge fade and exposure belong to the compositor, not here.

use glam::Vec3;
use smallvec::SmallVec;

use crate::config::SceneConfig;
use crate::constants::*;
use crate::march::{march_observed, MarchSettings};
use crate::sdf::Sdf;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LightKind {
    /// Unit direction pointing from the surface toward the light.
    Directional { direction: Vec3 },
    Point { position: Vec3 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Light {
    pub kind: LightKind,
    pub color: Vec3,
    pub intensity: f32,
}

pub type Lights = SmallVec<[Light; 2]>;

impl Light {
    /// Direction toward the light from `p` and how far a shadow ray may go.
    #[inline]
    fn toward(&self, p: Vec3, shadow_max_distance: f32) -> Option<(Vec3, f32)> {
        match self.kind {
            LightKind::Directional { direction } => Some((direction, shadow_max_distance)),
            LightKind::Point { position } => {
                let to_light = position - p;
                let dist = to_light.length();
                (dist > 1.0e-6).then(|| (to_light / dist, dist))
            }
        }
    }

    /// The key light (along `lightPosition`) plus the optional fill light.
    pub fn from_config(config: &SceneConfig) -> Lights {
        let mut lights = Lights::new();
        lights.push(Light {
            kind: LightKind::Directional {
                direction: config.light_position.try_normalize().unwrap_or(Vec3::Y),
            },
            color: config.light_color,
            intensity: config.light_intensity,
        });
        if let Some(position) = config.fill_light {
            lights.push(Light {
                kind: LightKind::Point { position },
                color: config.light_color,
                intensity: config.light_intensity * 0.35,
            });
        }
        lights
    }
}

/// Material and post parameters copied out of the config for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadingParams {
    pub primary_color: Vec3,
    pub accent_color: Vec3,
    pub background_color: Vec3,
    pub color_gradient: f32,
    pub ambient_intensity: f32,
    pub diffuse_intensity: f32,
    pub specular_intensity: f32,
    pub specular_power: f32,
    pub fresnel_power: f32,
    pub rim_intensity: f32,
    pub contrast: f32,
    pub fog_density: f32,
    pub soft_shadows: bool,
    pub ambient_occlusion: bool,
    pub shadow_softness: f32,
    pub shadow_max_distance: f32,
    pub surface_epsilon: f32,
    pub normal_epsilon: f32,
}

impl From<&SceneConfig> for ShadingParams {
    fn from(config: &SceneConfig) -> Self {
        Self {
            primary_color: config.primary_color,
            accent_color: config.light_color,
            background_color: config.background_color,
            color_gradient: config.color_gradient,
            ambient_intensity: config.ambient_intensity,
            diffuse_intensity: config.diffuse_intensity,
            specular_intensity: config.specular_intensity,
            specular_power: config.specular_power,
            fresnel_power: config.fresnel_power,
            rim_intensity: config.rim_intensity,
            contrast: config.contrast,
            fog_density: config.fog_density,
            soft_shadows: config.soft_shadows,
            ambient_occlusion: config.ambient_occlusion,
            shadow_softness: config.shadow_softness,
            shadow_max_distance: config.shadow_max_distance,
            surface_epsilon: config.march.surface_epsilon,
            normal_epsilon: NORMAL_EPSILON,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shaded {
    pub color: Vec3,
    pub alpha: f32,
}

/// Central-difference gradient of `scene` at `p`, normalized.
///
/// Falls back to +Y where the gradient vanishes so callers never see NaN.
pub fn calc_normal<S: Sdf + ?Sized>(scene: &S, p: Vec3, eps: f32) -> Vec3 {
    let dx = Vec3::new(eps, 0.0, 0.0);
    let dy = Vec3::new(0.0, eps, 0.0);
    let dz = Vec3::new(0.0, 0.0, eps);
    let gradient = Vec3::new(
        scene.distance(p + dx) - scene.distance(p - dx),
        scene.distance(p + dy) - scene.distance(p - dy),
        scene.distance(p + dz) - scene.distance(p - dz),
    );
    let len = gradient.length();
    if !len.is_finite() || len < DEGENERATE_GRADIENT {
        return Vec3::Y;
    }
    gradient / len
}

/// Penumbra factor in [0, 1] along `dir`; 0 means fully occluded.
fn soft_shadow<S: Sdf + ?Sized>(
    scene: &S,
    origin: Vec3,
    dir: Vec3,
    max_distance: f32,
    params: &ShadingParams,
) -> f32 {
    let settings = MarchSettings {
        max_steps: SHADOW_MAX_STEPS,
        surface_epsilon: params.surface_epsilon,
        max_distance,
        step_damping: 1.0,
        start_distance: SHADOW_START,
    };
    let mut penumbra: f32 = 1.0;
    let result = march_observed(origin, dir, scene, &settings, |sample| {
        penumbra = penumbra.min(params.shadow_softness * sample.distance / sample.traveled);
    });
    if result.hit {
        return 0.0;
    }
    penumbra.clamp(0.0, 1.0)
}

fn ambient_occlusion<S: Sdf + ?Sized>(scene: &S, p: Vec3, normal: Vec3) -> f32 {
    let mut occlusion = 0.0;
    let mut weight = 1.0;
    for i in 0..AO_SAMPLES {
        let reach = 0.01 + 0.02 * (i * i) as f32;
        let d = scene.distance(p + normal * reach);
        occlusion += (reach - d) * weight;
        weight *= AO_WEIGHT_DECAY;
    }
    (1.0 - occlusion).clamp(0.0, 1.0)
}

/// Lights the surface point `hit` seen along unit ray direction `ray_dir`
/// after traveling `travel` from the eye.
pub fn shade<S: Sdf + ?Sized>(
    hit: Vec3,
    ray_dir: Vec3,
    travel: f32,
    scene: &S,
    lights: &[Light],
    params: &ShadingParams,
) -> Shaded {
    let normal = calc_normal(scene, hit, params.normal_epsilon);
    let view = -ray_dir;
    let n_dot_v = normal.dot(view).max(0.0);

    let gradient = (hit.length() * params.color_gradient).clamp(0.0, 1.0);
    let base = params.primary_color.lerp(params.accent_color, gradient);

    let ao = if params.ambient_occlusion {
        ambient_occlusion(scene, hit, normal)
    } else {
        1.0
    };
    let shadow_origin = hit + normal * SHADOW_BIAS;

    let mut color = base * params.ambient_intensity;
    for light in lights {
        let Some((to_light, reach)) = light.toward(hit, params.shadow_max_distance) else {
            continue;
        };
        let radiance = light.color * light.intensity;

        let diffuse = base * radiance * normal.dot(to_light).max(0.0) * params.diffuse_intensity;
        let half = (to_light + view).try_normalize().unwrap_or(normal);
        let specular = radiance
            * normal.dot(half).max(0.0).powf(params.specular_power)
            * params.specular_intensity;
        let rim = radiance * (1.0 - n_dot_v).powf(params.fresnel_power) * params.rim_intensity;

        let shadow = if params.soft_shadows {
            soft_shadow(scene, shadow_origin, to_light, reach, params)
        } else {
            1.0
        };
        color += (diffuse + specular) * shadow + rim;
    }
    color *= ao;

    let pivot = Vec3::splat(CONTRAST_PIVOT);
    color = pivot.lerp(color, params.contrast).max(Vec3::ZERO);

    let fog = 1.0 - (-travel * params.fog_density).exp();
    color = color.lerp(params.background_color, fog);

    Shaded { color, alpha: 1.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdf::{sd_sphere, smooth_union};

    fn unit_sphere(p: Vec3) -> f32 {
        sd_sphere(p, 1.0)
    }

    fn params() -> ShadingParams {
        ShadingParams::from(&SceneConfig::default())
    }

    #[test]
    fn sphere_normals_are_unit_and_radial() {
        for p in [Vec3::X, Vec3::NEG_Y, Vec3::new(0.6, 0.0, -0.8)] {
            let n = calc_normal(&unit_sphere, p, NORMAL_EPSILON);
            assert!((n.length() - 1.0).abs() < 1e-4);
            assert!((n - p).length() < 1e-3);
        }
    }

    #[test]
    fn flat_field_falls_back_to_up() {
        let flat = |_: Vec3| 1.0_f32;
        assert_eq!(calc_normal(&flat, Vec3::ZERO, NORMAL_EPSILON), Vec3::Y);
    }

    #[test]
    fn shadowed_point_is_darker() {
        // Small sphere sitting between the probe and the light.
        let scene = |p: Vec3| unit_sphere(p).min(sd_sphere(p - Vec3::new(0.0, 2.0, 0.0), 0.5));
        let p = params();
        let lit = soft_shadow(&unit_sphere, Vec3::Y * 1.01, Vec3::Y, 10.0, &p);
        let blocked = soft_shadow(&scene, Vec3::Y * 1.01, Vec3::Y, 10.0, &p);
        assert_eq!(lit, 1.0);
        assert_eq!(blocked, 0.0);
    }

    #[test]
    fn grazing_ray_gets_partial_shadow() {
        // Occluder surface passes 0.03 beside the shadow ray around t = 2.
        let scene = |p: Vec3| unit_sphere(p).min(sd_sphere(p - Vec3::new(0.53, 3.0, 0.0), 0.5));
        let mut p = params();
        p.shadow_softness = 16.0;
        let shadow = soft_shadow(&scene, Vec3::Y * 1.01, Vec3::Y, 10.0, &p);
        assert!(shadow > 0.0 && shadow < 1.0, "penumbra {shadow}");
    }

    #[test]
    fn crevice_between_blended_spheres_is_occluded() {
        let left = Vec3::new(-0.9, 0.0, 0.0);
        let right = Vec3::new(0.9, 0.0, 0.0);
        let scene =
            |p: Vec3| smooth_union(sd_sphere(p - left, 1.0), sd_sphere(p - right, 1.0), 0.45);
        // Top of the neck where the two spheres meet.
        let junction = Vec3::new(0.0, 0.654, 0.0);
        assert!(scene(junction).abs() < 1e-2);
        let ao = ambient_occlusion(&scene, junction, Vec3::Y);
        let open = ambient_occlusion(&scene, Vec3::new(1.9, 0.0, 0.0), Vec3::X);
        assert!(ao > 0.0 && ao < 0.95, "crevice ao {ao}");
        assert!(ao < open);
    }

    #[test]
    fn point_light_reach_is_its_distance() {
        let light = Light {
            kind: LightKind::Point {
                position: Vec3::new(0.0, 3.0, 0.0),
            },
            color: Vec3::ONE,
            intensity: 1.0,
        };
        let (dir, reach) = light.toward(Vec3::ZERO, 10.0).unwrap();
        assert_eq!(dir, Vec3::Y);
        assert!((reach - 3.0).abs() < 1e-6);
        assert!(light.toward(Vec3::new(0.0, 3.0, 0.0), 10.0).is_none());
    }

    #[test]
    fn open_surface_is_not_occluded() {
        let ao = ambient_occlusion(&unit_sphere, Vec3::X, Vec3::X);
        assert!((ao - 1.0).abs() < 1e-4);
    }

    #[test]
    fn fog_pulls_toward_background() {
        let scene = unit_sphere;
        let lights = Light::from_config(&SceneConfig::default());
        let mut p = params();
        let hit = Vec3::new(0.0, 0.0, -1.0);
        let mut last = f32::INFINITY;
        for density in [0.0, 0.05, 0.2, 1.0, 5.0] {
            p.fog_density = density;
            let c = shade(hit, Vec3::Z, 4.0, &scene, &lights, &p).color;
            let dist = c.distance(p.background_color);
            assert!(dist <= last + 1e-6);
            last = dist;
        }
    }

    #[test]
    fn fill_light_is_a_point_light() {
        let config = SceneConfig {
            fill_light: Some(Vec3::new(-2.0, 1.0, -1.0)),
            ..SceneConfig::default()
        };
        let lights = Light::from_config(&config);
        assert_eq!(lights.len(), 2);
        assert!(matches!(lights[1].kind, LightKind::Point { .. }));
    }
}
