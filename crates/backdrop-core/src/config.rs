use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::ConfigError;
use crate::motion::MovementPattern;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneKind {
    /// Smooth-blended animated primitives.
    #[default]
    Field,
    /// Noise-displaced morphing blob with a torus and a repeated lattice.
    Morph,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    #[default]
    Sphere,
    Box,
    Torus,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MarchConfig {
    pub max_steps: u32,
    pub surface_epsilon: f32,
    pub max_distance: f32,
    pub step_damping: f32,
}

impl Default for MarchConfig {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
            surface_epsilon: DEFAULT_SURFACE_EPSILON,
            max_distance: DEFAULT_MAX_DISTANCE,
            step_damping: DEFAULT_STEP_DAMPING,
        }
    }
}

/// Screen-space falloff by NDC radius: full strength inside `inner`, gone at
/// `outer`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeFade {
    pub inner: f32,
    pub outer: f32,
}

impl Default for EdgeFade {
    fn default() -> Self {
        Self {
            inner: 0.7,
            outer: 1.2,
        }
    }
}

/// Full parameter set of the backdrop. Every field has a default so partial
/// JSON objects deserialize.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SceneConfig {
    pub scene: SceneKind,
    pub sphere_count: u32,
    pub shapes: Vec<ShapeKind>,
    pub primitive_size: f32,
    pub seed: u64,

    pub ambient_intensity: f32,
    pub diffuse_intensity: f32,
    pub specular_intensity: f32,
    pub specular_power: f32,
    pub fresnel_power: f32,
    pub rim_intensity: f32,
    pub background_color: Vec3,
    pub primary_color: Vec3,
    pub light_color: Vec3,
    pub light_position: Vec3,
    pub light_intensity: f32,
    pub fill_light: Option<Vec3>,
    pub smoothness: f32,
    pub contrast: f32,
    pub fog_density: f32,
    pub color_gradient: f32,

    pub movement_pattern: MovementPattern,
    pub movement_speed: f32,
    pub movement_scale: f32,
    pub min_movement_scale: f32,
    pub max_movement_scale: f32,
    pub individual_rotation: bool,
    pub mouse_proximity_effect: bool,
    pub pointer_smoothing: f32,
    pub pointer_radius: f32,
    pub pointer_strength: f32,
    pub pointer_world_scale: f32,

    pub camera_distance: f32,
    pub camera_orbit_speed: f32,
    pub focal_length: f32,
    pub camera_sway: bool,

    pub march: MarchConfig,
    pub soft_shadows: bool,
    pub ambient_occlusion: bool,
    pub shadow_softness: f32,
    pub shadow_max_distance: f32,

    pub edge_fade: Option<EdgeFade>,
    pub transparent_background: bool,
    pub exposure: Option<f32>,
    pub resolution_scale: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            scene: SceneKind::Field,
            sphere_count: 7,
            shapes: vec![ShapeKind::Sphere],
            primitive_size: 0.2,
            seed: 7,

            ambient_intensity: 0.12,
            diffuse_intensity: 0.7,
            specular_intensity: 1.8,
            specular_power: 20.0,
            fresnel_power: 2.2,
            rim_intensity: 1.0,
            background_color: rgb_hex(0x000505),
            primary_color: rgb_hex(0x000808),
            light_color: rgb_hex(0x00ffcc),
            light_position: Vec3::new(0.7, 1.3, 0.8),
            light_intensity: 1.0,
            fill_light: None,
            smoothness: 0.45,
            contrast: 1.6,
            fog_density: 0.08,
            color_gradient: 0.2,

            movement_pattern: MovementPattern::Wave,
            movement_speed: 1.4,
            movement_scale: 1.1,
            min_movement_scale: 0.3,
            max_movement_scale: 1.0,
            individual_rotation: true,
            mouse_proximity_effect: true,
            pointer_smoothing: 0.15,
            pointer_radius: 2.0,
            pointer_strength: 0.5,
            pointer_world_scale: 2.0,

            camera_distance: 2.0,
            camera_orbit_speed: 0.0,
            focal_length: 1.0,
            camera_sway: true,

            march: MarchConfig::default(),
            soft_shadows: true,
            ambient_occlusion: true,
            shadow_softness: 16.0,
            shadow_max_distance: 10.0,

            edge_fade: Some(EdgeFade::default()),
            transparent_background: true,
            exposure: None,
            resolution_scale: 0.5,
        }
    }
}

impl SceneConfig {
    /// Parses a (possibly partial) camelCase JSON object and validates it.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: SceneConfig = serde_json::from_str(raw)?;
        config.validated()
    }

    /// Rejects non-finite values and clamps everything else into range.
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        let scalars = [
            ("primitiveSize", self.primitive_size),
            ("ambientIntensity", self.ambient_intensity),
            ("diffuseIntensity", self.diffuse_intensity),
            ("specularIntensity", self.specular_intensity),
            ("specularPower", self.specular_power),
            ("fresnelPower", self.fresnel_power),
            ("rimIntensity", self.rim_intensity),
            ("lightIntensity", self.light_intensity),
            ("smoothness", self.smoothness),
            ("contrast", self.contrast),
            ("fogDensity", self.fog_density),
            ("colorGradient", self.color_gradient),
            ("movementSpeed", self.movement_speed),
            ("movementScale", self.movement_scale),
            ("minMovementScale", self.min_movement_scale),
            ("maxMovementScale", self.max_movement_scale),
            ("pointerSmoothing", self.pointer_smoothing),
            ("pointerRadius", self.pointer_radius),
            ("pointerStrength", self.pointer_strength),
            ("pointerWorldScale", self.pointer_world_scale),
            ("cameraDistance", self.camera_distance),
            ("cameraOrbitSpeed", self.camera_orbit_speed),
            ("focalLength", self.focal_length),
            ("march.surfaceEpsilon", self.march.surface_epsilon),
            ("march.maxDistance", self.march.max_distance),
            ("march.stepDamping", self.march.step_damping),
            ("shadowSoftness", self.shadow_softness),
            ("shadowMaxDistance", self.shadow_max_distance),
            ("resolutionScale", self.resolution_scale),
        ];
        for (field, value) in scalars {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { field });
            }
        }
        let vectors = [
            ("backgroundColor", self.background_color),
            ("primaryColor", self.primary_color),
            ("lightColor", self.light_color),
            ("lightPosition", self.light_position),
        ];
        for (field, value) in vectors {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { field });
            }
        }
        if let Some(fill) = self.fill_light {
            if !fill.is_finite() {
                return Err(ConfigError::NonFinite { field: "fillLight" });
            }
        }
        if self.light_position.length_squared() < 1.0e-12 {
            return Err(ConfigError::DegenerateLight);
        }
        if let Some(fade) = self.edge_fade {
            if !fade.inner.is_finite() || !fade.outer.is_finite() {
                return Err(ConfigError::NonFinite { field: "edgeFade" });
            }
            if fade.inner >= fade.outer {
                return Err(ConfigError::InvalidRange {
                    field: "edgeFade",
                    reason: "inner must be smaller than outer",
                });
            }
        }
        if let Some(exposure) = self.exposure {
            if !exposure.is_finite() {
                return Err(ConfigError::NonFinite { field: "exposure" });
            }
            if exposure <= 0.0 {
                return Err(ConfigError::InvalidRange {
                    field: "exposure",
                    reason: "must be positive",
                });
            }
        }

        self.sphere_count = self.sphere_count.min(MAX_PRIMITIVES);
        if self.shapes.is_empty() {
            self.shapes.push(ShapeKind::Sphere);
        }
        self.primitive_size = self.primitive_size.max(1.0e-3);

        self.ambient_intensity = self.ambient_intensity.max(0.0);
        self.diffuse_intensity = self.diffuse_intensity.max(0.0);
        self.specular_intensity = self.specular_intensity.max(0.0);
        self.specular_power = self.specular_power.max(1.0);
        self.fresnel_power = self.fresnel_power.max(0.0);
        self.rim_intensity = self.rim_intensity.max(0.0);
        self.light_intensity = self.light_intensity.max(0.0);
        self.background_color = self.background_color.max(Vec3::ZERO);
        self.primary_color = self.primary_color.max(Vec3::ZERO);
        self.light_color = self.light_color.max(Vec3::ZERO);
        self.smoothness = self.smoothness.max(0.0);
        self.contrast = self.contrast.max(0.0);
        self.fog_density = self.fog_density.max(0.0);
        self.color_gradient = self.color_gradient.max(0.0);

        self.movement_speed = self.movement_speed.max(0.0);
        self.movement_scale = self.movement_scale.max(0.0);
        self.min_movement_scale = self.min_movement_scale.max(0.0);
        self.max_movement_scale = self.max_movement_scale.max(0.0);
        if self.min_movement_scale > self.max_movement_scale {
            std::mem::swap(&mut self.min_movement_scale, &mut self.max_movement_scale);
        }
        self.pointer_smoothing = self.pointer_smoothing.clamp(0.0, 1.0);
        self.pointer_radius = self.pointer_radius.max(1.0e-3);
        self.pointer_strength = self.pointer_strength.max(0.0);
        self.pointer_world_scale = self.pointer_world_scale.max(0.0);

        self.camera_distance = self.camera_distance.max(1.0e-2);
        self.focal_length = self.focal_length.max(1.0e-2);

        self.march.max_steps = self.march.max_steps.max(1);
        self.march.surface_epsilon = self.march.surface_epsilon.max(1.0e-5);
        self.march.max_distance = self.march.max_distance.max(self.march.surface_epsilon);
        self.march.step_damping = self.march.step_damping.clamp(1.0e-2, 1.0);
        self.shadow_softness = self.shadow_softness.max(1.0e-2);
        self.shadow_max_distance = self.shadow_max_distance.max(1.0e-2);
        self.resolution_scale = self.resolution_scale.clamp(0.1, 1.0);

        Ok(self)
    }

    /// Recolors the config the way the site applies a palette to a preset:
    /// the accent drives the light, the dark tone the background. The
    /// preset's surface color is kept.
    pub fn apply_palette(&mut self, palette: Palette) {
        self.background_color = palette.background;
        self.light_color = palette.accent;
    }

    /// Shape of primitive `index`, cycling through `shapes`.
    pub fn shape_for(&self, index: u32) -> ShapeKind {
        if self.shapes.is_empty() {
            return ShapeKind::Sphere;
        }
        self.shapes[index as usize % self.shapes.len()]
    }
}

/// Three-tone palette as used by the site's background components.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    pub primary: Vec3,
    pub background: Vec3,
    pub accent: Vec3,
}

impl Palette {
    pub fn from_hex(primary: &str, background: &str, accent: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            primary: parse_hex_color(primary)?,
            background: parse_hex_color(background)?,
            accent: parse_hex_color(accent)?,
        })
    }

    /// Parses `"#ff3366,#101010,#00ffd1"`.
    pub fn from_list(list: &str) -> Result<Self, ConfigError> {
        let parts: Vec<&str> = list.split(',').map(str::trim).collect();
        match parts.as_slice() {
            [primary, background, accent] => Self::from_hex(primary, background, accent),
            _ => Err(ConfigError::InvalidColor(list.to_string())),
        }
    }
}

/// `#rrggbb` (or `rrggbb`) to linear 0..1 components.
pub fn parse_hex_color(raw: &str) -> Result<Vec3, ConfigError> {
    let hex = raw.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(ConfigError::InvalidColor(raw.to_string()));
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16)
            .map(|v| v as f32 / 255.0)
            .map_err(|_| ConfigError::InvalidColor(raw.to_string()))
    };
    Ok(Vec3::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

pub(crate) fn rgb_hex(value: u32) -> Vec3 {
    Vec3::new(
        ((value >> 16) & 0xff) as f32 / 255.0,
        ((value >> 8) & 0xff) as f32 / 255.0,
        (value & 0xff) as f32 / 255.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_yields_defaults() {
        let config = SceneConfig::from_json("{}").unwrap();
        assert_eq!(config, SceneConfig::default().validated().unwrap());
    }

    #[test]
    fn partial_json_overrides_named_fields() {
        let config = SceneConfig::from_json(
            r#"{"sphereCount": 3, "movementPattern": "chaos", "backgroundColor": [0.1, 0.2, 0.3],
                "march": {"stepDamping": 0.8}, "shapes": ["box", "torus"]}"#,
        )
        .unwrap();
        assert_eq!(config.sphere_count, 3);
        assert_eq!(config.movement_pattern, MovementPattern::Chaotic);
        assert_eq!(config.background_color, Vec3::new(0.1, 0.2, 0.3));
        assert_eq!(config.march.step_damping, 0.8);
        assert_eq!(config.march.max_steps, DEFAULT_MAX_STEPS);
        assert_eq!(config.shape_for(0), ShapeKind::Box);
        assert_eq!(config.shape_for(3), ShapeKind::Torus);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let config = SceneConfig {
            sphere_count: 99,
            smoothness: -1.0,
            pointer_smoothing: 3.0,
            min_movement_scale: 2.0,
            max_movement_scale: 0.5,
            shapes: Vec::new(),
            march: MarchConfig {
                max_steps: 0,
                surface_epsilon: 0.0,
                step_damping: 4.0,
                ..MarchConfig::default()
            },
            ..SceneConfig::default()
        }
        .validated()
        .unwrap();
        assert_eq!(config.sphere_count, MAX_PRIMITIVES);
        assert_eq!(config.smoothness, 0.0);
        assert_eq!(config.pointer_smoothing, 1.0);
        assert_eq!((config.min_movement_scale, config.max_movement_scale), (0.5, 2.0));
        assert_eq!(config.shapes, vec![ShapeKind::Sphere]);
        assert_eq!(config.march.max_steps, 1);
        assert!(config.march.surface_epsilon > 0.0);
        assert_eq!(config.march.step_damping, 1.0);
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let config = SceneConfig {
            fog_density: f32::NAN,
            ..SceneConfig::default()
        };
        match config.validated() {
            Err(ConfigError::NonFinite { field }) => assert_eq!(field, "fogDensity"),
            other => panic!("expected NonFinite, got {other:?}"),
        }
    }

    #[test]
    fn zero_light_position_is_rejected() {
        let config = SceneConfig {
            light_position: Vec3::ZERO,
            ..SceneConfig::default()
        };
        assert!(matches!(config.validated(), Err(ConfigError::DegenerateLight)));
    }

    #[test]
    fn inverted_edge_fade_is_rejected() {
        let config = SceneConfig {
            edge_fade: Some(EdgeFade {
                inner: 1.0,
                outer: 0.5,
            }),
            ..SceneConfig::default()
        };
        assert!(config.validated().is_err());
    }

    #[test]
    fn malformed_json_is_reported() {
        assert!(matches!(
            SceneConfig::from_json("{\"sphereCount\": \"many\"}"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn hex_colors_parse() {
        let c = parse_hex_color("#ff3366").unwrap();
        assert_eq!(c, Vec3::new(1.0, 0.2, 0.4));
        assert_eq!(parse_hex_color("00ffd1").unwrap(), rgb_hex(0x00ffd1));
        assert!(parse_hex_color("#fff").is_err());
        assert!(parse_hex_color("#gg0000").is_err());
    }

    #[test]
    fn palette_recolors_config() {
        let palette = Palette::from_list("#ff3366, #101010, #00ffd1").unwrap();
        let mut config = SceneConfig::default();
        let surface = config.primary_color;
        config.apply_palette(palette);
        assert_eq!(config.primary_color, surface);
        assert_ne!(config.primary_color, palette.primary);
        assert_eq!(config.background_color, palette.background);
        assert_eq!(config.light_color, palette.accent);
        assert!(Palette::from_list("#ff3366,#101010").is_err());
    }
}
