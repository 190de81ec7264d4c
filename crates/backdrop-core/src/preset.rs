use std::fmt;
use std::str::FromStr;

use glam::Vec3;

use crate::config::{rgb_hex, EdgeFade, MarchConfig, SceneConfig, SceneKind};
use crate::error::ConfigError;
use crate::motion::MovementPattern;

/// Named looks. Each one is a full [`SceneConfig`]; nothing else differs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Preset {
    Moody,
    Cosmic,
    #[default]
    Neon,
    Vibrant,
    Nebula,
}

impl Preset {
    pub const ALL: [Preset; 5] = [
        Preset::Moody,
        Preset::Cosmic,
        Preset::Neon,
        Preset::Vibrant,
        Preset::Nebula,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Preset::Moody => "moody",
            Preset::Cosmic => "cosmic",
            Preset::Neon => "neon",
            Preset::Vibrant => "vibrant",
            Preset::Nebula => "nebula",
        }
    }

    /// Case-insensitive lookup by name.
    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        let wanted = name.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ConfigError::UnknownPreset(name.to_string()))
    }

    /// `1`..`5` select presets in [`Preset::ALL`] order.
    pub fn from_digit(digit: char) -> Option<Self> {
        let index = digit.to_digit(10)?.checked_sub(1)?;
        Self::ALL.get(index as usize).copied()
    }

    pub fn config(self) -> SceneConfig {
        let base = SceneConfig::default();
        match self {
            Preset::Moody => SceneConfig {
                sphere_count: 6,
                ambient_intensity: 0.05,
                diffuse_intensity: 0.4,
                specular_intensity: 2.0,
                specular_power: 8.0,
                fresnel_power: 1.0,
                background_color: rgb_hex(0x050505),
                primary_color: rgb_hex(0x000000),
                light_color: rgb_hex(0xffffff),
                light_position: Vec3::new(1.0, 1.0, 1.0),
                smoothness: 0.3,
                contrast: 1.2,
                fog_density: 0.15,
                movement_pattern: MovementPattern::Orbital,
                movement_speed: 1.0,
                movement_scale: 1.0,
                ..base
            },
            Preset::Cosmic => SceneConfig {
                sphere_count: 8,
                ambient_intensity: 0.1,
                diffuse_intensity: 0.5,
                specular_intensity: 1.2,
                specular_power: 16.0,
                fresnel_power: 2.0,
                background_color: rgb_hex(0x000011),
                primary_color: rgb_hex(0x000022),
                light_color: rgb_hex(0x88aaff),
                light_position: Vec3::new(0.5, 1.0, 0.5),
                smoothness: 0.4,
                contrast: 1.4,
                fog_density: 0.2,
                movement_pattern: MovementPattern::Wave,
                movement_speed: 1.2,
                movement_scale: 1.3,
                ..base
            },
            Preset::Neon => base,
            Preset::Vibrant => SceneConfig {
                sphere_count: 10,
                ambient_intensity: 0.15,
                diffuse_intensity: 0.6,
                specular_intensity: 1.0,
                specular_power: 24.0,
                fresnel_power: 2.5,
                background_color: rgb_hex(0x0a0505),
                primary_color: rgb_hex(0x110000),
                light_color: rgb_hex(0xff8866),
                light_position: Vec3::new(0.8, 1.2, 0.6),
                smoothness: 0.5,
                contrast: 1.5,
                fog_density: 0.05,
                movement_pattern: MovementPattern::Chaotic,
                movement_speed: 1.5,
                movement_scale: 1.2,
                ..base
            },
            Preset::Nebula => SceneConfig {
                scene: SceneKind::Morph,
                ambient_intensity: 0.2,
                diffuse_intensity: 0.8,
                specular_intensity: 1.0,
                specular_power: 16.0,
                fresnel_power: 3.0,
                rim_intensity: 0.3,
                background_color: rgb_hex(0x0b0014),
                primary_color: rgb_hex(0x6a00f4),
                light_color: rgb_hex(0xff4fd8),
                light_position: Vec3::new(4.0, 5.0, -4.0),
                fill_light: Some(Vec3::new(-3.0, -1.0, -3.0)),
                contrast: 1.0,
                fog_density: 0.1,
                color_gradient: 0.4,
                camera_distance: 4.0,
                camera_orbit_speed: 0.3,
                focal_length: 1.5,
                camera_sway: false,
                march: MarchConfig {
                    max_steps: 100,
                    surface_epsilon: 1.0e-3,
                    max_distance: 20.0,
                    step_damping: 0.8,
                },
                shadow_max_distance: 2.5,
                edge_fade: Some(EdgeFade {
                    inner: 0.9,
                    outer: 1.4,
                }),
                exposure: Some(1.5),
                ..base
            },
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}
