//! Per-frame orchestration.
//!
//! [`FrameDriver`] is the only stateful piece of the pipeline: it owns the
//! clock, the pointer and the validated config. Every frame it hands out an
//! immutable [`FrameParams`] snapshot that the renderer reads from any number
//! of threads.

use glam::Vec2;

use crate::camera::Camera;
use crate::config::{Palette, SceneConfig};
use crate::constants::PROXIMITY_DISTANCE_GAIN;
use crate::error::ConfigError;
use crate::march::MarchSettings;
use crate::pointer::PointerState;
use crate::preset::Preset;
use crate::render::OutputSettings;
use crate::scene::SceneFunction;
use crate::shade::{Light, Lights, ShadingParams};

/// Render target size in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub aspect: f32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            aspect: width as f32 / height as f32,
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

/// Everything needed to render one frame, frozen at tick time.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameParams {
    pub time: f32,
    pub pointer: Vec2,
    pub scene: SceneFunction,
    pub camera: Camera,
    pub lights: Lights,
    pub shading: ShadingParams,
    pub march: MarchSettings,
    pub output: OutputSettings,
    pub viewport: Viewport,
}

pub struct FrameDriver {
    config: SceneConfig,
    palette: Option<Palette>,
    pointer: PointerState,
    viewport: Viewport,
    time: f32,
    animation_enabled: bool,
}

impl FrameDriver {
    pub fn new(config: SceneConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            config: config.validated()?,
            palette: None,
            pointer: PointerState::default(),
            viewport: Viewport::default(),
            time: 0.0,
            animation_enabled: true,
        })
    }

    pub fn from_preset(preset: Preset) -> Result<Self, ConfigError> {
        Self::new(preset.config())
    }

    /// Records a pointer sample in NDC; it is smoothed on the next tick.
    pub fn set_pointer(&mut self, ndc: Vec2) {
        self.pointer.set_raw(ndc);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        let viewport = Viewport::new(width, height);
        if viewport != self.viewport {
            log::debug!("viewport resized to {}x{}", viewport.width, viewport.height);
            self.viewport = viewport;
        }
    }

    pub fn set_animation_enabled(&mut self, enabled: bool) {
        if enabled != self.animation_enabled {
            log::info!("animation {}", if enabled { "resumed" } else { "paused" });
            self.animation_enabled = enabled;
        }
    }

    pub fn toggle_animation(&mut self) {
        self.set_animation_enabled(!self.animation_enabled);
    }

    /// Replaces the config. A palette set earlier is re-applied on top.
    pub fn set_config(&mut self, config: SceneConfig) -> Result<(), ConfigError> {
        let mut config = config.validated()?;
        if let Some(palette) = self.palette {
            config.apply_palette(palette);
        }
        log::debug!(
            "scene config updated: {:?} scene, {} primitives",
            config.scene,
            config.sphere_count
        );
        self.config = config;
        Ok(())
    }

    pub fn apply_preset(&mut self, preset: Preset) -> Result<(), ConfigError> {
        log::debug!("applying preset {preset}");
        self.set_config(preset.config())
    }

    pub fn apply_palette(&mut self, palette: Palette) {
        log::debug!("applying palette {palette:?}");
        self.palette = Some(palette);
        self.config.apply_palette(palette);
    }

    /// Advances the clock by `delta` seconds and snapshots the frame.
    ///
    /// With animation disabled nothing changes, so consecutive snapshots are
    /// identical bit for bit.
    pub fn tick(&mut self, delta: f32) -> FrameParams {
        if self.animation_enabled {
            if delta.is_finite() {
                self.time += delta.max(0.0);
            }
            self.pointer.smooth(self.config.pointer_smoothing);
        }
        self.snapshot()
    }

    /// The frame at the current clock without advancing anything.
    pub fn snapshot(&self) -> FrameParams {
        let config = &self.config;
        let time = self.time;
        let pointer = self.pointer.smoothed();

        let scene = SceneFunction::build(config, time, pointer, self.movement_scale());

        let mut camera = Camera::orbiting(
            config.camera_distance,
            config.camera_orbit_speed * time,
            config.focal_length,
        );
        if config.camera_sway {
            camera = camera.with_sway(time);
        }

        FrameParams {
            time,
            pointer,
            scene,
            camera,
            lights: Light::from_config(config),
            shading: ShadingParams::from(config),
            march: MarchSettings::from(&config.march),
            output: OutputSettings::from(config),
            viewport: self.viewport,
        }
    }

    /// Movement scale after pointer proximity, which calms the scene as the
    /// pointer nears the center.
    fn movement_scale(&self) -> f32 {
        let config = &self.config;
        if !config.mouse_proximity_effect {
            return config.movement_scale;
        }
        let reach = (self.pointer.smoothed().length() * PROXIMITY_DISTANCE_GAIN).min(1.0);
        config.min_movement_scale + (config.max_movement_scale - config.min_movement_scale) * reach
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn pointer(&self) -> PointerState {
        self.pointer
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn animation_enabled(&self) -> bool {
        self.animation_enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paused_driver_does_not_move() {
        let mut driver = FrameDriver::new(SceneConfig::default()).unwrap();
        driver.set_pointer(Vec2::new(0.5, 0.5));
        driver.tick(0.5);
        driver.set_animation_enabled(false);
        let before = driver.tick(0.016);
        driver.set_pointer(Vec2::new(-1.0, 1.0));
        let after = driver.tick(0.016);
        assert_eq!(before.time.to_bits(), after.time.to_bits());
        assert_eq!(before, after);
    }

    #[test]
    fn negative_and_nan_deltas_do_not_rewind() {
        let mut driver = FrameDriver::new(SceneConfig::default()).unwrap();
        driver.tick(1.0);
        driver.tick(-5.0);
        driver.tick(f32::NAN);
        assert_eq!(driver.time(), 1.0);
    }

    #[test]
    fn resize_clamps_to_one_pixel() {
        let mut driver = FrameDriver::new(SceneConfig::default()).unwrap();
        driver.resize(0, 0);
        assert_eq!(driver.viewport(), Viewport::new(1, 1));
        driver.resize(1920, 1080);
        assert!((driver.viewport().aspect - 16.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn palette_survives_preset_change() {
        let mut driver = FrameDriver::from_preset(Preset::Neon).unwrap();
        let palette = Palette::from_list("#ff3366,#101010,#00ffd1").unwrap();
        driver.apply_palette(palette);
        driver.apply_preset(Preset::Moody).unwrap();
        assert_eq!(driver.config().light_color, palette.accent);
        assert_eq!(driver.config().background_color, palette.background);
        assert_eq!(driver.config().primary_color, Preset::Moody.config().primary_color);
        assert_eq!(driver.config().sphere_count, 6);
    }

    #[test]
    fn pointer_distance_scales_movement() {
        let mut driver = FrameDriver::new(SceneConfig::default()).unwrap();
        assert_eq!(driver.movement_scale(), driver.config().min_movement_scale);
        driver.set_pointer(Vec2::new(1.0, 1.0));
        for _ in 0..200 {
            driver.tick(0.016);
        }
        assert!((driver.movement_scale() - driver.config().max_movement_scale).abs() < 1e-4);
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let config = SceneConfig {
            contrast: f32::INFINITY,
            ..SceneConfig::default()
        };
        assert!(FrameDriver::new(config).is_err());
    }
}
