//! Output compositor and the per-pixel driver loop.

use glam::{Vec2, Vec3};

use crate::config::{EdgeFade, SceneConfig};
use crate::constants::GAMMA;
use crate::frame::{FrameParams, Viewport};
use crate::march::{march, MarchResult};
use crate::math::{exposure, smoothstep};
use crate::shade::shade;

/// How shaded colors turn into stored pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OutputSettings {
    pub transparent_background: bool,
    pub background_color: Vec3,
    pub edge_fade: Option<EdgeFade>,
    /// When set, `1 - exp(-c * exposure)` followed by display gamma.
    pub exposure: Option<f32>,
}

impl From<&SceneConfig> for OutputSettings {
    fn from(config: &SceneConfig) -> Self {
        Self {
            transparent_background: config.transparent_background,
            background_color: config.background_color,
            edge_fade: config.edge_fade,
            exposure: config.exposure,
        }
    }
}

impl OutputSettings {
    fn tone_map(&self, color: Vec3) -> Vec3 {
        match self.exposure {
            Some(k) => exposure(color, k).max(Vec3::ZERO).powf(1.0 / GAMMA),
            None => color,
        }
    }

    fn edge_factor(&self, ndc: Vec2) -> f32 {
        match self.edge_fade {
            Some(fade) => 1.0 - smoothstep(fade.inner, fade.outer, ndc.length()),
            None => 1.0,
        }
    }
}

/// Straight-alpha RGBA8 from a linear color and coverage.
#[inline]
pub fn composite(color: Vec3, alpha: f32) -> [u8; 4] {
    let to_byte = |v: f32| {
        let v = if v.is_nan() { 0.0 } else { v };
        (v.clamp(0.0, 1.0) * 255.0).round() as u8
    };
    [
        to_byte(color.x),
        to_byte(color.y),
        to_byte(color.z),
        to_byte(alpha),
    ]
}

/// Result of tracing a single primary ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelSample {
    pub march: MarchResult,
    /// Post-processed color before quantization.
    pub color: Vec3,
    pub alpha: f32,
}

impl PixelSample {
    pub fn rgba(&self) -> [u8; 4] {
        composite(self.color, self.alpha)
    }
}

/// Traces the primary ray through `ndc` and resolves it to an output color.
pub fn trace_pixel(params: &FrameParams, ndc: Vec2) -> PixelSample {
    let camera = &params.camera;
    let output = &params.output;
    let dir = camera.ray_direction(ndc, params.viewport.aspect);
    let result = march(camera.eye, dir, &params.scene, &params.march);

    if !result.hit {
        let (color, alpha) = if output.transparent_background {
            (Vec3::ZERO, 0.0)
        } else {
            (output.tone_map(output.background_color), 1.0)
        };
        return PixelSample {
            march: result,
            color,
            alpha,
        };
    }

    let hit = camera.eye + dir * result.distance;
    let shaded = shade(
        hit,
        dir,
        result.distance,
        &params.scene,
        &params.lights,
        &params.shading,
    );
    let fade = output.edge_factor(ndc);
    let (color, alpha) = if output.transparent_background {
        (shaded.color, shaded.alpha * fade)
    } else {
        (output.background_color.lerp(shaded.color, fade), 1.0)
    };
    PixelSample {
        march: result,
        color: output.tone_map(color),
        alpha,
    }
}

/// NDC of the center of pixel `(x, y)`; row 0 is the top of the image.
#[inline]
pub fn pixel_ndc(x: u32, y: u32, viewport: Viewport) -> Vec2 {
    Vec2::new(
        (x as f32 + 0.5) / viewport.width as f32 * 2.0 - 1.0,
        1.0 - (y as f32 + 0.5) / viewport.height as f32 * 2.0,
    )
}

/// RGBA8 image in row-major order, top row first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Framebuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<[u8; 4]>,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        let mut fb = Self::default();
        fb.resize(width, height);
        fb
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width.max(1);
        self.height = height.max(1);
        self.pixels
            .resize(self.width as usize * self.height as usize, [0; 4]);
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }
}

fn render_row(params: &FrameParams, y: usize, row: &mut [[u8; 4]]) {
    for (x, slot) in row.iter_mut().enumerate() {
        let ndc = pixel_ndc(x as u32, y as u32, params.viewport);
        *slot = trace_pixel(params, ndc).rgba();
    }
}

/// Renders the whole frame into `target`, resizing it to the snapshot's
/// viewport first. Every pixel is overwritten.
pub fn render_frame(params: &FrameParams, target: &mut Framebuffer) {
    let viewport = params.viewport;
    if target.width != viewport.width || target.height != viewport.height {
        target.resize(viewport.width, viewport.height);
    }
    let width = viewport.width as usize;

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        target
            .pixels
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| render_row(params, y, row));
    }

    #[cfg(not(feature = "parallel"))]
    {
        target
            .pixels
            .chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| render_row(params, y, row));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composite_clamps_and_rounds() {
        assert_eq!(composite(Vec3::new(-1.0, 0.5, 2.0), 1.0), [0, 128, 255, 255]);
        assert_eq!(composite(Vec3::splat(f32::NAN), 0.0), [0, 0, 0, 0]);
    }

    #[test]
    fn edge_fade_is_full_at_center_and_gone_past_outer() {
        let output = OutputSettings::from(&SceneConfig::default());
        assert_eq!(output.edge_factor(Vec2::ZERO), 1.0);
        assert_eq!(output.edge_factor(Vec2::new(1.0, 1.0)), 0.0);
        let mid = output.edge_factor(Vec2::new(0.95, 0.0));
        assert!(mid > 0.0 && mid < 1.0);
    }

    #[test]
    fn exposure_maps_into_unit_range() {
        let output = OutputSettings {
            exposure: Some(1.5),
            ..OutputSettings::from(&SceneConfig::default())
        };
        let c = output.tone_map(Vec3::new(0.0, 1.0, 50.0));
        assert_eq!(c.x, 0.0);
        assert!(c.y > 0.0 && c.y < 1.0);
        assert!(c.z <= 1.0);
    }

    #[test]
    fn pixel_centers_cover_ndc_symmetrically() {
        let viewport = Viewport::new(4, 2);
        assert_eq!(pixel_ndc(0, 0, viewport), Vec2::new(-0.75, 0.5));
        assert_eq!(pixel_ndc(3, 1, viewport), Vec2::new(0.75, -0.5));
    }

    #[test]
    fn framebuffer_resize_keeps_length_consistent() {
        let mut fb = Framebuffer::new(0, 3);
        assert_eq!((fb.width, fb.height), (1, 3));
        fb.resize(5, 4);
        assert_eq!(fb.pixels.len(), 20);
        assert_eq!(fb.as_bytes().len(), 80);
        assert_eq!(fb.pixel(5, 0), None);
    }
}
