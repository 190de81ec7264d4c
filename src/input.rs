// Pure input helpers shared by the event wiring and host-side tests.

use glam::Vec2;

/// Converts a client-space position into NDC (`[-1, 1]`, +Y up) against a
/// viewport of `width` x `height` CSS pixels.
#[inline]
pub fn client_to_ndc(x: f64, y: f64, width: f64, height: f64) -> Vec2 {
    let w = width.max(1.0);
    let h = height.max(1.0);
    let nx = (x / w) * 2.0 - 1.0;
    let ny = 1.0 - (y / h) * 2.0;
    Vec2::new(nx.clamp(-1.0, 1.0) as f32, ny.clamp(-1.0, 1.0) as f32)
}

/// Drops samples that arrive faster than `interval_ms`.
#[derive(Clone, Copy, Debug)]
pub struct PointerThrottle {
    interval_ms: f64,
    last_ms: Option<f64>,
}

impl PointerThrottle {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms: interval_ms.max(0.0),
            last_ms: None,
        }
    }

    /// Returns true (and records the sample) when `now_ms` is far enough
    /// past the last accepted sample.
    pub fn accept(&mut self, now_ms: f64) -> bool {
        match self.last_ms {
            Some(last) if now_ms - last < self.interval_ms && now_ms >= last => false,
            _ => {
                self.last_ms = Some(now_ms);
                true
            }
        }
    }
}

/// Canvas backing-store size for a CSS box, a device pixel ratio and the
/// render resolution scale.
pub fn backing_size(
    css_width: f64,
    css_height: f64,
    device_pixel_ratio: f64,
    resolution_scale: f64,
    max_dpr: f64,
    max_dimension: u32,
) -> (u32, u32) {
    let dpr = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
        device_pixel_ratio.min(max_dpr)
    } else {
        1.0
    };
    let scale = dpr * resolution_scale;
    let side = |css: f64| ((css.max(0.0) * scale).round() as u32).clamp(1, max_dimension.max(1));
    (side(css_width), side(css_height))
}

/// What a key press asks the backdrop to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    ToggleAnimation,
    /// Zero-based index into the preset list.
    SelectPreset(usize),
}

pub fn key_action(key: &str) -> Option<KeyAction> {
    match key {
        " " | "Spacebar" => Some(KeyAction::ToggleAnimation),
        "1" | "2" | "3" | "4" | "5" => key
            .parse::<usize>()
            .ok()
            .map(|digit| KeyAction::SelectPreset(digit - 1)),
        _ => None,
    }
}
