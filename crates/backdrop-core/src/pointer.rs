use glam::Vec2;

/// Pointer position in normalized device coordinates, `[-1, 1]` on both
/// axes with +Y up.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerState {
    raw: Vec2,
    smoothed: Vec2,
}

impl PointerState {
    /// Stores the latest sample. Non-finite samples are ignored.
    pub fn set_raw(&mut self, ndc: Vec2) {
        if ndc.is_finite() {
            self.raw = ndc.clamp(Vec2::NEG_ONE, Vec2::ONE);
        }
    }

    /// Moves the smoothed estimate `factor` of the way toward the raw sample.
    pub fn smooth(&mut self, factor: f32) {
        self.smoothed += (self.raw - self.smoothed) * factor.clamp(0.0, 1.0);
    }

    pub fn raw(&self) -> Vec2 {
        self.raw
    }

    pub fn smoothed(&self) -> Vec2 {
        self.smoothed
    }
}

/// Converts a pixel position (origin top-left, +Y down) into NDC.
pub fn ndc_from_pixel(x: f32, y: f32, width: f32, height: f32) -> Vec2 {
    let w = width.max(1.0);
    let h = height.max(1.0);
    Vec2::new((x / w) * 2.0 - 1.0, 1.0 - (y / h) * 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoothing_converges_geometrically() {
        let mut pointer = PointerState::default();
        pointer.set_raw(Vec2::new(1.0, -0.5));
        let target = pointer.raw();
        let mut prev_gap = (target - pointer.smoothed()).length();
        for _ in 0..60 {
            pointer.smooth(0.15);
            let gap = (target - pointer.smoothed()).length();
            assert!(gap <= prev_gap * 0.85 + 1e-6);
            prev_gap = gap;
        }
        assert!(prev_gap < 1e-3);
    }

    #[test]
    fn raw_samples_are_clamped() {
        let mut pointer = PointerState::default();
        pointer.set_raw(Vec2::new(3.0, -7.0));
        assert_eq!(pointer.raw(), Vec2::new(1.0, -1.0));
        pointer.set_raw(Vec2::new(f32::NAN, 0.0));
        assert_eq!(pointer.raw(), Vec2::new(1.0, -1.0));
    }

    #[test]
    fn pixel_corners_map_to_ndc_corners() {
        assert_eq!(ndc_from_pixel(0.0, 0.0, 200.0, 100.0), Vec2::new(-1.0, 1.0));
        assert_eq!(ndc_from_pixel(200.0, 100.0, 200.0, 100.0), Vec2::new(1.0, -1.0));
        assert_eq!(ndc_from_pixel(100.0, 50.0, 200.0, 100.0), Vec2::ZERO);
    }
}
