//////////////////////////////////////////////////
// Using

use nalgebra_glm::{vec2, Vec2};
use winit::dpi::PhysicalSize;

//////////////////////////////////////////////////
// Definition

/// Dimensions of the current surface, in device pixels and device independent points.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SizeEvent {
    pub width_px: u32,
    pub height_px: u32,
    pub width_pt: f32,
    pub height_pt: f32,
    pub pixels_per_pt: f32,
}

//////////////////////////////////////////////////
// Implementation

impl SizeEvent {
    pub fn new(width_px: u32, height_px: u32, pixels_per_pt: f32) -> Self {
        // a zero ratio would turn every point value into infinity
        let pixels_per_pt = if pixels_per_pt > 0.0 { pixels_per_pt } else { 1.0 };
        Self {
            width_px,
            height_px,
            width_pt: width_px as f32 / pixels_per_pt,
            height_pt: height_px as f32 / pixels_per_pt,
            pixels_per_pt,
        }
    }

    pub fn from_physical(size: PhysicalSize<u32>, scale_factor: f64) -> Self {
        Self::new(size.width, size.height, scale_factor as f32)
    }

    pub fn px_to_pt(&self, px: f32) -> f32 {
        px / self.pixels_per_pt
    }

    pub fn size_pt(&self) -> Vec2 {
        vec2(self.width_pt, self.height_pt)
    }

    pub fn is_empty(&self) -> bool {
        self.width_px == 0 || self.height_px == 0
    }
}

//////////////////////////////////////////////////
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn px_to_pt_is_linear() {
        let size = SizeEvent::new(1080, 1920, 2.625);
        assert_eq!(size.px_to_pt(0.0), 0.0);
        for n in [1.0, 7.0, 160.0, 1080.0] {
            assert_relative_eq!(size.px_to_pt(2.0 * n), 2.0 * size.px_to_pt(n));
        }
        assert_relative_eq!(size.px_to_pt(1080.0), size.width_pt);
    }

    #[test]
    fn points_follow_ratio() {
        let size = SizeEvent::new(800, 600, 2.0);
        assert_relative_eq!(size.width_pt, 400.0);
        assert_relative_eq!(size.height_pt, 300.0);
    }

    #[test]
    fn invalid_ratio_falls_back_to_one() {
        let size = SizeEvent::new(100, 200, 0.0);
        assert_eq!(size.pixels_per_pt, 1.0);
        assert_relative_eq!(size.width_pt, 100.0);
        assert_relative_eq!(size.height_pt, 200.0);
    }
}
