//////////////////////////////////////////////////
// Using

use loading_gl::prelude::glm::{vec2, Vec2};
use loading_gl::prelude::*;

//////////////////////////////////////////////////
// Definition

/// Full width horizontal strip of the surface, in pixels.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Band {
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Layout {
    pub header: Band,
    pub body: Band,
    pub footer: Band,
}

//////////////////////////////////////////////////
// Implementation

impl Band {
    pub fn bottom(&self) -> u32 {
        self.top + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Top left corner in points.
    pub fn position(&self, size: &SizeEvent) -> Vec2 {
        vec2(0.0, size.px_to_pt(self.top as f32))
    }
}

impl Layout {
    /// Header on top, footer at the bottom, body takes the rest. On short surfaces the body
    /// gives way first, then the footer, then the header.
    pub fn new(width: u32, height: u32, header_height: u32, footer_height: u32) -> Self {
        let header_height = header_height.min(height);
        let footer_height = footer_height.min(height - header_height);
        let body_height = height - header_height - footer_height;
        Self {
            header: Band {
                top: 0,
                width,
                height: header_height,
            },
            body: Band {
                top: header_height,
                width,
                height: body_height,
            },
            footer: Band {
                top: header_height + body_height,
                width,
                height: footer_height,
            },
        }
    }
}

//////////////////////////////////////////////////
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn bands_stack_without_overlap() {
        let layout = Layout::new(1080, 1920, 200, 200);
        assert_eq!(layout.header, Band { top: 0, width: 1080, height: 200 });
        assert_eq!(layout.body, Band { top: 200, width: 1080, height: 1520 });
        assert_eq!(layout.footer, Band { top: 1720, width: 1080, height: 200 });
        assert_eq!(layout.header.bottom(), layout.body.top);
        assert_eq!(layout.body.bottom(), layout.footer.top);
        assert_eq!(layout.footer.bottom(), 1920);
    }

    #[test]
    fn short_surface_squeezes_body_then_footer() {
        let layout = Layout::new(300, 250, 200, 200);
        assert_eq!(layout.header.height, 200);
        assert!(layout.body.is_empty());
        assert_eq!(layout.footer.height, 50);
        assert_eq!(layout.footer.bottom(), 250);

        let layout = Layout::new(300, 120, 200, 200);
        assert_eq!(layout.header.height, 120);
        assert!(layout.body.is_empty());
        assert!(layout.footer.is_empty());
    }

    #[test]
    fn position_converts_to_points() {
        let size = SizeEvent::new(1080, 1920, 2.0);
        let layout = Layout::new(size.width_px, size.height_px, 200, 200);
        assert_relative_eq!(layout.footer.position(&size).y, 860.0);
        assert_relative_eq!(layout.footer.position(&size).x, 0.0);
    }
}
