//////////////////////////////////////////////////
// Using

use loading_gl::opengl::GlError;
use loading_gl::prelude::glm::{vec2, Vec2};
use loading_gl::prelude::image::{Rgba, RgbaImage};
use loading_gl::prelude::*;
use rusttype::{point, Font, Scale};
use thiserror::Error;

//////////////////////////////////////////////////
// Definition

/// Horizontal placement of the text inside its sprite.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
}

/// A string drawn over a solid background. Built per frame and dropped after drawing.
pub struct TextSprite<'a> {
    pub text: String,
    /// Measured instead of `text` when set, keeps the text steady while its length changes.
    pub placeholder: Option<String>,
    pub font: &'a Font<'static>,
    pub width: u32,
    pub height: u32,
    pub foreground: Rgba<u8>,
    pub background: Rgba<u8>,
    pub font_size: f32,
    pub dpi: f32,
    /// Top left corner in points.
    pub position: Vec2,
    pub alignment: Alignment,
}

#[derive(Debug, Error)]
pub enum SpriteError {
    #[error("sprite has no area ({width} x {height} px)")]
    Empty { width: u32, height: u32 },
    #[error("failed to upload sprite: {0}")]
    Upload(#[source] GlError),
    #[error("failed to draw sprite: {0}")]
    Draw(#[source] GlError),
}

//////////////////////////////////////////////////
// Implementation

impl TextSprite<'_> {
    /// Rasterizes, uploads and draws the sprite. The texture lives only for this call.
    pub fn render(&self, size: &SizeEvent, images: &Images) -> Result<(), SpriteError> {
        self.check_area()?;

        let mut image = images.new_image_filled(self.width, self.height, self.background);
        self.draw_text(&mut image.rgba);
        image.upload().map_err(SpriteError::Upload)?;

        let top_left = self.position;
        let top_right = self.position + vec2(size.px_to_pt(self.width as f32), 0.0);
        let bottom_left = self.position + vec2(0.0, size.px_to_pt(self.height as f32));
        let result = image.draw(size, top_left, top_right, bottom_left, image.bounds()).map_err(SpriteError::Draw);
        image.release();
        result
    }

    /// CPU side of [`TextSprite::render`].
    pub fn rasterize(&self) -> Result<RgbaImage, SpriteError> {
        self.check_area()?;
        let mut image = RgbaImage::from_pixel(self.width, self.height, self.background);
        self.draw_text(&mut image);
        Ok(image)
    }

    fn check_area(&self) -> Result<(), SpriteError> {
        if self.width == 0 || self.height == 0 {
            return Err(SpriteError::Empty {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    fn scale(&self) -> Scale {
        // no hinting in rusttype, output only depends on size and dpi
        Scale::uniform(self.font_size * self.dpi / 72.0)
    }

    fn draw_text(&self, target: &mut RgbaImage) {
        let (width, height) = target.dimensions();
        let scale = self.scale();
        let ascent = self.font.v_metrics(scale).ascent;
        let measured = measure(self.font, scale, self.placeholder.as_deref().unwrap_or(&self.text));
        let origin = point(origin_x(self.alignment, width as f32, measured), baseline_y(height as f32, ascent));

        for glyph in self.font.layout(&self.text, scale, origin) {
            if let Some(bounding_box) = glyph.pixel_bounding_box() {
                glyph.draw(|gx, gy, coverage| {
                    let x = bounding_box.min.x + gx as i32;
                    let y = bounding_box.min.y + gy as i32;
                    if x >= 0 && y >= 0 && (x as u32) < width && (y as u32) < height {
                        blend(target.get_pixel_mut(x as u32, y as u32), self.foreground, coverage);
                    }
                });
            }
        }
    }
}

//////////////////////////////////////////////////
// Layout helpers

/// Advance width of `text` at `scale`, kerning included.
pub fn measure(font: &Font<'_>, scale: Scale, text: &str) -> f32 {
    font.layout(text, scale, point(0.0, 0.0))
        .last()
        .map(|glyph| glyph.position().x + glyph.unpositioned().h_metrics().advance_width)
        .unwrap_or(0.0)
}

pub fn origin_x(alignment: Alignment, available: f32, measured: f32) -> f32 {
    match alignment {
        Alignment::Left => 0.0,
        Alignment::Center => (available - measured) / 2.0,
        Alignment::Right => available - measured,
    }
}

/// Baseline that puts the ascent of the font in the vertical middle of the sprite.
pub fn baseline_y(height: f32, ascent: f32) -> f32 {
    (height + ascent) / 2.0
}

fn blend(dst: &mut Rgba<u8>, src: Rgba<u8>, coverage: f32) {
    let alpha = coverage.clamp(0.0, 1.0) * src.0[3] as f32 / 255.0;
    for channel in 0..3 {
        dst.0[channel] = (src.0[channel] as f32 * alpha + dst.0[channel] as f32 * (1.0 - alpha)).round() as u8;
    }
    dst.0[3] = (255.0 * alpha + dst.0[3] as f32 * (1.0 - alpha)).round() as u8;
}

//////////////////////////////////////////////////
// Tests
