//////////////////////////////////////////////////
// Using

use std::mem::size_of;

use image::{Rgba, RgbaImage};
use nalgebra_glm::{vec2, Vec2};

use crate::gl;
use crate::opengl::{GlError, GlResource, GlShader, GlTexture, GlVertexArrayObject, GlVertexBuffer};
use crate::size::SizeEvent;
use crate::Gl;

//////////////////////////////////////////////////
// Shader

const VS: &[u8] = b"#version 300 es
layout(location = 0) in vec2 a_Pos;
layout(location = 1) in vec2 a_TexCoord;

out vec3 v_TexCoord;

void main() {
    v_TexCoord = vec3(a_TexCoord, 0.0);
    gl_Position = vec4(a_Pos, 0.0, 1.0);
}
";

const FS: &[u8] = b"#version 300 es
precision mediump float;
precision mediump sampler2DArray;

in vec3 v_TexCoord;

uniform sampler2DArray t_Sampler;

layout(location = 0) out vec4 target0;

void main() {
    target0 = texture(t_Sampler, v_TexCoord);
}
";

const TEXTURE_UNIT: u32 = 0;

//////////////////////////////////////////////////
// Definition

/// Pixel rectangle inside an image, used to pick the drawn region.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Shared GL state for drawing CPU-side images as textured quads.
#[derive(Debug)]
pub struct Images {
    gl: Gl,
    vao: GlVertexArrayObject,
    vbo: GlVertexBuffer<[f32; 4]>,
    shader: GlShader,
}

/// An RGBA buffer that can be uploaded to the GPU and drawn.
#[derive(Debug)]
pub struct Image<'a> {
    pub rgba: RgbaImage,
    images: &'a Images,
    texture: Option<GlTexture>,
}

//////////////////////////////////////////////////
// Implementation

impl Rect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }
}

impl Images {
    pub fn new(gl: &Gl) -> Self {
        let vao = GlVertexArrayObject::new(gl);
        let vbo = GlVertexBuffer::new(gl, gl::DYNAMIC_DRAW, &[[0.0; 4]; 4]);
        let shader = GlShader::new(gl, VS, FS);

        // position (xy) and texture coordinate (uv) are interleaved
        vao.bind();
        vao.bind_attrib(&vbo, 0, 2, gl::FLOAT, gl::FALSE, 0, 4 * size_of::<f32>());
        vao.bind_attrib(&vbo, 1, 2, gl::FLOAT, gl::FALSE, 2 * size_of::<f32>(), 4 * size_of::<f32>());
        vao.unbind();

        Self { gl: gl.clone(), vao, vbo, shader }
    }

    pub fn new_image_filled(&self, width: u32, height: u32, color: Rgba<u8>) -> Image<'_> {
        Image {
            rgba: RgbaImage::from_pixel(width, height, color),
            images: self,
            texture: None,
        }
    }

    pub fn release(&mut self) {
        self.vao.release();
        self.vbo.release();
        self.shader.release();
    }
}

impl Image<'_> {
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.rgba.width(), self.rgba.height())
    }

    /// Uploads the current pixels, replacing any earlier upload.
    pub fn upload(&mut self) -> Result<(), GlError> {
        self.release();
        self.texture = Some(GlTexture::new(&self.images.gl, &self.rgba)?);
        Ok(())
    }

    /// Draws the `src` region of the uploaded image onto the parallelogram spanned by three
    /// corners given in points. The fourth corner is implied.
    pub fn draw(&self, size: &SizeEvent, top_left: Vec2, top_right: Vec2, bottom_left: Vec2, src: Rect) -> Result<(), GlError> {
        let Some(texture) = self.texture.as_ref() else {
            log::warn!("Drawing an image that was never uploaded");
            return Ok(());
        };
        let vertices = quad_vertices(size, top_left, top_right, bottom_left, src, texture.dimensions());
        let images = self.images;
        images.vbo.update(&vertices)?;

        images.vao.bind();
        texture.bind(TEXTURE_UNIT);
        images.shader.bind();
        images.shader.link_texture(TEXTURE_UNIT as i32, "t_Sampler");
        let result = images.shader.draw_arrays(gl::TRIANGLE_STRIP, vertices.len());
        images.shader.unbind();
        texture.unbind(TEXTURE_UNIT);
        images.vao.unbind();
        result
    }

    pub fn release(&mut self) {
        if let Some(mut texture) = self.texture.take() {
            texture.release();
        }
    }
}

//////////////////////////////////////////////////
// Geometry

fn pt_to_ndc(size: &SizeEvent, point: Vec2) -> Vec2 {
    let size_pt = size.size_pt();
    vec2(2.0 * point.x / size_pt.x - 1.0, 1.0 - 2.0 * point.y / size_pt.y)
}

/// Triangle strip in order top-left, bottom-left, top-right, bottom-right.
fn quad_vertices(size: &SizeEvent, top_left: Vec2, top_right: Vec2, bottom_left: Vec2, src: Rect, (width, height): (u32, u32)) -> [[f32; 4]; 4] {
    let bottom_right = top_right + bottom_left - top_left;
    let (width, height) = (width.max(1) as f32, height.max(1) as f32);
    let u0 = src.x as f32 / width;
    let v0 = src.y as f32 / height;
    let u1 = (src.x + src.width) as f32 / width;
    let v1 = (src.y + src.height) as f32 / height;

    let tl = pt_to_ndc(size, top_left);
    let bl = pt_to_ndc(size, bottom_left);
    let tr = pt_to_ndc(size, top_right);
    let br = pt_to_ndc(size, bottom_right);
    [[tl.x, tl.y, u0, v0], [bl.x, bl.y, u0, v1], [tr.x, tr.y, u1, v0], [br.x, br.y, u1, v1]]
}

//////////////////////////////////////////////////
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn full_surface_maps_to_clip_space() {
        let size = SizeEvent::new(200, 100, 2.0);
        let vertices = quad_vertices(&size, vec2(0.0, 0.0), vec2(100.0, 0.0), vec2(0.0, 50.0), Rect::new(0, 0, 200, 100), (200, 100));
        assert_eq!(vertices[0], [-1.0, 1.0, 0.0, 0.0]);
        assert_eq!(vertices[1], [-1.0, -1.0, 0.0, 1.0]);
        assert_eq!(vertices[2], [1.0, 1.0, 1.0, 0.0]);
        assert_eq!(vertices[3], [1.0, -1.0, 1.0, 1.0]);
    }

    #[test]
    fn sub_region_maps_texture_coordinates() {
        let size = SizeEvent::new(100, 100, 1.0);
        let vertices = quad_vertices(&size, vec2(50.0, 50.0), vec2(100.0, 50.0), vec2(50.0, 100.0), Rect::new(25, 0, 25, 50), (100, 100));
        assert_relative_eq!(vertices[0][0], 0.0);
        assert_relative_eq!(vertices[0][1], 0.0);
        assert_relative_eq!(vertices[0][2], 0.25);
        assert_relative_eq!(vertices[3][2], 0.5);
        assert_relative_eq!(vertices[3][3], 0.5);
    }
}
