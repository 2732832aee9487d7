//////////////////////////////////////////////////
// Using

use std::ffi::{CStr, CString};
use std::mem::size_of;

use thiserror::Error;

use crate::gl;
use crate::gl::types::*;
use crate::Gl;

//////////////////////////////////////////////////
// Errors

#[derive(Debug, Error)]
#[error("{description} (error code {code:#06x})")]
pub struct GlError {
    pub description: &'static str,
    pub code: GLenum,
}

//////////////////////////////////////////////////
// Resources

#[allow(drop_bounds)]
pub trait GlResource: Drop {
    fn release(&mut self);
}

#[derive(Debug, Default)]
pub struct GlVertexArrayObject {
    gl: Option<Gl>,
    id: GLuint,
}

#[derive(Debug, Default)]
pub struct GlVertexBuffer<T: Default> {
    gl: Option<Gl>,
    id: GLuint,
    max_count: usize,
    phantom: std::marker::PhantomData<T>,
}

/// Single layer texture array, matching the `sampler2DArray` used by the sprite shader.
#[derive(Debug, Default)]
pub struct GlTexture {
    gl: Option<Gl>,
    id: GLuint,
    width: u32,
    height: u32,
}

#[derive(Debug, Default)]
pub struct GlShader {
    gl: Option<Gl>,
    vs: GLuint,
    fs: GLuint,
    program: GLuint,
}

pub struct GlString;

//////////////////////////////////////////////////
// Vertex Array Object

impl GlVertexArrayObject {
    pub fn new(gl: &Gl) -> GlVertexArrayObject {
        let mut id: GLuint = 0;
        unsafe {
            gl.GenVertexArrays(1, &mut id as _);
            if !check_error(gl, "Failed to create vertex array object") {
                log::debug!("Created vertex array object {}", id);
            }
        }
        GlVertexArrayObject { gl: Some(gl.clone()), id }
    }

    pub fn bind(&self) {
        if let Some(gl) = self.gl.as_ref() {
            unsafe {
                gl.BindVertexArray(self.id);
                check_error(gl, "Failed to bind vertex array");
            }
        }
    }

    pub fn unbind(&self) {
        if let Some(gl) = self.gl.as_ref() {
            unsafe {
                gl.BindVertexArray(0);
                check_error(gl, "Failed to unbind vertex array");
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn bind_attrib<T: Default>(&self, vbo: &GlVertexBuffer<T>, slot: GLuint, count: GLint, type_: GLenum, normalized: GLboolean, offset: usize, stride: usize) {
        if let Some(gl) = self.gl.as_ref() {
            unsafe {
                gl.BindBuffer(gl::ARRAY_BUFFER, vbo.id);
                check_error(gl, "Failed to bind vertex buffer");
                gl.VertexAttribPointer(slot, count, type_, normalized, stride as GLsizei, offset as *const () as *const _);
                check_error(gl, "Failed to set vertex attrib");
                gl.EnableVertexAttribArray(slot);
                check_error(gl, "Failed to enable vertex attrib");
                gl.BindBuffer(gl::ARRAY_BUFFER, 0);
            }
        }
    }
}

//////////////////////////////////////////////////
// Vertex Buffer

impl<T: Default> GlVertexBuffer<T> {
    pub fn new(gl: &Gl, usage: GLenum, data: &[T]) -> GlVertexBuffer<T> {
        let mut id: GLuint = 0;
        unsafe {
            gl.GenBuffers(1, &mut id);
            gl.BindBuffer(gl::ARRAY_BUFFER, id);
            gl.BufferData(gl::ARRAY_BUFFER, (data.len() * size_of::<T>()) as GLsizeiptr, data.as_ptr() as *const _, usage);
            gl.BindBuffer(gl::ARRAY_BUFFER, 0);
            if !check_error(gl, "Failed to create vertex buffer") {
                log::debug!("Created vertex buffer {}", id)
            }
        }
        GlVertexBuffer {
            gl: Some(gl.clone()),
            id,
            max_count: data.len(),
            phantom: std::marker::PhantomData,
        }
    }

    pub fn update(&self, data: &[T]) -> Result<(), GlError> {
        assert!(data.len() <= self.max_count, "Update data must fit into buffer");
        let gl = self.gl.as_ref().expect("Missing OpenGL Context!");
        unsafe {
            gl.BindBuffer(gl::ARRAY_BUFFER, self.id);
            gl.BufferSubData(gl::ARRAY_BUFFER, 0, (data.len() * size_of::<T>()) as GLsizeiptr, data.as_ptr() as *const _);
            gl.BindBuffer(gl::ARRAY_BUFFER, 0);
            take_error(gl, "Failed to update vertex buffer")
        }
    }
}

//////////////////////////////////////////////////
// Texture

impl GlTexture {
    pub fn new(gl: &Gl, image: &image::RgbaImage) -> Result<GlTexture, GlError> {
        let mut id: GLuint = 0;
        unsafe {
            gl.GenTextures(1, &mut id);
            gl.BindTexture(gl::TEXTURE_2D_ARRAY, id);
            gl.TexStorage3D(gl::TEXTURE_2D_ARRAY, 1, gl::RGBA8, image.width() as GLsizei, image.height() as GLsizei, 1);
            gl.TexSubImage3D(
                gl::TEXTURE_2D_ARRAY,
                0,
                0,
                0,
                0,
                image.width() as GLsizei,
                image.height() as GLsizei,
                1,
                gl::RGBA,
                gl::UNSIGNED_BYTE,
                image.as_ptr() as *const _,
            );
            gl.TexParameteri(gl::TEXTURE_2D_ARRAY, gl::TEXTURE_MAG_FILTER, gl::LINEAR as GLint);
            gl.TexParameteri(gl::TEXTURE_2D_ARRAY, gl::TEXTURE_MIN_FILTER, gl::LINEAR as GLint);
            gl.TexParameteri(gl::TEXTURE_2D_ARRAY, gl::TEXTURE_WRAP_S, gl::CLAMP_TO_EDGE as GLint);
            gl.TexParameteri(gl::TEXTURE_2D_ARRAY, gl::TEXTURE_WRAP_T, gl::CLAMP_TO_EDGE as GLint);
            gl.BindTexture(gl::TEXTURE_2D_ARRAY, 0);

            // wrap before checking, so a failed upload still deletes the name
            let texture = GlTexture {
                gl: Some(gl.clone()),
                id,
                width: image.width(),
                height: image.height(),
            };
            take_error(gl, "Failed to create texture")?;
            log::trace!("Created texture {} ({} x {})", id, texture.width, texture.height);
            Ok(texture)
        }
    }

    pub fn bind(&self, unit: GLuint) {
        if let Some(gl) = self.gl.as_ref() {
            unsafe {
                gl.ActiveTexture(gl::TEXTURE0 + unit);
                gl.BindTexture(gl::TEXTURE_2D_ARRAY, self.id);
                check_error(gl, "Failed to bind texture");
            }
        }
    }

    pub fn unbind(&self, unit: GLuint) {
        if let Some(gl) = self.gl.as_ref() {
            unsafe {
                gl.ActiveTexture(gl::TEXTURE0 + unit);
                gl.BindTexture(gl::TEXTURE_2D_ARRAY, 0);
                check_error(gl, "Failed to unbind texture");
            }
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

//////////////////////////////////////////////////
// Shader

impl GlShader {
    pub fn new(gl: &Gl, vert: &[u8], frag: &[u8]) -> GlShader {
        // ensure null termination
        let vert_string = CString::new(vert).expect("Failed to convert to C-String");
        let frag_string = CString::new(frag).expect("Failed to convert to C-String");

        unsafe {
            let vs = compile_shader(gl, gl::VERTEX_SHADER, &vert_string, "vertex");
            let fs = compile_shader(gl, gl::FRAGMENT_SHADER, &frag_string, "fragment");

            let program = gl.CreateProgram();
            gl.AttachShader(program, vs);
            gl.AttachShader(program, fs);
            gl.LinkProgram(program);
            let mut status = 0;
            gl.GetProgramiv(program, gl::LINK_STATUS, &mut status);
            if status == 0 {
                log::error!("Failed to link program {}", program);
                print_program_info(gl, program);
            } else {
                log::debug!("Linked program {}", program);
            }

            GlShader {
                gl: Some(gl.clone()),
                vs,
                fs,
                program,
            }
        }
    }

    pub fn bind(&self) {
        if let Some(gl) = self.gl.as_ref() {
            unsafe {
                gl.UseProgram(self.program);
                check_error(gl, "Failed to bind program");
            }
        }
    }

    pub fn unbind(&self) {
        if let Some(gl) = self.gl.as_ref() {
            unsafe {
                gl.UseProgram(0);
                check_error(gl, "Failed to unbind program");
            }
        }
    }

    pub fn link_texture(&self, unit: GLint, location: &str) {
        if let Some(gl) = self.gl.as_ref() {
            unsafe {
                let c_location = CString::new(location).expect("Failed to convert to C-String");
                let loc = gl.GetUniformLocation(self.program, c_location.as_ptr());
                gl.Uniform1i(loc, unit);
                check_error(gl, "Failed to bind texture");
            }
        }
    }

    pub fn draw_arrays(&self, mode: GLenum, vertex_count: usize) -> Result<(), GlError> {
        let gl = self.gl.as_ref().expect("Missing OpenGL Context!");
        unsafe {
            gl.DrawArrays(mode, 0, vertex_count as GLsizei);
            take_error(gl, "Failed to draw")
        }
    }
}

//////////////////////////////////////////////////
// GlString

impl GlString {
    pub fn get(gl: &gl::Gles2, name: GLenum) -> Option<String> {
        unsafe {
            let ptr = gl.GetString(name);
            if ptr.is_null() {
                None
            } else {
                Some(CStr::from_ptr(ptr as *const _).to_string_lossy().into_owned())
            }
        }
    }
}

//////////////////////////////////////////////////
// Trait Impl GlResource

impl GlResource for GlVertexArrayObject {
    fn release(&mut self) {
        if let Some(gl) = self.gl.as_ref() {
            unsafe {
                gl.DeleteVertexArrays(1, &self.id);
                if !check_error(gl, "Failed to release vertex array object") {
                    log::debug!("Deleted vertex array object {}", self.id)
                }
            }
        }
        self.gl = None;
    }
}
impl Drop for GlVertexArrayObject {
    fn drop(&mut self) {
        self.release()
    }
}

impl<T: Default> GlResource for GlVertexBuffer<T> {
    fn release(&mut self) {
        if let Some(gl) = self.gl.as_ref() {
            unsafe {
                gl.DeleteBuffers(1, &self.id);
                if !check_error(gl, "Failed to release vertex buffer") {
                    log::debug!("Deleted vertex buffer {}", self.id)
                }
            }
        }
        self.gl = None;
    }
}
impl<T: Default> Drop for GlVertexBuffer<T> {
    fn drop(&mut self) {
        self.release()
    }
}

impl GlResource for GlTexture {
    fn release(&mut self) {
        if let Some(gl) = self.gl.as_ref() {
            unsafe {
                gl.DeleteTextures(1, &self.id);
                if !check_error(gl, "Failed to release texture") {
                    log::trace!("Deleted texture {}", self.id);
                }
            }
        }
        self.gl = None;
    }
}
impl Drop for GlTexture {
    fn drop(&mut self) {
        self.release()
    }
}

impl GlResource for GlShader {
    fn release(&mut self) {
        if let Some(gl) = self.gl.as_ref() {
            unsafe {
                gl.DetachShader(self.program, self.vs);
                gl.DetachShader(self.program, self.fs);
                gl.DeleteShader(self.vs);
                gl.DeleteShader(self.fs);
                gl.DeleteProgram(self.program);
                if !check_error(gl, "Failed to destroy shaders") {
                    log::debug!("Deleted program {}", self.program);
                }
            }
        }
        self.gl = None;
    }
}
impl Drop for GlShader {
    fn drop(&mut self) {
        self.release()
    }
}

//////////////////////////////////////////////////
// Check error call

/// Logs all pending GL errors. Returns true if there were any.
#[inline]
#[cfg(debug_assertions)]
pub unsafe fn check_error(gl: &Gl, description: &str) -> bool {
    let mut err = gl.GetError();
    let mut has_error = false;
    while err != gl::NO_ERROR {
        log::error!("{}. ErrorCode {}", description, err);
        err = gl.GetError();
        has_error = true;
    }
    has_error
}

#[inline]
#[cfg(not(debug_assertions))]
pub unsafe fn check_error(_gl: &Gl, _description: &str) -> bool {
    false
}

/// Like [`check_error`], but hands the first pending error to the caller.
#[inline]
#[cfg(debug_assertions)]
pub unsafe fn take_error(gl: &Gl, description: &'static str) -> Result<(), GlError> {
    let code = gl.GetError();
    if code == gl::NO_ERROR {
        return Ok(());
    }
    // drain the remaining flags
    while gl.GetError() != gl::NO_ERROR {}
    Err(GlError { description, code })
}

#[inline]
#[cfg(not(debug_assertions))]
pub unsafe fn take_error(_gl: &Gl, _description: &'static str) -> Result<(), GlError> {
    Ok(())
}

unsafe fn compile_shader(gl: &Gl, kind: GLenum, source: &CStr, name: &str) -> GLuint {
    let shader = gl.CreateShader(kind);
    gl.ShaderSource(shader, 1, [source.as_ptr()].as_ptr(), std::ptr::null());
    gl.CompileShader(shader);
    let mut status = 0;
    gl.GetShaderiv(shader, gl::COMPILE_STATUS, &mut status);
    if status == 0 {
        log::error!("Failed to compile {} shader", name);
        print_shader_log(gl, shader);
    } else {
        log::debug!("Compiled {} shader {}", name, shader);
    }
    shader
}

pub unsafe fn print_shader_log(gl: &Gl, shader: GLuint) {
    let mut buffer = vec![0u8; 2048];
    let mut length = 0;
    gl.GetShaderInfoLog(shader, buffer.len() as GLsizei, &mut length, buffer.as_mut_ptr() as *mut _);
    log::debug!("{}", &String::from_utf8_lossy(&buffer[..length as usize]));
}

pub unsafe fn print_program_info(gl: &Gl, program: GLuint) {
    let mut buffer = vec![0u8; 2048];
    let mut length = 0;
    gl.GetProgramInfoLog(program, buffer.len() as GLsizei, &mut length, buffer.as_mut_ptr() as *mut _);
    log::debug!("{}", &String::from_utf8_lossy(&buffer[..length as usize]));
}
