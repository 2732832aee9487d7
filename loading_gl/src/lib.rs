//////////////////////////////////////////////////
// Module

mod app;
pub mod clock;
pub mod context;
pub mod file;
pub mod game_loop;
pub mod images;
pub mod input;
pub mod opengl;
pub mod size;

//////////////////////////////////////////////////
// OpenGL binding

pub mod gl {
    #![allow(clippy::all)]
    include!(concat!(env!("OUT_DIR"), "/gl_bindings.rs"));
}

//////////////////////////////////////////////////
// Prelude

pub mod prelude {
    pub use crate::clock;
    pub use crate::context::{ContextExt, GameContext};
    pub use crate::file::Files;
    pub use crate::game_loop::{GameLoop, GameLoopRunner};
    pub use crate::gl;
    pub use crate::gl::types::*;
    pub use crate::images::{Image, Images, Rect};
    pub use crate::input::{InputEvent, Key, KeyState, KeyboardEvent};
    pub use crate::size::SizeEvent;
    pub use crate::Gl;
    pub use image;
    pub use log::LevelFilter;
    pub use nalgebra_glm as glm;
    #[cfg(target_os = "android")]
    pub use winit::platform::android::activity::AndroidApp;
}

//////////////////////////////////////////////////
// Types

pub type Gl = std::rc::Rc<gl::Gles2>;

//////////////////////////////////////////////////
// Traits

impl std::fmt::Debug for gl::Gles2 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gles2").finish()
    }
}
