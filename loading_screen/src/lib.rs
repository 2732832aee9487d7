//////////////////////////////////////////////////
// Module

pub mod config;
pub mod font;
pub mod game;
pub mod game_loop;
pub mod layout;
pub mod text_sprite;

use loading_gl::prelude::*;

use crate::game_loop::LoadingGameLoop;

//////////////////////////////////////////////////
// Entry point for android

#[cfg(target_os = "android")]
#[no_mangle]
fn android_main(app: AndroidApp) {
    LoadingGameLoop::loop_forever(app);
}

// declared as pub to avoid dead_code warnings from cdylib target build
#[cfg(not(target_os = "android"))]
pub fn main() {
    LoadingGameLoop::loop_forever();
}
