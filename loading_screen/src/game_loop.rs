//////////////////////////////////////////////////
// Using

use loading_gl::prelude::*;

use crate::config::Config;
use crate::font::FontError;
use crate::game::Game;

//////////////////////////////////////////////////
// Runner

#[derive(Default)]
pub struct LoadingGameLoop {
    ctx: Option<GameContext>,
    game: Option<Game>,
}

impl LoadingGameLoop {
    fn exit(&self) {
        if let Some(ctx) = self.ctx.as_ref() {
            ctx.write(|ctx| ctx.exit());
        }
    }
}

impl GameLoop for LoadingGameLoop {
    fn title(&self) -> &str {
        "Loading"
    }

    fn log_level(&self) -> LevelFilter {
        Config::log_level()
    }

    fn init(&mut self, ctx: GameContext) {
        log::debug!("init");

        // nothing can be drawn without a font
        let files = ctx.read(|ctx| ctx.files());
        match Game::load(&files) {
            Ok(game) => self.game = Some(game),
            Err(err) => {
                log::error!("Unable to start: {}", err);
                if let FontError::Exhausted(errors) = &err {
                    errors.iter().for_each(|err| log::error!("  {}", err));
                }
                std::process::exit(1);
            }
        }
        self.ctx = Some(ctx);
    }

    fn cleanup(&mut self) {
        log::debug!("cleanup");
    }

    fn input(&mut self, input_events: &[InputEvent]) {
        for input_event in input_events {
            if input_event.is_back() {
                self.exit();
            } else if let (Some(down), Some(game)) = (input_event.press(), self.game.as_mut()) {
                game.touch(down);
            }
        }
    }

    fn update(&mut self, now: clock::Time) {
        if let Some(game) = self.game.as_mut() {
            game.update(now);
        }
    }

    fn render(&mut self, gl: &Gl, size: &SizeEvent, images: &Images) {
        unsafe {
            gl.ClearColor(0.0, 0.0, 0.0, 1.0);
            gl.Clear(gl::COLOR_BUFFER_BIT);
        }
        if let Some(game) = self.game.as_ref() {
            game.render(size, images);
        }
    }

    fn create_device(&mut self, gl: &Gl) {
        log::debug!("create_device");
        unsafe {
            gl.Disable(gl::DEPTH_TEST);
            gl.Disable(gl::CULL_FACE);
            gl.Enable(gl::BLEND);
            gl.BlendFunc(gl::SRC_ALPHA, gl::ONE_MINUS_SRC_ALPHA);
        }
    }

    fn destroy_device(&mut self, _gl: &Gl) {
        log::debug!("destroy_device");
    }

    fn resize_device(&mut self, gl: &Gl, size: &SizeEvent) {
        log::debug!("resize_device ({} x {} px, {} px/pt)", size.width_px, size.height_px, size.pixels_per_pt);
        unsafe {
            gl.Viewport(0, 0, size.width_px as GLsizei, size.height_px as GLsizei);
        }
    }
}

//////////////////////////////////////////////////
// Tests

#[cfg(all(test, not(target_os = "android")))]
mod tests {
    use super::*;
    use loading_gl::input::{Location, TouchEvent, TouchState};

    fn touch(state: TouchState) -> InputEvent {
        InputEvent::Touch(TouchEvent {
            state,
            location: Location::default(),
            id: 0,
        })
    }

    fn key(state: KeyState, key: Key) -> InputEvent {
        InputEvent::Keyboard(KeyboardEvent { state, key })
    }

    #[test]
    fn back_requests_exit() {
        let ctx = GameContext::default();
        let mut game_loop = LoadingGameLoop {
            ctx: Some(ctx.clone()),
            game: None,
        };
        game_loop.input(&[key(KeyState::Pressed, Key::Escape)]);
        assert!(!ctx.read(|ctx| ctx.request_exit()));
        game_loop.input(&[key(KeyState::Released, Key::Escape)]);
        assert!(ctx.read(|ctx| ctx.request_exit()));
    }

    #[test]
    fn touches_reach_the_game() {
        let mut game_loop = LoadingGameLoop {
            ctx: Some(GameContext::default()),
            game: Some(Game::load(&Files::new()).expect("bundled font")),
        };
        game_loop.input(&[touch(TouchState::Down), touch(TouchState::Move), touch(TouchState::Up), touch(TouchState::Down)]);
        game_loop.update(clock::Time(3));
        let state = game_loop.game.as_ref().map(|game| game.state().clone());
        assert_eq!(state.map(|state| (state.touch_count(), state.last_calc())), Some((2, clock::Time(3))));
    }

    #[test]
    fn input_without_game_is_ignored() {
        let mut game_loop = LoadingGameLoop::default();
        game_loop.input(&[touch(TouchState::Down), key(KeyState::Released, Key::Escape)]);
        game_loop.update(clock::Time(10));
        assert!(game_loop.game.is_none());
    }
}
