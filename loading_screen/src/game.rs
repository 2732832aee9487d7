//////////////////////////////////////////////////
// Using

use std::time::{SystemTime, UNIX_EPOCH};

use loading_gl::prelude::image::Rgba;
use loading_gl::prelude::*;
use rusttype::Font;

use crate::config::Config;
use crate::font::{load_font, FontError};
use crate::layout::{Band, Layout};
use crate::text_sprite::{Alignment, SpriteError, TextSprite};

//////////////////////////////////////////////////
// Const

const BODY_BACKGROUND: Rgba<u8> = Rgba([0x35, 0x67, 0x99, 0xFF]);
const BODY_FOREGROUND: Rgba<u8> = Rgba([0xFF, 0xFF, 0xFF, 0xFF]);
const HEADER_BACKGROUND: Rgba<u8> = Rgba([0x1E, 0x3A, 0x57, 0xFF]);
const HEADER_FOREGROUND: Rgba<u8> = Rgba([0xE0, 0xE0, 0xE0, 0xFF]);
const FOOTER_BACKGROUND: Rgba<u8> = Rgba([0x24, 0x24, 0x24, 0xFF]);
const FOOTER_FOREGROUND: Rgba<u8> = Rgba([0xFF, 0xC1, 0x07, 0xFF]);

const LOADING: &str = "Loading";
const LOADING_PLACEHOLDER: &str = "Loading...";

//////////////////////////////////////////////////
// Definition

pub struct Game {
    font: Font<'static>,
    state: GameState,
}

/// Everything of the game that is not a resource.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GameState {
    touch_count: u64,
    last_calc: clock::Time,
}

//////////////////////////////////////////////////
// Implementation

impl Game {
    pub fn new(font: Font<'static>) -> Self {
        Self {
            font,
            state: GameState::default(),
        }
    }

    pub fn load(files: &Files) -> Result<Self, FontError> {
        load_font(files).map(Self::new)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn touch(&mut self, down: bool) {
        self.state.touch(down);
    }

    pub fn update(&mut self, now: clock::Time) -> u64 {
        self.state.update(now)
    }

    pub fn render(&self, size: &SizeEvent, images: &Images) {
        // one failing sprite must not blank the others
        for sprite in self.sprites(size).iter() {
            match sprite.render(size, images) {
                Ok(()) => {}
                Err(err @ SpriteError::Empty { .. }) => log::trace!("Skipping sprite {:?}: {}", sprite.text, err),
                Err(err) => log::warn!("Skipping sprite {:?}: {}", sprite.text, err),
            }
        }
    }

    /// Header, body and footer, in drawing order.
    pub fn sprites(&self, size: &SizeEvent) -> [TextSprite<'_>; 3] {
        let layout = Layout::new(size.width_px, size.height_px, Config::header_height(), Config::footer_height());
        [
            self.sprite(
                size,
                layout.header,
                header_text(size),
                None,
                Config::header_font_size(),
                (HEADER_FOREGROUND, HEADER_BACKGROUND),
                Alignment::Center,
            ),
            self.sprite(
                size,
                layout.body,
                body_text(unix_secs()),
                Some(LOADING_PLACEHOLDER.to_string()),
                Config::body_font_size(),
                (BODY_FOREGROUND, BODY_BACKGROUND),
                Alignment::Center,
            ),
            self.sprite(
                size,
                layout.footer,
                footer_text(self.state.touch_count),
                None,
                Config::footer_font_size(),
                (FOOTER_FOREGROUND, FOOTER_BACKGROUND),
                Alignment::Right,
            ),
        ]
    }

    #[allow(clippy::too_many_arguments)]
    fn sprite(
        &self,
        size: &SizeEvent,
        band: Band,
        text: String,
        placeholder: Option<String>,
        font_size: f32,
        (foreground, background): (Rgba<u8>, Rgba<u8>),
        alignment: Alignment,
    ) -> TextSprite<'_> {
        TextSprite {
            text,
            placeholder,
            font: &self.font,
            width: band.width,
            height: band.height,
            foreground,
            background,
            font_size,
            dpi: Config::dpi(),
            position: band.position(size),
            alignment,
        }
    }
}

impl GameState {
    pub fn touch_count(&self) -> u64 {
        self.touch_count
    }

    pub fn last_calc(&self) -> clock::Time {
        self.last_calc
    }

    /// Only touch-downs count.
    pub fn touch(&mut self, down: bool) {
        if down {
            self.touch_count += 1;
            log::debug!("touch {}", self.touch_count);
        }
    }

    /// Computes game state up to `now`, one tick at a time. Returns the number of ticks computed.
    pub fn update(&mut self, now: clock::Time) -> u64 {
        let mut ticks = 0;
        while self.last_calc < now {
            self.calc_frame();
            self.last_calc = self.last_calc.next();
            ticks += 1;
        }
        ticks
    }

    fn calc_frame(&mut self) {
        log::trace!("calc frame {}", self.last_calc.0);
    }
}

//////////////////////////////////////////////////
// Texts

pub fn header_text(size: &SizeEvent) -> String {
    format!("{}px * {}px", size.width_px, size.height_px)
}

pub fn body_text(unix_secs: u64) -> String {
    format!("{}{}", LOADING, ".".repeat((unix_secs % 4) as usize))
}

pub fn footer_text(touch_count: u64) -> String {
    touch_count.to_string()
}

fn unix_secs() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|duration| duration.as_secs()).unwrap_or_default()
}

//////////////////////////////////////////////////
// Tests

#[cfg(all(test, not(target_os = "android")))]
mod tests {
    use super::*;
    use crate::font::bundled_font;
    use approx::assert_relative_eq;

    fn game() -> Game {
        Game::new(bundled_font())
    }

    #[test]
    fn touch_down_counts_touch_up_does_not() {
        let mut state = GameState::default();
        for _ in 0..5 {
            state.touch(true);
            state.touch(false);
        }
        assert_eq!(state.touch_count(), 5);
        state.touch(false);
        assert_eq!(state.touch_count(), 5);
    }

    #[test]
    fn update_converges_to_now() {
        let mut state = GameState::default();
        assert_eq!(state.update(clock::Time(10)), 10);
        assert_eq!(state.last_calc(), clock::Time(10));
        assert_eq!(state.update(clock::Time(25)), 15);
        assert_eq!(state.last_calc(), clock::Time(25));
    }

    #[test]
    fn update_is_idempotent_for_same_or_older_time() {
        let mut state = GameState::default();
        state.update(clock::Time(7));
        assert_eq!(state.update(clock::Time(7)), 0);
        assert_eq!(state.update(clock::Time(3)), 0);
        assert_eq!(state.last_calc(), clock::Time(7));
    }

    #[test]
    fn game_delegates_to_state() {
        let mut game = game();
        game.touch(true);
        assert_eq!(game.update(clock::Time(2)), 2);
        assert_eq!(game.state().touch_count(), 1);
        assert_eq!(game.state().last_calc(), clock::Time(2));
    }

    #[test]
    fn header_shows_surface_pixels() {
        assert_eq!(header_text(&SizeEvent::new(1080, 1920, 2.625)), "1080px * 1920px");
        assert_eq!(header_text(&SizeEvent::new(800, 600, 1.0)), "800px * 600px");
    }

    #[test]
    fn footer_shows_touch_count() {
        assert_eq!(footer_text(0), "0");
        assert_eq!(footer_text(7), "7");
        assert_eq!(footer_text(1234), "1234");
    }

    #[test]
    fn body_ellipsis_follows_unix_time() {
        assert_eq!(body_text(1_700_000_000), "Loading");
        assert_eq!(body_text(1_700_000_001), "Loading.");
        assert_eq!(body_text(1_700_000_002), "Loading..");
        assert_eq!(body_text(1_700_000_003), "Loading...");
        assert_eq!(body_text(1_700_000_004), "Loading");
    }

    #[test]
    fn sprites_are_header_body_footer() {
        let mut game = game();
        for _ in 0..3 {
            game.touch(true);
        }
        let size = SizeEvent::new(1080, 1920, 2.0);
        let [header, body, footer] = game.sprites(&size);

        assert_eq!(header.text, "1080px * 1920px");
        assert!(body.text.starts_with("Loading") && body.text.len() <= "Loading...".len());
        assert_eq!(footer.text, "3");

        assert_eq!(header.alignment, Alignment::Center);
        assert_eq!(body.alignment, Alignment::Center);
        assert_eq!(footer.alignment, Alignment::Right);

        assert_eq!(header.placeholder, None);
        assert_eq!(body.placeholder.as_deref(), Some("Loading..."));
        assert_eq!(footer.placeholder, None);

        assert_eq!((header.background, footer.foreground), (HEADER_BACKGROUND, FOOTER_FOREGROUND));
        assert_eq!((body.foreground, body.background), (BODY_FOREGROUND, BODY_BACKGROUND));
    }

    #[test]
    fn sprites_tile_the_surface() {
        let size = SizeEvent::new(1080, 1920, 2.0);
        let game = game();
        let [header, body, footer] = game.sprites(&size);
        let (header_px, footer_px) = (Config::header_height(), Config::footer_height());

        for sprite in [&header, &body, &footer] {
            assert_eq!(sprite.width, 1080);
            assert_relative_eq!(sprite.position.x, 0.0);
        }
        assert_eq!((header.height, body.height, footer.height), (header_px, 1920 - header_px - footer_px, footer_px));
        assert_relative_eq!(header.position.y, 0.0);
        assert_relative_eq!(body.position.y, header_px as f32 / 2.0);
        assert_relative_eq!(footer.position.y, (1920 - footer_px) as f32 / 2.0);
    }

    #[test]
    fn sprites_rasterize_over_their_background() {
        let game = game();
        let size = SizeEvent::new(1080, 1920, 2.0);
        for sprite in game.sprites(&size).iter() {
            let image = sprite.rasterize().expect("rasterize");
            assert_eq!(image.dimensions(), (sprite.width, sprite.height));
            assert_eq!(*image.get_pixel(0, 0), sprite.background);
            assert!(image.pixels().any(|pixel| *pixel != sprite.background), "no ink for {:?}", sprite.text);
        }
    }
}
