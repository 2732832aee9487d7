//////////////////////////////////////////////////
// Using

use std::fmt;

use loading_gl::prelude::*;
use rusttype::Font;
use thiserror::Error;

//////////////////////////////////////////////////
// Sources

/// Font shipped with the application assets (DejaVu Sans). Platform fonts are used if it is missing.
const BUNDLED_FONT: &str = "fonts/default.ttf";

#[cfg(target_os = "android")]
const DEFAULT_FONTS: &[&str] = &["/system/fonts/Roboto-Regular.ttf", "/system/fonts/DroidSans.ttf"];
#[cfg(target_os = "android")]
const MONOSPACE_FONTS: &[&str] = &["/system/fonts/DroidSansMono.ttf", "/system/fonts/CutiveMono.ttf"];

#[cfg(target_os = "macos")]
const DEFAULT_FONTS: &[&str] = &["/System/Library/Fonts/Supplemental/Arial.ttf", "/Library/Fonts/Arial.ttf"];
#[cfg(target_os = "macos")]
const MONOSPACE_FONTS: &[&str] = &["/System/Library/Fonts/Supplemental/Courier New.ttf", "/Library/Fonts/Courier New.ttf"];

#[cfg(target_os = "windows")]
const DEFAULT_FONTS: &[&str] = &["C:\\Windows\\Fonts\\arial.ttf", "C:\\Windows\\Fonts\\segoeui.ttf"];
#[cfg(target_os = "windows")]
const MONOSPACE_FONTS: &[&str] = &["C:\\Windows\\Fonts\\consola.ttf", "C:\\Windows\\Fonts\\cour.ttf"];

#[cfg(not(any(target_os = "android", target_os = "macos", target_os = "windows")))]
const DEFAULT_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/droid/DroidSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
];
#[cfg(not(any(target_os = "android", target_os = "macos", target_os = "windows")))]
const MONOSPACE_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/TTF/DejaVuSansMono.ttf",
    "/usr/share/fonts/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/truetype/droid/DroidSansMono.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationMono-Regular.ttf",
];

//////////////////////////////////////////////////
// Definition

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FontSource {
    Asset(&'static str),
    System(&'static str),
}

#[derive(Debug, Error)]
pub enum FontError {
    #[error("font {0} not found")]
    Missing(FontSource),
    #[error("unable to parse font {0}")]
    Parse(FontSource),
    #[error("no usable font, tried {} sources", .0.len())]
    Exhausted(Vec<FontError>),
}

//////////////////////////////////////////////////
// Implementation

impl fmt::Display for FontSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontSource::Asset(name) => write!(f, "asset:{}", name),
            FontSource::System(path) => f.write_str(path),
        }
    }
}

impl FontSource {
    fn load(&self, files: &Files) -> Result<Font<'static>, FontError> {
        let bytes = match self {
            FontSource::Asset(name) => files.load_bytes(name),
            FontSource::System(path) => files.load_system_bytes(path),
        }
        .ok_or(FontError::Missing(*self))?;
        Font::try_from_vec(bytes).ok_or(FontError::Parse(*self))
    }
}

/// Sources in the order they are tried: bundled asset, platform default, platform monospace.
pub fn font_sources() -> Vec<FontSource> {
    std::iter::once(FontSource::Asset(BUNDLED_FONT))
        .chain(DEFAULT_FONTS.iter().copied().map(FontSource::System))
        .chain(MONOSPACE_FONTS.iter().copied().map(FontSource::System))
        .collect()
}

pub fn load_font(files: &Files) -> Result<Font<'static>, FontError> {
    load_first(files, &font_sources())
}

fn load_first(files: &Files, sources: &[FontSource]) -> Result<Font<'static>, FontError> {
    let mut errors = Vec::new();
    for source in sources {
        match source.load(files) {
            Ok(font) => {
                log::info!("Loaded font {}", source);
                return Ok(font);
            }
            Err(err) => {
                log::debug!("{}", err);
                errors.push(err);
            }
        }
    }
    Err(FontError::Exhausted(errors))
}

/// The bundled font, compiled in for tests that rasterize text.
#[cfg(test)]
pub(crate) fn bundled_font() -> Font<'static> {
    Font::try_from_bytes(include_bytes!("../assets/fonts/default.ttf")).expect("bundled font parses")
}

//////////////////////////////////////////////////
// Tests

#[cfg(all(test, not(target_os = "android")))]
mod tests {
    use super::*;

    #[test]
    fn asset_comes_first_then_monospace_last() {
        let sources = font_sources();
        assert_eq!(sources.first(), Some(&FontSource::Asset(BUNDLED_FONT)));
        assert_eq!(sources.last().copied(), MONOSPACE_FONTS.last().copied().map(FontSource::System));
        assert_eq!(sources.len(), 1 + DEFAULT_FONTS.len() + MONOSPACE_FONTS.len());
    }

    #[test]
    fn bundled_asset_is_loaded_first() {
        let font = load_first(&Files::new(), &font_sources()).expect("bundled font");
        let expected = bundled_font();
        assert_eq!(font.glyph_count(), expected.glyph_count());
        assert!(FontSource::Asset(BUNDLED_FONT).load(&Files::new()).is_ok());
    }

    #[test]
    fn missing_sources_are_exhausted() {
        let files = Files::new();
        let sources = [FontSource::Asset("fonts/does-not-exist.ttf"), FontSource::System("/does/not/exist.ttf")];
        match load_first(&files, &sources) {
            Err(FontError::Exhausted(errors)) => {
                assert_eq!(errors.len(), 2);
                assert!(matches!(errors[0], FontError::Missing(FontSource::Asset(_))));
                assert!(matches!(errors[1], FontError::Missing(FontSource::System(_))));
            }
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn unparsable_file_is_a_parse_error() {
        let path = std::env::temp_dir().join("loading-screen-not-a-font.ttf");
        std::fs::write(&path, b"definitely not a font").expect("write temp file");
        let leaked: &'static str = Box::leak(path.to_string_lossy().into_owned().into_boxed_str());
        let result = FontSource::System(leaked).load(&Files::new());
        assert!(matches!(result, Err(FontError::Parse(_))));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn exhausted_message_counts_sources() {
        let err = FontError::Exhausted(vec![FontError::Missing(FontSource::System("/a.ttf")), FontError::Parse(FontSource::Asset("b.ttf"))]);
        assert_eq!(err.to_string(), "no usable font, tried 2 sources");
        assert_eq!(FontError::Parse(FontSource::Asset("b.ttf")).to_string(), "unable to parse font asset:b.ttf");
    }
}
