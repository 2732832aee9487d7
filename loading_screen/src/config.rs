//////////////////////////////////////////////////
// Using

use log::LevelFilter;

//////////////////////////////////////////////////
// Definitions

pub struct Config {}

//////////////////////////////////////////////////
// Android

#[cfg(target_os = "android")]
impl Config {
    pub fn log_level() -> LevelFilter {
        LevelFilter::Debug
    }
    pub fn dpi() -> f32 {
        72.0
    }
    pub fn header_height() -> u32 {
        200
    }
    pub fn footer_height() -> u32 {
        200
    }
    pub fn header_font_size() -> f32 {
        64.0
    }
    pub fn body_font_size() -> f32 {
        100.0
    }
    pub fn footer_font_size() -> f32 {
        80.0
    }
}

//////////////////////////////////////////////////
// Desktop

#[cfg(not(target_os = "android"))]
impl Config {
    pub fn log_level() -> LevelFilter {
        LevelFilter::Info
    }
    pub fn dpi() -> f32 {
        72.0
    }
    pub fn header_height() -> u32 {
        96
    }
    pub fn footer_height() -> u32 {
        96
    }
    pub fn header_font_size() -> f32 {
        40.0
    }
    pub fn body_font_size() -> f32 {
        100.0
    }
    pub fn footer_font_size() -> f32 {
        48.0
    }
}
