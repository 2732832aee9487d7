//////////////////////////////////////////////////
// Using

use std::path::Path;

#[cfg(target_os = "android")]
use ndk::asset::AssetManager;
#[cfg(target_os = "android")]
use std::ffi::CString;
#[cfg(target_os = "android")]
use winit::platform::android::activity::AndroidApp;

//////////////////////////////////////////////////
// Const

#[cfg(not(target_os = "android"))]
const ASSET_DIR: &str = "assets";

//////////////////////////////////////////////////
// Definition

/// Read access to bundled assets and to files of the device.
pub struct Files {
    #[cfg(target_os = "android")]
    asset_manager: AssetManager,
}

//////////////////////////////////////////////////
// Implementations

#[cfg(target_os = "android")]
impl Files {
    pub fn new(android_app: &AndroidApp) -> Self {
        Files {
            asset_manager: android_app.asset_manager(),
        }
    }

    pub fn load_bytes(&self, filename: &str) -> Option<Vec<u8>> {
        let mut asset = CString::new(filename).ok().and_then(|filename| self.asset_manager.open(&filename));
        asset.as_mut().and_then(|asset| asset.buffer().ok()).map(|buffer| buffer.to_vec())
    }
}

#[cfg(not(target_os = "android"))]
impl Files {
    pub fn new() -> Self {
        Files {}
    }

    pub fn load_bytes(&self, filename: &str) -> Option<Vec<u8>> {
        std::fs::read(Path::new(ASSET_DIR).join(filename)).ok()
    }
}

#[cfg(not(target_os = "android"))]
impl Default for Files {
    fn default() -> Self {
        Self::new()
    }
}

impl Files {
    /// Reads a file outside the asset bundle, e.g. a system font.
    pub fn load_system_bytes(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        let path = path.as_ref();
        match std::fs::read(path) {
            Ok(bytes) => Some(bytes),
            Err(err) => {
                log::trace!("Unable to read {}: {}", path.display(), err);
                None
            }
        }
    }
}
