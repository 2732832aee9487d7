//////////////////////////////////////////////////
// Using

use std::sync::{Arc, PoisonError, RwLock};

#[cfg(target_os = "android")]
use winit::platform::android::activity::AndroidApp;

use crate::file::Files;

//////////////////////////////////////////////////
// Context Traits

pub trait ContextExt<T> {
    fn read<R>(&self, exec: impl FnOnce(&T) -> R) -> R;

    fn write<R>(&self, exec: impl FnOnce(&mut T) -> R) -> R;
}

impl<T> ContextExt<T> for Arc<RwLock<T>> {
    fn read<R>(&self, exec: impl FnOnce(&T) -> R) -> R {
        let t = self.as_ref().read().unwrap_or_else(PoisonError::into_inner);
        exec(&t)
    }

    fn write<R>(&self, exec: impl FnOnce(&mut T) -> R) -> R {
        let mut t = self.as_ref().write().unwrap_or_else(PoisonError::into_inner);
        exec(&mut t)
    }
}

//////////////////////////////////////////////////
// Definition

pub type GameContext = Arc<RwLock<RawGameContext>>;

#[derive(Debug, Default)]
pub struct RawGameContext {
    #[cfg(target_os = "android")]
    android_app: Option<AndroidApp>,
    request_exit: bool,
}

//////////////////////////////////////////////////
// Implementation

impl RawGameContext {
    #[cfg(target_os = "android")]
    pub(crate) fn init_android(&mut self, android_app: AndroidApp) {
        self.android_app = Some(android_app);
    }

    #[cfg(target_os = "android")]
    pub fn android_app(&self) -> &AndroidApp {
        self.android_app.as_ref().expect("Android app is not initialized")
    }

    #[cfg(target_os = "android")]
    pub fn files(&self) -> Files {
        Files::new(self.android_app())
    }

    #[cfg(not(target_os = "android"))]
    pub fn files(&self) -> Files {
        Files::new()
    }

    pub fn request_exit(&self) -> bool {
        self.request_exit
    }

    pub fn exit(&mut self) {
        self.request_exit = true;
    }
}

//////////////////////////////////////////////////
// Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_request_is_shared() {
        let ctx = GameContext::default();
        let other = ctx.clone();
        assert!(!ctx.read(|ctx| ctx.request_exit()));
        other.write(|ctx| ctx.exit());
        assert!(ctx.read(|ctx| ctx.request_exit()));
    }
}
