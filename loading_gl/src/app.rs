//////////////////////////////////////////////////
// Using

use std::ffi::CString;
use std::num::NonZeroU32;
use std::rc::Rc;

use glutin::config::{Config, ConfigTemplateBuilder, GetGlConfig, GlConfig};
use glutin::context::{ContextApi, ContextAttributesBuilder, NotCurrentContext, NotCurrentGlContext, PossiblyCurrentContext, PossiblyCurrentGlContext, Version};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface, SwapInterval, WindowSurface};
use glutin_winit::GlWindow;
use raw_window_handle::HasWindowHandle;
use winit::dpi::PhysicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowAttributes};

use crate::opengl::GlString;
use crate::size::SizeEvent;
use crate::{gl, Gl};

//////////////////////////////////////////////////
// Definition

struct AppState {
    window: Window,
    surface: Surface<WindowSurface>,
}

enum GlDisplayCreationState {
    /// The display was not build yet.
    Build,
    /// The display was already created for the application.
    Init,
}

/// Owns the window, the GL surface and the GL context across Android suspend/resume cycles.
pub(crate) struct App {
    template: ConfigTemplateBuilder,
    window: WindowAttributes,
    display: GlDisplayCreationState,
    context: Option<PossiblyCurrentContext>,
    state: Option<AppState>,
    renderer: Option<Gl>,
}

//////////////////////////////////////////////////
// Implementations

impl App {
    pub fn new(template: ConfigTemplateBuilder, window: WindowAttributes) -> Self {
        Self {
            template,
            window,
            display: GlDisplayCreationState::Build,
            context: None,
            state: None,
            renderer: None,
        }
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Option<(Window, Config)> {
        match self.display {
            // First resume: build the display, pick a config and create the context.
            GlDisplayCreationState::Build => {
                let display_builder = glutin_winit::DisplayBuilder::new().with_window_attributes(Some(self.window.clone()));
                let (window, gl_config) = match display_builder.build(event_loop, self.template.clone(), gl_config_picker) {
                    Ok((Some(window), gl_config)) => (window, gl_config),
                    Ok((None, _)) => {
                        log::error!("Display was built without a window");
                        return None;
                    }
                    Err(err) => {
                        log::error!("Failed to build display: {}", err);
                        return None;
                    }
                };

                log::debug!("Picked a config with {} samples", gl_config.num_samples());

                // the display stays valid until it is explicitly destroyed
                self.display = GlDisplayCreationState::Init;
                self.context = Some(create_gl_context(&window, &gl_config).treat_as_possibly_current());

                Some((window, gl_config))
            }
            // Later resumes: reuse the config of the existing context.
            GlDisplayCreationState::Init => {
                let gl_config = self.context.as_ref()?.config();
                match glutin_winit::finalize_window(event_loop, self.window.clone(), &gl_config) {
                    Ok(window) => Some((window, gl_config)),
                    Err(err) => {
                        log::error!("Failed to recreate window: {}", err);
                        None
                    }
                }
            }
        }
    }

    fn create_renderer<D: GlDisplay>(&mut self, gl_display: &D) {
        self.renderer.get_or_insert_with(|| {
            let gl = gl::Gles2::load_with(|symbol| match CString::new(symbol) {
                Ok(symbol) => gl_display.get_proc_address(symbol.as_c_str()).cast(),
                Err(_) => std::ptr::null(),
            });

            if let Some(renderer) = GlString::get(&gl, gl::RENDERER) {
                log::info!("Running on {}", renderer);
            }
            if let Some(version) = GlString::get(&gl, gl::VERSION) {
                log::info!("OpenGL Version {}", version);
            }
            if let Some(shaders_version) = GlString::get(&gl, gl::SHADING_LANGUAGE_VERSION) {
                log::debug!("Shaders version {}", shaders_version);
            }
            Rc::new(gl)
        });
    }

    /// Creates window and surface and makes the context current. Returns false if the event
    /// loop should stop.
    pub fn resume(&mut self, event_loop: &ActiveEventLoop) -> bool {
        log::debug!("Window resumed");
        if !is_detached(&self.state) {
            return false;
        }

        let Some((window, gl_config)) = self.create_window(event_loop) else {
            return false;
        };
        let attrs = match window.build_surface_attributes(Default::default()) {
            Ok(attrs) => attrs,
            Err(err) => {
                log::error!("Failed to build surface attributes: {}", err);
                return false;
            }
        };
        let gl_surface = match unsafe { gl_config.display().create_window_surface(&gl_config, &attrs) } {
            Ok(gl_surface) => gl_surface,
            Err(err) => {
                log::error!("Failed to create window surface: {}", err);
                return false;
            }
        };

        // the context must be current for function loading (WGL) and resource setup
        let Some(gl_context) = self.context.as_ref() else {
            log::error!("Missing GL context");
            return false;
        };
        if let Err(err) = gl_context.make_current(&gl_surface) {
            log::error!("Failed to make context current: {}", err);
            return false;
        }

        if let Err(res) = gl_surface.set_swap_interval(gl_context, SwapInterval::Wait(NonZeroU32::MIN)) {
            log::error!("Error setting vsync: {res:?}");
        }

        self.create_renderer(&gl_config.display());

        self.state = Some(AppState { surface: gl_surface, window });
        true
    }

    pub fn suspend(&mut self) {
        // Android may take the native window at any moment: drop the surface and
        // un-current the context before the window goes back to the system.
        log::debug!("Window removed");
        self.state = None;

        if let Some(context) = self.context.take() {
            match context.make_not_current() {
                Ok(context) => self.context = Some(context.treat_as_possibly_current()),
                Err(err) => log::error!("Failed to release GL context: {}", err),
            }
        }
    }

    pub fn swap_buffers(&mut self) {
        if let (Some(AppState { surface, window }), Some(gl_context)) = (self.state.as_ref(), self.context.as_ref()) {
            window.request_redraw();
            if let Err(err) = surface.swap_buffers(gl_context) {
                log::error!("Failed to swap buffers: {}", err);
            }
        }
    }

    pub fn resize(&mut self, size: PhysicalSize<u32>) {
        // EGL (Wayland, Android) needs the surface resized explicitly
        if let (Some(AppState { surface, .. }), Some(gl_context)) = (self.state.as_ref(), self.context.as_ref()) {
            if let (Some(width), Some(height)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height)) {
                surface.resize(gl_context, width, height);
            }
        }
    }

    pub fn size_event(&self) -> Option<SizeEvent> {
        self.state.as_ref().map(|AppState { window, .. }| SizeEvent::from_physical(window.inner_size(), window.scale_factor()))
    }

    pub fn exit(&mut self) {
        // nvidia on Wayland touches the display on exit, terminate it while still valid
        let _gl_display = self.context.take().map(|context| context.display());

        self.state = None;
        #[cfg(egl_backend)]
        #[allow(irrefutable_let_patterns)]
        if let Some(glutin::display::Display::Egl(display)) = _gl_display {
            unsafe {
                display.terminate();
            }
        }
    }

    pub fn has_surface_and_context(&self) -> bool {
        self.context.is_some() && self.state.is_some()
    }

    pub fn renderer(&self) -> Option<&Gl> {
        self.renderer.as_ref()
    }
}

pub fn gl_config_picker(configs: Box<dyn Iterator<Item = Config> + '_>) -> Config {
    configs
        .reduce(|accum, config| {
            let transparency_check = config.supports_transparency().unwrap_or(false) & !accum.supports_transparency().unwrap_or(false);
            if transparency_check || config.num_samples() > accum.num_samples() {
                config
            } else {
                accum
            }
        })
        .expect("No GL config available")
}

/// A window must be suspended before it can be resumed again.
fn is_detached<T>(state: &Option<T>) -> bool {
    if state.is_some() {
        log::error!("Window resumed twice without a suspend");
        return false;
    }
    true
}

fn create_gl_context(window: &Window, gl_config: &Config) -> NotCurrentContext {
    let raw_window_handle = window.window_handle().ok().map(|wh| wh.as_raw());

    // Desktop core profile first, then GLES, then legacy 2.1 for old devices.
    let context_attributes = ContextAttributesBuilder::new().build(raw_window_handle);
    let fallback_context_attributes = ContextAttributesBuilder::new().with_context_api(ContextApi::Gles(None)).build(raw_window_handle);
    let legacy_context_attributes = ContextAttributesBuilder::new().with_context_api(ContextApi::OpenGl(Some(Version::new(2, 1)))).build(raw_window_handle);

    let gl_display = gl_config.display();
    unsafe {
        gl_display.create_context(gl_config, &context_attributes).unwrap_or_else(|_| {
            gl_display
                .create_context(gl_config, &fallback_context_attributes)
                .unwrap_or_else(|_| gl_display.create_context(gl_config, &legacy_context_attributes).expect("failed to create context"))
        })
    }
}

//////////////////////////////////////////////////
// Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resume_requires_prior_suspend() {
        assert!(is_detached::<()>(&None));
        assert!(!is_detached(&Some(())));
    }

    #[test]
    fn new_app_has_nothing_to_draw_on() {
        let app = App::new(ConfigTemplateBuilder::new(), Window::default_attributes());
        assert!(!app.has_surface_and_context());
        assert!(app.size_event().is_none());
        assert!(app.renderer().is_none());
    }
}
