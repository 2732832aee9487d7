//////////////////////////////////////////////////
// Using

use std::convert::TryInto;

use log::LevelFilter;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::WindowId;

#[cfg(target_os = "android")]
use winit::platform::android::activity::AndroidApp;
#[cfg(target_os = "android")]
use winit::platform::android::EventLoopBuilderExtAndroid;

use crate::app::App;
use crate::clock::{self, Clock};
use crate::context::{ContextExt, GameContext};
use crate::images::Images;
use crate::input::{CursorEvent, InputEvent, MouseEvent};
use crate::size::SizeEvent;
use crate::Gl;

//////////////////////////////////////////////////
// GameLoop

/// Callbacks delivered by the host, all on the event loop thread.
pub trait GameLoop: Default {
    fn title(&self) -> &str;

    fn log_level(&self) -> LevelFilter {
        LevelFilter::Off
    }

    fn init(&mut self, ctx: GameContext);

    fn cleanup(&mut self);

    fn input(&mut self, input_events: &[InputEvent]);

    /// Called once per loop iteration with the current logical time.
    fn update(&mut self, now: clock::Time);

    fn render(&mut self, gl: &Gl, size: &SizeEvent, images: &Images);

    fn create_device(&mut self, gl: &Gl);

    fn destroy_device(&mut self, gl: &Gl);

    fn resize_device(&mut self, gl: &Gl, size: &SizeEvent);
}

struct GameLoopData {
    app: Option<App>,
    images: Option<Images>,
    size: Option<SizeEvent>,
    clock: Clock,
    input_events: Vec<InputEvent>,
}

pub struct GameLoopWrapper<L: GameLoop> {
    interface: L,
    data: GameLoopData,
    ctx: GameContext,
}

//////////////////////////////////////////////////
// GameLoopRunner

pub trait GameLoopRunner {
    #[cfg(target_os = "android")]
    fn loop_forever(app: AndroidApp);

    #[cfg(not(target_os = "android"))]
    fn loop_forever();
}

//////////////////////////////////////////////////
// Implementation

impl GameLoopData {
    fn new() -> Self {
        Self {
            app: None,
            images: None,
            size: None,
            clock: Clock::new(),
            input_events: Vec::with_capacity(10),
        }
    }
}

impl<L: GameLoop> GameLoopWrapper<L> {
    pub fn new() -> Self {
        Self {
            interface: Default::default(),
            data: GameLoopData::new(),
            ctx: Default::default(),
        }
    }

    pub fn with_logging(self) -> Self {
        let filter_level = self.interface.log_level();
        #[cfg(target_os = "android")]
        android_logger::init_once(android_logger::Config::default().with_max_level(filter_level));
        #[cfg(not(target_os = "android"))]
        {
            let _ = env_logger::builder().filter_level(filter_level).parse_default_env().try_init();
        }
        self
    }

    #[cfg(target_os = "android")]
    fn android(self, android_app: AndroidApp) -> Self {
        self.ctx.write(|ctx| ctx.init_android(android_app));
        self
    }

    fn run(&mut self) {
        log::info!("Initializing application...");

        #[cfg(target_os = "android")]
        let event_loop = EventLoop::builder().with_android_app(self.ctx.read(|ctx| ctx.android_app().clone())).build();
        #[cfg(not(target_os = "android"))]
        let event_loop = EventLoop::builder().build();
        let event_loop = match event_loop {
            Ok(event_loop) => event_loop,
            Err(err) => {
                log::error!("Failed to create event loop: {}", err);
                return;
            }
        };

        let template = glutin::config::ConfigTemplateBuilder::new().with_alpha_size(8).with_transparency(cfg!(cgl_backend));
        let window = winit::window::Window::default_attributes().with_transparent(true).with_title(self.interface.title());
        self.data.app = Some(App::new(template, window));

        self.interface.init(self.ctx.clone());

        // logical time starts with the loop
        self.data.clock.restart();

        log::info!("Running game loop...");
        if let Err(err) = event_loop.run_app(self) {
            log::error!("Game loop terminated with error: {}", err);
        }
    }

    fn resize(&mut self, size: SizeEvent) {
        if let Some(gl) = self.data.app.as_ref().and_then(|app| app.renderer()) {
            self.interface.resize_device(gl, &size);
        }
        self.data.size = Some(size);
    }
}

impl<L: GameLoop> Default for GameLoopWrapper<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: GameLoop> GameLoopRunner for L {
    #[cfg(target_os = "android")]
    fn loop_forever(app: AndroidApp) {
        GameLoopWrapper::<L>::new().android(app).with_logging().run();
    }

    #[cfg(not(target_os = "android"))]
    fn loop_forever() {
        GameLoopWrapper::<L>::new().with_logging().run();
    }
}

//////////////////////////////////////////////////
// ApplicationHandler

impl<L: GameLoop> ApplicationHandler for GameLoopWrapper<L> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        log::info!("Resuming game loop ...");
        let Some(app) = self.data.app.as_mut() else {
            return;
        };
        if !app.resume(event_loop) {
            event_loop.exit();
            return;
        }
        if let Some(gl) = app.renderer() {
            self.data.images = Some(Images::new(gl));
            self.interface.create_device(gl);
        }

        // not every platform sends a resize after the surface comes back
        if let Some(size) = app.size_event().filter(|size| !size.is_empty()) {
            self.resize(size);
        }
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        log::info!("Suspending game loop ...");
        if let Some(app) = self.data.app.as_mut().filter(|app| app.has_surface_and_context()) {
            if let Some(mut images) = self.data.images.take() {
                images.release();
            }
            if let Some(gl) = app.renderer() {
                self.interface.destroy_device(gl);
            }
            app.suspend();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::RedrawRequested => {
                if let Some(app) = self.data.app.as_mut() {
                    if let (true, Some(gl), Some(size), Some(images)) = (app.has_surface_and_context(), app.renderer(), self.data.size.as_ref(), self.data.images.as_ref()) {
                        self.interface.render(gl, size, images);
                    }
                    app.swap_buffers();
                }
            }
            WindowEvent::Resized(size) if size.width != 0 && size.height != 0 => {
                let size_event = self.data.app.as_mut().filter(|app| app.has_surface_and_context()).and_then(|app| {
                    app.resize(size);
                    app.size_event()
                });
                if let Some(size_event) = size_event {
                    self.resize(size_event);
                }
            }
            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(size_event) = self.data.app.as_ref().and_then(|app| app.size_event()).filter(|size| !size.is_empty()) {
                    self.resize(size_event);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.data.input_events.push(InputEvent::Cursor(CursorEvent { location: position.into() }));
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.data.input_events.push(InputEvent::Mouse(MouseEvent {
                    state: state.into(),
                    button: button.into(),
                }));
            }
            WindowEvent::Touch(touch) => {
                self.data.input_events.push(InputEvent::Touch(touch.into()));
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let Ok(event) = event.try_into() {
                    self.data.input_events.push(InputEvent::Keyboard(event));
                }
            }
            WindowEvent::CloseRequested => event_loop.exit(),
            _ => (),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        // call input callback
        self.interface.input(&self.data.input_events);
        self.data.input_events.clear();

        // call update callback
        self.interface.update(self.data.clock.now());

        // check for exit request
        if self.ctx.read(|ctx| ctx.request_exit()) {
            event_loop.exit();
        }
    }

    fn exiting(&mut self, event_loop: &ActiveEventLoop) {
        log::info!("Exiting application...");

        self.suspended(event_loop);

        if let Some(app) = self.data.app.as_mut() {
            self.interface.cleanup();
            app.exit();
        }
        self.data.app = None;
    }
}

//////////////////////////////////////////////////
// Tests

#[cfg(all(test, not(target_os = "android")))]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Idle {
        updates: Vec<clock::Time>,
    }

    impl GameLoop for Idle {
        fn title(&self) -> &str {
            "Idle"
        }
        fn log_level(&self) -> LevelFilter {
            LevelFilter::Warn
        }
        fn init(&mut self, _ctx: GameContext) {}
        fn cleanup(&mut self) {}
        fn input(&mut self, _input_events: &[InputEvent]) {}
        fn update(&mut self, now: clock::Time) {
            self.updates.push(now);
        }
        fn render(&mut self, _gl: &Gl, _size: &SizeEvent, _images: &Images) {}
        fn create_device(&mut self, _gl: &Gl) {}
        fn destroy_device(&mut self, _gl: &Gl) {}
        fn resize_device(&mut self, _gl: &Gl, _size: &SizeEvent) {}
    }

    #[test]
    fn logging_can_be_set_up_more_than_once() {
        let wrapper = GameLoopWrapper::<Idle>::new().with_logging().with_logging();
        assert!(wrapper.interface.updates.is_empty());
        let _again = GameLoopWrapper::<Idle>::new().with_logging();
    }

    #[test]
    fn resize_without_renderer_keeps_size() {
        let mut wrapper = GameLoopWrapper::<Idle>::new();
        wrapper.resize(SizeEvent::new(640, 480, 1.0));
        assert_eq!(wrapper.data.size, Some(SizeEvent::new(640, 480, 1.0)));
    }
}
