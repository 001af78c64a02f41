//! Standalone viewer window backed by winit.
//!
//! ```no_run
//! # use speckle::Viewer;
//! Viewer::builder()
//!     .with_path("caffeine.xyz")
//!     .build()
//!     .run()
//!     .unwrap();
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{Window, WindowId},
};

use crate::error::SpeckleError;
use crate::gpu::render_context::RenderContext;
use crate::input::{InputEvent, InputProcessor, KeyAction, MouseButton};
use crate::options::{Options, Preset};
use crate::renderer::Renderer;
use crate::structure::Structure;
use crate::view::ViewState;

/// Directory searched for presets that are not built in.
const PRESET_DIR: &str = "presets";

// ── Builder ──────────────────────────────────────────────────────────────

/// Fluent builder for [`Viewer`].
pub struct ViewerBuilder {
    path: Option<PathBuf>,
    options: Options,
    title: String,
}

impl ViewerBuilder {
    fn new() -> Self {
        Self {
            path: None,
            options: Options::default(),
            title: "Speckle".into(),
        }
    }

    /// Set the XYZ file to display.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Override the default options.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Set the window title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Consume the builder and produce a [`Viewer`].
    #[must_use]
    pub fn build(self) -> Viewer {
        Viewer {
            path: self.path,
            options: self.options,
            title: self.title,
        }
    }
}

// ── Viewer ───────────────────────────────────────────────────────────────

/// A window that displays one structure and refines it progressively.
///
/// Construct via [`Viewer::builder`], then call [`run`](Self::run).
pub struct Viewer {
    path: Option<PathBuf>,
    options: Options,
    title: String,
}

impl Viewer {
    /// Start a new builder.
    #[must_use]
    pub fn builder() -> ViewerBuilder {
        ViewerBuilder::new()
    }

    /// Open the window and run the event loop. Blocks until the window is
    /// closed.
    ///
    /// # Errors
    ///
    /// Returns [`SpeckleError::StructureLoad`] or [`SpeckleError::Io`] if
    /// the structure cannot be read, and [`SpeckleError::Viewer`] if the
    /// event loop fails.
    pub fn run(self) -> Result<(), SpeckleError> {
        let structure = self.path.as_deref().map(Structure::load).transpose()?;

        let mut state = ViewState::default();
        match Preset::find(&self.options.display.preset, Path::new(PRESET_DIR)) {
            Ok(preset) => preset.apply(&mut state),
            Err(e) => log::warn!("preset {}: {e}", self.options.display.preset),
        }

        let event_loop =
            EventLoop::new().map_err(|e| SpeckleError::Viewer(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = ViewerApp {
            window: None,
            gpu: None,
            pending: structure,
            state,
            input: InputProcessor::new(self.options.controls.clone()),
            options: self.options,
            title: self.title,
        };

        event_loop
            .run_app(&mut app)
            .map_err(|e| SpeckleError::Viewer(e.to_string()))
    }
}

// ── Winit app ────────────────────────────────────────────────────────────

struct Gpu {
    context: RenderContext,
    renderer: Renderer,
}

impl Gpu {
    /// Reallocate targets when the window or the resolution scales
    /// changed.
    fn resize(&mut self, state: &ViewState, width: u32, height: u32) {
        self.context.resize(width, height);
        let (resolution, ao_resolution) = state.resolutions(width, height);
        if resolution != self.renderer.resolution()
            || ao_resolution != self.renderer.ao_resolution()
        {
            self.renderer
                .set_resolution(&self.context, resolution, ao_resolution);
        }
    }
}

struct ViewerApp {
    window: Option<Arc<Window>>,
    gpu: Option<Gpu>,
    /// Structure waiting for the GPU to come up.
    pending: Option<Structure>,
    state: ViewState,
    input: InputProcessor,
    options: Options,
    title: String,
}

fn viewport_size(inner: winit::dpi::PhysicalSize<u32>) -> (u32, u32) {
    (inner.width.max(1), inner.height.max(1))
}

impl ViewerApp {
    fn init_gpu(&mut self, window: &Arc<Window>) -> Result<Gpu, SpeckleError> {
        let (width, height) = viewport_size(window.inner_size());
        let context =
            pollster::block_on(RenderContext::new(window.clone(), (width, height)))?;
        let (resolution, ao_resolution) = self.state.resolutions(width, height);
        let mut renderer = Renderer::new(&context, resolution, ao_resolution)?;
        renderer.set_background(self.options.display.background);

        if let Some(structure) = self.pending.take() {
            self.state.center(&structure, resolution);
            renderer.set_structure(&context, structure, &self.state);
        }
        Ok(Gpu { context, renderer })
    }

    fn handle_key(&mut self, action: KeyAction) {
        let Some(gpu) = &mut self.gpu else {
            return;
        };
        match action {
            KeyAction::Recenter => {
                if let Some(structure) = gpu.renderer.structure() {
                    self.state.center(structure, gpu.renderer.resolution());
                }
            }
            KeyAction::Preset(index) => {
                let Some(preset) = Preset::builtin_ids()
                    .get(index)
                    .copied()
                    .and_then(Preset::builtin)
                else {
                    return;
                };
                preset.apply(&mut self.state);
                gpu.renderer.update_bonds(&gpu.context, &self.state);
                let (width, height) = gpu.context.size();
                gpu.resize(&self.state, width, height);
            }
        }
        gpu.renderer.reset();
    }

    fn handle_input(&mut self, event: InputEvent) {
        let Some(command) = self.input.handle_event(event) else {
            return;
        };
        if let Some(gpu) = &mut self.gpu {
            if command.apply(&mut self.state, gpu.renderer.resolution()) {
                gpu.renderer.reset();
            }
        }
    }

    fn redraw(&mut self) {
        let (Some(window), Some(gpu)) = (&self.window, &mut self.gpu) else {
            return;
        };
        match gpu.renderer.render_frame(&gpu.context, &self.state) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
                let (width, height) = viewport_size(window.inner_size());
                gpu.resize(&self.state, width, height);
            }
            Err(e) => log::error!("render error: {e:?}"),
        }
        window.request_redraw();
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title(&self.title)
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.options.display.window_width,
                self.options.display.window_height,
            ));
        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        match self.init_gpu(&window) {
            Ok(gpu) => self.gpu = Some(gpu),
            Err(e) => {
                log::error!("Failed to initialize renderer: {e}");
                event_loop.exit();
                return;
            }
        }

        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        if matches!(event, WindowEvent::CloseRequested) {
            event_loop.exit();
            return;
        }

        match event {
            WindowEvent::Resized(size) => {
                let (width, height) = viewport_size(size);
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(&self.state, width, height);
                }
            }

            WindowEvent::RedrawRequested => self.redraw(),

            WindowEvent::MouseInput { button, state, .. } => {
                self.handle_input(InputEvent::MouseButton {
                    button: MouseButton::from(button),
                    pressed: state == ElementState::Pressed,
                });
            }

            WindowEvent::CursorMoved { position, .. } => {
                #[allow(clippy::cast_possible_truncation)]
                self.handle_input(InputEvent::CursorMoved {
                    x: position.x as f32,
                    y: position.y as f32,
                });
            }

            WindowEvent::MouseWheel { delta, .. } => {
                #[allow(clippy::cast_possible_truncation)]
                let steps = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.01,
                };
                self.handle_input(InputEvent::Scroll { delta: steps });
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                self.handle_input(InputEvent::ModifiersChanged {
                    shift: modifiers.state().shift_key(),
                });
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed {
                    return;
                }
                let PhysicalKey::Code(code) = event.physical_key else {
                    return;
                };
                if let Some(action) =
                    self.input.handle_key_press(&format!("{code:?}"))
                {
                    self.handle_key(action);
                }
            }

            _ => (),
        }
    }
}
