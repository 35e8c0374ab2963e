//! Standalone showcase window backed by winit.
//!
//! ```no_run
//! # use tidepool::Viewer;
//! Viewer::builder()
//!     .with_asset_root("assets")
//!     .build()
//!     .run()
//!     .unwrap();
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::{
    assets::{load_scene, FileSource},
    engine::{CursorIcon, SceneEngine, SceneEvent},
    error::TidepoolError,
    input::translate_window_event,
    manifest::SceneManifest,
    options::Options,
    scene::Scene,
};

/// Called with the link of a clicked model.
pub type NavigateCallback = Box<dyn FnMut(&str)>;

// ── Builder ──────────────────────────────────────────────────────────────

/// Fluent builder for [`Viewer`].
pub struct ViewerBuilder {
    title: String,
    options: Option<Options>,
    manifest: Option<SceneManifest>,
    asset_root: PathBuf,
    on_navigate: Option<NavigateCallback>,
}

impl ViewerBuilder {
    fn new() -> Self {
        Self {
            title: "Tidepool".into(),
            options: None,
            manifest: None,
            asset_root: PathBuf::from("assets"),
            on_navigate: None,
        }
    }

    /// Set the window title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Override the default options.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = Some(options);
        self
    }

    /// Override the built-in showcase manifest.
    #[must_use]
    pub fn with_manifest(mut self, manifest: SceneManifest) -> Self {
        self.manifest = Some(manifest);
        self
    }

    /// Directory manifest paths are resolved against.
    #[must_use]
    pub fn with_asset_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.asset_root = root.into();
        self
    }

    /// Run `callback` when a model link is clicked. Without one the link
    /// is only logged.
    #[must_use]
    pub fn on_navigate(mut self, callback: impl FnMut(&str) + 'static) -> Self {
        self.on_navigate = Some(Box::new(callback));
        self
    }

    /// Consume the builder and produce a [`Viewer`].
    #[must_use]
    pub fn build(self) -> Viewer {
        Viewer {
            title: self.title,
            options: self.options.unwrap_or_default(),
            manifest: self.manifest.unwrap_or_default(),
            asset_root: self.asset_root,
            on_navigate: self.on_navigate,
        }
    }
}

// ── Viewer ───────────────────────────────────────────────────────────────

/// A standalone window that displays the showcase scene.
///
/// Construct via [`Viewer::builder`], then call [`run`](Self::run) to
/// enter the event loop.
pub struct Viewer {
    title: String,
    options: Options,
    manifest: SceneManifest,
    asset_root: PathBuf,
    on_navigate: Option<NavigateCallback>,
}

impl Viewer {
    /// Start a new builder.
    #[must_use]
    pub fn builder() -> ViewerBuilder {
        ViewerBuilder::new()
    }

    /// Load the scene, open the window and run the event loop. Blocks
    /// until the window is closed.
    ///
    /// # Errors
    ///
    /// Returns [`TidepoolError::Viewer`] if the event loop fails.
    pub fn run(self) -> Result<(), TidepoolError> {
        let source = FileSource::new(&self.asset_root);
        let scene = load_scene(&source, &self.manifest);
        log::info!(
            "loaded {}/{} models from {}",
            scene.models.len(),
            self.manifest.models.len(),
            self.asset_root.display()
        );

        let event_loop = EventLoop::new()
            .map_err(|e| TidepoolError::Viewer(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = ViewerApp {
            window: None,
            engine: None,
            pending: Some((self.options, scene)),
            title: self.title,
            on_navigate: self.on_navigate,
        };
        event_loop
            .run_app(&mut app)
            .map_err(|e| TidepoolError::Viewer(e.to_string()))
    }
}

// ── Winit app ────────────────────────────────────────────────────────────

struct ViewerApp {
    window: Option<Arc<Window>>,
    engine: Option<SceneEngine>,
    /// Options and scene waiting for the window to exist.
    pending: Option<(Options, Scene)>,
    title: String,
    on_navigate: Option<NavigateCallback>,
}

impl ViewerApp {
    fn handle_scene_event(&mut self, event: SceneEvent) {
        match event {
            SceneEvent::Navigate(link) => {
                log::info!("navigate: {link}");
                if let Some(callback) = &mut self.on_navigate {
                    callback(&link);
                }
            }
            SceneEvent::CursorChanged(icon) => {
                if let Some(window) = &self.window {
                    window.set_cursor(match icon {
                        CursorIcon::Default => winit::window::CursorIcon::Default,
                        CursorIcon::Pointer => winit::window::CursorIcon::Pointer,
                    });
                }
            }
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let Some((options, scene)) = self.pending.take() else {
            return;
        };

        let attrs = Window::default_attributes()
            .with_title(&self.title)
            .with_inner_size(winit::dpi::LogicalSize::new(1280.0, 800.0));
        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let inner = window.inner_size();
        let engine = pollster::block_on(SceneEngine::new(
            window.clone(),
            (inner.width.max(1), inner.height.max(1)),
            window.scale_factor(),
            options,
            scene,
        ));
        let engine = match engine {
            Ok(e) => e,
            Err(e) => {
                log::error!("Failed to initialize engine: {e}");
                event_loop.exit();
                return;
            }
        };

        window.request_redraw();
        self.window = Some(window);
        self.engine = Some(engine);
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
        let (Some(window), Some(engine)) = (&self.window, &mut self.engine)
        else {
            return;
        };

        match event {
            WindowEvent::Resized(size) => {
                engine.resize(size.width, size.height);
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                engine.set_scale_factor(scale_factor);
            }
            WindowEvent::RedrawRequested => {
                match engine.frame() {
                    Ok(()) => {}
                    Err(
                        wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost,
                    ) => engine.reconfigure(),
                    Err(e) => log::error!("render error: {e:?}"),
                }
                window.request_redraw();
            }
            other => {
                let scene_event = translate_window_event(&other)
                    .and_then(|input| engine.handle_input(input));
                if let Some(scene_event) = scene_event {
                    self.handle_scene_event(scene_event);
                }
            }
        }
    }
}
