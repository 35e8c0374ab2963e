//! Browser entry point.
//!
//! The page calls `start("canvas-id", "assets/scene.toml")`. Every asset
//! the manifest names is fetched up front into a [`MemorySource`], then
//! the engine is created on the canvas and driven by winit's browser
//! event loop (which runs on `requestAnimationFrame`).

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlCanvasElement, Request, RequestInit, RequestMode, Response};
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    platform::web::{EventLoopExtWebSys, WindowAttributesExtWebSys},
    window::{Window, WindowId},
};

use crate::{
    assets::{load_scene, referenced_uris, MemorySource},
    engine::{CursorIcon, SceneEngine, SceneEvent},
    input::translate_window_event,
    manifest::SceneManifest,
    options::Options,
    scene::Scene,
};

/// Start the showcase on the canvas with id `canvas_id`, reading the scene
/// description from `manifest_url`. Manifest paths resolve against the
/// manifest's directory.
///
/// # Errors
///
/// Rejects if the canvas does not exist or the event loop cannot start.
/// Missing assets are logged and skipped.
#[wasm_bindgen]
pub async fn start(canvas_id: String, manifest_url: String) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::warn!("logger already installed");
    }

    let canvas = find_canvas(&canvas_id)?;
    let root = asset_root(&manifest_url);

    let manifest = match fetch_text(&manifest_url).await {
        Ok(text) => SceneManifest::from_toml(&text).unwrap_or_else(|e| {
            log::error!("{manifest_url}: {e}, using the built-in scene");
            SceneManifest::default()
        }),
        Err(e) => {
            log::error!("failed to fetch {manifest_url}: {e}, using the built-in scene");
            SceneManifest::default()
        }
    };

    let source = prefetch(&root, &manifest).await;
    let scene = load_scene(&source, &manifest);
    log::info!(
        "loaded {}/{} models from {root}",
        scene.models.len(),
        manifest.models.len()
    );

    let event_loop =
        EventLoop::new().map_err(|e| JsValue::from_str(&e.to_string()))?;
    event_loop.set_control_flow(ControlFlow::Poll);
    event_loop.spawn_app(WebApp {
        window: None,
        engine: Rc::new(RefCell::new(None)),
        pending: Some((Options::default(), scene, canvas)),
    });
    Ok(())
}

fn find_canvas(id: &str) -> Result<HtmlCanvasElement, JsValue> {
    web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(id))
        .ok_or_else(|| JsValue::from_str(&format!("no element with id '{id}'")))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| JsValue::from_str(&format!("'{id}' is not a canvas")))
}

/// Directory part of `url`, with a trailing slash (empty if none).
fn asset_root(url: &str) -> String {
    url.rfind('/')
        .map_or_else(String::new, |i| url[..=i].to_owned())
}

/// Fetch every manifest asset, plus the buffers and images each glTF
/// references. Failed fetches are logged and left out.
async fn prefetch(root: &str, manifest: &SceneManifest) -> MemorySource {
    let mut source = MemorySource::default();
    for path in manifest.asset_paths() {
        let Some(bytes) = fetch_asset(root, path).await else {
            continue;
        };
        if is_gltf(path) {
            match referenced_uris(path, &bytes) {
                Ok(uris) => {
                    for uri in uris {
                        if source.contains(&uri) {
                            continue;
                        }
                        if let Some(data) = fetch_asset(root, &uri).await {
                            source.insert(&uri, data);
                        }
                    }
                }
                Err(e) => log::error!("{e}"),
            }
        }
        source.insert(path, bytes);
    }
    log::debug!("prefetched {} files", source.len());
    source
}

fn is_gltf(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    lower.ends_with(".gltf") || lower.ends_with(".glb")
}

async fn fetch_asset(root: &str, path: &str) -> Option<Vec<u8>> {
    let url = format!("{root}{path}");
    match fetch_bytes(&url).await {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            log::error!("failed to fetch {url}: {e}");
            None
        }
    }
}

async fn fetch_response(url: &str) -> Result<Response, String> {
    let window = web_sys::window().ok_or("no window")?;
    let init = RequestInit::new();
    init.set_method("GET");
    init.set_mode(RequestMode::Cors);
    let request =
        Request::new_with_str_and_init(url, &init).map_err(|e| format!("{e:?}"))?;
    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| format!("{e:?}"))?
        .dyn_into()
        .map_err(|e| format!("{e:?}"))?;
    if response.ok() {
        Ok(response)
    } else {
        Err(format!("HTTP {}", response.status()))
    }
}

async fn fetch_bytes(url: &str) -> Result<Vec<u8>, String> {
    let response = fetch_response(url).await?;
    let promise = response.array_buffer().map_err(|e| format!("{e:?}"))?;
    let buffer = JsFuture::from(promise).await.map_err(|e| format!("{e:?}"))?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

async fn fetch_text(url: &str) -> Result<String, String> {
    let response = fetch_response(url).await?;
    let promise = response.text().map_err(|e| format!("{e:?}"))?;
    JsFuture::from(promise)
        .await
        .map_err(|e| format!("{e:?}"))?
        .as_string()
        .ok_or_else(|| "response body is not text".to_owned())
}

// ── Winit app ────────────────────────────────────────────────────────────

struct WebApp {
    window: Option<Arc<Window>>,
    /// Filled in once the async GPU setup finishes.
    engine: Rc<RefCell<Option<SceneEngine>>>,
    pending: Option<(Options, Scene, HtmlCanvasElement)>,
}

impl WebApp {
    fn handle_scene_event(&self, event: SceneEvent) {
        match event {
            SceneEvent::Navigate(link) => {
                log::info!("navigate: {link}");
                let result = web_sys::window()
                    .map(|w| w.location().set_href(&link));
                if let Some(Err(e)) = result {
                    log::error!("navigation to {link} failed: {e:?}");
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

impl ApplicationHandler for WebApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let Some((options, scene, canvas)) = self.pending.take() else {
            return;
        };

        let attrs = Window::default_attributes().with_canvas(Some(canvas.clone()));
        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to attach to canvas: {e}");
                return;
            }
        };
        self.window = Some(window.clone());

        let slot = Rc::clone(&self.engine);
        wasm_bindgen_futures::spawn_local(async move {
            let size = (canvas.width().max(1), canvas.height().max(1));
            match SceneEngine::new(
                wgpu::SurfaceTarget::Canvas(canvas),
                size,
                window.scale_factor(),
                options,
                scene,
            )
            .await
            {
                Ok(engine) => {
                    *slot.borrow_mut() = Some(engine);
                    window.request_redraw();
                }
                Err(e) => log::error!("Failed to initialize engine: {e}"),
            }
        });
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.clone() else {
            return;
        };
        let scene_event = {
            let mut slot = self.engine.borrow_mut();
            let Some(engine) = slot.as_mut() else {
                return;
            };
            match event {
                WindowEvent::Resized(size) => {
                    engine.resize(size.width, size.height);
                    None
                }
                WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                    engine.set_scale_factor(scale_factor);
                    None
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
                    None
                }
                other => translate_window_event(&other)
                    .and_then(|input| engine.handle_input(input)),
            }
        };
        if let Some(scene_event) = scene_event {
            self.handle_scene_event(scene_event);
        }
    }
}
