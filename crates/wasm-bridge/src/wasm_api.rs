//! WASM entry points for the host page.
//!
//! This module is only compiled for the `wasm32` target. The page passes a
//! host object implementing the rendering calls (see [`PreviewHost`]), then
//! forwards UI events through [`process_message`]. Frames are driven by
//! `requestAnimationFrame` from here.

use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use file_format::Artifact;
use preview_engine::{
    CameraFraming, ObjectUrls, PreviewError, ReplacingLink, Rgba, SystemClock, Viewport,
};
use tracing::warn;
use tube_types::RenderMesh;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::bridge_state::{BridgeError, BridgeState};
use crate::dispatch;

#[wasm_bindgen]
extern "C" {
    /// The page-side renderer and download anchor.
    pub type PreviewHost;

    #[wasm_bindgen(method, js_name = setMesh)]
    fn set_mesh(this: &PreviewHost, vertices: &[f32], normals: &[f32], indices: &[u32]);

    #[wasm_bindgen(method, js_name = setRotation)]
    fn set_rotation(this: &PreviewHost, radians: f64);

    #[wasm_bindgen(method, js_name = resizeCanvas)]
    fn resize_canvas(this: &PreviewHost) -> bool;

    #[wasm_bindgen(method, js_name = canvasWidth)]
    fn canvas_width(this: &PreviewHost) -> f64;

    #[wasm_bindgen(method, js_name = centerCameraAround)]
    fn center_camera_around(
        this: &PreviewHost,
        center: &[f64],
        size: &[f64],
        radius: f64,
        rotation_radians: f64,
    );

    /// RGBA bytes at a canvas position, or `undefined` outside the canvas.
    #[wasm_bindgen(method, js_name = pixelColor)]
    fn pixel_color(this: &PreviewHost, x: f64, y: f64) -> Option<Vec<u8>>;

    #[wasm_bindgen(method)]
    fn render(this: &PreviewHost);

    /// Wrap export bytes in the file the user saves. A 3MF artifact carries
    /// only the model part, which the host places in its OPC package; other
    /// formats pass through unchanged.
    #[wasm_bindgen(method, catch, js_name = packageDownload)]
    fn package_download(
        this: &PreviewHost,
        bytes: &js_sys::Uint8Array,
        mime_type: &str,
        filename: &str,
    ) -> Result<web_sys::Blob, JsValue>;

    #[wasm_bindgen(method, js_name = setDownload)]
    fn set_download(this: &PreviewHost, href: &str, filename: &str);

    #[wasm_bindgen(method, js_name = setPointerTracking)]
    fn set_pointer_tracking(this: &PreviewHost, tracking: bool);
}

struct HostViewport {
    host: PreviewHost,
}

impl Viewport for HostViewport {
    fn set_mesh(&mut self, mesh: &RenderMesh) {
        self.host.set_mesh(&mesh.vertices, &mesh.normals, &mesh.indices);
    }

    fn set_rotation(&mut self, radians: f64) {
        self.host.set_rotation(radians);
    }

    fn resize_canvas(&mut self) -> bool {
        self.host.resize_canvas()
    }

    fn canvas_width(&self) -> f64 {
        self.host.canvas_width()
    }

    fn center_camera_around(&mut self, framing: &CameraFraming) {
        self.host.center_camera_around(
            &framing.bounds.center(),
            &framing.bounds.size(),
            framing.bounds.radius(),
            framing.rotation_radians,
        );
    }

    fn pixel_color(&self, x: f64, y: f64) -> Option<Rgba> {
        match self.host.pixel_color(x, y)?.as_slice() {
            [r, g, b, a, ..] => Some(Rgba::new(*r, *g, *b, *a)),
            _ => None,
        }
    }

    fn render(&mut self) {
        self.host.render();
    }
}

/// Blob URLs for packaged downloads.
struct BrowserUrls {
    host: PreviewHost,
}

impl ObjectUrls for BrowserUrls {
    fn create(&mut self, artifact: &Artifact) -> Result<String, PreviewError> {
        let host_error = |call: &str, e: JsValue| PreviewError::Host {
            call: call.to_string(),
            message: format!("{e:?}"),
        };
        let bytes = js_sys::Uint8Array::from(artifact.bytes.as_slice());
        let blob = self
            .host
            .package_download(&bytes, artifact.mime_type, &artifact.filename)
            .map_err(|e| host_error("packageDownload", e))?;
        web_sys::Url::create_object_url_with_blob(&blob)
            .map_err(|e| host_error("URL.createObjectURL", e))
    }

    fn revoke(&mut self, url: &str) {
        if let Err(e) = web_sys::Url::revoke_object_url(url) {
            warn!(error = ?e, "failed to revoke previous download URL");
        }
    }

    fn set_anchor(&mut self, url: &str, filename: &str) {
        self.host.set_download(url, filename);
    }
}

// Global state: the page is single-threaded.
thread_local! {
    static STATE: RefCell<Option<BridgeState>> = RefCell::new(None);
}

/// Initialize the configurator and start the frame loop.
///
/// `config_json` may override any subset of the preview configuration.
#[wasm_bindgen]
pub fn init(host: PreviewHost, config_json: Option<String>) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    install_console_logging();

    let config = BridgeState::parse_config(config_json.as_deref()).map_err(to_js)?;
    let viewport = Box::new(HostViewport { host: host.clone() });
    let link = Box::new(ReplacingLink::new(BrowserUrls { host: host.clone() }));
    let state = BridgeState::with_builtin_kernel(config, viewport, link, Rc::new(SystemClock))
        .map_err(to_js)?;

    state
        .coordinator
        .tracking_cell()
        .add_listener(move |tracking| host.set_pointer_tracking(*tracking));

    STATE.with(|cell| *cell.borrow_mut() = Some(state));
    start_frame_loop()
}

/// Handle one JSON-encoded `HostEvent` and return the JSON-encoded reply.
#[wasm_bindgen]
pub fn process_message(json_input: &str) -> String {
    STATE.with(|cell| match cell.borrow_mut().as_mut() {
        Some(state) => dispatch::dispatch_json(state, json_input),
        None => r#"{"type":"Error","message":"not initialized; call init() first"}"#.to_string(),
    })
}

fn start_frame_loop() -> Result<(), JsValue> {
    let callback: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let next = Rc::clone(&callback);
    *callback.borrow_mut() = Some(Closure::new(move || {
        STATE.with(|cell| {
            if let Some(state) = cell.borrow_mut().as_mut() {
                state.coordinator.tick();
            }
        });
        if let Some(closure) = next.borrow().as_ref() {
            if let Err(e) = request_frame(closure) {
                warn!(error = ?e, "frame loop stopped");
            }
        }
    }));
    if let Some(closure) = callback.borrow().as_ref() {
        request_frame(closure)?;
    }
    Ok(())
}

fn request_frame(closure: &Closure<dyn FnMut()>) -> Result<i32, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    window.request_animation_frame(closure.as_ref().unchecked_ref())
}

fn to_js(error: BridgeError) -> JsValue {
    JsValue::from_str(&error.to_string())
}

/// Forwards formatted log lines to the browser console.
struct ConsoleWriter {
    buf: Vec<u8>,
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.buf.is_empty() {
            let line = String::from_utf8_lossy(&self.buf);
            web_sys::console::log_1(&JsValue::from_str(line.trim_end()));
            self.buf.clear();
        }
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let _ = io::Write::flush(self);
    }
}

fn install_console_logging() {
    let result = tracing_subscriber::fmt()
        .with_writer(|| ConsoleWriter { buf: Vec::new() })
        .with_ansi(false)
        .without_time()
        .with_max_level(tracing::Level::INFO)
        .try_init();
    if result.is_err() {
        web_sys::console::log_1(&JsValue::from_str("tracing subscriber already installed"));
    }
}
