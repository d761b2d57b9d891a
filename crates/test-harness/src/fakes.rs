//! Recording fakes for the viewport and download link.
//!
//! Both are handles over shared state: give one clone to the coordinator and
//! keep another to inspect what it did.

use std::cell::RefCell;
use std::rc::Rc;

use file_format::Artifact;
use preview_engine::{CameraFraming, ObjectUrls, PreviewError, Rgba, Viewport};
use tube_types::RenderMesh;

/// Color reported for pixels covered by the part.
pub const PART_COLOR: Rgba = Rgba {
    r: 180,
    g: 180,
    b: 190,
    a: 255,
};

#[derive(Debug, Clone)]
struct ViewportLog {
    width: f64,
    height: f64,
    /// x0, y0, x1, y1 of the opaque area.
    part_rect: [f64; 4],
    pending_resize: bool,
    meshes: Vec<RenderMesh>,
    rotations: Vec<f64>,
    framings: Vec<CameraFraming>,
    renders: usize,
}

/// An 800×600 canvas whose middle half is covered by the part.
#[derive(Debug, Clone)]
pub struct FakeViewport {
    log: Rc<RefCell<ViewportLog>>,
}

impl FakeViewport {
    pub fn new() -> Self {
        Self::with_size(800.0, 600.0)
    }

    pub fn with_size(width: f64, height: f64) -> Self {
        Self {
            log: Rc::new(RefCell::new(ViewportLog {
                width,
                height,
                part_rect: [width * 0.25, height * 0.25, width * 0.75, height * 0.75],
                pending_resize: false,
                meshes: Vec::new(),
                rotations: Vec::new(),
                framings: Vec::new(),
                renders: 0,
            })),
        }
    }

    /// Simulate the element changing size; the next resize check reports it.
    pub fn resize_to(&self, width: f64, height: f64) {
        let mut log = self.log.borrow_mut();
        log.width = width;
        log.height = height;
        log.pending_resize = true;
    }

    pub fn set_part_rect(&self, rect: [f64; 4]) {
        self.log.borrow_mut().part_rect = rect;
    }

    /// A point inside the part.
    pub fn part_center(&self) -> (f64, f64) {
        let [x0, y0, x1, y1] = self.log.borrow().part_rect;
        ((x0 + x1) / 2.0, (y0 + y1) / 2.0)
    }

    pub fn width(&self) -> f64 {
        self.log.borrow().width
    }

    pub fn mesh_count(&self) -> usize {
        self.log.borrow().meshes.len()
    }

    pub fn last_mesh(&self) -> Option<RenderMesh> {
        self.log.borrow().meshes.last().cloned()
    }

    pub fn rotations(&self) -> Vec<f64> {
        self.log.borrow().rotations.clone()
    }

    pub fn last_rotation(&self) -> Option<f64> {
        self.log.borrow().rotations.last().copied()
    }

    pub fn framings(&self) -> Vec<CameraFraming> {
        self.log.borrow().framings.clone()
    }

    pub fn render_count(&self) -> usize {
        self.log.borrow().renders
    }
}

impl Default for FakeViewport {
    fn default() -> Self {
        Self::new()
    }
}

impl Viewport for FakeViewport {
    fn set_mesh(&mut self, mesh: &RenderMesh) {
        self.log.borrow_mut().meshes.push(mesh.clone());
    }

    fn set_rotation(&mut self, radians: f64) {
        self.log.borrow_mut().rotations.push(radians);
    }

    fn resize_canvas(&mut self) -> bool {
        std::mem::take(&mut self.log.borrow_mut().pending_resize)
    }

    fn canvas_width(&self) -> f64 {
        self.log.borrow().width
    }

    fn center_camera_around(&mut self, framing: &CameraFraming) {
        self.log.borrow_mut().framings.push(*framing);
    }

    fn pixel_color(&self, x: f64, y: f64) -> Option<Rgba> {
        let log = self.log.borrow();
        if !(0.0..log.width).contains(&x) || !(0.0..log.height).contains(&y) {
            return None;
        }
        let [x0, y0, x1, y1] = log.part_rect;
        if (x0..x1).contains(&x) && (y0..y1).contains(&y) {
            Some(PART_COLOR)
        } else {
            Some(Rgba::TRANSPARENT)
        }
    }

    fn render(&mut self) {
        self.log.borrow_mut().renders += 1;
    }
}

#[derive(Debug, Default)]
struct LinkLog {
    published: Vec<Artifact>,
    live: Vec<String>,
    revoked: Vec<String>,
    anchor: Option<(String, String)>,
}

/// Object URLs backed by memory. Every packaged artifact is kept, along with
/// which URLs are still live and where the anchor points.
///
/// Wrap a clone in [`ReplacingLink`](preview_engine::ReplacingLink) to get
/// the same publishing rules the page uses.
#[derive(Debug, Clone, Default)]
pub struct RecordingLink {
    log: Rc<RefCell<LinkLog>>,
}

impl RecordingLink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.log.borrow().published.len()
    }

    pub fn last(&self) -> Option<Artifact> {
        self.log.borrow().published.last().cloned()
    }

    pub fn filenames(&self) -> Vec<String> {
        self.log
            .borrow()
            .published
            .iter()
            .map(|a| a.filename.clone())
            .collect()
    }

    /// URLs created and not yet revoked.
    pub fn live_urls(&self) -> Vec<String> {
        self.log.borrow().live.clone()
    }

    pub fn revoked(&self) -> Vec<String> {
        self.log.borrow().revoked.clone()
    }

    /// The anchor's href and download filename.
    pub fn anchor(&self) -> Option<(String, String)> {
        self.log.borrow().anchor.clone()
    }
}

impl ObjectUrls for RecordingLink {
    fn create(&mut self, artifact: &Artifact) -> Result<String, PreviewError> {
        let mut log = self.log.borrow_mut();
        log.published.push(artifact.clone());
        let url = format!("blob:test/{}", log.published.len());
        log.live.push(url.clone());
        Ok(url)
    }

    fn revoke(&mut self, url: &str) {
        let mut log = self.log.borrow_mut();
        log.live.retain(|u| u != url);
        log.revoked.push(url.to_string());
    }

    fn set_anchor(&mut self, url: &str, filename: &str) {
        self.log.borrow_mut().anchor = Some((url.to_string(), filename.to_string()));
    }
}
