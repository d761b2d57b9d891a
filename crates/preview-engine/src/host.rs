//! Seams to the rendering host and the download link.

use file_format::Artifact;
use tube_types::{Bounds, RenderMesh};

/// One rendered pixel, 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Background pixels are fully transparent; anything else is the part.
    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }
}

/// What the camera should frame: the mesh bounds seen at the resting rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraFraming {
    pub bounds: Bounds,
    /// Rotation about the vertical axis with no animation applied.
    pub rotation_radians: f64,
}

/// The 3D scene and its canvas.
pub trait Viewport {
    /// Replace the displayed geometry.
    fn set_mesh(&mut self, mesh: &RenderMesh);

    /// Rotation of the part about its vertical axis.
    fn set_rotation(&mut self, radians: f64);

    /// Match the drawing surface to its element. Returns true if it changed size.
    fn resize_canvas(&mut self) -> bool;

    /// CSS pixel width of the canvas.
    fn canvas_width(&self) -> f64;

    fn center_camera_around(&mut self, framing: &CameraFraming);

    /// Color at a canvas position, or `None` when the position is outside it.
    fn pixel_color(&self, x: f64, y: f64) -> Option<Rgba>;

    fn render(&mut self);
}

/// The download anchor. Each new artifact replaces the previous one.
pub trait DownloadLink {
    fn publish(&mut self, artifact: Artifact);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_zero_alpha_is_transparent() {
        assert!(Rgba::TRANSPARENT.is_transparent());
        assert!(Rgba::new(255, 255, 255, 0).is_transparent());
        assert!(!Rgba::new(0, 0, 0, 1).is_transparent());
    }
}
