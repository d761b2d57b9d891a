//! Helper functions: error type and mesh math.

use std::f64::consts::TAU;

use tube_types::{CylinderParams, RenderMesh};

// ── Error Type ──────────────────────────────────────────────────────────────

/// Unified error type for the test harness.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("dispatch error: {message}")]
    DispatchError { message: String },

    #[error("assertion failed: {detail}")]
    AssertionFailed { detail: String },

    #[error("oracle failure ({oracle}): {detail}")]
    OracleFailure { oracle: String, detail: String },

    #[error("scenario did not settle after {frames} frames")]
    NotSettled { frames: usize },
}

// ── Mesh Math ───────────────────────────────────────────────────────────────

/// Signed volume via the divergence theorem; positive for an outward-facing closed mesh.
pub fn signed_volume(mesh: &RenderMesh) -> f64 {
    mesh.indices
        .chunks_exact(3)
        .map(|t| {
            let a = mesh.position(t[0]).map(f64::from);
            let b = mesh.position(t[1]).map(f64::from);
            let c = mesh.position(t[2]).map(f64::from);
            let cross = [
                b[1] * c[2] - b[2] * c[1],
                b[2] * c[0] - b[0] * c[2],
                b[0] * c[1] - b[1] * c[0],
            ];
            (a[0] * cross[0] + a[1] * cross[1] + a[2] * cross[2]) / 6.0
        })
        .sum()
}

/// Area of the regular n-gon inscribed in a circle of `radius`.
pub fn polygon_area(radius: f64, segments: usize) -> f64 {
    0.5 * segments as f64 * radius * radius * (TAU / segments as f64).sin()
}

/// Volume of the faceted part the kernel should produce for `params`.
pub fn expected_volume(params: &CylinderParams, segments: usize) -> f64 {
    let outer = polygon_area(params.outer_radius, segments) * params.height;
    let floor = if params.closed_bottom {
        params.wall_thickness.min(params.height)
    } else {
        0.0
    };
    let bore = polygon_area(params.inner_radius(), segments) * (params.height - floor);
    outer - bore
}

/// Hashable key for a vertex position, treating -0.0 as 0.0.
pub fn position_key(p: [f32; 3]) -> [u32; 3] {
    p.map(|c| if c == 0.0 { 0 } else { c.to_bits() })
}
