//! Direct tessellation of the hollow cylinder.
//!
//! The part stands on the XY plane with its axis along +Z. Each surface
//! (outer wall, bore, rims, floor, base) gets its own vertices so caps stay
//! flat-shaded while the walls keep smooth radial normals.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::traits::SolidBuilder;
use crate::types::*;

/// Resolution of the generated mesh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TessellationConfig {
    /// Number of facets around the circumference. Values below 3 are raised to 3.
    pub segments: usize,
}

impl Default for TessellationConfig {
    fn default() -> Self {
        Self { segments: 96 }
    }
}

/// Builds the printable mesh for a set of cylinder parameters.
#[derive(Debug, Clone, Default)]
pub struct TessellatedBuilder {
    config: TessellationConfig,
}

impl TessellatedBuilder {
    pub fn new(config: TessellationConfig) -> Self {
        Self { config }
    }

    pub fn segments(&self) -> usize {
        self.config.segments.max(3)
    }
}

impl SolidBuilder for TessellatedBuilder {
    #[instrument(skip(self), fields(segments = self.segments()))]
    fn build(&self, params: &CylinderParams) -> Result<RenderMesh, KernelError> {
        validate_params(params)?;
        let n = self.segments();
        let outer = params.outer_radius;
        let inner = params.inner_radius();
        let height = params.height;
        let floor = if params.closed_bottom {
            params.wall_thickness.min(height)
        } else {
            0.0
        };

        let mut mesh = RenderMesh::new();
        wall(&mut mesh, n, outer, 0.0, height, Facing::Outward);

        if inner <= 0.0 || floor >= height {
            disc(&mut mesh, n, outer, height, Facing::Up);
            disc(&mut mesh, n, outer, 0.0, Facing::Down);
        } else {
            wall(&mut mesh, n, inner, floor, height, Facing::Inward);
            annulus(&mut mesh, n, inner, outer, height, Facing::Up);
            if params.closed_bottom {
                disc(&mut mesh, n, inner, floor, Facing::Up);
                disc(&mut mesh, n, outer, 0.0, Facing::Down);
            } else {
                annulus(&mut mesh, n, inner, outer, 0.0, Facing::Down);
            }
        }

        info!(
            height,
            outer_radius = outer,
            inner_radius = inner,
            closed_bottom = params.closed_bottom,
            triangles = mesh.triangle_count(),
            "tessellated cylinder"
        );
        Ok(mesh)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Facing {
    Outward,
    Inward,
    Up,
    Down,
}

fn rim_point(radius: f64, angle: f64, z: f64) -> [f64; 3] {
    [radius * angle.cos(), radius * angle.sin(), z]
}

fn angle(i: usize, n: usize) -> f64 {
    TAU * (i % n) as f64 / n as f64
}

/// Side wall between `z0` and `z1`. Outward walls face away from the axis.
fn wall(mesh: &mut RenderMesh, n: usize, radius: f64, z0: f64, z1: f64, facing: Facing) {
    let sign = if facing == Facing::Inward { -1.0 } else { 1.0 };
    let mut bottom = Vec::with_capacity(n);
    let mut top = Vec::with_capacity(n);
    for i in 0..n {
        let a = angle(i, n);
        let normal = [sign * a.cos(), sign * a.sin(), 0.0];
        bottom.push(mesh.add_vertex(rim_point(radius, a, z0), normal));
        top.push(mesh.add_vertex(rim_point(radius, a, z1), normal));
    }
    for i in 0..n {
        let j = (i + 1) % n;
        if facing == Facing::Inward {
            mesh.add_triangle(bottom[i], top[i], bottom[j]);
            mesh.add_triangle(top[i], top[j], bottom[j]);
        } else {
            mesh.add_triangle(bottom[i], bottom[j], top[i]);
            mesh.add_triangle(top[i], bottom[j], top[j]);
        }
    }
}

/// Flat ring between two radii at height `z`.
fn annulus(mesh: &mut RenderMesh, n: usize, inner: f64, outer: f64, z: f64, facing: Facing) {
    let normal = cap_normal(facing);
    let mut inner_ring = Vec::with_capacity(n);
    let mut outer_ring = Vec::with_capacity(n);
    for i in 0..n {
        let a = angle(i, n);
        inner_ring.push(mesh.add_vertex(rim_point(inner, a, z), normal));
        outer_ring.push(mesh.add_vertex(rim_point(outer, a, z), normal));
    }
    for i in 0..n {
        let j = (i + 1) % n;
        if facing == Facing::Up {
            mesh.add_triangle(inner_ring[i], outer_ring[i], outer_ring[j]);
            mesh.add_triangle(inner_ring[i], outer_ring[j], inner_ring[j]);
        } else {
            mesh.add_triangle(inner_ring[i], outer_ring[j], outer_ring[i]);
            mesh.add_triangle(inner_ring[i], inner_ring[j], outer_ring[j]);
        }
    }
}

/// Fan-triangulated disc at height `z`.
fn disc(mesh: &mut RenderMesh, n: usize, radius: f64, z: f64, facing: Facing) {
    let normal = cap_normal(facing);
    let center = mesh.add_vertex([0.0, 0.0, z], normal);
    let ring: Vec<u32> = (0..n)
        .map(|i| mesh.add_vertex(rim_point(radius, angle(i, n), z), normal))
        .collect();
    for i in 0..n {
        let j = (i + 1) % n;
        if facing == Facing::Up {
            mesh.add_triangle(center, ring[i], ring[j]);
        } else {
            mesh.add_triangle(center, ring[j], ring[i]);
        }
    }
}

fn cap_normal(facing: Facing) -> [f64; 3] {
    match facing {
        Facing::Up => [0.0, 0.0, 1.0],
        Facing::Down => [0.0, 0.0, -1.0],
        Facing::Outward | Facing::Inward => [0.0, 0.0, 0.0],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder(segments: usize) -> TessellatedBuilder {
        TessellatedBuilder::new(TessellationConfig { segments })
    }

    #[test]
    fn open_tube_triangle_count() {
        let mesh = builder(8)
            .build(&CylinderParams::new(50.0, 25.0, 3.0, false))
            .unwrap();
        // outer + inner walls (2n each) + two annuli (2n each)
        assert_eq!(mesh.triangle_count(), 8 * 8);
    }

    #[test]
    fn closed_cup_triangle_count() {
        let mesh = builder(8)
            .build(&CylinderParams::new(50.0, 25.0, 3.0, true))
            .unwrap();
        // outer wall, bore, rim annulus (2n each) + floor and base discs (n each)
        assert_eq!(mesh.triangle_count(), 2 * 8 * 3 + 8 * 2);
    }

    #[test]
    fn thick_wall_becomes_solid_slug() {
        let mesh = builder(8)
            .build(&CylinderParams::new(50.0, 25.0, 40.0, false))
            .unwrap();
        // outer wall + two discs, no bore
        assert_eq!(mesh.triangle_count(), 2 * 8 + 8 * 2);
    }

    #[test]
    fn bounds_match_parameters() {
        let mesh = builder(64)
            .build(&CylinderParams::new(80.0, 25.0, 3.0, true))
            .unwrap();
        let bounds = mesh.bounds().unwrap();
        assert!((bounds.max[2] - 80.0).abs() < 1e-4);
        assert!(bounds.min[2].abs() < 1e-4);
        assert!((bounds.max[0] - 25.0).abs() < 1e-4);
        assert!((bounds.min[0] + 25.0).abs() < 1e-4);
    }

    #[test]
    fn segments_are_raised_to_three() {
        assert_eq!(builder(0).segments(), 3);
    }

    #[test]
    fn rejects_non_positive_radius() {
        let err = builder(8)
            .build(&CylinderParams::new(50.0, 0.0, 3.0, true))
            .unwrap_err();
        assert!(matches!(err, KernelError::InvalidParams { .. }));
    }
}
