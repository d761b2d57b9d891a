use serde::{Deserialize, Serialize};

/// Indexed triangle mesh handed to the renderer and the serializers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderMesh {
    /// Flat array of vertex positions [x0, y0, z0, x1, y1, z1, ...].
    pub vertices: Vec<f32>,
    /// Flat array of vertex normals, one triple per vertex.
    pub normals: Vec<f32>,
    /// Triangle indices into the vertex array, counter-clockwise seen from outside.
    pub indices: Vec<u32>,
}

impl RenderMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn add_vertex(&mut self, position: [f64; 3], normal: [f64; 3]) -> u32 {
        let idx = self.vertex_count() as u32;
        self.vertices.extend(position.iter().map(|&c| c as f32));
        self.normals.extend(normal.iter().map(|&c| c as f32));
        idx
    }

    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.extend_from_slice(&[i0, i1, i2]);
    }

    pub fn position(&self, index: u32) -> [f32; 3] {
        let i = index as usize * 3;
        [self.vertices[i], self.vertices[i + 1], self.vertices[i + 2]]
    }

    /// Axis-aligned bounds of all vertices, or `None` for an empty mesh.
    pub fn bounds(&self) -> Option<Bounds> {
        let mut chunks = self.vertices.chunks_exact(3);
        let first = chunks.next()?;
        let mut bounds = Bounds {
            min: [first[0] as f64, first[1] as f64, first[2] as f64],
            max: [first[0] as f64, first[1] as f64, first[2] as f64],
        };
        for p in chunks {
            for axis in 0..3 {
                bounds.min[axis] = bounds.min[axis].min(p[axis] as f64);
                bounds.max[axis] = bounds.max[axis].max(p[axis] as f64);
            }
        }
        Some(bounds)
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl Bounds {
    pub fn center(&self) -> [f64; 3] {
        [
            (self.min[0] + self.max[0]) / 2.0,
            (self.min[1] + self.max[1]) / 2.0,
            (self.min[2] + self.max[2]) / 2.0,
        ]
    }

    pub fn size(&self) -> [f64; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }

    /// Radius of the bounding sphere around `center()`.
    pub fn radius(&self) -> f64 {
        let [x, y, z] = self.size();
        (x * x + y * y + z * z).sqrt() / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_of_single_triangle() {
        let mut mesh = RenderMesh::new();
        let a = mesh.add_vertex([0.0, 0.0, 0.0], [0.0, 0.0, 1.0]);
        let b = mesh.add_vertex([2.0, 0.0, 0.0], [0.0, 0.0, 1.0]);
        let c = mesh.add_vertex([0.0, 4.0, 0.0], [0.0, 0.0, 1.0]);
        mesh.add_triangle(a, b, c);

        let bounds = mesh.bounds().unwrap();
        assert_eq!(bounds.min, [0.0, 0.0, 0.0]);
        assert_eq!(bounds.max, [2.0, 4.0, 0.0]);
        assert_eq!(bounds.center(), [1.0, 2.0, 0.0]);
        assert_eq!(mesh.triangle_count(), 1);
    }

    #[test]
    fn empty_mesh_has_no_bounds() {
        assert!(RenderMesh::new().bounds().is_none());
        assert!(RenderMesh::new().is_empty());
    }
}
