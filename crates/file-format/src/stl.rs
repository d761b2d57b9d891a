use tube_types::RenderMesh;

use crate::errors::ExportError;
use crate::serializer::{check_mesh, MeshSerializer};

const HEADER: &[u8] = b"Tube configurator STL export";

/// Binary STL, for slicers that do not read 3MF.
///
/// Binary STL layout:
/// - 80 bytes: header
/// - 4 bytes: u32 LE triangle count
/// - Per triangle (50 bytes each):
///   - 12 bytes: normal vector (3 × f32 LE)
///   - 36 bytes: 3 vertices (3 × 3 × f32 LE)
///   - 2 bytes: attribute byte count (0u16)
#[derive(Debug, Clone, Copy, Default)]
pub struct StlSerializer;

impl MeshSerializer for StlSerializer {
    fn mime_type(&self) -> &'static str {
        "model/stl"
    }

    fn extension(&self) -> &'static str {
        "stl"
    }

    fn serialize(&self, mesh: &RenderMesh) -> Result<Vec<u8>, ExportError> {
        check_mesh(mesh)?;
        let tri_count = mesh.triangle_count();
        let mut buf = Vec::with_capacity(84 + tri_count * 50);

        buf.extend_from_slice(HEADER);
        buf.resize(80, 0);
        buf.extend_from_slice(&(tri_count as u32).to_le_bytes());

        for t in mesh.indices.chunks_exact(3) {
            let v0 = mesh.position(t[0]);
            let v1 = mesh.position(t[1]);
            let v2 = mesh.position(t[2]);

            for c in &face_normal(v0, v1, v2) {
                buf.extend_from_slice(&c.to_le_bytes());
            }
            for v in &[v0, v1, v2] {
                for c in v {
                    buf.extend_from_slice(&c.to_le_bytes());
                }
            }
            buf.extend_from_slice(&0u16.to_le_bytes());
        }

        Ok(buf)
    }
}

fn face_normal(v0: [f32; 3], v1: [f32; 3], v2: [f32; 3]) -> [f32; 3] {
    let e1 = [v1[0] - v0[0], v1[1] - v0[1], v1[2] - v0[2]];
    let e2 = [v2[0] - v0[0], v2[1] - v0[1], v2[2] - v0[2]];
    let n = [
        e1[1] * e2[2] - e1[2] * e2[1],
        e1[2] * e2[0] - e1[0] * e2[2],
        e1[0] * e2[1] - e1[1] * e2[0],
    ];
    let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
    if len > 1e-12 {
        [n[0] / len, n[1] / len, n[2] / len]
    } else {
        [0.0, 0.0, 0.0]
    }
}
