//! 3MF core model part (`3D/3dmodel.model`).
//!
//! Produces the XML document only. The host page's `packageDownload` call
//! wraps it in the OPC package before any download URL is created.

use std::collections::HashMap;
use std::fmt::Write;

use tube_types::RenderMesh;

use crate::errors::ExportError;
use crate::serializer::{check_mesh, MeshSerializer};

const CORE_NAMESPACE: &str = "http://schemas.microsoft.com/3dmanufacturing/core/2015/02";

/// Writes the mesh as a single-object 3MF model in millimetres.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreeMfModelSerializer;

impl MeshSerializer for ThreeMfModelSerializer {
    fn mime_type(&self) -> &'static str {
        "model/3mf"
    }

    fn extension(&self) -> &'static str {
        "3mf"
    }

    fn serialize(&self, mesh: &RenderMesh) -> Result<Vec<u8>, ExportError> {
        check_mesh(mesh)?;
        let (positions, triangles) = weld(mesh);

        let mut xml = String::with_capacity(64 + positions.len() * 48 + triangles.len() * 40);
        // Writing into a String cannot fail.
        let _ = writeln!(xml, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        let _ = writeln!(
            xml,
            r#"<model unit="millimeter" xml:lang="en-US" xmlns="{}">"#,
            CORE_NAMESPACE
        );
        xml.push_str(" <resources>\n  <object id=\"1\" type=\"model\">\n   <mesh>\n    <vertices>\n");
        for [x, y, z] in &positions {
            let _ = writeln!(xml, r#"     <vertex x="{x}" y="{y}" z="{z}"/>"#);
        }
        xml.push_str("    </vertices>\n    <triangles>\n");
        for [a, b, c] in &triangles {
            let _ = writeln!(xml, r#"     <triangle v1="{a}" v2="{b}" v3="{c}"/>"#);
        }
        xml.push_str("    </triangles>\n   </mesh>\n  </object>\n </resources>\n");
        xml.push_str(" <build>\n  <item objectid=\"1\"/>\n </build>\n</model>\n");

        Ok(xml.into_bytes())
    }
}

/// Merge vertices with identical positions so the model is an indexed manifold.
/// Per-surface normals are dropped; 3MF does not store them.
fn weld(mesh: &RenderMesh) -> (Vec<[f32; 3]>, Vec<[u32; 3]>) {
    let mut lookup: HashMap<[u32; 3], u32> = HashMap::new();
    let mut positions = Vec::new();
    let mut remap = Vec::with_capacity(mesh.vertex_count());

    for p in mesh.vertices.chunks_exact(3) {
        // -0.0 and 0.0 must land on the same vertex
        let p = [p[0] + 0.0, p[1] + 0.0, p[2] + 0.0];
        let key = [p[0].to_bits(), p[1].to_bits(), p[2].to_bits()];
        let index = *lookup.entry(key).or_insert_with(|| {
            positions.push(p);
            (positions.len() - 1) as u32
        });
        remap.push(index);
    }

    let triangles = mesh
        .indices
        .chunks_exact(3)
        .map(|t| {
            [
                remap[t[0] as usize],
                remap[t[1] as usize],
                remap[t[2] as usize],
            ]
        })
        .filter(|[a, b, c]| a != b && b != c && a != c)
        .collect();

    (positions, triangles)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> RenderMesh {
        let mut mesh = RenderMesh::new();
        let n = [0.0, 0.0, 1.0];
        let a = mesh.add_vertex([0.0, 0.0, 0.0], n);
        let b = mesh.add_vertex([1.0, 0.0, 0.0], n);
        let c = mesh.add_vertex([1.0, 1.0, 0.0], n);
        mesh.add_triangle(a, b, c);
        // second triangle re-emits two of the same positions
        let d = mesh.add_vertex([0.0, 0.0, 0.0], n);
        let e = mesh.add_vertex([1.0, 1.0, 0.0], n);
        let f = mesh.add_vertex([0.0, 1.0, 0.0], n);
        mesh.add_triangle(d, e, f);
        mesh
    }

    #[test]
    fn welds_duplicate_positions() {
        let (positions, triangles) = weld(&quad());
        assert_eq!(positions.len(), 4);
        assert_eq!(triangles, vec![[0, 1, 2], [0, 2, 3]]);
    }

    #[test]
    fn writes_model_document() {
        let bytes = ThreeMfModelSerializer.serialize(&quad()).unwrap();
        let xml = String::from_utf8(bytes).unwrap();
        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains(r#"unit="millimeter""#));
        assert_eq!(xml.matches("<vertex ").count(), 4);
        assert_eq!(xml.matches("<triangle ").count(), 2);
        assert!(xml.contains(r#"<item objectid="1"/>"#));
    }

    #[test]
    fn rejects_empty_mesh() {
        assert_eq!(
            ThreeMfModelSerializer.serialize(&RenderMesh::new()),
            Err(ExportError::EmptyMesh)
        );
    }
}
