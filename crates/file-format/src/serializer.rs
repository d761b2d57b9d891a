use tube_types::RenderMesh;

use crate::errors::ExportError;

/// A serialized file ready to be offered for download.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub filename: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Turns a mesh into the bytes of a printable file.
pub trait MeshSerializer {
    fn mime_type(&self) -> &'static str;

    /// File extension without the dot.
    fn extension(&self) -> &'static str;

    fn serialize(&self, mesh: &RenderMesh) -> Result<Vec<u8>, ExportError>;

    /// Serialize and attach the download name.
    fn artifact(&self, mesh: &RenderMesh, filename: String) -> Result<Artifact, ExportError> {
        Ok(Artifact {
            filename,
            mime_type: self.mime_type(),
            bytes: self.serialize(mesh)?,
        })
    }
}

/// Reject meshes a slicer could not use.
pub(crate) fn check_mesh(mesh: &RenderMesh) -> Result<(), ExportError> {
    if mesh.is_empty() {
        return Err(ExportError::EmptyMesh);
    }
    let vertex_count = mesh.vertex_count();
    if let Some(&index) = mesh.indices.iter().find(|&&i| i as usize >= vertex_count) {
        return Err(ExportError::IndexOutOfRange {
            index,
            vertex_count,
        });
    }
    Ok(())
}
