pub mod errors;
pub mod filename;
pub mod load;
pub mod migrate;
pub mod save;
pub mod serializer;
pub mod stl;
pub mod three_mf;

pub use errors::{ExportError, LoadError};
pub use filename::artifact_filename;
pub use load::load_preset;
pub use save::{save_preset, FORMAT_ID, FORMAT_VERSION};
pub use serializer::{Artifact, MeshSerializer};
pub use stl::StlSerializer;
pub use three_mf::ThreeMfModelSerializer;
