pub mod mesh;
pub mod orientation;
pub mod params;

pub use mesh::*;
pub use orientation::*;
pub use params::*;
