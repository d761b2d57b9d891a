use serde::Serialize;
use tube_types::CylinderParams;

/// Format identifier written into every preset.
pub const FORMAT_ID: &str = "tube-preset";

/// Current preset format version.
pub const FORMAT_VERSION: u32 = 1;

/// The top-level preset structure.
#[derive(Debug, Clone, Serialize)]
pub struct PresetFile<'a> {
    /// Format identifier.
    pub format: &'a str,
    /// Format version number.
    pub version: u32,
    /// Human-readable preset name.
    pub name: &'a str,
    /// The cylinder parameters.
    pub params: CylinderParams,
}

/// Serialize a preset to a pretty-printed JSON string.
pub fn save_preset(name: &str, params: &CylinderParams) -> Result<String, serde_json::Error> {
    let file = PresetFile {
        format: FORMAT_ID,
        version: FORMAT_VERSION,
        name,
        params: *params,
    };
    serde_json::to_string_pretty(&file)
}
