use serde::Deserialize;
use serde_json::Value;
use tube_types::{CylinderParams, ParamLimits};

use crate::errors::LoadError;
use crate::save::{FORMAT_ID, FORMAT_VERSION};

/// The top-level preset structure for deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct PresetFileRaw {
    pub format: String,
    pub version: u32,
    #[serde(default)]
    pub name: String,
    pub params: Value,
}

/// A preset after validation, migration and clamping.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedPreset {
    pub name: String,
    pub params: CylinderParams,
}

/// Deserialize a preset from a JSON string.
///
/// Validates the format identifier and version, migrates older layouts and
/// clamps every numeric field into `limits` (presets are user-editable files).
pub fn load_preset(json: &str, limits: &ParamLimits) -> Result<LoadedPreset, LoadError> {
    let raw: PresetFileRaw =
        serde_json::from_str(json).map_err(|e| LoadError::ParseError(e.to_string()))?;

    if raw.format != FORMAT_ID {
        return Err(LoadError::UnknownFormat(raw.format));
    }

    if raw.version > FORMAT_VERSION {
        return Err(LoadError::FutureVersion {
            file_version: raw.version,
            supported_version: FORMAT_VERSION,
        });
    }

    let params = crate::migrate::migrate(raw.params, raw.version, FORMAT_VERSION)?;
    let params: CylinderParams =
        serde_json::from_value(params).map_err(|e| LoadError::ParseError(e.to_string()))?;

    let clamped = limits.clamp(params);
    if clamped != params {
        tracing::debug!(?params, ?clamped, "preset values clamped into range");
    }

    Ok(LoadedPreset {
        name: raw.name,
        params: clamped,
    })
}
