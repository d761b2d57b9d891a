use serde::{Deserialize, Serialize};
use tube_types::CylinderParams;

/// Download formats offered on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    ThreeMf,
    Stl,
}

/// Messages from the host page to the configurator.
/// Serialized as JSON with a `type` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum HostEvent {
    // -- Parameter inputs --
    /// Text typed into a numeric field; `name` is `height`, `outerRadius` or `wallThickness`.
    SetParam { name: String, text: String },
    SetClosedBottom { closed: bool },
    /// Ask for the current targets, e.g. to populate the form on start-up.
    GetParams,

    // -- Pointer --
    /// Press at canvas coordinates in CSS pixels.
    PointerDown { x: f64, y: f64 },
    PointerMove { x: f64 },
    PointerUp,
    PointerCancel,

    // -- Presets --
    LoadPreset { json: String },
    SavePreset {
        #[serde(default)]
        name: Option<String>,
    },

    // -- Export --
    /// Serialize the mesh on screen in the requested format.
    Export { format: ExportFormat },
}

/// Replies to the host page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BridgeReply {
    /// The event was handled. `pointer_tracking` says whether global
    /// move/up listeners should currently be attached.
    Ack { pointer_tracking: bool },

    /// Current parameter targets after the event, already clamped.
    Params {
        params: CylinderParams,
        filename: Option<String>,
    },

    /// Saved preset JSON, ready to be offered as a file.
    PresetReady { json: String },

    /// Serialized mesh, base64 encoded. For 3MF this is the bare model part;
    /// the host packages it the same way as the download link does.
    ExportReady {
        filename: String,
        mime_type: String,
        data_base64: String,
    },

    Error { message: String },
}
