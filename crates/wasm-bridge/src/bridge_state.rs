use std::rc::Rc;

use file_format::{ExportError, LoadError, ThreeMfModelSerializer};
use preview_engine::{
    Clock, Collaborators, DownloadLink, FrameCoordinator, PreviewConfig, PreviewError, Viewport,
};
use tube_kernel::{InlineKernel, TessellatedBuilder};

use crate::messages::BridgeReply;

/// Name written into presets saved without an explicit one.
pub const DEFAULT_PRESET_NAME: &str = "Cylinder";

/// Errors from the bridge layer.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("failed to parse message: {message}")]
    Parse { message: String },

    #[error("unknown parameter: {name}")]
    UnknownParam { name: String },

    #[error(transparent)]
    Config(#[from] PreviewError),

    #[error("preset: {0}")]
    Preset(#[from] LoadError),

    #[error("export failed: {0}")]
    Export(#[from] ExportError),

    #[error("no mesh has been generated yet")]
    NoMesh,

    #[error("serialization failed: {message}")]
    Serialize { message: String },
}

/// The configurator as seen from the host page.
pub struct BridgeState {
    pub coordinator: FrameCoordinator,
    /// Name of the last loaded preset, reused when saving.
    pub preset_name: String,
}

impl BridgeState {
    pub fn new(config: PreviewConfig, collaborators: Collaborators) -> Result<Self, BridgeError> {
        Ok(Self {
            coordinator: FrameCoordinator::new(config, collaborators)?,
            preset_name: DEFAULT_PRESET_NAME.to_string(),
        })
    }

    /// Wire the built-in tessellating kernel and the 3MF serializer to the
    /// given host objects.
    pub fn with_builtin_kernel(
        config: PreviewConfig,
        viewport: Box<dyn Viewport>,
        link: Box<dyn DownloadLink>,
        clock: Rc<dyn Clock>,
    ) -> Result<Self, BridgeError> {
        let kernel = InlineKernel::new(TessellatedBuilder::new(config.tessellation));
        let collaborators = Collaborators {
            kernel: Box::new(kernel),
            viewport,
            link,
            serializer: Box::new(ThreeMfModelSerializer),
            clock,
        };
        Self::new(config, collaborators)
    }

    /// Parse a host-supplied configuration. Missing fields take their defaults.
    pub fn parse_config(json: Option<&str>) -> Result<PreviewConfig, BridgeError> {
        let config = match json.map(str::trim).filter(|s| !s.is_empty()) {
            Some(json) => serde_json::from_str(json).map_err(|e| BridgeError::Parse {
                message: e.to_string(),
            })?,
            None => PreviewConfig::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn pointer_tracking(&self) -> bool {
        self.coordinator.tracking_cell().latest()
    }

    pub fn ack(&self) -> BridgeReply {
        BridgeReply::Ack {
            pointer_tracking: self.pointer_tracking(),
        }
    }

    pub fn params_reply(&self) -> BridgeReply {
        BridgeReply::Params {
            params: self.coordinator.params_target(),
            filename: self.coordinator.current_filename().map(str::to_string),
        }
    }
}
