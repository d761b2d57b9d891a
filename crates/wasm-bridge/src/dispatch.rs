use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use file_format::{load_preset, save_preset, MeshSerializer, StlSerializer, ThreeMfModelSerializer};
use tracing::debug;
use tube_types::ParamKind;

use crate::bridge_state::{BridgeError, BridgeState};
use crate::messages::{BridgeReply, ExportFormat, HostEvent};

/// Dispatch a host event and return the reply.
///
/// Errors never escape: they become [`BridgeReply::Error`].
pub fn dispatch(state: &mut BridgeState, event: HostEvent) -> BridgeReply {
    match handle_event(state, event) {
        Ok(reply) => reply,
        Err(e) => BridgeReply::Error {
            message: e.to_string(),
        },
    }
}

/// JSON in, JSON out. This is what the page's message handler calls.
pub fn dispatch_json(state: &mut BridgeState, json_input: &str) -> String {
    let reply = match serde_json::from_str::<HostEvent>(json_input) {
        Ok(event) => dispatch(state, event),
        Err(e) => BridgeReply::Error {
            message: BridgeError::Parse {
                message: e.to_string(),
            }
            .to_string(),
        },
    };
    serde_json::to_string(&reply).unwrap_or_else(|e| {
        format!(
            r#"{{"type":"Error","message":"Serialization failed: {}"}}"#,
            e
        )
    })
}

fn handle_event(state: &mut BridgeState, event: HostEvent) -> Result<BridgeReply, BridgeError> {
    match event {
        // -- Parameter inputs --
        HostEvent::SetParam { name, text } => {
            let kind = ParamKind::from_name(&name).ok_or(BridgeError::UnknownParam { name })?;
            let outcome = state.coordinator.set_param_text(kind, &text);
            debug!(param = kind.name(), ?outcome, "parameter edit");
            Ok(state.params_reply())
        }

        HostEvent::SetClosedBottom { closed } => {
            state.coordinator.set_closed_bottom(closed);
            Ok(state.params_reply())
        }

        HostEvent::GetParams => Ok(state.params_reply()),

        // -- Pointer --
        HostEvent::PointerDown { x, y } => {
            state.coordinator.pointer_down(x, y);
            Ok(state.ack())
        }

        HostEvent::PointerMove { x } => {
            state.coordinator.pointer_move(x);
            Ok(state.ack())
        }

        HostEvent::PointerUp => {
            state.coordinator.pointer_up();
            Ok(state.ack())
        }

        HostEvent::PointerCancel => {
            state.coordinator.pointer_cancel();
            Ok(state.ack())
        }

        // -- Presets --
        HostEvent::LoadPreset { json } => {
            let limits = state.coordinator.config().limits;
            let preset = load_preset(&json, &limits)?;
            state.coordinator.load_params(preset.params);
            state.preset_name = preset.name;
            Ok(state.params_reply())
        }

        HostEvent::SavePreset { name } => {
            if let Some(name) = name {
                state.preset_name = name;
            }
            let json = save_preset(&state.preset_name, &state.coordinator.params_target())
                .map_err(|e| BridgeError::Serialize {
                    message: e.to_string(),
                })?;
            Ok(BridgeReply::PresetReady { json })
        }

        // -- Export --
        HostEvent::Export { format } => {
            let serializer: &dyn MeshSerializer = match format {
                ExportFormat::ThreeMf => &ThreeMfModelSerializer,
                ExportFormat::Stl => &StlSerializer,
            };
            let mesh = state.coordinator.current_mesh().ok_or(BridgeError::NoMesh)?;
            let filename = state.coordinator.current_filename().unwrap_or("cylinder.3mf");
            let filename = with_extension(filename, serializer.extension());
            let artifact = serializer.artifact(mesh, filename)?;
            Ok(BridgeReply::ExportReady {
                filename: artifact.filename,
                mime_type: artifact.mime_type.to_string(),
                data_base64: STANDARD.encode(&artifact.bytes),
            })
        }
    }
}

/// Replace the extension of `filename`, or append one if it has none.
fn with_extension(filename: &str, extension: &str) -> String {
    let stem = match filename.rfind('.') {
        Some(dot) => &filename[..dot],
        None => filename,
    };
    format!("{stem}.{extension}")
}
