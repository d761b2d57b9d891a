//! Browser glue for the cylinder configurator.
//!
//! The host page forwards UI events as JSON [`messages::HostEvent`]s and
//! receives [`messages::BridgeReply`]s. On `wasm32` the [`wasm_api`] module
//! also owns the animation-frame loop and the JavaScript-backed viewport.

pub mod bridge_state;
pub mod dispatch;
pub mod messages;

#[cfg(target_arch = "wasm32")]
pub mod wasm_api;

pub use bridge_state::{BridgeError, BridgeState};
pub use dispatch::{dispatch, dispatch_json};
pub use messages::{BridgeReply, ExportFormat, HostEvent};
