//! Test harness for the cylinder configurator.
//!
//! Drives the real bridge dispatch path against deterministic fakes so whole
//! interactions (edits, taps, drags, slow kernels) can be scripted frame by
//! frame.
//!
//! # Key Components
//!
//! - [`Scenario`]: scripted driver over `wasm_bridge::dispatch`
//! - [`fakes`]: recording viewport and download link
//! - [`oracle`]: mesh checks returning pass/fail verdicts
//! - [`assertions`]: assertion helpers with diagnostics

pub mod assertions;
pub mod fakes;
pub mod helpers;
pub mod oracle;
pub mod scenario;

pub use fakes::{FakeViewport, RecordingLink};
pub use helpers::HarnessError;
pub use oracle::OracleVerdict;
pub use scenario::Scenario;
