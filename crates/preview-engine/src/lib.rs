//! Live preview pipeline for the cylinder configurator.
//!
//! Parameter edits land in [`cell::ReactiveCell`]s, are smoothed by
//! [`animate::Animated`] quantities, and trigger geometry rebuilds through the
//! single-flight [`scheduler::RegenScheduler`]. Pointer input drives the
//! [`gesture::GestureMachine`], whose rotation target is animated the same
//! way. [`coordinator::FrameCoordinator`] ties it together once per frame.

pub mod animate;
pub mod cell;
pub mod clock;
pub mod config;
pub mod coordinator;
pub mod download;
pub mod error;
pub mod gesture;
pub mod host;
pub mod inputs;
pub mod scheduler;

pub use animate::{Animated, Easing, Transition};
pub use cell::{zip2, zip4, ListenerId, ReactiveCell};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{AnimationConfig, PreviewConfig, SchedulerConfig, ViewConfig};
pub use coordinator::{Collaborators, FrameCoordinator, FrameReport, RotationTarget};
pub use download::{ObjectUrls, ReplacingLink};
pub use error::PreviewError;
pub use gesture::{GestureConfig, GestureMachine, GesturePosition};
pub use host::{CameraFraming, DownloadLink, Rgba, Viewport};
pub use inputs::{InputOutcome, NumericInput, ToggleInput};
pub use scheduler::{RegenResult, RegenScheduler};
