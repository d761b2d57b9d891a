//! Scenario: scripted driver for end-to-end configurator tests.
//!
//! Wraps `wasm_bridge::dispatch()` so tests exercise the real message path,
//! with a [`MockKernel`], a [`ManualClock`] and recording fakes in place of
//! the browser. Time only moves when the scenario says so.

use std::rc::Rc;

use file_format::ThreeMfModelSerializer;
use preview_engine::{Collaborators, FrameReport, ManualClock, PreviewConfig, ReplacingLink};
use tube_kernel::{MockKernel, MockMode};
use tube_types::{CylinderParams, Orientation};
use wasm_bridge::{dispatch, dispatch_json, BridgeReply, BridgeState, HostEvent};

use crate::fakes::{FakeViewport, RecordingLink};
use crate::helpers::HarnessError;

/// Length of one simulated display frame.
pub const FRAME_MS: u64 = 16;

/// Upper bound on frames spent waiting for the pipeline to go quiet.
const SETTLE_FRAME_LIMIT: usize = 500;

pub struct Scenario {
    pub state: BridgeState,
    pub kernel: MockKernel,
    pub clock: ManualClock,
    pub viewport: FakeViewport,
    pub link: RecordingLink,
    replies: Vec<(HostEvent, BridgeReply)>,
}

impl Scenario {
    /// No animation and a kernel that waits to be resolved by the test.
    pub fn mock() -> Self {
        Self::with_config(PreviewConfig::instant(), MockMode::Manual)
    }

    /// No animation and a kernel that answers inside the request.
    pub fn immediate() -> Self {
        Self::with_config(PreviewConfig::instant(), MockMode::Immediate)
    }

    /// Default (eased) animation with a manual kernel.
    pub fn animated() -> Self {
        Self::with_config(PreviewConfig::default(), MockMode::Manual)
    }

    pub fn with_config(config: PreviewConfig, mode: MockMode) -> Self {
        let kernel = MockKernel::with_mode(mode);
        let clock = ManualClock::new();
        let viewport = FakeViewport::new();
        let link = RecordingLink::new();
        let collaborators = Collaborators {
            kernel: Box::new(kernel.clone()),
            viewport: Box::new(viewport.clone()),
            link: Box::new(ReplacingLink::new(link.clone())),
            serializer: Box::new(ThreeMfModelSerializer),
            clock: Rc::new(clock.clone()),
        };
        let state = match BridgeState::new(config, collaborators) {
            Ok(state) => state,
            Err(e) => panic!("scenario configuration rejected: {e}"),
        };
        Self {
            state,
            kernel,
            clock,
            viewport,
            link,
            replies: Vec::new(),
        }
    }

    // ── Messages ────────────────────────────────────────────────────────

    /// Dispatch one event and record the reply.
    pub fn send(&mut self, event: HostEvent) -> BridgeReply {
        let reply = dispatch(&mut self.state, event.clone());
        self.replies.push((event, reply.clone()));
        reply
    }

    /// Dispatch a raw JSON message, as the page would.
    pub fn send_json(&mut self, json: &str) -> String {
        dispatch_json(&mut self.state, json)
    }

    pub fn set_param(&mut self, name: &str, text: &str) -> BridgeReply {
        self.send(HostEvent::SetParam {
            name: name.to_string(),
            text: text.to_string(),
        })
    }

    pub fn set_closed(&mut self, closed: bool) -> BridgeReply {
        self.send(HostEvent::SetClosedBottom { closed })
    }

    // ── Time ────────────────────────────────────────────────────────────

    /// Run one frame at the current time.
    pub fn tick(&mut self) -> FrameReport {
        self.state.coordinator.tick()
    }

    /// Move the clock forward, then run one frame.
    pub fn advance_ms(&mut self, ms: u64) -> FrameReport {
        self.clock.advance_ms(ms);
        self.tick()
    }

    /// Run frames for `total_ms` of simulated time.
    pub fn run_ms(&mut self, total_ms: u64) -> Vec<FrameReport> {
        let frames = total_ms.div_ceil(FRAME_MS);
        (0..frames).map(|_| self.advance_ms(FRAME_MS)).collect()
    }

    /// Resolve kernel requests and run frames until nothing is animating,
    /// loading or waiting to load.
    pub fn settle(&mut self) -> Result<usize, HarnessError> {
        for frame in 0..SETTLE_FRAME_LIMIT {
            self.kernel.resolve_all();
            let report = self.advance_ms(FRAME_MS);
            let scheduler = self.state.coordinator.scheduler();
            let quiet = !report.params_changed
                && !report.rotation_changed
                && report.issued_seq.is_none()
                && report.applied_seq.is_none()
                && !scheduler.needs_reload()
                && !scheduler.is_loading()
                && self.kernel.outstanding() == 0;
            if quiet {
                return Ok(frame + 1);
            }
        }
        Err(HarnessError::NotSettled {
            frames: SETTLE_FRAME_LIMIT,
        })
    }

    // ── Pointer ─────────────────────────────────────────────────────────

    /// Press and release on the part within the tap window.
    pub fn tap(&mut self) -> BridgeReply {
        let (x, y) = self.viewport.part_center();
        self.send(HostEvent::PointerDown { x, y });
        self.clock.advance_ms(50);
        self.send(HostEvent::PointerUp)
    }

    /// Press on the part, move horizontally by `dx` over `duration_ms`
    /// (one frame per step), then release.
    pub fn drag(&mut self, dx: f64, duration_ms: u64) -> BridgeReply {
        let (x, y) = self.viewport.part_center();
        self.send(HostEvent::PointerDown { x, y });
        let steps = duration_ms.div_ceil(FRAME_MS).max(1);
        for step in 1..=steps {
            let at = x + dx * step as f64 / steps as f64;
            self.send(HostEvent::PointerMove { x: at });
            self.advance_ms(FRAME_MS);
        }
        self.send(HostEvent::PointerUp)
    }

    // ── Inspection ──────────────────────────────────────────────────────

    pub fn orientation(&self) -> Orientation {
        self.state.coordinator.orientation()
    }

    pub fn rotation_units(&self) -> f64 {
        self.state.coordinator.rotation_units()
    }

    pub fn params_target(&self) -> CylinderParams {
        self.state.coordinator.params_target()
    }

    pub fn params_current(&self) -> CylinderParams {
        self.state.coordinator.params_current()
    }

    pub fn pointer_tracking(&self) -> bool {
        self.state.pointer_tracking()
    }

    pub fn kernel_requests(&self) -> Vec<CylinderParams> {
        self.kernel.requests()
    }

    pub fn replies(&self) -> &[(HostEvent, BridgeReply)] {
        &self.replies
    }

    /// Every error reply received so far.
    pub fn errors(&self) -> Vec<String> {
        self.replies
            .iter()
            .filter_map(|(_, reply)| match reply {
                BridgeReply::Error { message } => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn assert_no_errors(&self) -> Result<(), HarnessError> {
        match self.errors().as_slice() {
            [] => Ok(()),
            errors => Err(HarnessError::DispatchError {
                message: errors.join("; "),
            }),
        }
    }
}
