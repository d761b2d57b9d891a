//! Single-flight geometry regeneration.
//!
//! At most one kernel request is outstanding at a time. Parameter changes
//! that arrive while a request is in flight only set `needs_reload`; the
//! next request starts once the outstanding one settles, or once it has been
//! outstanding longer than the stuck-load timeout.
//!
//! Requests carry increasing sequence numbers. A result is applied only if
//! its sequence is newer than the last applied one, so a straggler that
//! resolves after a request issued past the timeout is discarded.

use std::sync::mpsc::{Receiver, Sender, TryRecvError};

use file_format::artifact_filename;
use tracing::{debug, info, warn};
use tube_kernel::{completion_channel, Completion, CylinderParams, Delivery, RenderMesh, SolidKernel};
use web_time::Instant;

use crate::config::SchedulerConfig;

/// A mesh ready to be shown, plus the file name it should download as.
#[derive(Debug, Clone)]
pub struct RegenResult {
    pub seq: u64,
    pub params: CylinderParams,
    pub mesh: RenderMesh,
    pub filename: String,
}

#[derive(Debug)]
pub struct RegenScheduler {
    config: SchedulerConfig,
    needs_reload: bool,
    load_started_at: Option<Instant>,
    next_seq: u64,
    latest_issued: u64,
    last_applied: u64,
    tx: Sender<Delivery>,
    rx: Receiver<Delivery>,
}

impl RegenScheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        let (tx, rx) = completion_channel();
        Self {
            config,
            needs_reload: false,
            load_started_at: None,
            next_seq: 1,
            latest_issued: 0,
            last_applied: 0,
            tx,
            rx,
        }
    }

    pub fn mark_needs_reload(&mut self) {
        self.needs_reload = true;
    }

    pub fn needs_reload(&self) -> bool {
        self.needs_reload
    }

    /// True while the most recently issued request has not settled.
    pub fn is_loading(&self) -> bool {
        self.load_started_at.is_some()
    }

    pub fn latest_issued(&self) -> u64 {
        self.latest_issued
    }

    pub fn last_applied(&self) -> u64 {
        self.last_applied
    }

    /// Issue a request for `params` if one is wanted and the single-flight
    /// gate allows it. Returns the new request's sequence number.
    pub fn start_reload_if_due(
        &mut self,
        now: Instant,
        params: CylinderParams,
        kernel: &mut dyn SolidKernel,
    ) -> Option<u64> {
        if !self.needs_reload {
            return None;
        }
        if let Some(started) = self.load_started_at {
            let waited = now.saturating_duration_since(started);
            if waited <= self.config.stuck_load_timeout() {
                return None;
            }
            warn!(
                seq = self.latest_issued,
                waited_ms = waited.as_millis() as u64,
                "kernel request outstanding past timeout; issuing another"
            );
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        self.latest_issued = seq;
        self.needs_reload = false;
        self.load_started_at = Some(now);
        debug!(
            seq,
            height = params.height,
            outer_radius = params.outer_radius,
            wall_thickness = params.wall_thickness,
            closed_bottom = params.closed_bottom,
            "kernel request issued"
        );
        kernel.generate_solid(params, Completion::new(seq, params, self.tx.clone()));
        Some(seq)
    }

    /// Drain settled requests. Returns the newest result not yet applied.
    pub fn poll(&mut self) -> Option<RegenResult> {
        let mut fresh = None;
        loop {
            let delivery = match self.rx.try_recv() {
                Ok(delivery) => delivery,
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            };
            if delivery.seq == self.latest_issued {
                self.load_started_at = None;
            }
            match delivery.result {
                Err(error) => {
                    warn!(seq = delivery.seq, %error, "kernel request failed");
                }
                Ok(mesh) if delivery.seq > self.last_applied => {
                    self.last_applied = delivery.seq;
                    let filename = artifact_filename(&delivery.params);
                    info!(
                        seq = delivery.seq,
                        triangles = mesh.triangle_count(),
                        filename = %filename,
                        "kernel result applied"
                    );
                    fresh = Some(RegenResult {
                        seq: delivery.seq,
                        params: delivery.params,
                        mesh,
                        filename,
                    });
                }
                Ok(_) => {
                    debug!(
                        seq = delivery.seq,
                        last_applied = self.last_applied,
                        "stale kernel result discarded"
                    );
                }
            }
        }
        fresh
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tube_kernel::{KernelError, MockKernel};

    use super::*;

    fn params(height: f64) -> CylinderParams {
        CylinderParams::new(height, 25.0, 3.0, true)
    }

    fn scheduler() -> RegenScheduler {
        RegenScheduler::new(SchedulerConfig::default())
    }

    #[test]
    fn idle_scheduler_issues_nothing() {
        let mut kernel = MockKernel::new();
        let mut sched = scheduler();
        assert_eq!(sched.start_reload_if_due(Instant::now(), params(50.0), &mut kernel), None);
        assert_eq!(kernel.request_count(), 0);
    }

    #[test]
    fn single_flight_until_settled() {
        let mut kernel = MockKernel::new();
        let mut sched = scheduler();
        let t0 = Instant::now();

        sched.mark_needs_reload();
        assert_eq!(sched.start_reload_if_due(t0, params(50.0), &mut kernel), Some(1));
        sched.mark_needs_reload();
        assert_eq!(sched.start_reload_if_due(t0 + Duration::from_millis(50), params(60.0), &mut kernel), None);
        assert_eq!(kernel.request_count(), 1);

        assert!(kernel.resolve_next().is_some());
        let result = sched.poll().map(|r| r.seq);
        assert_eq!(result, Some(1));
        assert!(!sched.is_loading());

        assert_eq!(sched.start_reload_if_due(t0 + Duration::from_millis(60), params(60.0), &mut kernel), Some(2));
        assert_eq!(kernel.last_request().map(|p| p.height), Some(60.0));
    }

    #[test]
    fn stuck_load_timeout_allows_second_request() {
        let mut kernel = MockKernel::new();
        let mut sched = scheduler();
        let t0 = Instant::now();

        sched.mark_needs_reload();
        sched.start_reload_if_due(t0, params(50.0), &mut kernel);
        sched.mark_needs_reload();
        assert_eq!(sched.start_reload_if_due(t0 + Duration::from_millis(100), params(70.0), &mut kernel), None);
        assert_eq!(sched.start_reload_if_due(t0 + Duration::from_millis(101), params(70.0), &mut kernel), Some(2));
        assert_eq!(kernel.outstanding(), 2);
    }

    #[test]
    fn straggler_after_newer_result_is_discarded() {
        let mut kernel = MockKernel::new();
        let mut sched = scheduler();
        let t0 = Instant::now();

        sched.mark_needs_reload();
        sched.start_reload_if_due(t0, params(50.0), &mut kernel);
        sched.mark_needs_reload();
        sched.start_reload_if_due(t0 + Duration::from_millis(150), params(70.0), &mut kernel);

        assert!(kernel.resolve_latest().is_some());
        assert_eq!(sched.poll().map(|r| r.params.height), Some(70.0));
        assert!(!sched.is_loading());

        assert!(kernel.resolve_next().is_some());
        assert!(sched.poll().is_none());
        assert_eq!(sched.last_applied(), 2);
    }

    #[test]
    fn older_request_settling_keeps_gate_closed() {
        let mut kernel = MockKernel::new();
        let mut sched = scheduler();
        let t0 = Instant::now();

        sched.mark_needs_reload();
        sched.start_reload_if_due(t0, params(50.0), &mut kernel);
        sched.mark_needs_reload();
        sched.start_reload_if_due(t0 + Duration::from_millis(150), params(70.0), &mut kernel);

        assert!(kernel.resolve_next().is_some());
        assert_eq!(sched.poll().map(|r| r.seq), Some(1));
        assert!(sched.is_loading());
    }

    #[test]
    fn failure_opens_gate_without_rearming() {
        let mut kernel = MockKernel::new();
        let mut sched = scheduler();
        let t0 = Instant::now();

        sched.mark_needs_reload();
        sched.start_reload_if_due(t0, params(50.0), &mut kernel);
        assert!(kernel
            .fail_next(KernelError::Other {
                message: "boom".into()
            })
            .is_some());
        assert!(sched.poll().is_none());
        assert!(!sched.is_loading());
        assert!(!sched.needs_reload());
        assert_eq!(sched.start_reload_if_due(t0 + Duration::from_millis(10), params(50.0), &mut kernel), None);
    }

    #[test]
    fn result_carries_filename() {
        let mut kernel = MockKernel::immediate();
        let mut sched = scheduler();
        sched.mark_needs_reload();
        sched.start_reload_if_due(Instant::now(), CylinderParams::new(80.0, 25.0, 3.0, true), &mut kernel);
        let result = sched.poll();
        assert_eq!(
            result.map(|r| r.filename),
            Some("cylinder-50x80-wall3-closed.3mf".to_string())
        );
    }
}
