//! One-shot completion handles for kernel requests.
//!
//! Each request carries a [`Completion`] that posts a [`Delivery`] into a
//! channel owned by the scheduler. The scheduler drains the channel once per
//! frame, so a kernel may resolve from inside `generate_solid`, from a later
//! callback, or from another thread.

use std::sync::mpsc::{self, Receiver, Sender};

use crate::types::*;

/// The outcome of one kernel request.
#[derive(Debug, Clone)]
pub struct Delivery {
    /// Sequence number assigned by the requester.
    pub seq: u64,
    /// The exact parameters the mesh was generated for.
    pub params: CylinderParams,
    pub result: Result<RenderMesh, KernelError>,
}

/// Handle used by a kernel to report the outcome of one request.
#[derive(Debug)]
pub struct Completion {
    seq: u64,
    params: CylinderParams,
    tx: Sender<Delivery>,
}

impl Completion {
    pub fn new(seq: u64, params: CylinderParams, tx: Sender<Delivery>) -> Self {
        Self { seq, params, tx }
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn params(&self) -> &CylinderParams {
        &self.params
    }

    /// Report the outcome. A receiver that has gone away is not an error.
    pub fn resolve(self, result: Result<RenderMesh, KernelError>) {
        let delivery = Delivery {
            seq: self.seq,
            params: self.params,
            result,
        };
        if self.tx.send(delivery).is_err() {
            tracing::debug!(seq = self.seq, "completion receiver dropped");
        }
    }

    pub fn succeed(self, mesh: RenderMesh) {
        self.resolve(Ok(mesh))
    }

    pub fn fail(self, error: KernelError) {
        self.resolve(Err(error))
    }
}

/// Create the sender/receiver pair a scheduler uses to mint completions.
pub fn completion_channel() -> (Sender<Delivery>, Receiver<Delivery>) {
    mpsc::channel()
}
