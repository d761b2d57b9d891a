use std::sync::Arc;
use std::thread;

use tracing::{debug, warn};

use crate::completion::Completion;
use crate::traits::{SolidBuilder, SolidKernel};
use crate::types::*;

/// Builds each request on its own worker thread.
///
/// The completion channel is the only thing shared with the caller, so the
/// scheduler keeps observing results from its own thread.
pub struct ThreadedKernel<B> {
    builder: Arc<B>,
}

impl<B: SolidBuilder + Send + Sync + 'static> ThreadedKernel<B> {
    pub fn new(builder: B) -> Self {
        Self {
            builder: Arc::new(builder),
        }
    }
}

impl<B: SolidBuilder + Send + Sync + 'static> SolidKernel for ThreadedKernel<B> {
    fn generate_solid(&mut self, params: CylinderParams, done: Completion) {
        let builder = Arc::clone(&self.builder);
        let seq = done.seq();
        let spawned = thread::Builder::new()
            .name(format!("tube-kernel-{seq}"))
            .spawn(move || {
                debug!(seq, "worker building solid");
                let result = builder.build(&params);
                done.resolve(result);
            });
        if let Err(e) = spawned {
            // The completion moved into the closure and was dropped with it;
            // the caller sees a load that never finishes.
            warn!(seq, error = %e, "failed to spawn kernel worker");
        }
    }
}
