//! Deterministic test double implementing `SolidKernel`.
//!
//! Records every request and holds its completion until the test resolves
//! or fails it explicitly, so in-flight behaviour can be scripted. Clones
//! share state: hand one clone to the code under test, keep the other.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::completion::Completion;
use crate::tessellation::{TessellatedBuilder, TessellationConfig};
use crate::traits::{SolidBuilder, SolidKernel};
use crate::types::*;

/// How the mock answers new requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockMode {
    /// Hold completions until the test resolves them.
    Manual,
    /// Resolve successfully inside `generate_solid`.
    Immediate,
}

struct MockState {
    mode: MockMode,
    requests: Vec<CylinderParams>,
    outstanding: VecDeque<Completion>,
    builder: TessellatedBuilder,
}

/// Deterministic test double for the geometry kernel.
#[derive(Clone)]
pub struct MockKernel {
    state: Rc<RefCell<MockState>>,
}

impl MockKernel {
    pub fn new() -> Self {
        Self::with_mode(MockMode::Manual)
    }

    pub fn immediate() -> Self {
        Self::with_mode(MockMode::Immediate)
    }

    pub fn with_mode(mode: MockMode) -> Self {
        Self {
            state: Rc::new(RefCell::new(MockState {
                mode,
                requests: Vec::new(),
                outstanding: VecDeque::new(),
                builder: TessellatedBuilder::new(TessellationConfig { segments: 12 }),
            })),
        }
    }

    pub fn set_mode(&self, mode: MockMode) {
        self.state.borrow_mut().mode = mode;
    }

    /// Every request received so far, in call order.
    pub fn requests(&self) -> Vec<CylinderParams> {
        self.state.borrow().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.borrow().requests.len()
    }

    pub fn last_request(&self) -> Option<CylinderParams> {
        self.state.borrow().requests.last().copied()
    }

    /// Number of requests whose completion has not been resolved yet.
    pub fn outstanding(&self) -> usize {
        self.state.borrow().outstanding.len()
    }

    /// Sequence numbers of unresolved requests, oldest first.
    pub fn outstanding_seqs(&self) -> Vec<u64> {
        self.state
            .borrow()
            .outstanding
            .iter()
            .map(Completion::seq)
            .collect()
    }

    /// Resolve the oldest outstanding request with a mesh built for its params.
    /// Returns the resolved sequence number.
    pub fn resolve_next(&self) -> Option<u64> {
        let completion = self.state.borrow_mut().outstanding.pop_front()?;
        Some(self.finish(completion))
    }

    /// Resolve the newest outstanding request, leaving older ones pending.
    pub fn resolve_latest(&self) -> Option<u64> {
        let completion = self.state.borrow_mut().outstanding.pop_back()?;
        Some(self.finish(completion))
    }

    /// Resolve every outstanding request, oldest first.
    pub fn resolve_all(&self) -> Vec<u64> {
        std::iter::from_fn(|| self.resolve_next()).collect()
    }

    /// Fail the oldest outstanding request.
    pub fn fail_next(&self, error: KernelError) -> Option<u64> {
        let completion = self.state.borrow_mut().outstanding.pop_front()?;
        let seq = completion.seq();
        completion.fail(error);
        Some(seq)
    }

    /// Drop the oldest outstanding completion without resolving it.
    pub fn abandon_next(&self) -> Option<u64> {
        let completion = self.state.borrow_mut().outstanding.pop_front()?;
        Some(completion.seq())
    }

    fn finish(&self, completion: Completion) -> u64 {
        let seq = completion.seq();
        let result = self.state.borrow().builder.build(completion.params());
        completion.resolve(result);
        seq
    }
}

impl Default for MockKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl SolidKernel for MockKernel {
    fn generate_solid(&mut self, params: CylinderParams, done: Completion) {
        let mode = {
            let mut state = self.state.borrow_mut();
            state.requests.push(params);
            state.mode
        };
        match mode {
            MockMode::Manual => self.state.borrow_mut().outstanding.push_back(done),
            MockMode::Immediate => {
                self.finish(done);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::completion_channel;

    #[test]
    fn manual_mode_holds_until_resolved() {
        let (tx, rx) = completion_channel();
        let mut kernel = MockKernel::new();
        let params = CylinderParams::default();
        kernel.generate_solid(params, Completion::new(1, params, tx.clone()));
        kernel.generate_solid(params, Completion::new(2, params, tx));

        assert!(rx.try_recv().is_err());
        assert_eq!(kernel.outstanding_seqs(), vec![1, 2]);

        assert_eq!(kernel.resolve_latest(), Some(2));
        assert_eq!(rx.try_recv().unwrap().seq, 2);
        assert_eq!(kernel.resolve_next(), Some(1));
        assert_eq!(rx.try_recv().unwrap().seq, 1);
        assert_eq!(kernel.request_count(), 2);
    }

    #[test]
    fn clones_share_state() {
        let (tx, _rx) = completion_channel();
        let observer = MockKernel::new();
        let mut handle = observer.clone();
        let params = CylinderParams::default();
        handle.generate_solid(params, Completion::new(1, params, tx));
        assert_eq!(observer.outstanding(), 1);
        assert_eq!(observer.last_request(), Some(params));
    }

    #[test]
    fn fail_next_reports_error() {
        let (tx, rx) = completion_channel();
        let mut kernel = MockKernel::new();
        let params = CylinderParams::default();
        kernel.generate_solid(params, Completion::new(5, params, tx));
        kernel.fail_next(KernelError::Other {
            message: "boom".to_string(),
        });
        let delivery = rx.try_recv().unwrap();
        assert!(delivery.result.is_err());
    }
}
