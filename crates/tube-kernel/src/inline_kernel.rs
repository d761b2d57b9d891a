use tracing::debug;

use crate::completion::Completion;
use crate::traits::{SolidBuilder, SolidKernel};
use crate::types::*;

/// Runs the builder during `generate_solid` and resolves immediately.
///
/// The scheduler still observes the delivery on its next poll, so the
/// single-flight bookkeeping is the same as for a truly asynchronous kernel.
#[derive(Debug, Clone, Default)]
pub struct InlineKernel<B> {
    builder: B,
}

impl<B: SolidBuilder> InlineKernel<B> {
    pub fn new(builder: B) -> Self {
        Self { builder }
    }

    pub fn builder(&self) -> &B {
        &self.builder
    }
}

impl<B: SolidBuilder> SolidKernel for InlineKernel<B> {
    fn generate_solid(&mut self, params: CylinderParams, done: Completion) {
        debug!(seq = done.seq(), "inline kernel building");
        let result = self.builder.build(&params);
        done.resolve(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::completion_channel;
    use crate::tessellation::TessellatedBuilder;

    #[test]
    fn resolves_before_returning() {
        let (tx, rx) = completion_channel();
        let mut kernel = InlineKernel::new(TessellatedBuilder::default());
        let params = CylinderParams::default();
        kernel.generate_solid(params, Completion::new(3, params, tx));

        let delivery = rx.try_recv().unwrap();
        assert_eq!(delivery.seq, 3);
        assert!(!delivery.result.unwrap().is_empty());
    }
}
