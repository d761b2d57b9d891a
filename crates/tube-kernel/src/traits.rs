use crate::completion::Completion;
use crate::types::*;

/// Asynchronous solid generator consumed by the regeneration scheduler.
///
/// `generate_solid` must return promptly. The outcome is reported through
/// `done`, at most once, possibly after the call returns. Dropping `done`
/// without resolving it is allowed; the caller treats that as a load that
/// never finishes.
pub trait SolidKernel {
    fn generate_solid(&mut self, params: CylinderParams, done: Completion);
}

/// Synchronous mesh construction. Wrapped by [`crate::InlineKernel`] and
/// [`crate::ThreadedKernel`] to become a [`SolidKernel`].
pub trait SolidBuilder {
    fn build(&self, params: &CylinderParams) -> Result<RenderMesh, KernelError>;
}

impl<K: SolidKernel + ?Sized> SolidKernel for Box<K> {
    fn generate_solid(&mut self, params: CylinderParams, done: Completion) {
        (**self).generate_solid(params, done)
    }
}
