//! Geometry kernel seam for the cylinder configurator.
//!
//! The preview pipeline only ever sees [`SolidKernel`]: an asynchronous,
//! completion-based generator. Concrete kernels wrap a synchronous
//! [`SolidBuilder`] (the real tessellator) or are test doubles.

pub mod completion;
pub mod inline_kernel;
pub mod mock_kernel;
pub mod tessellation;
#[cfg(not(target_arch = "wasm32"))]
pub mod threaded_kernel;
pub mod traits;
pub mod types;

pub use completion::{completion_channel, Completion, Delivery};
pub use inline_kernel::InlineKernel;
pub use mock_kernel::{MockKernel, MockMode};
pub use tessellation::{TessellatedBuilder, TessellationConfig};
#[cfg(not(target_arch = "wasm32"))]
pub use threaded_kernel::ThreadedKernel;
pub use traits::*;
pub use types::*;
