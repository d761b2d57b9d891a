/// Errors from setting up the preview pipeline or calling into its host.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PreviewError {
    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("host call {call} failed: {message}")]
    Host { call: String, message: String },
}
