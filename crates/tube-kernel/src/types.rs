// Re-export shared types from tube-types
pub use tube_types::{CylinderParams, RenderMesh};

/// Errors from kernel operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum KernelError {
    #[error("invalid parameters: {reason}")]
    InvalidParams { reason: String },

    #[error("generation cancelled")]
    Cancelled,

    #[error("kernel worker disconnected")]
    Disconnected,

    #[error("kernel error: {message}")]
    Other { message: String },
}

/// Check the kernel preconditions. The bore is clamped later, never rejected here.
pub fn validate_params(params: &CylinderParams) -> Result<(), KernelError> {
    let CylinderParams {
        height,
        outer_radius,
        wall_thickness,
        ..
    } = *params;
    if !height.is_finite() || height <= 0.0 {
        return Err(KernelError::InvalidParams {
            reason: format!("height must be positive, got {height}"),
        });
    }
    if !outer_radius.is_finite() || outer_radius <= 0.0 {
        return Err(KernelError::InvalidParams {
            reason: format!("outer radius must be positive, got {outer_radius}"),
        });
    }
    if !wall_thickness.is_finite() || wall_thickness <= 0.0 {
        return Err(KernelError::InvalidParams {
            reason: format!("wall thickness must be positive, got {wall_thickness}"),
        });
    }
    Ok(())
}
