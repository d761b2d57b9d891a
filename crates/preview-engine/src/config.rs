//! Tunables for the preview pipeline.
//!
//! Every field has a default, so a host may pass a partial JSON override.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tube_kernel::TessellationConfig;
use tube_types::{ParamLimits, ParamRange};

use crate::animate::Easing;
use crate::error::PreviewError;
use crate::gesture::GestureConfig;

/// How parameter and rotation changes are smoothed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnimationConfig {
    /// Length of one eased transition. Zero makes every change immediate.
    pub duration_ms: u64,
    pub easing: Easing,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            duration_ms: 400,
            easing: Easing::EaseInOutCubic,
        }
    }
}

impl AnimationConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

/// Regeneration throttling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SchedulerConfig {
    /// After this long without a result, a new request may start even though
    /// the previous one is still outstanding.
    pub stuck_load_timeout_ms: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            stuck_load_timeout_ms: 100,
        }
    }
}

impl SchedulerConfig {
    pub fn stuck_load_timeout(&self) -> Duration {
        Duration::from_millis(self.stuck_load_timeout_ms)
    }
}

/// Scene presentation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewConfig {
    /// Added to every applied rotation so the front view is never exactly face-on.
    pub rotation_offset_radians: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            rotation_offset_radians: 0.02,
        }
    }
}

/// Configuration for the whole preview pipeline.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PreviewConfig {
    pub animation: AnimationConfig,
    pub gesture: GestureConfig,
    pub scheduler: SchedulerConfig,
    pub view: ViewConfig,
    pub limits: ParamLimits,
    pub tessellation: TessellationConfig,
}

impl PreviewConfig {
    /// Short transitions, for hosts that prefer responsiveness over smoothness.
    pub fn snappy() -> Self {
        Self {
            animation: AnimationConfig {
                duration_ms: 150,
                easing: Easing::EaseOutCubic,
            },
            ..Self::default()
        }
    }

    /// No smoothing at all: every change lands on the next frame.
    pub fn instant() -> Self {
        Self {
            animation: AnimationConfig {
                duration_ms: 0,
                easing: Easing::Linear,
            },
            ..Self::default()
        }
    }

    /// Reject limits that cannot produce a valid part.
    pub fn validate(&self) -> Result<(), PreviewError> {
        check_range("height", &self.limits.height)?;
        check_range("outer radius", &self.limits.outer_radius)?;
        check_range("wall thickness", &self.limits.wall_thickness)?;
        if !(self.gesture.tap_max_travel_px >= 0.0) {
            return Err(PreviewError::InvalidConfig {
                reason: "tap travel threshold must be non-negative".to_string(),
            });
        }
        Ok(())
    }
}

fn check_range(name: &str, range: &ParamRange) -> Result<(), PreviewError> {
    let invalid = |reason: String| Err(PreviewError::InvalidConfig { reason });
    if !(range.min.is_finite() && range.max.is_finite()) || range.min > range.max {
        return invalid(format!("{name} range [{}, {}] is empty", range.min, range.max));
    }
    if range.min <= 0.0 {
        return invalid(format!("{name} minimum must be positive, got {}", range.min));
    }
    if !range.contains(range.default) {
        return invalid(format!(
            "{name} default {} outside [{}, {}]",
            range.default, range.min, range.max
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(PreviewConfig::default().validate().is_ok());
        assert!(PreviewConfig::instant().validate().is_ok());
        assert!(PreviewConfig::snappy().validate().is_ok());
    }

    #[test]
    fn partial_json_override_keeps_defaults() {
        let config: PreviewConfig =
            serde_json::from_str(r#"{"animation": {"durationMs": 250}}"#).unwrap();
        assert_eq!(config.animation.duration_ms, 250);
        assert_eq!(config.animation.easing, Easing::EaseInOutCubic);
        assert_eq!(config.scheduler.stuck_load_timeout_ms, 100);
        assert_eq!(config.limits, ParamLimits::default());
    }

    #[test]
    fn default_outside_range_is_rejected() {
        let mut config = PreviewConfig::default();
        config.limits.height.default = 1000.0;
        assert!(matches!(
            config.validate(),
            Err(PreviewError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn zero_radius_minimum_is_rejected() {
        let mut config = PreviewConfig::default();
        config.limits.outer_radius.min = 0.0;
        assert!(config.validate().is_err());
    }
}
