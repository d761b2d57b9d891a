//! Time-based interpolation toward a target value.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use web_time::Instant;

/// Easing curve applied to normalized progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Easing {
    Linear,
    EaseOutCubic,
    #[default]
    EaseInOutCubic,
}

impl Easing {
    /// Map progress `t` in [0, 1] to eased progress in [0, 1].
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

/// How a new target is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transition {
    #[default]
    Eased,
    /// Jump straight to the target on the next update.
    Immediate,
}

/// A scalar that interpolates from where it is toward its latest target.
///
/// Retargeting mid-flight restarts the curve from the current value, so the
/// output never jumps.
#[derive(Debug, Clone)]
pub struct Animated {
    target: f64,
    current: f64,
    start_value: f64,
    start_time: Option<Instant>,
    duration: Duration,
    easing: Easing,
    reported: Option<f64>,
}

impl Animated {
    pub fn new(initial: f64, duration: Duration, easing: Easing) -> Self {
        Self {
            target: initial,
            current: initial,
            start_value: initial,
            start_time: None,
            duration,
            easing,
            reported: None,
        }
    }

    pub fn current(&self) -> f64 {
        self.current
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn is_animating(&self) -> bool {
        self.start_time.is_some()
    }

    /// Begin moving toward `target`.
    ///
    /// An eased call with the target already in place is a no-op so that
    /// repeated identical requests don't restart the curve.
    pub fn start_animation_to(&mut self, target: f64, now: Instant, transition: Transition) {
        match transition {
            Transition::Immediate => {
                self.target = target;
                self.current = target;
                self.start_value = target;
                self.start_time = None;
            }
            Transition::Eased => {
                if target == self.target {
                    return;
                }
                self.target = target;
                self.start_value = self.current;
                if self.duration.is_zero() {
                    self.current = target;
                    self.start_time = None;
                } else {
                    self.start_time = Some(now);
                }
            }
        }
    }

    /// Advance to `now`. Returns true when the value differs from the one
    /// reported by the previous call, and always on the first call.
    pub fn update(&mut self, now: Instant) -> bool {
        if let Some(start) = self.start_time {
            let elapsed = now.saturating_duration_since(start);
            if elapsed >= self.duration {
                self.current = self.target;
                self.start_time = None;
            } else {
                let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();
                let eased = self.easing.apply(t);
                self.current = self.start_value + (self.target - self.start_value) * eased;
            }
        }
        let changed = self.reported != Some(self.current);
        self.reported = Some(self.current);
        changed
    }
}
