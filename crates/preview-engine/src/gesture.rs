//! Pointer gesture state machine for the inspect-rotation interaction.
//!
//! A press on the part enters `Pending`; any move turns it into `Dragging`
//! with a live rotation target. Release decides between a tap (toggle the
//! orientation held before the press) and a drag (snap to the nearest
//! orientation).

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;
use tube_types::Orientation;
use web_time::Instant;

/// Thresholds separating a tap from a drag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GestureConfig {
    pub tap_max_duration_ms: u64,
    pub tap_max_travel_px: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            tap_max_duration_ms: 300,
            tap_max_travel_px: 15.0,
        }
    }
}

impl GestureConfig {
    pub fn tap_max_duration(&self) -> Duration {
        Duration::from_millis(self.tap_max_duration_ms)
    }
}

/// Everything captured at pointer-down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragOrigin {
    /// Rotation (in units) the part was showing when pressed.
    pub start_rotation: f64,
    pub start_pixel: [f64; 2],
    pub clock_start: Instant,
    /// Orientation in effect before the press; the tap toggle starts here.
    pub return_target: Orientation,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GesturePosition {
    Static(Orientation),
    Pending(DragOrigin),
    Dragging {
        origin: DragOrigin,
        current_pixel_x: f64,
    },
}

impl Default for GesturePosition {
    fn default() -> Self {
        GesturePosition::Static(Orientation::Front)
    }
}

/// Wrap a rotation in units into [-1, 1).
pub fn wrap_rotation(units: f64) -> f64 {
    (units + 1.0).rem_euclid(2.0) - 1.0
}

#[derive(Debug, Clone, Default)]
pub struct GestureMachine {
    config: GestureConfig,
    position: GesturePosition,
}

impl GestureMachine {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            position: GesturePosition::default(),
        }
    }

    pub fn position(&self) -> GesturePosition {
        self.position
    }

    /// True while a press is in progress and move/up events matter.
    pub fn is_tracking(&self) -> bool {
        match self.position {
            GesturePosition::Static(_) => false,
            GesturePosition::Pending(_) | GesturePosition::Dragging { .. } => true,
        }
    }

    /// The resting orientation, or the one a release would return to.
    pub fn orientation(&self) -> Orientation {
        match self.position {
            GesturePosition::Static(orientation) => orientation,
            GesturePosition::Pending(origin) | GesturePosition::Dragging { origin, .. } => {
                origin.return_target
            }
        }
    }

    /// Start a press at `(x, y)`. Ignored unless the machine is at rest.
    pub fn pointer_down(&mut self, x: f64, y: f64, now: Instant, current_rotation: f64) -> bool {
        match self.position {
            GesturePosition::Static(orientation) => {
                self.position = GesturePosition::Pending(DragOrigin {
                    start_rotation: current_rotation,
                    start_pixel: [x, y],
                    clock_start: now,
                    return_target: orientation,
                });
                true
            }
            GesturePosition::Pending(_) | GesturePosition::Dragging { .. } => {
                debug!("pointer down while already tracking; ignored");
                false
            }
        }
    }

    /// Follow the pointer. Returns the live rotation target in units.
    pub fn pointer_move(&mut self, x: f64, canvas_width: f64) -> Option<f64> {
        let origin = match self.position {
            GesturePosition::Static(_) => return None,
            GesturePosition::Pending(origin) | GesturePosition::Dragging { origin, .. } => origin,
        };
        if !(canvas_width > 0.0) || !x.is_finite() {
            debug!(canvas_width, x, "pointer move without usable geometry; ignored");
            return None;
        }
        self.position = GesturePosition::Dragging {
            origin,
            current_pixel_x: x,
        };
        let delta = (x - origin.start_pixel[0]) / canvas_width;
        Some(wrap_rotation(origin.start_rotation + delta))
    }

    /// Finish the press. Returns the orientation to settle on, or `None`
    /// when nothing was being tracked.
    pub fn pointer_up(&mut self, now: Instant, current_rotation: f64) -> Option<Orientation> {
        let (origin, last_x) = match self.position {
            GesturePosition::Static(_) => return None,
            GesturePosition::Pending(origin) => (origin, origin.start_pixel[0]),
            GesturePosition::Dragging {
                origin,
                current_pixel_x,
            } => (origin, current_pixel_x),
        };
        let elapsed = now.saturating_duration_since(origin.clock_start);
        let travel = (last_x - origin.start_pixel[0]).abs();
        let settled = if elapsed < self.config.tap_max_duration()
            && travel < self.config.tap_max_travel_px
        {
            origin.return_target.toggled()
        } else {
            Orientation::nearest(current_rotation)
        };
        self.position = GesturePosition::Static(settled);
        Some(settled)
    }

    /// Treated like a release.
    pub fn pointer_cancel(&mut self, now: Instant, current_rotation: f64) -> Option<Orientation> {
        self.pointer_up(now, current_rotation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn wrap_keeps_range() {
        assert_eq!(wrap_rotation(0.5), 0.5);
        assert_eq!(wrap_rotation(1.5), -0.5);
        assert_eq!(wrap_rotation(-1.5), 0.5);
        assert_eq!(wrap_rotation(1.0), -1.0);
    }

    #[test]
    fn quick_tap_toggles_orientation() {
        let mut machine = GestureMachine::default();
        let t0 = Instant::now();
        assert!(machine.pointer_down(100.0, 50.0, t0, 0.0));
        assert!(machine.is_tracking());
        assert_eq!(
            machine.pointer_up(t0 + ms(100), 0.0),
            Some(Orientation::BackPositive)
        );
        assert!(!machine.is_tracking());

        machine.pointer_down(100.0, 50.0, t0 + ms(500), 1.0);
        assert_eq!(
            machine.pointer_up(t0 + ms(550), 1.0),
            Some(Orientation::Front)
        );
    }

    #[test]
    fn small_drag_still_counts_as_tap() {
        let mut machine = GestureMachine::default();
        let t0 = Instant::now();
        machine.pointer_down(100.0, 0.0, t0, 0.0);
        let live = machine.pointer_move(110.0, 400.0);
        assert!(live.is_some());
        assert_eq!(
            machine.pointer_up(t0 + ms(200), 0.4),
            Some(Orientation::BackPositive)
        );
    }

    #[test]
    fn slow_release_snaps_to_nearest() {
        let mut machine = GestureMachine::default();
        let t0 = Instant::now();
        machine.pointer_down(0.0, 0.0, t0, 0.0);
        assert_eq!(machine.pointer_up(t0 + ms(400), -0.8), Some(Orientation::BackNegative));
    }

    #[test]
    fn long_drag_snaps_to_nearest() {
        let mut machine = GestureMachine::default();
        let t0 = Instant::now();
        machine.pointer_down(0.0, 0.0, t0, 0.0);
        let live = machine.pointer_move(-120.0, 400.0).unwrap_or(f64::NAN);
        assert!((live + 0.3).abs() < 1e-12);
        assert_eq!(machine.pointer_up(t0 + ms(100), live), Some(Orientation::Front));
    }

    #[test]
    fn full_width_drag_moves_one_unit() {
        let mut machine = GestureMachine::default();
        machine.pointer_down(0.0, 0.0, Instant::now(), 0.25);
        let live = machine.pointer_move(800.0, 800.0).unwrap_or(f64::NAN);
        assert!((live - wrap_rotation(1.25)).abs() < 1e-12);
    }

    #[test]
    fn moves_and_releases_at_rest_are_ignored() {
        let mut machine = GestureMachine::default();
        assert_eq!(machine.pointer_move(10.0, 100.0), None);
        assert_eq!(machine.pointer_up(Instant::now(), 0.0), None);
        assert_eq!(machine.position(), GesturePosition::Static(Orientation::Front));
    }

    #[test]
    fn zero_width_canvas_is_ignored() {
        let mut machine = GestureMachine::default();
        machine.pointer_down(0.0, 0.0, Instant::now(), 0.0);
        assert_eq!(machine.pointer_move(10.0, 0.0), None);
        assert!(matches!(machine.position(), GesturePosition::Pending(_)));
    }

    #[test]
    fn cancel_behaves_like_release() {
        let mut machine = GestureMachine::default();
        let t0 = Instant::now();
        machine.pointer_down(0.0, 0.0, t0, 0.0);
        assert_eq!(
            machine.pointer_cancel(t0 + ms(10), 0.0),
            Some(Orientation::BackPositive)
        );
    }
}
