//! Property-based tests for the preview pipeline using the `proptest` crate.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use proptest::prelude::*;

use preview_engine::gesture::wrap_rotation;
use preview_engine::{
    Animated, Easing, GestureConfig, GestureMachine, ReactiveCell, RegenScheduler, SchedulerConfig,
    Transition,
};
use tube_kernel::{CylinderParams, MockKernel};
use tube_types::Orientation;
use web_time::Instant;

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

fn arb_orientation() -> impl Strategy<Value = Orientation> {
    prop_oneof![
        Just(Orientation::BackNegative),
        Just(Orientation::Front),
        Just(Orientation::BackPositive),
    ]
}

fn arb_easing() -> impl Strategy<Value = Easing> {
    prop_oneof![
        Just(Easing::Linear),
        Just(Easing::EaseOutCubic),
        Just(Easing::EaseInOutCubic),
    ]
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

const TOL: f64 = 1e-9;

// ---------------------------------------------------------------------------
// 1. A listener sees the initial value plus one call per actual change
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn cell_notifies_once_per_change(values in prop::collection::vec(0i32..4, 0..40)) {
        let cell = ReactiveCell::new(0);
        let calls = Rc::new(Cell::new(0usize));
        let counter = Rc::clone(&calls);
        cell.add_listener(move |_| counter.set(counter.get() + 1));

        let mut expected = 1;
        let mut latest = 0;
        for value in values {
            if value != latest {
                expected += 1;
                latest = value;
            }
            cell.send(value);
        }
        prop_assert_eq!(calls.get(), expected);
        prop_assert_eq!(cell.latest(), latest);
    }
}

// ---------------------------------------------------------------------------
// 2. Eased animation never leaves the segment between start and target
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn animation_never_overshoots(
        from in -100.0f64..100.0,
        to in -100.0f64..100.0,
        easing in arb_easing(),
        samples in prop::collection::vec(0u64..600, 1..20),
    ) {
        let t0 = Instant::now();
        let mut anim = Animated::new(from, ms(400), easing);
        anim.start_animation_to(to, t0, Transition::Eased);
        let (lo, hi) = (from.min(to), from.max(to));

        let mut sorted = samples;
        sorted.sort_unstable();
        for at in sorted {
            anim.update(t0 + ms(at));
            let value = anim.current();
            prop_assert!(value >= lo - TOL && value <= hi + TOL,
                "value {} outside [{}, {}] at {}ms", value, lo, hi, at);
        }
        anim.update(t0 + ms(400));
        prop_assert_eq!(anim.current(), to);
    }
}

// ---------------------------------------------------------------------------
// 3. Retargeting mid-flight does not move the current value
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn retarget_is_continuous(
        first in -10.0f64..10.0,
        second in -10.0f64..10.0,
        at in 0u64..400,
    ) {
        let t0 = Instant::now();
        let mut anim = Animated::new(0.0, ms(400), Easing::EaseInOutCubic);
        anim.start_animation_to(first, t0, Transition::Eased);
        anim.update(t0 + ms(at));
        let before = anim.current();

        anim.start_animation_to(second, t0 + ms(at), Transition::Eased);
        anim.update(t0 + ms(at));
        prop_assert!((anim.current() - before).abs() < TOL);
    }
}

// ---------------------------------------------------------------------------
// 4. A quick release near the press point toggles, whatever happened between
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn quick_small_release_toggles(
        start in arb_orientation(),
        start_x in 0.0f64..800.0,
        wander in prop::collection::vec(-400.0f64..400.0, 0..10),
        final_offset in -14.9f64..14.9,
        held_ms in 0u64..300,
        width in 100.0f64..2000.0,
    ) {
        let mut machine = GestureMachine::new(GestureConfig::default());
        let t0 = Instant::now();

        // Settle into `start` first through a slow release.
        machine.pointer_down(0.0, 0.0, t0, start.units());
        machine.pointer_up(t0 + ms(1000), start.units());
        prop_assert_eq!(machine.orientation(), start);

        let pressed = t0 + ms(2000);
        prop_assert!(machine.pointer_down(start_x, 10.0, pressed, start.units()));
        for dx in wander {
            machine.pointer_move(start_x + dx, width);
        }
        if machine.pointer_move(start_x + final_offset, width).is_none() {
            return Err(TestCaseError::fail("move while tracking was ignored"));
        }
        let settled = machine.pointer_up(pressed + ms(held_ms), 0.37);
        prop_assert_eq!(settled, Some(start.toggled()));
    }
}

// ---------------------------------------------------------------------------
// 5. Dragging across the full canvas width moves the target by one unit
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn full_width_drag_is_one_unit(
        start_rotation in -1.0f64..1.0,
        start_x in 0.0f64..500.0,
        width in 50.0f64..3000.0,
    ) {
        let mut machine = GestureMachine::default();
        machine.pointer_down(start_x, 0.0, Instant::now(), start_rotation);
        let at_start = machine.pointer_move(start_x, width);
        let across = machine.pointer_move(start_x + width, width);
        let (Some(at_start), Some(across)) = (at_start, across) else {
            return Err(TestCaseError::fail("drag target missing"));
        };
        prop_assert!((at_start - wrap_rotation(start_rotation)).abs() < TOL);
        prop_assert!((-1.0..1.0).contains(&across));

        let residue = (across - at_start - 1.0).rem_euclid(2.0);
        prop_assert!(residue < 1e-6 || residue > 2.0 - 1e-6,
            "{} -> {} is not one unit", at_start, across);
    }
}

// ---------------------------------------------------------------------------
// 6. Any number of changes during one request yields exactly one more request
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn changes_in_flight_coalesce(heights in prop::collection::vec(10.0f64..200.0, 1..30)) {
        let mut kernel = MockKernel::new();
        let mut sched = RegenScheduler::new(SchedulerConfig::default());
        let t0 = Instant::now();

        sched.mark_needs_reload();
        sched.start_reload_if_due(t0, CylinderParams::new(50.0, 25.0, 3.0, true), &mut kernel);

        let mut last = 50.0;
        for (i, height) in heights.iter().enumerate() {
            sched.mark_needs_reload();
            let at = t0 + ms(i as u64 % 50);
            let issued = sched.start_reload_if_due(at, CylinderParams::new(*height, 25.0, 3.0, true), &mut kernel);
            prop_assert!(issued.is_none());
            last = *height;
        }
        prop_assert_eq!(kernel.request_count(), 1);

        kernel.resolve_next();
        prop_assert!(sched.poll().is_some());
        sched.start_reload_if_due(t0 + ms(60), CylinderParams::new(last, 25.0, 3.0, true), &mut kernel);
        sched.start_reload_if_due(t0 + ms(61), CylinderParams::new(last, 25.0, 3.0, true), &mut kernel);

        prop_assert_eq!(kernel.request_count(), 2);
        prop_assert_eq!(kernel.last_request().map(|p| p.height), Some(last));
    }
}
