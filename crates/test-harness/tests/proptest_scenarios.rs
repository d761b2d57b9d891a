//! Property-based end-to-end tests: arbitrary interaction scripts always
//! converge on the requested part.

use proptest::prelude::*;

use file_format::artifact_filename;
use test_harness::Scenario;

#[derive(Debug, Clone)]
enum Step {
    Param(&'static str, f64),
    Closed(bool),
    Frame(u64),
    Resolve,
    Tap,
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        (10.0f64..200.0).prop_map(|v| Step::Param("height", v)),
        (5.0f64..100.0).prop_map(|v| Step::Param("outerRadius", v)),
        (0.5f64..50.0).prop_map(|v| Step::Param("wallThickness", v)),
        any::<bool>().prop_map(Step::Closed),
        (0u64..60).prop_map(Step::Frame),
        Just(Step::Resolve),
        Just(Step::Tap),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn pipeline_converges_on_latest_targets(steps in prop::collection::vec(arb_step(), 1..40)) {
        let mut s = Scenario::mock();
        for step in steps {
            match step {
                Step::Param(name, value) => {
                    s.set_param(name, &format!("{value}"));
                }
                Step::Closed(closed) => {
                    s.set_closed(closed);
                }
                Step::Frame(ms) => {
                    s.advance_ms(ms);
                }
                Step::Resolve => {
                    s.kernel.resolve_next();
                }
                Step::Tap => {
                    s.tap();
                }
            }
        }
        prop_assert!(s.settle().is_ok());

        let target = s.params_target();
        prop_assert_eq!(s.kernel.last_request(), Some(target));
        prop_assert_eq!(s.link.last().map(|a| a.filename), Some(artifact_filename(&target)));
        prop_assert!(s.errors().is_empty());
    }

    #[test]
    fn taps_alternate_between_front_and_back(taps in 1usize..8) {
        let mut s = Scenario::mock();
        for i in 0..taps {
            s.tap();
            let expected = if i % 2 == 0 { 1.0 } else { 0.0 };
            prop_assert_eq!(s.orientation().units(), expected);
        }
    }
}
