//! Property tests for the phase clock and session countdown.

use breathwork_core::timer::phase_progress;
use breathwork_core::{BreathingPattern, BreathingTimer, PatternSource, Phase, PhaseClock};
use proptest::prelude::*;

fn pattern(inhale: u32, hold: u32, exhale: u32, hold_empty: u32) -> BreathingPattern {
    BreathingPattern {
        name: "prop".into(),
        inhale,
        hold,
        exhale,
        hold_empty,
        source: PatternSource::Builtin,
    }
}

fn visited(p: &BreathingPattern, ticks: usize) -> Vec<Phase> {
    let mut clock = PhaseClock::new();
    let mut seen = vec![clock.phase()];
    for _ in 0..ticks {
        if let Some(next) = clock.advance(p, 100) {
            seen.push(next);
        }
    }
    seen
}

#[derive(Debug, Clone)]
enum Op {
    Start,
    Pause,
    Tick(u16),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Start),
        Just(Op::Pause),
        (1u16..400).prop_map(Op::Tick),
    ]
}

proptest! {
    #[test]
    fn zero_hold_goes_straight_to_exhale(inhale in 1u32..8, exhale in 1u32..8, hold_empty in 0u32..8) {
        let p = pattern(inhale, 0, exhale, hold_empty);
        let seen = visited(&p, 400);
        prop_assert!(!seen.contains(&Phase::Hold));
        for pair in seen.windows(2) {
            if pair[0] == Phase::Inhale {
                prop_assert_eq!(pair[1], Phase::Exhale);
            }
        }
    }

    #[test]
    fn zero_hold_empty_goes_straight_to_inhale(inhale in 1u32..8, hold in 0u32..8, exhale in 1u32..8) {
        let p = pattern(inhale, hold, exhale, 0);
        let seen = visited(&p, 400);
        prop_assert!(!seen.contains(&Phase::HoldEmpty));
        for pair in seen.windows(2) {
            if pair[0] == Phase::Exhale {
                prop_assert_eq!(pair[1], Phase::Inhale);
            }
        }
    }

    #[test]
    fn progress_bounds(d in 1u32..30) {
        prop_assert_eq!(phase_progress(0, d), 0.0);
        prop_assert_eq!(phase_progress(u64::from(d) * 1000, d), 1.0);
        prop_assert_eq!(phase_progress(u64::from(d) * 5000, d), 1.0);
    }

    #[test]
    fn progress_is_monotonic_within_a_phase(inhale in 1u32..10, hold in 0u32..10, exhale in 1u32..10, hold_empty in 0u32..10) {
        let p = pattern(inhale, hold, exhale, hold_empty);
        let mut clock = PhaseClock::new();
        let mut last = clock.progress(&p);
        for _ in 0..500 {
            let changed = clock.advance(&p, 100);
            let now = clock.progress(&p);
            prop_assert!(now <= 1.0);
            if changed.is_some() {
                prop_assert_eq!(now, 0.0);
            } else {
                prop_assert!(now >= last);
            }
            last = now;
        }
    }

    #[test]
    fn reset_restores_initial_state(minutes in 1u32..10, ops in proptest::collection::vec(op(), 0..30)) {
        let mut timer = BreathingTimer::new(pattern(4, 4, 4, 4), minutes);
        for op in ops {
            match op {
                Op::Start => { timer.start(); }
                Op::Pause => { timer.pause(); }
                Op::Tick(n) => { for _ in 0..n { timer.tick(); } }
            }
        }
        timer.reset();
        prop_assert_eq!(timer.remaining_ms(), u64::from(minutes) * 60_000);
        prop_assert_eq!(timer.phase(), Phase::Inhale);
        prop_assert_eq!(timer.phase_progress(), 0.0);
        prop_assert!(!timer.is_running());
    }

    #[test]
    fn completion_is_time_driven(inhale in 1u32..20, hold in 0u32..20, exhale in 1u32..20, hold_empty in 0u32..20, minutes in 1u32..4) {
        let mut timer = BreathingTimer::new(pattern(inhale, hold, exhale, hold_empty), minutes);
        timer.start();
        let ticks = minutes as usize * 600;
        for _ in 0..ticks - 1 {
            timer.tick();
        }
        prop_assert!(!timer.is_completed());
        timer.tick();
        prop_assert!(timer.is_completed());
        prop_assert_eq!(timer.phase(), Phase::Completed);
    }
}
