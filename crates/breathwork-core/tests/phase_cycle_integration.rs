//! Property-based tests for the phase cycle timer.
//!
//! These tests use proptest to check the timer's guarantees across
//! random patterns and random tick sequences.

use breathwork_core::{Event, PhaseDurations, PhaseKind, PhaseTimer, SessionConfig, TimerStatus, TotalDuration};
use proptest::prelude::*;

const TOLERANCE: f64 = 1e-6;

prop_compose! {
    fn arbitrary_durations()(
        inhale in 0.1f64..10.0,
        hold_full in 0.1f64..10.0,
        exhale in 0.1f64..10.0,
        hold_empty in 0.1f64..10.0,
    ) -> PhaseDurations {
        PhaseDurations::new(inhale, hold_full, exhale, hold_empty).unwrap()
    }
}

fn arbitrary_ticks() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.0f64..15.0, 0..40)
}

prop_compose! {
    /// Whole-second phases, so sums of whole-second ticks are exact and a
    /// total can land precisely on a phase boundary.
    fn whole_second_durations()(secs in prop::array::uniform4(1u8..6)) -> PhaseDurations {
        PhaseDurations::new(
            f64::from(secs[0]),
            f64::from(secs[1]),
            f64::from(secs[2]),
            f64::from(secs[3]),
        )
        .unwrap()
    }
}

/// Phase changes a timer must have reported to get where it is.
fn crossings(timer: &PhaseTimer) -> u64 {
    4 * timer.cycles_completed() + timer.current_phase().index() as u64
}

fn position_in_cycle(timer: &PhaseTimer) -> f64 {
    timer.config().phases.offset_of(timer.current_phase()) + timer.phase_elapsed()
}

proptest! {
    #[test]
    fn cycle_position_is_elapsed_time_modulo_cycle(
        phases in arbitrary_durations(),
        ticks in arbitrary_ticks(),
    ) {
        let mut timer = PhaseTimer::new(SessionConfig::new(phases, TotalDuration::Unbounded));
        let mut total = 0.0;
        for dt in &ticks {
            timer.tick(*dt);
            total += dt;
        }

        let cycle = phases.cycle_secs();
        let expected = total % cycle;
        let diff = (position_in_cycle(&timer) - expected).abs();
        prop_assert!(diff < TOLERANCE || (cycle - diff).abs() < TOLERANCE,
            "position {} expected {} (cycle {})", position_in_cycle(&timer), expected, cycle);
        prop_assert!((timer.session_elapsed() - total).abs() < TOLERANCE);
    }

    #[test]
    fn phases_always_follow_cycle_order(
        phases in arbitrary_durations(),
        ticks in arbitrary_ticks(),
    ) {
        let mut timer = PhaseTimer::new(SessionConfig::new(phases, TotalDuration::Unbounded));
        let mut current = PhaseKind::Inhale;
        for dt in ticks {
            for event in timer.tick(dt) {
                if let Event::PhaseChanged { from, to, .. } = event {
                    prop_assert_eq!(from, current);
                    prop_assert_eq!(to, from.next());
                    current = to;
                }
            }
            prop_assert_eq!(timer.current_phase(), current);
        }
    }

    #[test]
    fn every_crossing_is_reported(
        phases in arbitrary_durations(),
        ticks in prop::collection::vec(0.0f64..200.0, 0..20),
    ) {
        let mut timer = PhaseTimer::new(SessionConfig::new(phases, TotalDuration::Unbounded));
        let mut changes = 0u64;
        let mut wraps = 0u64;
        for dt in ticks {
            for event in timer.tick(dt) {
                match event {
                    Event::PhaseChanged { .. } => changes += 1,
                    Event::CycleCompleted { .. } => wraps += 1,
                    _ => {}
                }
            }
        }
        prop_assert_eq!(changes, crossings(&timer));
        prop_assert_eq!(wraps, timer.cycles_completed());
    }

    #[test]
    fn final_state_does_not_depend_on_tick_size(
        phases in whole_second_durations(),
        total in 1u32..80,
        steps in prop::collection::vec(1u32..6, 1..100),
    ) {
        let total = f64::from(total);
        let config = SessionConfig::new(phases, TotalDuration::Finite(total));

        let mut single = PhaseTimer::new(config);
        let single_events = single.tick(total);

        let mut stepped = PhaseTimer::new(config);
        let mut stepped_events = Vec::new();
        for step in steps.iter().copied().chain(std::iter::once(total as u32)) {
            stepped_events.extend(stepped.tick(f64::from(step)));
        }

        prop_assert_eq!(single.status(), TimerStatus::Completed);
        prop_assert_eq!(stepped.status(), TimerStatus::Completed);
        prop_assert_eq!(single.current_phase(), stepped.current_phase());
        prop_assert_eq!(single.cycles_completed(), stepped.cycles_completed());
        prop_assert_eq!(single.phase_elapsed(), stepped.phase_elapsed());
        prop_assert!(single.phase_elapsed() > 0.0);

        for events in [&single_events, &stepped_events] {
            for event in events.iter() {
                match event {
                    Event::PhaseChanged { session_elapsed_secs, .. }
                    | Event::CycleCompleted { session_elapsed_secs, .. } => {
                        prop_assert!(*session_elapsed_secs < total);
                    }
                    _ => {}
                }
            }
        }
    }

    #[test]
    fn phase_remaining_stays_within_phase(
        phases in arbitrary_durations(),
        ticks in arbitrary_ticks(),
    ) {
        let mut timer = PhaseTimer::new(SessionConfig::new(phases, TotalDuration::Unbounded));
        for dt in ticks {
            timer.tick(dt);
            let snap = timer.snapshot();
            prop_assert!(snap.phase_elapsed_secs >= 0.0);
            prop_assert!(snap.phase_elapsed_secs < snap.phase_duration_secs);
            prop_assert!(snap.phase_remaining_secs > 0.0);
            prop_assert!(snap.phase_remaining_secs <= snap.phase_duration_secs);
        }
    }

    #[test]
    fn finite_sessions_complete_exactly_once(
        phases in arbitrary_durations(),
        total in 0.5f64..60.0,
        ticks in prop::collection::vec(0.0f64..5.0, 1..80),
    ) {
        let mut timer = PhaseTimer::new(SessionConfig::new(phases, TotalDuration::Finite(total)));
        let mut completions = 0;
        let mut changes_after_completion = 0;
        // Pad with one large tick so the sum always reaches the total.
        for dt in ticks.iter().copied().chain(std::iter::once(total)) {
            let already_done = timer.is_finished();
            for event in timer.tick(dt) {
                match event {
                    Event::SessionCompleted { .. } => completions += 1,
                    Event::PhaseChanged { .. } if already_done => changes_after_completion += 1,
                    _ => {}
                }
            }
        }

        prop_assert_eq!(completions, 1);
        prop_assert_eq!(changes_after_completion, 0);
        prop_assert_eq!(timer.status(), TimerStatus::Completed);
        prop_assert_eq!(timer.session_elapsed(), total);
        prop_assert_eq!(timer.snapshot().total_remaining_secs, Some(0.0));
    }

    #[test]
    fn unbounded_sessions_never_complete(
        phases in arbitrary_durations(),
        ticks in prop::collection::vec(0.0f64..1000.0, 0..40),
    ) {
        let mut timer = PhaseTimer::new(SessionConfig::new(phases, TotalDuration::Unbounded));
        for dt in ticks {
            let events = timer.tick(dt);
            prop_assert!(!events.iter().any(|e| matches!(e, Event::SessionCompleted { .. })), "unbounded session emitted SessionCompleted");
        }
        prop_assert_eq!(timer.status(), TimerStatus::Running);
        prop_assert_eq!(timer.total_remaining(), None);
    }

    #[test]
    fn stop_freezes_the_clocks(
        phases in arbitrary_durations(),
        before in arbitrary_ticks(),
        after in arbitrary_ticks(),
    ) {
        let mut timer = PhaseTimer::new(SessionConfig::new(phases, TotalDuration::Unbounded));
        for dt in before {
            timer.tick(dt);
        }
        timer.stop();
        let frozen = timer.snapshot();
        for dt in after {
            prop_assert!(timer.tick(dt).is_empty());
        }
        prop_assert_eq!(timer.snapshot(), frozen);
        prop_assert_eq!(timer.status(), TimerStatus::Stopped);
    }
}

#[test]
fn four_two_four_two_pattern_with_five_second_ticks() {
    let phases = PhaseDurations::new(4.0, 2.0, 4.0, 2.0).unwrap();
    let mut timer = PhaseTimer::new(SessionConfig::new(phases, TotalDuration::Finite(12.0)));

    timer.tick(5.0);
    assert_eq!(timer.current_phase(), PhaseKind::HoldFull);
    assert_eq!(timer.phase_elapsed(), 1.0);

    timer.tick(5.0);
    assert_eq!(timer.current_phase(), PhaseKind::HoldEmpty);
    assert_eq!(timer.phase_elapsed(), 0.0);

    let events = timer.tick(5.0);
    assert!(events.iter().any(|e| matches!(e, Event::SessionCompleted { .. })));
    assert_eq!(timer.total_remaining(), Some(0.0));
}
