// ABOUTME: Integration tests for phase selection and repetition counting over angle sequences
// ABOUTME: Drives the phase tracker and counter directly with synthetic contexts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::time::Duration;

use pierre_form_engine::conditions::EvaluationContext;
use pierre_form_engine::definition::ExerciseDefinition;
use pierre_form_engine::engine::{select_phase, HoldTracker, PhaseTracker, RepCounter};
use rand::Rng;

const SQUAT_PHASES: &str = r#"
name: squat_phases
angles:
  primary: { points: [left_hip, left_knee, left_ankle] }
states:
  start: { condition: "angle > 160" }
  descent: { condition: "100 <= angle <= 160" }
  bottom: { condition: "angle < 100" }
state_order: [bottom, descent, start]
counter: { trigger_state: bottom }
min_rep_duration: 0.5
"#;

const ONE_REP: [f64; 9] = [175.0, 160.0, 130.0, 100.0, 85.0, 95.0, 140.0, 170.0, 175.0];

fn context(angle: f64) -> EvaluationContext {
    [("angle".to_owned(), angle), ("primary_angle".to_owned(), angle)]
        .into_iter()
        .collect()
}

/// Feed angles 200ms apart, returning the phase after each and the count
fn run(definition: &ExerciseDefinition, angles: &[f64]) -> (Vec<String>, u32) {
    run_every(definition, angles, 200)
}

fn run_every(definition: &ExerciseDefinition, angles: &[f64], gap_ms: u64) -> (Vec<String>, u32) {
    let mut phases = PhaseTracker::new();
    let mut counter = RepCounter::default();
    let mut seen = Vec::with_capacity(angles.len());

    for (step, angle) in angles.iter().enumerate() {
        let now = Duration::from_millis(gap_ms * step as u64);
        phases.update(select_phase(definition, &context(*angle)));
        counter.try_count(&phases, &definition.counter, now);
        seen.push(phases.current().unwrap_or("none").to_owned());
    }
    (seen, counter.count())
}

#[test]
fn test_one_full_squat_counts_once() {
    let definition = common::definition(SQUAT_PHASES);
    let (phases, count) = run(&definition, &ONE_REP);

    assert_eq!(
        phases,
        [
            "start", "descent", "descent", "descent", "bottom", "bottom", "descent", "start",
            "start"
        ]
    );
    assert_eq!(count, 1);
}

#[test]
fn test_one_full_squat_at_half_second_frames_counts_once() {
    let definition = common::definition(SQUAT_PHASES);
    let (phases, count) = run_every(&definition, &ONE_REP, 500);

    assert_eq!(phases.last().map(String::as_str), Some("start"));
    assert_eq!(count, 1);
}

#[test]
fn test_counter_never_decreases_over_random_sequences() {
    let definition = common::definition(SQUAT_PHASES);

    for seed in 0..16 {
        let mut rng = common::seeded_rng(seed);
        let mut phases = PhaseTracker::new();
        let mut counter = RepCounter::default();
        let mut now = Duration::ZERO;
        let mut previous = 0;

        for _ in 0..500 {
            now += Duration::from_millis(rng.gen_range(0..=700));
            phases.update(select_phase(&definition, &context(rng.gen_range(0.0..=180.0))));
            let counted = counter.try_count(&phases, &definition.counter, now);

            let count = counter.count();
            assert!(count >= previous, "seed {seed}: {count} < {previous}");
            assert_eq!(count - previous, u32::from(counted), "seed {seed}");
            if counted {
                assert_eq!(phases.current(), Some("bottom"));
            }
            previous = count;
        }
    }
}

#[test]
fn test_from_state_requirement_still_counts_a_clean_rep() {
    let yaml = SQUAT_PHASES.replace(
        "counter: { trigger_state: bottom }",
        "counter: { trigger_state: bottom, from_state: descent }",
    );
    let definition = common::definition(&yaml);
    assert_eq!(run(&definition, &ONE_REP).1, 1);
}

#[test]
fn test_from_state_blocks_skipped_phase() {
    let yaml = SQUAT_PHASES.replace(
        "counter: { trigger_state: bottom }",
        "counter: { trigger_state: bottom, from_state: descent }",
    );
    let definition = common::definition(&yaml);
    // start -> bottom without passing through descent
    assert_eq!(run(&definition, &[175.0, 80.0, 175.0]).1, 0);

    let lenient = common::definition(SQUAT_PHASES);
    assert_eq!(run(&lenient, &[175.0, 80.0, 175.0]).1, 1);
}

#[test]
fn test_unmatched_angle_keeps_previous_phase() {
    let gappy = r#"
name: gappy
angles:
  primary: { points: [left_hip, left_knee, left_ankle] }
states:
  up: { condition: "angle > 160" }
  down: { condition: "angle < 90" }
counter: { trigger_state: down }
"#;
    let definition = common::definition(gappy);
    let (phases, count) = run(&definition, &[170.0, 120.0, 80.0, 120.0, 170.0, 120.0, 80.0]);

    assert_eq!(phases, ["up", "up", "down", "down", "up", "up", "down"]);
    assert_eq!(count, 2);
}

#[test]
fn test_repeated_trigger_without_transition_counts_once() {
    let definition = common::definition(SQUAT_PHASES);
    let (_, count) = run(&definition, &[130.0, 85.0, 80.0, 75.0, 85.0, 90.0]);
    assert_eq!(count, 1);
}

#[test]
fn test_fast_bounce_is_debounced() {
    let definition = common::definition(SQUAT_PHASES);
    let mut phases = PhaseTracker::new();
    let mut counter = RepCounter::default();

    let mut feed = |ms: u64, angle: f64| {
        phases.update(select_phase(&definition, &context(angle)));
        counter.try_count(&phases, &definition.counter, Duration::from_millis(ms))
    };

    assert!(!feed(0, 130.0));
    assert!(feed(100, 85.0));
    assert!(!feed(200, 130.0));
    // 300ms after the first count: under the 0.5s minimum
    assert!(!feed(400, 85.0));
    assert!(!feed(500, 130.0));
    assert!(feed(700, 85.0));
    assert_eq!(counter.count(), 2);
    assert_eq!(counter.last_count_at(), Some(Duration::from_millis(700)));
}

#[test]
fn test_state_order_priority_resolves_overlaps() {
    let overlapping = r#"
name: overlap
angles:
  primary: { points: [left_hip, left_knee, left_ankle] }
states:
  wide: { condition: "angle < 150" }
  narrow: { condition: "angle < 90" }
state_order: [narrow, wide]
counter: { trigger_state: narrow }
"#;
    let definition = common::definition(overlapping);
    assert_eq!(select_phase(&definition, &context(80.0)), Some("narrow"));
    assert_eq!(select_phase(&definition, &context(120.0)), Some("wide"));
    assert_eq!(select_phase(&definition, &context(170.0)), None);

    let declared = overlapping.replace("state_order: [narrow, wide]\n", "");
    let definition = common::definition(&declared);
    assert_eq!(select_phase(&definition, &context(80.0)), Some("wide"));
}

#[test]
fn test_hold_tracker_counts_only_long_enough_holds() {
    let target = Duration::from_secs(2);
    let mut hold = HoldTracker::default();
    let at = Duration::from_millis;

    assert!(!hold.update(true, at(0), target));
    assert!(!hold.update(true, at(1000), target));
    assert!(!hold.update(false, at(1500), target));
    assert_eq!(hold.current(), Duration::ZERO);

    assert!(!hold.update(true, at(2000), target));
    assert!(!hold.update(true, at(4500), target));
    assert!(hold.is_holding());
    assert!(hold.update(false, at(5000), target));
    assert!(!hold.is_holding());
}
