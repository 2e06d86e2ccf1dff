// ABOUTME: Criterion benchmarks for the per-frame exercise pipeline
// ABOUTME: Measures condition evaluation, frame processing, and parallel trace replay
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Criterion benchmarks for the form engine.
//!
//! Frames are synthetic knee poses, so timings cover angle math, phase
//! selection, feedback rules and scoring without any detector cost.

#![allow(
    clippy::missing_docs_in_private_items,
    clippy::unwrap_used,
    clippy::cast_precision_loss,
    missing_docs
)]

use std::f64::consts::TAU;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pierre_form_engine::conditions::{Condition, EvaluationContext};
use pierre_form_engine::definition::{DefinitionLoader, ExerciseDefinition};
use pierre_form_engine::engine::{ExerciseEngine, ManualClock};
use pierre_form_engine::models::{Joint, Landmark, PoseFrame};
use pierre_form_engine::replay::{replay_all, PoseTrace, TraceFrame};

const FRAME_SIZE: u32 = 1280;

fn bundled(exercise: &str) -> Arc<ExerciseDefinition> {
    DefinitionLoader::new(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("definitions"))
        .load(exercise)
        .unwrap()
}

fn knee_frame(degrees: f64) -> PoseFrame {
    let mut landmarks = vec![Landmark::new(0.5, 0.95); 33];
    let theta = degrees.to_radians();
    landmarks[Joint::LeftHip.landmark_index()] = Landmark::new(0.5, 0.3);
    landmarks[Joint::LeftKnee.landmark_index()] = Landmark::new(0.5, 0.5);
    landmarks[Joint::LeftAnkle.landmark_index()] =
        Landmark::new(0.2f64.mul_add(theta.sin(), 0.5), 0.2f64.mul_add(-theta.cos(), 0.5));
    PoseFrame::new(landmarks, FRAME_SIZE, FRAME_SIZE)
}

/// One squat sampled at `frames` evenly spaced angles, down and back up
fn squat_cycle(frames: usize) -> Vec<PoseFrame> {
    (0..frames)
        .map(|index| {
            let progress = index as f64 / frames as f64;
            let depth = (progress * TAU).cos().mul_add(47.5, 127.5);
            knee_frame(depth)
        })
        .collect()
}

fn bench_condition_evaluation(c: &mut Criterion) {
    let mut group = c.benchmark_group("conditions");
    let context: EvaluationContext = [
        ("angle".to_owned(), 92.0),
        ("hip_angle".to_owned(), 71.0),
        ("left_knee_x".to_owned(), 640.0),
        ("left_ankle_x".to_owned(), 702.0),
    ]
    .into_iter()
    .collect();

    for (label, source) in [
        ("simple", "angle < 100"),
        ("chained", "100 <= angle <= 160"),
        (
            "compound",
            "angle < 100 and abs(left_knee_x - left_ankle_x) > 60 or hip_angle < 60",
        ),
    ] {
        group.bench_with_input(BenchmarkId::new("compile", label), source, |b, source| {
            b.iter(|| Condition::compile(black_box(source)));
        });
        let condition = Condition::compile(source);
        group.bench_with_input(
            BenchmarkId::new("evaluate", label),
            &condition,
            |b, condition| {
                b.iter(|| condition.is_satisfied("bench", black_box(&context)));
            },
        );
    }

    group.finish();
}

fn bench_process_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("process_frame");
    let frames = squat_cycle(60);
    group.throughput(Throughput::Elements(frames.len() as u64));

    for exercise in ["squat", "lunge"] {
        let definition = bundled(exercise);
        group.bench_with_input(
            BenchmarkId::new("squat_cycle", exercise),
            &frames,
            |b, frames| {
                let clock = Arc::new(ManualClock::new());
                let engine = ExerciseEngine::new(Arc::<ManualClock>::clone(&clock));
                let mut session = engine.start_session(Arc::clone(&definition));
                b.iter(|| {
                    for frame in frames {
                        clock.advance(Duration::from_millis(33));
                        black_box(engine.process_frame(&mut session, Some(frame)));
                    }
                });
            },
        );
    }

    group.finish();
}

fn bench_parallel_replay(c: &mut Criterion) {
    let mut group = c.benchmark_group("replay");
    let definition = bundled("squat");
    let trace = PoseTrace {
        exercise: Some("squat".to_owned()),
        width: FRAME_SIZE,
        height: FRAME_SIZE,
        frames: squat_cycle(300)
            .into_iter()
            .enumerate()
            .map(|(index, frame)| TraceFrame {
                timestamp: index as f64 / 30.0,
                landmarks: frame.landmarks,
            })
            .collect(),
    };

    for traces in [1_usize, 8, 32] {
        let jobs: Vec<_> = (0..traces)
            .map(|_| (Arc::clone(&definition), trace.clone()))
            .collect();
        group.throughput(Throughput::Elements(traces as u64));
        group.bench_with_input(BenchmarkId::new("replay_all", traces), &jobs, |b, jobs| {
            b.iter(|| replay_all(black_box(jobs)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_condition_evaluation,
    bench_process_frame,
    bench_parallel_replay
);
criterion_main!(benches);
