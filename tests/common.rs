// ABOUTME: Shared test utilities for form engine integration tests
// ABOUTME: Quiet logging, definition fixtures, synthetic pose frames, and manual-clock engines
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `pierre_form_engine`

use std::env;
use std::path::PathBuf;
use std::sync::{Arc, Once};
use std::time::Duration;

use pierre_form_engine::definition::{DefinitionLoader, ExerciseDefinition};
use pierre_form_engine::engine::{
    ExerciseEngine, ExerciseSession, FrameResult, ManualClock,
};
use pierre_form_engine::models::{Joint, Landmark, PoseFrame};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::Level;

static INIT_LOGGER: Once = Once::new();

/// Frame size used by every synthetic pose
pub const FRAME_SIZE: u32 = 1000;

/// Landmarks in the detector's 33-point scheme
pub const LANDMARK_COUNT: usize = 33;

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => Level::TRACE,
            Ok("DEBUG") => Level::DEBUG,
            Ok("INFO") => Level::INFO,
            _ => Level::WARN,
        };

        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}

/// Deterministic generator so sweeps replay identically
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Directory holding the bundled definitions
pub fn bundled_definitions_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("definitions")
}

/// Loader over the bundled definitions
pub fn bundled_loader() -> DefinitionLoader {
    init_test_logging();
    DefinitionLoader::new(bundled_definitions_dir())
}

/// Parse and validate an inline document
pub fn definition(yaml: &str) -> Arc<ExerciseDefinition> {
    init_test_logging();
    let loader = DefinitionLoader::new(bundled_definitions_dir());
    Arc::new(
        loader
            .parse_definition(yaml, "inline")
            .expect("inline definition should validate"),
    )
}

/// Engine driven by a manual clock, plus a fresh session
pub fn manual_engine(
    definition: Arc<ExerciseDefinition>,
) -> (Arc<ManualClock>, ExerciseEngine, ExerciseSession) {
    let clock = Arc::new(ManualClock::new());
    let engine = ExerciseEngine::new(Arc::<ManualClock>::clone(&clock));
    let session = engine.start_session(definition);
    (clock, engine, session)
}

/// Process one frame at an absolute time in milliseconds
pub fn step_at(
    clock: &ManualClock,
    engine: &ExerciseEngine,
    session: &mut ExerciseSession,
    at_ms: u64,
    frame: &PoseFrame,
) -> FrameResult {
    clock.set(Duration::from_millis(at_ms));
    engine.process_frame(session, Some(frame))
}

/// Every landmark parked low in the frame, away from the joints under test
pub fn base_landmarks() -> Vec<Landmark> {
    vec![Landmark::new(0.5, 0.95); LANDMARK_COUNT]
}

/// Place `vertex` at (x, 0.5), `upper` 0.2 above it, and `lower` so the
/// angle at the vertex is `degrees`
pub fn place_vertex(
    landmarks: &mut [Landmark],
    (upper, vertex, lower): (Joint, Joint, Joint),
    x: f64,
    degrees: f64,
    mirrored: bool,
) {
    let theta = degrees.to_radians();
    let direction = if mirrored { -1.0 } else { 1.0 };
    landmarks[upper.landmark_index()] = Landmark::new(x, 0.3);
    landmarks[vertex.landmark_index()] = Landmark::new(x, 0.5);
    landmarks[lower.landmark_index()] =
        Landmark::new(0.2f64.mul_add(direction * theta.sin(), x), 0.2f64.mul_add(-theta.cos(), 0.5));
}

/// Pose whose left knee angle (hip-knee-ankle) is `degrees`
pub fn knee_frame(degrees: f64) -> PoseFrame {
    let mut landmarks = base_landmarks();
    place_vertex(
        &mut landmarks,
        (Joint::LeftHip, Joint::LeftKnee, Joint::LeftAnkle),
        0.5,
        degrees,
        false,
    );
    PoseFrame::new(landmarks, FRAME_SIZE, FRAME_SIZE)
}

/// Pose whose left hip angle (shoulder-hip-ankle) is `degrees`
pub fn hip_line_frame(degrees: f64) -> PoseFrame {
    let mut landmarks = base_landmarks();
    place_vertex(
        &mut landmarks,
        (Joint::LeftShoulder, Joint::LeftHip, Joint::LeftAnkle),
        0.5,
        degrees,
        false,
    );
    PoseFrame::new(landmarks, FRAME_SIZE, FRAME_SIZE)
}

/// Pose with both elbow angles (shoulder-elbow-wrist) set
pub fn arms_frame(left_degrees: f64, right_degrees: f64) -> PoseFrame {
    let mut landmarks = base_landmarks();
    place_vertex(
        &mut landmarks,
        (Joint::LeftShoulder, Joint::LeftElbow, Joint::LeftWrist),
        0.4,
        left_degrees,
        false,
    );
    place_vertex(
        &mut landmarks,
        (Joint::RightShoulder, Joint::RightElbow, Joint::RightWrist),
        0.6,
        right_degrees,
        true,
    );
    PoseFrame::new(landmarks, FRAME_SIZE, FRAME_SIZE)
}

/// Pose where the detector lost the right wrist, so only the left arm angle exists
pub fn left_arm_only_frame(left_degrees: f64) -> PoseFrame {
    let mut frame = arms_frame(left_degrees, 170.0);
    frame.landmarks.truncate(Joint::RightWrist.landmark_index());
    frame
}
