// ABOUTME: Offline replay of recorded pose traces through the exercise engine
// ABOUTME: One session and one manual clock per trace; independent traces replay in parallel
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Trace Replay
//!
//! A trace is a JSON document:
//!
//! ```json
//! {
//!   "exercise": "squat",
//!   "width": 640,
//!   "height": 480,
//!   "frames": [
//!     { "timestamp": 0.033, "landmarks": [{ "x": 0.5, "y": 0.3, "visibility": 0.99 }] }
//!   ]
//! }
//! ```
//!
//! Frame timestamps drive a [`ManualClock`], so replaying the same trace
//! always yields the same results. A frame with an empty landmark list is
//! processed as "no detection".

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use pierre_form_core::errors::{AppError, AppResult, ErrorCode};
use pierre_form_core::models::{Landmark, PoseFrame};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::definition::ExerciseDefinition;
use crate::engine::{ExerciseEngine, FrameResult, ManualClock, SessionSummary};

/// Recorded pose stream for one exercise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseTrace {
    /// Exercise the trace was recorded for
    #[serde(default)]
    pub exercise: Option<String>,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Frames in recording order
    pub frames: Vec<TraceFrame>,
}

/// One recorded frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceFrame {
    /// Seconds since the start of the recording
    pub timestamp: f64,
    /// Detected landmarks; empty when nothing was detected
    #[serde(default)]
    pub landmarks: Vec<Landmark>,
}

impl PoseTrace {
    /// Parse a trace from JSON text
    ///
    /// # Errors
    ///
    /// Returns `SerializationError` for malformed JSON.
    pub fn from_json(json: &str) -> AppResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a trace file
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the file cannot be read and
    /// `SerializationError` when it is not a valid trace.
    pub fn from_path(path: &Path) -> AppResult<Self> {
        let json = fs::read_to_string(path).map_err(|e| {
            AppError::new(
                ErrorCode::StorageError,
                format!("Failed to read trace {}", path.display()),
            )
            .with_source(e)
        })?;
        Self::from_json(&json)
    }
}

/// Results of replaying one trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayReport {
    /// Exercise replayed
    pub exercise: String,
    /// One result per frame, in order
    pub frames: Vec<FrameResult>,
    /// Session state after the last frame
    pub summary: SessionSummary,
}

/// Replay a trace through a fresh session
#[must_use]
pub fn replay_trace(definition: Arc<ExerciseDefinition>, trace: &PoseTrace) -> ReplayReport {
    let clock = Arc::new(ManualClock::new());
    let engine = ExerciseEngine::new(Arc::<ManualClock>::clone(&clock));
    let mut session = engine.start_session(definition);

    let frames = trace
        .frames
        .iter()
        .map(|recorded| {
            clock.set(timestamp_offset(recorded.timestamp));
            let frame = PoseFrame::new(recorded.landmarks.clone(), trace.width, trace.height);
            engine.process_frame(&mut session, Some(&frame))
        })
        .collect();

    let summary = session.summary();
    debug!(
        exercise.name = %summary.exercise,
        replay.frames = trace.frames.len(),
        replay.counter = summary.counter,
        "Trace replayed"
    );

    ReplayReport {
        exercise: summary.exercise.clone(),
        frames,
        summary,
    }
}

/// Replay independent traces in parallel, preserving input order
#[must_use]
pub fn replay_all(jobs: &[(Arc<ExerciseDefinition>, PoseTrace)]) -> Vec<ReplayReport> {
    let reports: Vec<ReplayReport> = jobs
        .par_iter()
        .map(|(definition, trace)| replay_trace(Arc::clone(definition), trace))
        .collect();
    info!(replay.traces = reports.len(), "Replay batch complete");
    reports
}

/// Negative or non-finite timestamps clamp to zero
fn timestamp_offset(seconds: f64) -> Duration {
    Duration::try_from_secs_f64(seconds).unwrap_or(Duration::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::DefinitionLoader;
    use crate::models::Joint;

    const KNEE_ONLY: &str = r#"
name: knee_only
angles:
  primary: { points: [left_hip, left_knee, left_ankle] }
states:
  up: { condition: "angle > 120" }
  down: { condition: "angle <= 120" }
counter: { trigger_state: down }
"#;

    fn straight_leg() -> Vec<Landmark> {
        let mut landmarks = vec![Landmark::new(0.5, 0.9); 33];
        landmarks[Joint::LeftHip.landmark_index()] = Landmark::new(0.5, 0.3);
        landmarks[Joint::LeftKnee.landmark_index()] = Landmark::new(0.5, 0.5);
        landmarks[Joint::LeftAnkle.landmark_index()] = Landmark::new(0.5, 0.7);
        landmarks
    }

    #[test]
    fn test_replay_trace_runs_on_trace_time() {
        let definition = DefinitionLoader::new("definitions")
            .parse_definition(KNEE_ONLY, "inline")
            .unwrap();
        let trace = PoseTrace {
            exercise: None,
            width: 100,
            height: 100,
            frames: vec![
                TraceFrame {
                    timestamp: 0.25,
                    landmarks: straight_leg(),
                },
                TraceFrame {
                    timestamp: 0.75,
                    landmarks: Vec::new(),
                },
            ],
        };

        let report = replay_trace(Arc::new(definition), &trace);

        assert_eq!(report.exercise, "knee_only");
        assert_eq!(report.frames.len(), 2);
        assert!(report.frames[0].success);
        assert_eq!(report.frames[0].phase.as_deref(), Some("up"));
        assert!((report.frames[0].timestamp - 0.25).abs() < 1e-9);
        assert!(!report.frames[1].success);
        assert_eq!(report.summary.frames_processed, 1);
        assert_eq!(report.summary.counter, 0);
    }

    #[test]
    fn test_trace_parsing_defaults() {
        let trace = PoseTrace::from_json(
            r#"{"width": 640, "height": 480, "frames": [{"timestamp": 0.5}]}"#,
        )
        .unwrap();
        assert!(trace.exercise.is_none());
        assert!(trace.frames[0].landmarks.is_empty());
    }

    #[test]
    fn test_malformed_trace_is_serialization_error() {
        let error = PoseTrace::from_json("{ not json").unwrap_err();
        assert_eq!(error.code, ErrorCode::SerializationError);
    }

    #[test]
    fn test_timestamp_clamping() {
        assert_eq!(timestamp_offset(-1.0), Duration::ZERO);
        assert_eq!(timestamp_offset(f64::NAN), Duration::ZERO);
        assert_eq!(timestamp_offset(1.5), Duration::from_millis(1500));
    }
}
