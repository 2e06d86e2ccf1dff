// ABOUTME: Exercise engine: per-frame processing pipeline and per-session state
// ABOUTME: Phases, debounced counting, calibration, feedback, form scoring, and result types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Exercise Engine
//!
//! Each frame flows through the same pipeline:
//!
//! 1. angles and evaluation context ([`crate::geometry`])
//! 2. phase selection, per side for bilateral exercises
//! 3. edge-triggered, debounced counting (hold completion for duration exercises)
//! 4. calibration sampling on counted reps
//! 5. feedback rules
//! 6. form score, then closing the counted repetition
//!
//! [`ExerciseEngine`] is stateless apart from its [`Clock`]; everything that
//! changes between frames lives in an [`ExerciseSession`].

/// Range-of-motion calibration
pub mod calibration;
/// Injected time source
pub mod clock;
/// Debounced repetition counter
pub mod counter;
/// Feedback rule evaluation
pub mod feedback;
/// Frame processor
pub mod processor;
/// Result and summary types
pub mod results;
/// Form scoring
pub mod scoring;
/// Per-session state
pub mod session;
/// Phase selection and hold tracking
pub mod state_machine;

pub use calibration::{CalibrationResult, CalibrationStatus, Calibrator};
pub use clock::{Clock, ManualClock, SystemClock};
pub use counter::RepCounter;
pub use feedback::evaluate_feedback;
pub use processor::{ExerciseEngine, NO_DETECTION};
pub use results::{FrameResult, HoldStatus, SessionSummary, SideStatus};
pub use scoring::ScoreTracker;
pub use session::{ExerciseSession, SideState, VariantState};
pub use state_machine::{select_phase, HoldTracker, PhaseTracker};
