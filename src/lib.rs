// ABOUTME: Main library entry point for the Pierre form engine
// ABOUTME: Declarative exercise definitions driving rep counting, feedback, and form scoring
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Pierre Form Engine
//!
//! Turns a stream of 2D pose landmarks into repetition counts, phase
//! tracking, form feedback, and a 0-100 form score. Exercises are data:
//! each one is a YAML document naming its joint angles, phase conditions,
//! counting rule, and feedback rules. Adding an exercise never needs code.
//!
//! ## Architecture
//!
//! - **definition**: YAML loading and load-time validation
//! - **conditions**: the restricted expression language used by rules
//! - **geometry**: vertex angles, smoothing, and the per-frame context
//! - **engine**: sessions, phase machines, counting, feedback, scoring
//! - **replay**: deterministic offline replay of recorded traces
//! - **config** / **logging**: environment configuration and tracing setup
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use pierre_form_engine::definition::DefinitionLoader;
//! use pierre_form_engine::engine::ExerciseEngine;
//! use pierre_form_engine::errors::AppResult;
//! use pierre_form_engine::models::PoseFrame;
//!
//! fn main() -> AppResult<()> {
//!     let definition = DefinitionLoader::new("definitions").load("squat")?;
//!     let engine = ExerciseEngine::default();
//!     let mut session = engine.start_session(definition);
//!
//!     let frame = PoseFrame::new(Vec::new(), 640, 480);
//!     let result = engine.process_frame(&mut session, Some(&frame));
//!     println!("reps: {}, score: {}", result.counter, result.form_score);
//!     Ok(())
//! }
//! ```

/// Restricted condition expression language
pub mod conditions;

/// Environment-based engine configuration
pub mod config;

/// Exercise definition model, loader, and validation
pub mod definition;

/// Per-frame processing pipeline and session state
pub mod engine;

/// Angle computation, smoothing, and context building
pub mod geometry;

/// Structured logging setup and engine events
pub mod logging;

/// Offline replay of recorded pose traces
pub mod replay;

pub use pierre_form_core::{constants, errors, models};
