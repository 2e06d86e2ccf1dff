// ABOUTME: Validated, immutable exercise definitions and their loader
// ABOUTME: Angles, phases, counter, feedback, calibration, smoothing, scoring, and runtime variant
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Exercise Definitions
//!
//! One YAML document per exercise describes which joint angles to measure,
//! which phases the movement passes through, when a repetition counts, and
//! how form is judged. The loader turns a document into an
//! [`ExerciseDefinition`] after validating every cross-reference, and the
//! runtime [`ExerciseVariant`] is fixed at that point.

/// Directory resolution, listing, and info projection
pub mod loader;
/// Raw document shape
pub mod schema;
/// Cross-reference and range checks
pub mod validation;

pub use loader::DefinitionLoader;

use std::time::Duration;

use pierre_form_core::models::{Joint, MovementKind, Severity};
use serde::{Deserialize, Serialize};

use crate::conditions::Condition;

/// A vertex angle measured at the middle joint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AngleSpec {
    /// Angle name (context key is `<name>_angle`)
    pub name: String,
    /// Joints in order; `joints[1]` is the vertex
    pub joints: [Joint; 3],
}

/// A named movement phase and the condition selecting it
#[derive(Debug, Clone, PartialEq)]
pub struct StateRule {
    /// Phase name
    pub name: String,
    /// Selection condition
    pub condition: Condition,
}

/// When a phase transition counts as a repetition
#[derive(Debug, Clone, PartialEq)]
pub struct CounterRule {
    /// Phase whose arrival counts
    pub trigger_state: String,
    /// Phase that must have been left, if any
    pub from_state: Option<String>,
    /// Minimum time between two counts
    pub min_rep_duration: Duration,
}

/// Form check producing a message while its condition holds
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackRule {
    /// Rule name
    pub name: String,
    /// Trigger condition
    pub condition: Condition,
    /// Message text
    pub message: String,
    /// Severity
    pub severity: Severity,
}

/// Extreme-angle sampling over the first repetitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalibrationConfig {
    /// Whether samples are collected
    pub enabled: bool,
    /// Samples needed in each list
    pub reps: usize,
    /// Phases whose primary angle feeds the minimum list
    pub bottom_states: Vec<String>,
    /// Phases whose primary angle feeds the maximum list
    pub top_states: Vec<String>,
}

/// Moving-average smoothing of computed angles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmoothingConfig {
    /// Whether smoothing applies
    pub enabled: bool,
    /// Samples averaged per angle
    pub window: usize,
}

/// Acceptable repetition duration in seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TempoRange {
    /// Fastest acceptable
    pub min: f64,
    /// Slowest acceptable
    pub max: f64,
}

/// Phase transition that starts the repetition timer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepStart {
    /// Phase left
    pub from: String,
    /// Phase entered
    pub to: String,
}

/// Inputs to the form score
#[derive(Debug, Clone, PartialEq)]
pub struct FormScoreConfig {
    /// Ideal degrees per angle name, in declaration order
    pub ideal_angles: Vec<(String, f64)>,
    /// Tempo bounds
    pub tempo: TempoRange,
    /// Rep timer start transition
    pub rep_start: RepStart,
}

/// Runtime behaviour selected once at load
#[derive(Debug, Clone, PartialEq)]
pub enum ExerciseVariant {
    /// One phase machine, one counter
    Standard,
    /// One phase machine and counter per side; `angle` binds to each side's angle
    Bilateral {
        /// Side names; each names a defined angle
        sides: Vec<String>,
    },
    /// Counted by sustained holds
    Duration {
        /// Hold needed for a count
        target: Duration,
        /// Phase that counts as holding
        hold_state: String,
    },
}

impl ExerciseVariant {
    /// Short label for logs and summaries
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Bilateral { .. } => "bilateral",
            Self::Duration { .. } => "duration",
        }
    }
}

/// Presentation projection of a definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseInfo {
    /// Display name
    pub display_name: String,
    /// Movement kind
    pub kind: MovementKind,
    /// Muscles worked
    pub target_muscles: Vec<String>,
    /// Equipment label
    pub equipment: String,
    /// Suggested repetitions per set
    pub default_reps: u32,
    /// Suggested sets
    pub default_sets: u32,
    /// Suggested rest
    pub rest_time: String,
    /// Benefits
    pub benefits: Vec<String>,
    /// Difficulty label
    pub difficulty: String,
    /// Description
    pub description: String,
}

/// Validated exercise definition, shared read-only between sessions
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseDefinition {
    /// Machine name
    pub name: String,
    /// Human-readable name
    pub display_name: String,
    /// Movement kind as declared
    pub kind: MovementKind,
    /// Angles in declaration order
    pub angles: Vec<AngleSpec>,
    /// Phases in declaration order
    pub states: Vec<StateRule>,
    /// Indices into `states` in evaluation priority
    pub(crate) priority: Vec<usize>,
    /// Counting rule
    pub counter: CounterRule,
    /// Feedback rules in declaration order
    pub feedback: Vec<FeedbackRule>,
    /// Calibration settings
    pub calibration: CalibrationConfig,
    /// Smoothing settings
    pub smoothing: SmoothingConfig,
    /// Scoring settings
    pub form_score: FormScoreConfig,
    /// Runtime variant
    pub variant: ExerciseVariant,
    /// Presentation metadata
    pub info: ExerciseInfo,
}

impl ExerciseDefinition {
    /// Phases in the order they are tried each frame
    pub fn states_by_priority(&self) -> impl Iterator<Item = &StateRule> {
        self.priority.iter().filter_map(|&index| self.states.get(index))
    }

    /// Phase names in evaluation priority
    #[must_use]
    pub fn state_order(&self) -> Vec<&str> {
        self.states_by_priority()
            .map(|state| state.name.as_str())
            .collect()
    }
}

/// `push_up` -> `Push Up`
#[must_use]
pub fn title_case(identifier: &str) -> String {
    identifier
        .split(['_', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}
