// ABOUTME: Raw serde_yaml view of an exercise definition document before validation
// ABOUTME: Every field optional so validation can report all missing pieces at once
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_yaml::{Mapping, Value};

/// Top-level document as written on disk
///
/// Mappings whose declaration order matters (`angles`, `states`,
/// `feedback`, `ideal_angles`) stay as `serde_yaml::Mapping`, which keeps
/// insertion order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDocument {
    /// Machine name
    pub name: Option<String>,
    /// Human-readable name
    pub display_name: Option<String>,
    /// `repetition` or `duration`
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Angle name -> `{ points: [a, b, c] }`
    pub angles: Option<Mapping>,
    /// State name -> `{ condition }`
    pub states: Option<Mapping>,
    /// Explicit state priority
    pub state_order: Option<Vec<String>>,
    /// Counter rule
    pub counter: Option<RawCounter>,
    /// Rule name -> `{ condition, message, severity }`
    pub feedback: Option<Mapping>,
    /// Debounce between counted repetitions, seconds
    pub min_rep_duration: Option<f64>,
    /// Calibration settings
    pub calibration: Option<RawCalibration>,
    /// Smoothing settings
    pub smoothing: Option<RawSmoothing>,
    /// Scoring settings
    pub form_score: Option<RawFormScore>,
    /// Two independent sides
    pub bilateral: Option<bool>,
    /// Side angle names for bilateral exercises
    pub sides: Option<Vec<String>>,
    /// Hold target for duration exercises, seconds
    pub target_duration: Option<f64>,
    /// Phase that counts as holding
    pub hold_state: Option<String>,
    /// Presentation metadata
    #[serde(flatten)]
    pub info: RawInfo,
}

/// Presentation-only fields
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawInfo {
    /// Muscles worked
    pub target_muscles: Option<Vec<String>>,
    /// Equipment label
    pub equipment: Option<String>,
    /// Suggested repetitions per set
    pub default_reps: Option<u32>,
    /// Suggested sets
    pub default_sets: Option<u32>,
    /// Suggested rest
    pub rest_time: Option<String>,
    /// Benefit bullet points
    pub benefits: Option<Vec<String>>,
    /// Difficulty label
    pub difficulty: Option<String>,
    /// Free-form description
    pub description: Option<String>,
}

/// One angle entry
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAngle {
    /// Joint names, vertex in the middle
    pub points: Option<Vec<String>>,
}

/// One state entry
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawState {
    /// Condition expression
    pub condition: Option<String>,
}

/// Counter block
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCounter {
    /// Phase whose arrival counts a repetition
    pub trigger_state: Option<String>,
    /// Phase that must precede the trigger
    pub from_state: Option<String>,
    /// Overrides the top-level debounce
    pub min_rep_duration: Option<f64>,
}

/// One feedback entry
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFeedback {
    /// Condition expression
    pub condition: Option<String>,
    /// Message text
    pub message: Option<String>,
    /// `info`, `warning`, or `error`
    pub severity: Option<String>,
}

/// Calibration block
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCalibration {
    /// Whether calibration runs
    pub enabled: Option<bool>,
    /// Samples required per list
    pub reps: Option<u32>,
    /// Phases feeding the minimum list
    pub bottom_states: Option<Vec<String>>,
    /// Phases feeding the maximum list
    pub top_states: Option<Vec<String>>,
}

/// Smoothing block
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSmoothing {
    /// Whether smoothing runs
    pub enabled: Option<bool>,
    /// Moving average window
    pub window: Option<u32>,
}

/// Scoring block
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFormScore {
    /// Angle name -> ideal degrees
    pub ideal_angles: Option<Mapping>,
    /// Acceptable repetition duration
    pub tempo_range: Option<RawTempoRange>,
    /// Transition that starts the repetition timer
    pub rep_start: Option<RawRepStart>,
}

/// Tempo bounds in seconds
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTempoRange {
    /// Fastest acceptable repetition
    pub min: Option<f64>,
    /// Slowest acceptable repetition
    pub max: Option<f64>,
}

/// Phase transition starting the rep timer
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRepStart {
    /// Phase left
    pub from: Option<String>,
    /// Phase entered
    pub to: Option<String>,
}

/// Parse a document, reporting YAML errors with the source label
///
/// # Errors
///
/// Returns the `serde_yaml` message when the text is not a mapping of the
/// expected shape.
pub fn parse_document(yaml: &str) -> Result<RawDocument, serde_yaml::Error> {
    serde_yaml::from_str(yaml)
}

/// Decode each entry of an ordered mapping into `T`
///
/// Non-string keys and malformed values are reported through `violations`
/// and skipped.
pub fn ordered_entries<T: DeserializeOwned>(
    mapping: &Mapping,
    section: &str,
    violations: &mut Vec<String>,
) -> Vec<(String, T)> {
    let mut entries = Vec::with_capacity(mapping.len());
    for (key, value) in mapping {
        let Some(name) = key_name(key) else {
            violations.push(format!("{section} has a non-string key: {key:?}"));
            continue;
        };
        let value = if value.is_null() {
            Value::Mapping(Mapping::new())
        } else {
            value.clone()
        };
        match serde_yaml::from_value::<T>(value) {
            Ok(entry) => entries.push((name, entry)),
            Err(e) => violations.push(format!("{section} entry '{name}' is malformed: {e}")),
        }
    }
    entries
}

fn key_name(key: &Value) -> Option<String> {
    match key {
        Value::String(name) => Some(name.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}
