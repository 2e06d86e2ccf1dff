// ABOUTME: Advisory range-of-motion calibration collected from counted repetitions
// ABOUTME: Completes once when both sample lists are full and logs the mean range
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

use crate::definition::CalibrationConfig;
use crate::logging::FormLogger;

/// Mean primary angle observed at the bottom and top of counted reps
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationResult {
    /// Mean of the bottom-phase samples
    pub min_angle: f64,
    /// Mean of the top-phase samples
    pub max_angle: f64,
}

/// Calibration progress, reported in summaries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationStatus {
    /// Whether the definition enables calibration
    pub enabled: bool,
    /// Whether calibration has completed
    pub is_calibrated: bool,
    /// Bottom-phase samples collected
    pub min_samples: usize,
    /// Top-phase samples collected
    pub max_samples: usize,
    /// Samples required per list
    pub required: usize,
    /// Completed result
    pub result: Option<CalibrationResult>,
}

/// Sample collector
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Calibrator {
    min_samples: Vec<f64>,
    max_samples: Vec<f64>,
    result: Option<CalibrationResult>,
}

impl Calibrator {
    /// Whether calibration has completed
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.result.is_some()
    }

    /// Completed result, if any
    #[must_use]
    pub const fn result(&self) -> Option<CalibrationResult> {
        self.result
    }

    /// Record the primary angle at a counted repetition
    ///
    /// Bottom phases take precedence over top phases when a phase appears in
    /// both lists. Returns the result on the call that completes
    /// calibration and `None` on every other call.
    pub fn record(
        &mut self,
        exercise: &str,
        config: &CalibrationConfig,
        phase: Option<&str>,
        primary_angle: Option<f64>,
    ) -> Option<CalibrationResult> {
        if !config.enabled || self.is_complete() {
            return None;
        }
        let (Some(phase), Some(angle)) = (phase, primary_angle) else {
            return None;
        };

        if config.bottom_states.iter().any(|s| s == phase) {
            self.min_samples.push(angle);
        } else if config.top_states.iter().any(|s| s == phase) {
            self.max_samples.push(angle);
        }

        if self.min_samples.len() < config.reps || self.max_samples.len() < config.reps {
            return None;
        }

        let result = CalibrationResult {
            min_angle: mean(&self.min_samples),
            max_angle: mean(&self.max_samples),
        };
        FormLogger::log_calibration_complete(exercise, result.min_angle, result.max_angle);
        self.result = Some(result);
        self.result
    }

    /// Progress snapshot
    #[must_use]
    pub fn status(&self, config: &CalibrationConfig) -> CalibrationStatus {
        CalibrationStatus {
            enabled: config.enabled,
            is_calibrated: self.is_complete(),
            min_samples: self.min_samples.len(),
            max_samples: self.max_samples.len(),
            required: config.reps,
            result: self.result,
        }
    }

    /// Discard samples and result
    pub fn reset(&mut self) {
        self.min_samples.clear();
        self.max_samples.clear();
        self.result = None;
    }
}

fn mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f64>() / samples.len() as f64
}
