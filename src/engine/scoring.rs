// ABOUTME: Form score (0-100) from angle deviation, repetition tempo, and active feedback
// ABOUTME: Tracks repetition timing and the per-rep score history behind the running average
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Form Scoring
//!
//! ```text
//! score = 100 - min(angle, 40) - min(tempo, 30) - min(feedback, 30)
//! ```
//!
//! - angle: `(|current - ideal| / 10) * 5` averaged over the ideal targets
//!   present this frame
//! - tempo: judged on the last completed repetition only; too fast costs
//!   15 per half second under the minimum, too slow costs 10 per second
//!   over the maximum
//! - feedback: 10 per active message
//!
//! Each component is truncated to an integer before capping.

use std::collections::BTreeMap;
use std::time::Duration;

use pierre_form_core::constants::scoring::{
    ANGLE_DEVIATION_STEP_DEG, ANGLE_PENALTY_CAP, ANGLE_POINTS_PER_STEP, FAST_TEMPO_POINTS_PER_STEP,
    FAST_TEMPO_STEP_SECS, FEEDBACK_PENALTY_CAP, FEEDBACK_POINTS_PER_MESSAGE, MAX_SCORE,
    SLOW_TEMPO_POINTS_PER_SEC, TEMPO_PENALTY_CAP,
};
use pierre_form_core::models::FormGrade;

use crate::definition::{FormScoreConfig, TempoRange};

/// Mean deviation penalty over ideal targets present in `angles`
///
/// Missing or zero angles are skipped; no usable target means no penalty.
#[must_use]
pub fn angle_penalty(ideal_angles: &[(String, f64)], angles: &BTreeMap<String, f64>) -> u32 {
    let penalties: Vec<f64> = ideal_angles
        .iter()
        .filter_map(|(name, ideal)| {
            angles
                .get(name)
                .copied()
                .filter(|current| *current != 0.0)
                .map(|current| {
                    (current - ideal).abs() / ANGLE_DEVIATION_STEP_DEG * ANGLE_POINTS_PER_STEP
                })
        })
        .collect();

    if penalties.is_empty() {
        return 0;
    }
    (penalties.iter().sum::<f64>() / penalties.len() as f64) as u32
}

/// Penalty for the most recent repetition duration
#[must_use]
pub fn tempo_penalty(last_duration: Option<f64>, tempo: &TempoRange) -> u32 {
    let Some(duration) = last_duration else {
        return 0;
    };
    if duration < tempo.min {
        ((tempo.min - duration) / FAST_TEMPO_STEP_SECS * FAST_TEMPO_POINTS_PER_STEP) as u32
    } else if duration > tempo.max {
        ((duration - tempo.max) * SLOW_TEMPO_POINTS_PER_SEC) as u32
    } else {
        0
    }
}

/// Penalty for active feedback messages
#[must_use]
pub fn feedback_penalty(active: usize) -> u32 {
    u32::try_from(active)
        .unwrap_or(u32::MAX)
        .saturating_mul(FEEDBACK_POINTS_PER_MESSAGE)
}

/// Combine capped penalties into a 0-100 score
#[must_use]
pub fn form_score(angle: u32, tempo: u32, feedback: u32) -> u32 {
    MAX_SCORE
        .saturating_sub(angle.min(ANGLE_PENALTY_CAP))
        .saturating_sub(tempo.min(TEMPO_PENALTY_CAP))
        .saturating_sub(feedback.min(FEEDBACK_PENALTY_CAP))
}

/// Scoring state carried across frames of one session
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreTracker {
    rep_started_at: Option<Duration>,
    rep_durations: Vec<f64>,
    rep_scores: Vec<u32>,
    active_feedback: usize,
    current: u32,
    average: u32,
}

impl Default for ScoreTracker {
    fn default() -> Self {
        Self {
            rep_started_at: None,
            rep_durations: Vec::new(),
            rep_scores: Vec::new(),
            active_feedback: 0,
            current: MAX_SCORE,
            average: MAX_SCORE,
        }
    }
}

impl ScoreTracker {
    /// Score of the latest frame
    #[must_use]
    pub const fn current(&self) -> u32 {
        self.current
    }

    /// Integer mean of per-rep scores
    #[must_use]
    pub const fn average(&self) -> u32 {
        self.average
    }

    /// Feedback messages active on the latest scored frame
    #[must_use]
    pub const fn active_feedback(&self) -> usize {
        self.active_feedback
    }

    /// Grade for the current score
    #[must_use]
    pub const fn grade(&self) -> FormGrade {
        FormGrade::from_score(self.current)
    }

    /// Completed repetition durations in seconds
    #[must_use]
    pub fn rep_durations(&self) -> &[f64] {
        &self.rep_durations
    }

    /// Score recorded for each completed repetition
    #[must_use]
    pub fn rep_scores(&self) -> &[u32] {
        &self.rep_scores
    }

    /// Start timing a repetition
    pub fn start_rep(&mut self, now: Duration) {
        self.rep_started_at = Some(now);
    }

    /// Score one frame and remember it as current
    pub fn score_frame(
        &mut self,
        config: &FormScoreConfig,
        angles: &BTreeMap<String, f64>,
        active_feedback: usize,
    ) -> u32 {
        let angle = angle_penalty(&config.ideal_angles, angles);
        let tempo = tempo_penalty(self.rep_durations.last().copied(), &config.tempo);
        let feedback = feedback_penalty(active_feedback);
        self.active_feedback = active_feedback;
        self.current = form_score(angle, tempo, feedback);
        self.current
    }

    /// Close the repetition counted this frame
    ///
    /// The duration is recorded only if a repetition timer was running; the
    /// current score always joins the history.
    pub fn complete_rep(&mut self, now: Duration) {
        if let Some(started) = self.rep_started_at.take() {
            self.rep_durations
                .push(now.saturating_sub(started).as_secs_f64());
        }
        self.rep_scores.push(self.current);
        let total: u64 = self.rep_scores.iter().map(|s| u64::from(*s)).sum();
        self.average = u32::try_from(total / self.rep_scores.len() as u64).unwrap_or(MAX_SCORE);
    }

    /// Back to a perfect score with no history
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::RepStart;

    fn tempo() -> TempoRange {
        TempoRange { min: 1.0, max: 3.0 }
    }

    #[test]
    fn test_angle_penalty_averages_present_targets() {
        let ideal = vec![("primary".to_owned(), 90.0), ("back".to_owned(), 170.0)];
        let mut angles = BTreeMap::new();
        angles.insert("primary".to_owned(), 100.0);
        assert_eq!(angle_penalty(&ideal, &angles), 5);

        angles.insert("back".to_owned(), 150.0);
        assert_eq!(angle_penalty(&ideal, &angles), 7);
        assert_eq!(angle_penalty(&ideal, &BTreeMap::new()), 0);
    }

    #[test]
    fn test_tempo_penalties() {
        assert_eq!(tempo_penalty(None, &tempo()), 0);
        assert_eq!(tempo_penalty(Some(0.5), &tempo()), 15);
        assert_eq!(tempo_penalty(Some(2.0), &tempo()), 0);
        assert_eq!(tempo_penalty(Some(4.5), &tempo()), 15);
    }

    #[test]
    fn test_caps_and_floor() {
        assert_eq!(form_score(0, 0, 0), 100);
        assert_eq!(form_score(5, 15, 30), 50);
        assert_eq!(form_score(400, 300, 300), 0);
        assert_eq!(form_score(0, 0, feedback_penalty(3)), 70);
    }

    #[test]
    fn test_rep_history_and_average() {
        let config = FormScoreConfig {
            ideal_angles: vec![("primary".to_owned(), 90.0)],
            tempo: tempo(),
            rep_start: RepStart {
                from: "start".to_owned(),
                to: "descent".to_owned(),
            },
        };
        let mut angles = BTreeMap::new();
        angles.insert("primary".to_owned(), 90.0);

        let mut tracker = ScoreTracker::default();
        tracker.start_rep(Duration::from_secs(1));
        assert_eq!(tracker.score_frame(&config, &angles, 0), 100);
        tracker.complete_rep(Duration::from_millis(1500));
        assert_eq!(tracker.rep_durations(), &[0.5]);

        assert_eq!(tracker.score_frame(&config, &angles, 1), 75);
        assert_eq!(tracker.active_feedback(), 1);
        tracker.complete_rep(Duration::from_secs(3));
        assert_eq!(tracker.rep_scores(), &[100, 75]);
        assert_eq!(tracker.average(), 87);
        assert_eq!(tracker.rep_durations().len(), 1);

        tracker.reset();
        assert_eq!(tracker.active_feedback(), 0);
        assert_eq!(tracker.current(), 100);
        assert!(tracker.rep_scores().is_empty());
    }
}
