// ABOUTME: Serializable per-frame results and on-demand session summaries
// ABOUTME: Carries counters, phases, angles, feedback, scores, and hold or side status
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use pierre_form_core::models::{FeedbackMessage, FormGrade};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::calibration::CalibrationStatus;

/// Status of one side of a bilateral exercise
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideStatus {
    /// Repetitions counted on this side
    pub counter: u32,
    /// Current phase of this side
    pub phase: Option<String>,
}

/// Hold timing of a duration exercise
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoldStatus {
    /// Seconds held so far
    pub current_duration: f64,
    /// Seconds needed for a count
    pub target_duration: f64,
    /// Whether the hold phase is active
    pub is_holding: bool,
}

/// Outcome of processing one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameResult {
    /// False when the frame carried no pose
    pub success: bool,
    /// Why the frame was not processed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Exercise machine name
    pub exercise: String,
    /// Total repetitions (sum of sides for bilateral exercises)
    pub counter: u32,
    /// Per-side status, bilateral exercises only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sides: Option<BTreeMap<String, SideStatus>>,
    /// Current phase, single-machine exercises only
    pub phase: Option<String>,
    /// Reported angles
    pub angles: BTreeMap<String, f64>,
    /// Angles before smoothing
    pub raw_angles: BTreeMap<String, f64>,
    /// Active feedback in declaration order
    pub feedback: Vec<FeedbackMessage>,
    /// Whether a repetition was counted on this frame
    pub counted: bool,
    /// Score of this frame
    pub form_score: u32,
    /// Running per-rep average
    pub average_score: u32,
    /// Grade of this frame's score
    pub grade: FormGrade,
    /// Hold timing, duration exercises only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hold: Option<HoldStatus>,
    /// Clock reading for this frame, seconds
    pub timestamp: f64,
}

/// Snapshot of a whole session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Session identifier
    pub session_id: Uuid,
    /// Exercise machine name
    pub exercise: String,
    /// Exercise display name
    pub display_name: String,
    /// `standard`, `bilateral`, or `duration`
    pub variant: String,
    /// Wall-clock session start
    pub started_at: DateTime<Utc>,
    /// Frames that carried a pose
    pub frames_processed: u64,
    /// Total repetitions
    pub counter: u32,
    /// Per-side status, bilateral exercises only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sides: Option<BTreeMap<String, SideStatus>>,
    /// Current phase, single-machine exercises only
    pub phase: Option<String>,
    /// Angles from the last processed frame
    pub angles: BTreeMap<String, f64>,
    /// Score of the last processed frame
    pub form_score: u32,
    /// Running per-rep average
    pub average_score: u32,
    /// Grade of the last score
    pub grade: FormGrade,
    /// Feedback messages active on the last processed frame
    pub active_feedback: usize,
    /// Calibration progress
    pub calibration: CalibrationStatus,
    /// Completed repetition durations, seconds
    pub rep_durations: Vec<f64>,
    /// Score recorded per completed repetition
    pub rep_scores: Vec<u32>,
    /// Hold timing, duration exercises only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hold: Option<HoldStatus>,
}
