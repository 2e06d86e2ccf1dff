// ABOUTME: Mutable per-session state for one exercise: phases, counters, scoring, calibration
// ABOUTME: Variant-specific state is a tagged enum chosen once from the definition
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::calibration::Calibrator;
use super::counter::RepCounter;
use super::results::{HoldStatus, SessionSummary, SideStatus};
use super::scoring::ScoreTracker;
use super::state_machine::{HoldTracker, PhaseTracker};
use crate::definition::{ExerciseDefinition, ExerciseVariant};
use crate::geometry::AngleSmoother;
use crate::logging::FormLogger;

/// Phase machine and counter of one bilateral side
#[derive(Debug, Clone, PartialEq)]
pub struct SideState {
    /// Side name, also the name of its angle
    pub name: String,
    /// Phase of this side
    pub phases: PhaseTracker,
    /// Count of this side
    pub counter: RepCounter,
}

impl SideState {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            phases: PhaseTracker::new(),
            counter: RepCounter::default(),
        }
    }

    fn status(&self) -> SideStatus {
        SideStatus {
            counter: self.counter.count(),
            phase: self.phases.current().map(str::to_owned),
        }
    }
}

/// Variant-specific session state
#[derive(Debug, Clone, PartialEq)]
pub enum VariantState {
    /// Single phase machine
    Standard {
        /// Phase tracking
        phases: PhaseTracker,
        /// Repetition count
        counter: RepCounter,
    },
    /// One machine per side
    Bilateral {
        /// Sides in declaration order
        sides: Vec<SideState>,
    },
    /// Counted by completed holds
    Duration {
        /// Phase tracking
        phases: PhaseTracker,
        /// Completed holds
        counter: RepCounter,
        /// Hold timing
        hold: HoldTracker,
        /// Hold needed for a count
        target: Duration,
        /// Phase that counts as holding
        hold_state: String,
    },
}

impl VariantState {
    /// Fresh state for a definition's variant
    #[must_use]
    pub fn for_variant(variant: &ExerciseVariant) -> Self {
        match variant {
            ExerciseVariant::Standard => Self::Standard {
                phases: PhaseTracker::new(),
                counter: RepCounter::default(),
            },
            ExerciseVariant::Bilateral { sides } => Self::Bilateral {
                sides: sides.iter().map(|side| SideState::new(side)).collect(),
            },
            ExerciseVariant::Duration { target, hold_state } => Self::Duration {
                phases: PhaseTracker::new(),
                counter: RepCounter::default(),
                hold: HoldTracker::default(),
                target: *target,
                hold_state: hold_state.clone(),
            },
        }
    }

    /// Total repetitions; bilateral totals are the sum of the sides
    #[must_use]
    pub fn counter(&self) -> u32 {
        match self {
            Self::Standard { counter, .. } | Self::Duration { counter, .. } => counter.count(),
            Self::Bilateral { sides } => sides.iter().map(|side| side.counter.count()).sum(),
        }
    }

    /// Current phase of a single-machine variant
    #[must_use]
    pub fn phase(&self) -> Option<&str> {
        match self {
            Self::Standard { phases, .. } | Self::Duration { phases, .. } => phases.current(),
            Self::Bilateral { .. } => None,
        }
    }

    /// Per-side status of a bilateral variant
    #[must_use]
    pub fn side_statuses(&self) -> Option<BTreeMap<String, SideStatus>> {
        match self {
            Self::Bilateral { sides } => Some(
                sides
                    .iter()
                    .map(|side| (side.name.clone(), side.status()))
                    .collect(),
            ),
            _ => None,
        }
    }

    /// Hold timing of a duration variant
    #[must_use]
    pub fn hold_status(&self) -> Option<HoldStatus> {
        match self {
            Self::Duration { hold, target, .. } => Some(HoldStatus {
                current_duration: hold.current().as_secs_f64(),
                target_duration: target.as_secs_f64(),
                is_holding: hold.is_holding(),
            }),
            _ => None,
        }
    }
}

/// State of one athlete performing one exercise
///
/// Processing needs `&mut self`, so a session is never mutated from two
/// threads at once. Independent sessions can run on different threads.
#[derive(Debug, Clone)]
pub struct ExerciseSession {
    pub(crate) id: Uuid,
    pub(crate) started_at: DateTime<Utc>,
    pub(crate) definition: Arc<ExerciseDefinition>,
    pub(crate) smoother: AngleSmoother,
    pub(crate) scores: ScoreTracker,
    pub(crate) calibrator: Calibrator,
    pub(crate) variant: VariantState,
    pub(crate) last_angles: BTreeMap<String, f64>,
    pub(crate) frames_processed: u64,
}

impl ExerciseSession {
    /// Fresh session for a loaded definition
    #[must_use]
    pub fn new(definition: Arc<ExerciseDefinition>) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            smoother: AngleSmoother::new(definition.smoothing.window),
            scores: ScoreTracker::default(),
            calibrator: Calibrator::default(),
            variant: VariantState::for_variant(&definition.variant),
            last_angles: BTreeMap::new(),
            frames_processed: 0,
            definition,
        }
    }

    /// Session identifier
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Wall-clock start (or last reset)
    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Definition driving this session
    #[must_use]
    pub fn definition(&self) -> &ExerciseDefinition {
        &self.definition
    }

    /// Variant-specific state
    #[must_use]
    pub const fn variant(&self) -> &VariantState {
        &self.variant
    }

    /// Total repetitions
    #[must_use]
    pub fn counter(&self) -> u32 {
        self.variant.counter()
    }

    /// Current phase (`None` for bilateral sessions)
    #[must_use]
    pub fn phase(&self) -> Option<&str> {
        self.variant.phase()
    }

    /// Scoring state
    #[must_use]
    pub const fn scores(&self) -> &ScoreTracker {
        &self.scores
    }

    /// Calibration state
    #[must_use]
    pub const fn calibrator(&self) -> &Calibrator {
        &self.calibrator
    }

    /// Frames that carried a pose
    #[must_use]
    pub const fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    /// Restore every field to its initial value, keeping the identifier
    pub fn reset(&mut self) {
        self.started_at = Utc::now();
        self.smoother.clear();
        self.scores.reset();
        self.calibrator.reset();
        self.variant = VariantState::for_variant(&self.definition.variant);
        self.last_angles.clear();
        self.frames_processed = 0;
        FormLogger::log_session_reset(&self.definition.name, &self.id.to_string());
    }

    /// Snapshot of the whole session
    #[must_use]
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            session_id: self.id,
            exercise: self.definition.name.clone(),
            display_name: self.definition.display_name.clone(),
            variant: self.definition.variant.label().to_owned(),
            started_at: self.started_at,
            frames_processed: self.frames_processed,
            counter: self.counter(),
            sides: self.variant.side_statuses(),
            phase: self.phase().map(str::to_owned),
            angles: self.last_angles.clone(),
            form_score: self.scores.current(),
            average_score: self.scores.average(),
            grade: self.scores.grade(),
            active_feedback: self.scores.active_feedback(),
            calibration: self.calibrator.status(&self.definition.calibration),
            rep_durations: self.scores.rep_durations().to_vec(),
            rep_scores: self.scores.rep_scores().to_vec(),
            hold: self.variant.hold_status(),
        }
    }
}
