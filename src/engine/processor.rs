// ABOUTME: Frame processor driving geometry, phases, counting, feedback, and scoring
// ABOUTME: Single dispatch point over the session's variant; time comes from the injected clock
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use pierre_form_core::constants::expression::{COUNTER_KEY, HOLD_DURATION_KEY};
use pierre_form_core::constants::geometry::ANGLE_ALIAS;
use pierre_form_core::models::{FeedbackMessage, PoseFrame};
use tracing::{debug, trace};

use super::calibration::Calibrator;
use super::clock::{Clock, SystemClock};
use super::counter::RepCounter;
use super::feedback::evaluate_feedback;
use super::results::FrameResult;
use super::scoring::ScoreTracker;
use super::session::{ExerciseSession, SideState, VariantState};
use super::state_machine::{select_phase, HoldTracker, PhaseTracker};
use crate::conditions::Overlay;
use crate::definition::ExerciseDefinition;
use crate::geometry::{build_frame_geometry, FrameGeometry};
use crate::logging::FormLogger;

/// Reported when a frame carries no pose
pub const NO_DETECTION: &str = "No landmarks detected";

/// What one variant step produced
struct StepOutcome {
    feedback: Vec<FeedbackMessage>,
    reps_completed: u32,
}

/// Stateless frame processor
///
/// Holds only the clock; all mutable state lives in [`ExerciseSession`].
#[derive(Debug, Clone)]
pub struct ExerciseEngine {
    clock: Arc<dyn Clock>,
}

impl Default for ExerciseEngine {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock::new()))
    }
}

impl ExerciseEngine {
    /// Engine reading time from `clock`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Clock read once per processed frame
    #[must_use]
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Fresh session for a definition
    #[must_use]
    pub fn start_session(&self, definition: Arc<ExerciseDefinition>) -> ExerciseSession {
        let session = ExerciseSession::new(definition);
        debug!(
            session.id = %session.id,
            exercise.name = %session.definition.name,
            exercise.variant = session.definition.variant.label(),
            "Exercise session started"
        );
        session
    }

    /// Advance a session by one frame
    ///
    /// A missing frame or one without landmarks leaves the session untouched
    /// and returns a result with `success == false`.
    pub fn process_frame(
        &self,
        session: &mut ExerciseSession,
        frame: Option<&PoseFrame>,
    ) -> FrameResult {
        let Some(frame) = frame.filter(|frame| !frame.is_empty()) else {
            trace!(session.id = %session.id, "Frame without landmarks skipped");
            return no_detection(session, self.clock.now());
        };

        let now = self.clock.now();
        let definition = Arc::clone(&session.definition);
        let geometry = build_frame_geometry(&definition, frame, &mut session.smoother);

        let outcome = match &mut session.variant {
            VariantState::Standard { phases, counter } => step_standard(
                &definition,
                &geometry,
                phases,
                counter,
                &mut session.scores,
                &mut session.calibrator,
                now,
            ),
            VariantState::Bilateral { sides } => step_bilateral(&definition, &geometry, sides, now),
            VariantState::Duration {
                phases,
                counter,
                hold,
                target,
                hold_state,
            } => step_duration(
                &definition,
                &geometry,
                phases,
                counter,
                hold,
                (*target, hold_state.as_str()),
                now,
            ),
        };

        session.scores.score_frame(
            &definition.form_score,
            &geometry.angles,
            outcome.feedback.len(),
        );
        for _ in 0..outcome.reps_completed {
            session.scores.complete_rep(now);
        }

        session.frames_processed += 1;
        session.last_angles.clone_from(&geometry.angles);

        FrameResult {
            success: true,
            error: None,
            exercise: definition.name.clone(),
            counter: session.counter(),
            sides: session.variant.side_statuses(),
            phase: session.phase().map(str::to_owned),
            angles: geometry.angles,
            raw_angles: geometry.raw_angles,
            feedback: outcome.feedback,
            counted: outcome.reps_completed > 0,
            form_score: session.scores.current(),
            average_score: session.scores.average(),
            grade: session.scores.grade(),
            hold: session.variant.hold_status(),
            timestamp: now.as_secs_f64(),
        }
    }
}

fn no_detection(session: &ExerciseSession, now: Duration) -> FrameResult {
    FrameResult {
        success: false,
        error: Some(NO_DETECTION.to_owned()),
        exercise: session.definition.name.clone(),
        counter: session.counter(),
        sides: session.variant.side_statuses(),
        phase: session.phase().map(str::to_owned),
        angles: BTreeMap::new(),
        raw_angles: BTreeMap::new(),
        feedback: Vec::new(),
        counted: false,
        form_score: session.scores.current(),
        average_score: session.scores.average(),
        grade: session.scores.grade(),
        hold: session.variant.hold_status(),
        timestamp: now.as_secs_f64(),
    }
}

fn step_standard(
    definition: &ExerciseDefinition,
    geometry: &FrameGeometry,
    phases: &mut PhaseTracker,
    counter: &mut RepCounter,
    scores: &mut ScoreTracker,
    calibrator: &mut Calibrator,
    now: Duration,
) -> StepOutcome {
    phases.update(select_phase(definition, &geometry.context));

    let rep_start = &definition.form_score.rep_start;
    if phases.transitioned(&rep_start.from, &rep_start.to) {
        scores.start_rep(now);
    }

    let counted = counter.try_count(phases, &definition.counter, now);
    if counted {
        FormLogger::log_rep_counted(
            &definition.name,
            None,
            counter.count(),
            phases.current().unwrap_or_default(),
        );
        calibrator.record(
            &definition.name,
            &definition.calibration,
            phases.current(),
            geometry.primary_angle(),
        );
    }

    let vars = Overlay::new(&geometry.context).bind(COUNTER_KEY, f64::from(counter.count()));
    StepOutcome {
        feedback: evaluate_feedback(&definition.feedback, &vars),
        reps_completed: u32::from(counted),
    }
}

fn step_bilateral(
    definition: &ExerciseDefinition,
    geometry: &FrameGeometry,
    sides: &mut [SideState],
    now: Duration,
) -> StepOutcome {
    let mut reps_completed = 0;

    for side in &mut *sides {
        match geometry.angle(&side.name) {
            Some(side_angle) => {
                let vars = Overlay::new(&geometry.context).bind(ANGLE_ALIAS, side_angle);
                side.phases.update(select_phase(definition, &vars));
            }
            None => side.phases.hold(),
        }

        if side.counter.try_count(&side.phases, &definition.counter, now) {
            reps_completed += 1;
            FormLogger::log_rep_counted(
                &definition.name,
                Some(side.name.as_str()),
                side.counter.count(),
                side.phases.current().unwrap_or_default(),
            );
        }
    }

    let total: u32 = sides.iter().map(|side| side.counter.count()).sum();
    let vars = sides.iter().fold(
        Overlay::new(&geometry.context).bind(COUNTER_KEY, f64::from(total)),
        |vars, side| {
            vars.bind(
                format!("{COUNTER_KEY}_{}", side.name),
                f64::from(side.counter.count()),
            )
        },
    );

    StepOutcome {
        feedback: evaluate_feedback(&definition.feedback, &vars),
        reps_completed,
    }
}

fn step_duration(
    definition: &ExerciseDefinition,
    geometry: &FrameGeometry,
    phases: &mut PhaseTracker,
    counter: &mut RepCounter,
    hold: &mut HoldTracker,
    (target, hold_state): (Duration, &str),
    now: Duration,
) -> StepOutcome {
    phases.update(select_phase(definition, &geometry.context));

    let in_hold = phases.current() == Some(hold_state);
    let completed = hold.update(in_hold, now, target);
    if completed {
        counter.record(now);
        FormLogger::log_rep_counted(
            &definition.name,
            None,
            counter.count(),
            phases.current().unwrap_or_default(),
        );
    }

    let vars = Overlay::new(&geometry.context)
        .bind(COUNTER_KEY, f64::from(counter.count()))
        .bind(HOLD_DURATION_KEY, hold.current().as_secs_f64());
    StepOutcome {
        feedback: evaluate_feedback(&definition.feedback, &vars),
        reps_completed: u32::from(completed),
    }
}
