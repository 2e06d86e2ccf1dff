// ABOUTME: Turns a raw definition document into a validated ExerciseDefinition
// ABOUTME: Collects every schema, reference, and range violation instead of stopping at the first
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::BTreeSet;
use std::time::Duration;

use pierre_form_core::constants::{defaults, expression, geometry};
use pierre_form_core::errors::{DefinitionError, ExpressionError};
use pierre_form_core::models::{Joint, MovementKind, Severity};
use tracing::warn;

use super::schema::{
    ordered_entries, RawAngle, RawCalibration, RawDocument, RawFeedback, RawFormScore, RawInfo,
    RawSmoothing, RawState,
};
use super::{
    title_case, AngleSpec, CalibrationConfig, CounterRule, ExerciseDefinition, ExerciseInfo,
    ExerciseVariant, FeedbackRule, FormScoreConfig, RepStart, SmoothingConfig, StateRule,
    TempoRange,
};
use crate::conditions::Condition;

/// Values a document inherits when it leaves them out
#[derive(Debug, Clone, Copy)]
pub struct BuildDefaults {
    /// Debounce when neither `min_rep_duration` key is present
    pub min_rep_duration: Duration,
}

impl Default for BuildDefaults {
    fn default() -> Self {
        Self {
            min_rep_duration: Duration::from_secs_f64(defaults::MIN_REP_DURATION_SECS),
        }
    }
}

/// Where a condition is evaluated, which decides the variables it may use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RuleScope {
    State,
    Feedback,
}

/// Validate a raw document and build the definition
///
/// # Errors
///
/// Returns `DefinitionError::Validation` listing every violation found.
pub fn build_definition(
    raw: RawDocument,
    source_name: &str,
    build_defaults: BuildDefaults,
) -> Result<ExerciseDefinition, DefinitionError> {
    let mut checker = Checker::default();

    for (field, present) in [
        ("name", raw.name.is_some()),
        ("angles", raw.angles.is_some()),
        ("states", raw.states.is_some()),
        ("counter", raw.counter.is_some()),
    ] {
        if !present {
            checker.violation(format!("Missing required field: {field}"));
        }
    }

    let kind = checker.movement_kind(raw.kind.as_deref());
    let angles = checker.angles(&raw);
    let states = checker.states(&raw);
    let priority = checker.priority(raw.state_order.as_deref(), &states);
    let counter = checker.counter(&raw, build_defaults);
    let calibration = checker.calibration(raw.calibration.as_ref());
    let smoothing = checker.smoothing(raw.smoothing.as_ref());
    let form_score = checker.form_score(raw.form_score.as_ref());
    let variant = checker.variant(&raw, kind);
    let feedback = checker.feedback(&raw);

    for state in &states {
        checker.condition(&state.condition, "State", &state.name, RuleScope::State, &variant);
    }
    for rule in &feedback {
        checker.condition(&rule.condition, "Feedback", &rule.name, RuleScope::Feedback, &variant);
    }

    let exercise = raw.name.clone().unwrap_or_else(|| source_name.to_owned());
    match (raw.name.as_deref(), counter) {
        (Some(name), Some(counter)) if checker.violations.is_empty() => {
            let info = project_info(&raw, name);
            Ok(ExerciseDefinition {
                name: name.to_owned(),
                display_name: info.display_name.clone(),
                kind,
                angles,
                states,
                priority,
                counter,
                feedback,
                calibration,
                smoothing,
                form_score,
                variant,
                info,
            })
        }
        _ => Err(DefinitionError::Validation {
            exercise,
            violations: checker.violations,
        }),
    }
}

/// Presentation projection; never fails, defaults fill any gap
#[must_use]
pub fn project_info(raw: &RawDocument, fallback_name: &str) -> ExerciseInfo {
    let RawInfo {
        target_muscles,
        equipment,
        default_reps,
        default_sets,
        rest_time,
        benefits,
        difficulty,
        description,
    } = raw.info.clone();

    ExerciseInfo {
        display_name: raw
            .display_name
            .clone()
            .unwrap_or_else(|| title_case(fallback_name)),
        kind: raw
            .kind
            .as_deref()
            .and_then(MovementKind::parse)
            .unwrap_or_default(),
        target_muscles: target_muscles.unwrap_or_default(),
        equipment: equipment.unwrap_or_else(|| defaults::info::EQUIPMENT.to_owned()),
        default_reps: default_reps.unwrap_or(defaults::info::REPS),
        default_sets: default_sets.unwrap_or(defaults::info::SETS),
        rest_time: rest_time.unwrap_or_else(|| defaults::info::REST_TIME.to_owned()),
        benefits: benefits.unwrap_or_default(),
        difficulty: difficulty.unwrap_or_else(|| defaults::info::DIFFICULTY.to_owned()),
        description: description.unwrap_or_default(),
    }
}

#[derive(Default)]
struct Checker {
    violations: Vec<String>,
    angle_names: BTreeSet<String>,
    state_names: BTreeSet<String>,
}

impl Checker {
    fn violation(&mut self, message: impl Into<String>) {
        self.violations.push(message.into());
    }

    fn require_state(&mut self, name: &str, what: &str) {
        if !self.state_names.contains(name) {
            self.violation(format!("{what} '{name}' is not a defined state"));
        }
    }

    fn movement_kind(&mut self, kind: Option<&str>) -> MovementKind {
        match kind {
            None => MovementKind::default(),
            Some(text) => MovementKind::parse(text).unwrap_or_else(|| {
                self.violation(format!(
                    "Unknown type '{text}' (expected repetition or duration)"
                ));
                MovementKind::default()
            }),
        }
    }

    fn angles(&mut self, raw: &RawDocument) -> Vec<AngleSpec> {
        let Some(mapping) = &raw.angles else {
            return Vec::new();
        };
        let entries = ordered_entries::<RawAngle>(mapping, "Angle", &mut self.violations);

        let mut angles = Vec::with_capacity(entries.len());
        for (name, angle) in entries {
            self.angle_names.insert(name.clone());
            let Some(points) = angle.points else {
                self.violation(format!("Angle '{name}' missing 'points' field"));
                continue;
            };
            let joints: Vec<Option<Joint>> = points.iter().map(|p| Joint::parse(p)).collect();
            for (point, joint) in points.iter().zip(&joints) {
                if joint.is_none() {
                    self.violation(format!("Angle '{name}' references unknown joint '{point}'"));
                }
            }
            match joints.as_slice() {
                [Some(a), Some(b), Some(c)] => angles.push(AngleSpec {
                    name,
                    joints: [*a, *b, *c],
                }),
                [_, _, _] => {}
                _ => self.violation(format!("Angle '{name}' must have exactly 3 points")),
            }
        }
        angles
    }

    fn states(&mut self, raw: &RawDocument) -> Vec<StateRule> {
        let Some(mapping) = &raw.states else {
            return Vec::new();
        };
        let entries = ordered_entries::<RawState>(mapping, "State", &mut self.violations);

        let mut states = Vec::with_capacity(entries.len());
        for (name, state) in entries {
            self.state_names.insert(name.clone());
            match state.condition {
                Some(source) => states.push(StateRule {
                    name,
                    condition: Condition::compile(source),
                }),
                None => self.violation(format!("State '{name}' missing 'condition' field")),
            }
        }
        states
    }

    fn priority(&mut self, state_order: Option<&[String]>, states: &[StateRule]) -> Vec<usize> {
        let Some(order) = state_order else {
            return (0..states.len()).collect();
        };
        let mut priority = Vec::with_capacity(order.len());
        for name in order {
            if let Some(index) = states.iter().position(|state| &state.name == name) {
                priority.push(index);
            } else if !self.state_names.contains(name) {
                self.violation(format!(
                    "state_order references undefined state '{name}'"
                ));
            }
        }
        priority
    }

    fn seconds(&mut self, field: &str, value: f64) -> Option<Duration> {
        match Duration::try_from_secs_f64(value) {
            Ok(duration) => Some(duration),
            Err(_) => {
                self.violation(format!("{field} must be a non-negative number of seconds"));
                None
            }
        }
    }

    fn counter(&mut self, raw: &RawDocument, build_defaults: BuildDefaults) -> Option<CounterRule> {
        let counter = raw.counter.as_ref()?;

        let min_rep_duration = match counter.min_rep_duration.or(raw.min_rep_duration) {
            Some(seconds) => self.seconds("min_rep_duration", seconds),
            None => Some(build_defaults.min_rep_duration),
        };

        let Some(trigger_state) = counter.trigger_state.clone() else {
            self.violation("Counter missing 'trigger_state' field");
            return None;
        };
        self.require_state(&trigger_state, "Counter trigger_state");
        if let Some(from_state) = &counter.from_state {
            self.require_state(from_state, "Counter from_state");
        }

        Some(CounterRule {
            trigger_state,
            from_state: counter.from_state.clone(),
            min_rep_duration: min_rep_duration?,
        })
    }

    fn feedback(&mut self, raw: &RawDocument) -> Vec<FeedbackRule> {
        let Some(mapping) = &raw.feedback else {
            return Vec::new();
        };
        let entries = ordered_entries::<RawFeedback>(mapping, "Feedback", &mut self.violations);

        let mut rules = Vec::with_capacity(entries.len());
        for (name, rule) in entries {
            let severity = match rule.severity.as_deref() {
                None => Severity::default(),
                Some(text) => Severity::parse(text).unwrap_or_else(|| {
                    self.violation(format!(
                        "Feedback '{name}' has unknown severity '{text}' (expected info, warning, or error)"
                    ));
                    Severity::default()
                }),
            };
            let Some(source) = rule.condition else {
                self.violation(format!("Feedback '{name}' missing 'condition' field"));
                continue;
            };
            rules.push(FeedbackRule {
                name,
                condition: Condition::compile(source),
                message: rule
                    .message
                    .unwrap_or_else(|| defaults::FEEDBACK_MESSAGE.to_owned()),
                severity,
            });
        }
        rules
    }

    fn calibration(&mut self, raw: Option<&RawCalibration>) -> CalibrationConfig {
        let raw = raw.cloned().unwrap_or_default();
        let reps = raw.reps.map_or(defaults::CALIBRATION_REPS, |reps| reps as usize);
        if reps == 0 {
            self.violation("calibration.reps must be at least 1");
        }
        CalibrationConfig {
            enabled: raw.enabled.unwrap_or(false),
            reps: reps.max(1),
            bottom_states: raw
                .bottom_states
                .unwrap_or_else(|| to_owned_list(&defaults::BOTTOM_STATES)),
            top_states: raw
                .top_states
                .unwrap_or_else(|| to_owned_list(&defaults::TOP_STATES)),
        }
    }

    fn smoothing(&mut self, raw: Option<&RawSmoothing>) -> SmoothingConfig {
        let raw = raw.cloned().unwrap_or_default();
        let window = raw.window.map_or(defaults::SMOOTHING_WINDOW, |window| window as usize);
        if window == 0 {
            self.violation("smoothing.window must be at least 1");
        }
        SmoothingConfig {
            enabled: raw.enabled.unwrap_or(false),
            window: window.max(1),
        }
    }

    fn form_score(&mut self, raw: Option<&RawFormScore>) -> FormScoreConfig {
        let raw = raw.cloned().unwrap_or_default();

        let mut ideal_angles = Vec::new();
        if let Some(mapping) = &raw.ideal_angles {
            for (name, degrees) in ordered_entries::<f64>(mapping, "ideal_angles", &mut self.violations) {
                if !self.angle_names.contains(&name) {
                    self.violation(format!("ideal_angles references undefined angle '{name}'"));
                }
                ideal_angles.push((name, degrees));
            }
        }

        let tempo_raw = raw.tempo_range.unwrap_or_default();
        let tempo = TempoRange {
            min: tempo_raw.min.unwrap_or(defaults::TEMPO_MIN_SECS),
            max: tempo_raw.max.unwrap_or(defaults::TEMPO_MAX_SECS),
        };
        if !(tempo.min >= 0.0 && tempo.min <= tempo.max) {
            self.violation(format!(
                "tempo_range must satisfy 0 <= min <= max, got min={} max={}",
                tempo.min, tempo.max
            ));
        }

        let rep_start = match raw.rep_start {
            Some(explicit) => {
                let rep_start = RepStart {
                    from: explicit
                        .from
                        .unwrap_or_else(|| defaults::REP_START_FROM.to_owned()),
                    to: explicit.to.unwrap_or_else(|| defaults::REP_START_TO.to_owned()),
                };
                self.require_state(&rep_start.from, "rep_start.from");
                self.require_state(&rep_start.to, "rep_start.to");
                rep_start
            }
            None => RepStart {
                from: defaults::REP_START_FROM.to_owned(),
                to: defaults::REP_START_TO.to_owned(),
            },
        };

        FormScoreConfig {
            ideal_angles,
            tempo,
            rep_start,
        }
    }

    fn variant(&mut self, raw: &RawDocument, kind: MovementKind) -> ExerciseVariant {
        if kind == MovementKind::Duration {
            let seconds = raw
                .target_duration
                .unwrap_or(defaults::TARGET_DURATION_SECS);
            if seconds <= 0.0 {
                self.violation(format!("target_duration must be positive, got {seconds}"));
            }
            let target = self
                .seconds("target_duration", seconds)
                .unwrap_or_default();
            let hold_state = raw
                .hold_state
                .clone()
                .unwrap_or_else(|| defaults::HOLD_STATE.to_owned());
            if raw.states.is_some() {
                self.require_state(&hold_state, "hold_state");
            }
            return ExerciseVariant::Duration { target, hold_state };
        }

        if raw.bilateral.unwrap_or(false) {
            let sides = raw
                .sides
                .clone()
                .unwrap_or_else(|| to_owned_list(&defaults::SIDES));
            if sides.is_empty() {
                self.violation("sides must name at least one angle");
            }
            for side in &sides {
                if !self.angle_names.contains(side) {
                    self.violation(format!("Side '{side}' is not a defined angle"));
                }
            }
            return ExerciseVariant::Bilateral { sides };
        }

        ExerciseVariant::Standard
    }

    fn condition(
        &mut self,
        condition: &Condition,
        section: &str,
        rule: &str,
        scope: RuleScope,
        variant: &ExerciseVariant,
    ) {
        match condition.compile_error() {
            Some(ExpressionError::Unsafe { fragment }) => {
                warn!(
                    section,
                    rule,
                    fragment = %fragment,
                    expression = condition.source(),
                    "Unsafe condition kept; it will evaluate as false"
                );
                return;
            }
            Some(error) => {
                self.violation(format!("{section} '{rule}' condition is invalid: {error}"));
                return;
            }
            None => {}
        }

        for variable in condition.variables() {
            if !self.resolves(&variable, scope, variant) {
                self.violation(format!(
                    "{section} '{rule}' condition references unknown variable '{variable}'"
                ));
            }
        }
    }

    fn resolves(&self, variable: &str, scope: RuleScope, variant: &ExerciseVariant) -> bool {
        if variable == geometry::ANGLE_ALIAS {
            let side_bound =
                scope == RuleScope::State && matches!(variant, ExerciseVariant::Bilateral { .. });
            return side_bound || self.angle_names.contains(geometry::PRIMARY_ANGLE);
        }
        if let Some(angle) = variable.strip_suffix(geometry::ANGLE_SUFFIX) {
            if self.angle_names.contains(angle) {
                return true;
            }
        }
        if let Some(joint) = variable
            .strip_suffix("_x")
            .or_else(|| variable.strip_suffix("_y"))
        {
            if Joint::parse(joint).is_some() {
                return true;
            }
        }
        if scope == RuleScope::Feedback {
            return feedback_key(variable, variant);
        }
        false
    }
}

fn feedback_key(variable: &str, variant: &ExerciseVariant) -> bool {
    if variable == expression::COUNTER_KEY {
        return true;
    }
    match variant {
        ExerciseVariant::Bilateral { sides } => variable
            .strip_prefix(expression::COUNTER_KEY)
            .and_then(|rest| rest.strip_prefix('_'))
            .is_some_and(|side| sides.iter().any(|s| s == side)),
        ExerciseVariant::Duration { .. } => variable == expression::HOLD_DURATION_KEY,
        ExerciseVariant::Standard => false,
    }
}

fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| (*item).to_owned()).collect()
}
