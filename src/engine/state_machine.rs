// ABOUTME: Phase selection and hold tracking for the exercise state machine
// ABOUTME: First matching state in priority order wins; no match keeps the current phase
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::time::Duration;

use crate::conditions::Variables;
use crate::definition::ExerciseDefinition;

/// First state, in priority order, whose condition holds
///
/// Failing conditions are logged and skipped.
#[must_use]
pub fn select_phase<'d>(
    definition: &'d ExerciseDefinition,
    vars: &dyn Variables,
) -> Option<&'d str> {
    definition
        .states_by_priority()
        .find(|state| state.condition.is_satisfied(&state.name, vars))
        .map(|state| state.name.as_str())
}

/// Current and previous phase of one state machine
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhaseTracker {
    current: Option<String>,
    previous: Option<String>,
}

impl PhaseTracker {
    /// Tracker with no phase yet
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Phase after the latest update
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Phase before the latest update
    #[must_use]
    pub fn previous(&self) -> Option<&str> {
        self.previous.as_deref()
    }

    /// Whether the latest update changed the phase
    #[must_use]
    pub fn changed(&self) -> bool {
        self.current != self.previous
    }

    /// Whether the latest update moved from `from` to `to`
    #[must_use]
    pub fn transitioned(&self, from: &str, to: &str) -> bool {
        self.previous() == Some(from) && self.current() == Some(to)
    }

    /// Record the previous phase, then adopt `selected` if any
    pub fn update(&mut self, selected: Option<&str>) {
        self.previous.clone_from(&self.current);
        if let Some(phase) = selected {
            if self.current.as_deref() != Some(phase) {
                self.current = Some(phase.to_owned());
            }
        }
    }

    /// Frame without a usable angle: no edge, phase kept
    pub fn hold(&mut self) {
        self.update(None);
    }
}

/// Hold timing for duration exercises
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HoldTracker {
    holding: bool,
    started_at: Option<Duration>,
    current: Duration,
}

impl HoldTracker {
    /// Whether the athlete is in the hold phase
    #[must_use]
    pub const fn is_holding(&self) -> bool {
        self.holding
    }

    /// Duration of the hold in progress
    #[must_use]
    pub const fn current(&self) -> Duration {
        self.current
    }

    /// Advance hold timing for one frame
    ///
    /// Entering the hold starts the timer, staying accumulates `now - start`,
    /// and leaving resets the duration to zero. Returns true when the hold
    /// that just ended had reached `target`.
    pub fn update(&mut self, in_hold: bool, now: Duration, target: Duration) -> bool {
        if in_hold {
            match (self.holding, self.started_at) {
                (true, Some(start)) => self.current = now.saturating_sub(start),
                _ => {
                    self.started_at = Some(now);
                    self.holding = true;
                }
            }
            return false;
        }

        self.holding = false;
        let completed = self.current >= target;
        self.current = Duration::ZERO;
        completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_match_keeps_phase_without_edge() {
        let mut phases = PhaseTracker::new();
        phases.update(Some("start"));
        assert!(phases.changed());
        phases.update(None);
        assert_eq!(phases.current(), Some("start"));
        assert!(!phases.changed());
    }

    #[test]
    fn test_transition_detection() {
        let mut phases = PhaseTracker::new();
        phases.update(Some("start"));
        phases.update(Some("descent"));
        assert!(phases.transitioned("start", "descent"));
        phases.update(Some("descent"));
        assert!(!phases.transitioned("start", "descent"));
    }

    #[test]
    fn test_hold_counts_only_when_target_reached() {
        let target = Duration::from_secs(2);
        let mut hold = HoldTracker::default();

        assert!(!hold.update(true, Duration::from_secs(10), target));
        assert!(!hold.update(true, Duration::from_secs(11), target));
        assert_eq!(hold.current(), Duration::from_secs(1));
        assert!(!hold.update(false, Duration::from_secs(12), target));
        assert_eq!(hold.current(), Duration::ZERO);

        assert!(!hold.update(true, Duration::from_secs(20), target));
        assert!(!hold.update(true, Duration::from_secs(22), target));
        assert!(hold.update(false, Duration::from_secs(23), target));
        assert!(!hold.is_holding());
    }
}
