// ABOUTME: Edge-triggered, time-debounced repetition counter
// ABOUTME: Counts only a real transition into the trigger phase past the debounce window
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::time::Duration;

use super::state_machine::PhaseTracker;
use crate::definition::CounterRule;

/// Repetition count and the time of the last count
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepCounter {
    count: u32,
    last_count_at: Option<Duration>,
}

impl RepCounter {
    /// Repetitions counted so far
    #[must_use]
    pub const fn count(&self) -> u32 {
        self.count
    }

    /// Time of the last successful count
    #[must_use]
    pub const fn last_count_at(&self) -> Option<Duration> {
        self.last_count_at
    }

    /// Count one repetition if every clause holds
    ///
    /// The phase changed this frame, the new phase is the trigger, the
    /// left phase matches `from_state` when one is set, and at least
    /// `min_rep_duration` has passed since the last count. The first count
    /// of a session is never debounced.
    pub fn try_count(&mut self, phases: &PhaseTracker, rule: &CounterRule, now: Duration) -> bool {
        let reached_trigger = phases.current() == Some(rule.trigger_state.as_str());
        let from_valid = rule
            .from_state
            .as_deref()
            .is_none_or(|from| phases.previous() == Some(from));
        let debounced = self
            .last_count_at
            .is_none_or(|last| now.saturating_sub(last) >= rule.min_rep_duration);

        if phases.changed() && reached_trigger && from_valid && debounced {
            self.record(now);
            true
        } else {
            false
        }
    }

    /// Count unconditionally (completed holds)
    pub fn record(&mut self, now: Duration) {
        self.count += 1;
        self.last_count_at = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(from_state: Option<&str>) -> CounterRule {
        CounterRule {
            trigger_state: "bottom".to_owned(),
            from_state: from_state.map(str::to_owned),
            min_rep_duration: Duration::from_millis(500),
        }
    }

    fn step(phases: &mut PhaseTracker, phase: &str) {
        phases.update(Some(phase));
    }

    #[test]
    fn test_reconfirming_trigger_does_not_count() {
        let mut phases = PhaseTracker::new();
        let mut counter = RepCounter::default();
        let rule = rule(None);

        step(&mut phases, "bottom");
        assert!(counter.try_count(&phases, &rule, Duration::from_secs(1)));
        step(&mut phases, "bottom");
        assert!(!counter.try_count(&phases, &rule, Duration::from_secs(5)));
        assert_eq!(counter.count(), 1);
    }

    #[test]
    fn test_debounce_blocks_then_allows() {
        let mut phases = PhaseTracker::new();
        let mut counter = RepCounter::default();
        let rule = rule(None);

        step(&mut phases, "bottom");
        assert!(counter.try_count(&phases, &rule, Duration::from_millis(1000)));
        step(&mut phases, "start");
        counter.try_count(&phases, &rule, Duration::from_millis(1100));
        step(&mut phases, "bottom");
        assert!(!counter.try_count(&phases, &rule, Duration::from_millis(1200)));

        step(&mut phases, "start");
        counter.try_count(&phases, &rule, Duration::from_millis(1300));
        step(&mut phases, "bottom");
        assert!(counter.try_count(&phases, &rule, Duration::from_millis(1500)));
        assert_eq!(counter.count(), 2);
    }

    #[test]
    fn test_from_state_must_match() {
        let mut phases = PhaseTracker::new();
        let mut counter = RepCounter::default();
        let rule = rule(Some("descent"));

        step(&mut phases, "start");
        step(&mut phases, "bottom");
        assert!(!counter.try_count(&phases, &rule, Duration::from_secs(1)));

        step(&mut phases, "descent");
        step(&mut phases, "bottom");
        assert!(counter.try_count(&phases, &rule, Duration::from_secs(2)));
    }
}
