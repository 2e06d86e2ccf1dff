// ABOUTME: Evaluates feedback rules in declaration order against a frame context
// ABOUTME: Every satisfied rule yields one message; failing rules are logged and skipped
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use pierre_form_core::models::FeedbackMessage;

use crate::conditions::Variables;
use crate::definition::FeedbackRule;

/// Messages for every rule whose condition holds
#[must_use]
pub fn evaluate_feedback(rules: &[FeedbackRule], vars: &dyn Variables) -> Vec<FeedbackMessage> {
    rules
        .iter()
        .filter(|rule| rule.condition.is_satisfied(&rule.name, vars))
        .map(|rule| FeedbackMessage {
            name: rule.name.clone(),
            message: rule.message.clone(),
            severity: rule.severity,
        })
        .collect()
}
