// ABOUTME: Restricted condition language used by state and feedback rules
// ABOUTME: Denylist scan, compile-once parsing, and fail-closed evaluation over a flat context
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Condition Expressions
//!
//! Conditions are small boolean expressions such as
//! `100 <= angle <= 160 and abs(left_knee_x - left_ankle_x) < 40`.
//!
//! The grammar is closed: numeric literals, `True`/`False`, context
//! variables, arithmetic (`+ - * / %`), comparison chains, `and`/`or`/`not`,
//! and the built-ins `abs`, `min` and `max`. Nothing else is reachable.
//!
//! The raw text is scanned against a substring denylist before parsing. A
//! condition that fails the scan still compiles into a [`Condition`], but
//! every evaluation of it returns [`ExpressionError::Unsafe`].

/// Variable sources (flat context and overlay)
pub mod context;
/// Tree-walking evaluator
pub mod evaluator;
/// Tokenizer
pub mod lexer;
/// Recursive-descent parser
pub mod parser;

pub use context::{EvaluationContext, Overlay, Variables};
pub use evaluator::Value;
pub use parser::Expr;

use std::collections::BTreeSet;
use std::fmt;

use pierre_form_core::constants::expression::DENYLIST;
use pierre_form_core::errors::ExpressionError;

use crate::logging::FormLogger;

/// Reject expression text containing a denylisted fragment
///
/// Matching is a case-sensitive substring scan of the raw text, so
/// identifiers that merely contain a fragment (`nose_x` contains `os`) are
/// rejected too.
///
/// # Errors
///
/// Returns `ExpressionError::Unsafe` naming the first fragment found.
pub fn check_safety(source: &str) -> Result<(), ExpressionError> {
    DENYLIST
        .iter()
        .find(|fragment| source.contains(*fragment))
        .map_or(Ok(()), |fragment| {
            Err(ExpressionError::Unsafe {
                fragment: (*fragment).to_owned(),
            })
        })
}

fn compile_expr(source: &str) -> Result<Expr, ExpressionError> {
    check_safety(source)?;
    let tokens = lexer::tokenize(source)?;
    parser::parse(&tokens, source.len())
}

/// A condition compiled once at load time
#[derive(Clone)]
pub struct Condition {
    source: String,
    compiled: Result<Expr, ExpressionError>,
}

impl Condition {
    /// Compile expression text, keeping any compile error for evaluation time
    #[must_use]
    pub fn compile(source: impl Into<String>) -> Self {
        let source = source.into();
        let compiled = compile_expr(&source);
        Self { source, compiled }
    }

    /// Compile expression text, failing immediately on any error
    ///
    /// # Errors
    ///
    /// Returns the denylist, lexer, or parser error.
    pub fn try_compile(source: impl Into<String>) -> Result<Self, ExpressionError> {
        let condition = Self::compile(source);
        match condition.compiled {
            Ok(_) => Ok(condition),
            Err(error) => Err(error),
        }
    }

    /// Original expression text
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Compile error, if the text did not produce an expression tree
    #[must_use]
    pub fn compile_error(&self) -> Option<&ExpressionError> {
        self.compiled.as_ref().err()
    }

    /// Whether the text hit the safety denylist
    #[must_use]
    pub fn is_unsafe(&self) -> bool {
        matches!(self.compiled, Err(ExpressionError::Unsafe { .. }))
    }

    /// Variable names referenced by the expression (empty if it did not compile)
    #[must_use]
    pub fn variables(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        if let Ok(expr) = &self.compiled {
            expr.collect_variables(&mut names);
        }
        names
    }

    /// Evaluate to a boolean using truthiness
    ///
    /// # Errors
    ///
    /// Returns the stored compile error, or any evaluation error.
    pub fn evaluate(&self, vars: &dyn Variables) -> Result<bool, ExpressionError> {
        match &self.compiled {
            Ok(expr) => evaluator::evaluate(expr, vars).map(Value::is_truthy),
            Err(error) => Err(error.clone()),
        }
    }

    /// Evaluate, logging any failure and treating it as false
    #[must_use]
    pub fn is_satisfied(&self, rule: &str, vars: &dyn Variables) -> bool {
        self.evaluate(vars).unwrap_or_else(|error| {
            FormLogger::log_rule_failure(rule, &self.source, &error);
            false
        })
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Condition")
            .field("source", &self.source)
            .field("compiled", &self.compiled.is_ok())
            .finish()
    }
}

impl PartialEq for Condition {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

/// Compile and evaluate expression text in one step
///
/// # Errors
///
/// Returns any denylist, syntax, or evaluation error.
pub fn evaluate_expression(source: &str, vars: &dyn Variables) -> Result<bool, ExpressionError> {
    Condition::compile(source).evaluate(vars)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(pairs: &[(&str, f64)]) -> EvaluationContext {
        pairs
            .iter()
            .map(|(name, value)| ((*name).to_owned(), *value))
            .collect()
    }

    #[test]
    fn test_denylist_checked_before_parsing() {
        for source in [
            "__import__('os')",
            "eval('1')",
            "exec(x)",
            "open('f')",
            "file > 1",
            "sys > 1",
        ] {
            let condition = Condition::compile(source);
            assert!(condition.is_unsafe(), "{source} should be unsafe");
            assert!(matches!(
                condition.evaluate(&EvaluationContext::new()),
                Err(ExpressionError::Unsafe { .. })
            ));
        }
    }

    #[test]
    fn test_denylist_is_a_raw_substring_scan() {
        assert!(Condition::compile("nose_x > 10").is_unsafe());
        assert!(!Condition::compile("left_knee_x > 10").is_unsafe());
    }

    #[test]
    fn test_failed_rule_is_false() {
        let condition = Condition::compile("angle > 160");
        assert!(!condition.is_satisfied("start", &EvaluationContext::new()));
        assert!(condition.is_satisfied("start", &context(&[("angle", 170.0)])));
    }

    #[test]
    fn test_try_compile_surfaces_syntax_errors() {
        assert!(matches!(
            Condition::try_compile("angle >"),
            Err(ExpressionError::Syntax { .. })
        ));
    }

    #[test]
    fn test_evaluate_expression_one_shot() {
        assert_eq!(
            evaluate_expression("angle < 100", &context(&[("angle", 85.0)])),
            Ok(true)
        );
    }
}
