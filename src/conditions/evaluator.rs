// ABOUTME: Tree-walking evaluator for parsed condition expressions
// ABOUTME: Numbers and booleans (booleans count as 1 and 0), short-circuit logic, context only
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use pierre_form_core::errors::ExpressionError;

use super::context::Variables;
use super::parser::{BinaryOp, Builtin, CompareOp, Expr, UnaryOp};

/// Runtime value of a sub-expression
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    /// Floating point number
    Number(f64),
    /// Boolean
    Bool(bool),
}

impl Value {
    /// Truthiness: non-zero numbers and `true` are truthy
    #[must_use]
    pub fn is_truthy(self) -> bool {
        match self {
            Self::Number(value) => value != 0.0,
            Self::Bool(value) => value,
        }
    }

    /// Numeric view; booleans are 1 and 0
    #[must_use]
    pub const fn as_number(self) -> f64 {
        match self {
            Self::Number(value) => value,
            Self::Bool(true) => 1.0,
            Self::Bool(false) => 0.0,
        }
    }
}

/// Evaluate an expression tree against a variable source
///
/// # Errors
///
/// Returns `UnknownVariable` for names absent from `vars`, `DivisionByZero`
/// for `/` or `%` by zero, and `Arity` for builtins called without arguments.
pub fn evaluate(expr: &Expr, vars: &dyn Variables) -> Result<Value, ExpressionError> {
    match expr {
        Expr::Number(value) => Ok(Value::Number(*value)),
        Expr::Bool(value) => Ok(Value::Bool(*value)),
        Expr::Variable(name) => vars
            .lookup(name)
            .map(Value::Number)
            .ok_or_else(|| ExpressionError::UnknownVariable { name: name.clone() }),
        Expr::Unary { op, operand } => {
            let value = evaluate(operand, vars)?.as_number();
            Ok(Value::Number(match op {
                UnaryOp::Neg => -value,
                UnaryOp::Plus => value,
            }))
        }
        Expr::Binary { op, lhs, rhs } => {
            let lhs = evaluate(lhs, vars)?.as_number();
            let rhs = evaluate(rhs, vars)?.as_number();
            arithmetic(*op, lhs, rhs).map(Value::Number)
        }
        Expr::Compare { first, rest } => {
            let mut left = evaluate(first, vars)?;
            for (op, operand) in rest {
                let right = evaluate(operand, vars)?;
                if !compare(*op, left.as_number(), right.as_number()) {
                    return Ok(Value::Bool(false));
                }
                left = right;
            }
            Ok(Value::Bool(true))
        }
        Expr::Not(operand) => Ok(Value::Bool(!evaluate(operand, vars)?.is_truthy())),
        Expr::And(lhs, rhs) => {
            let left = evaluate(lhs, vars)?;
            if left.is_truthy() {
                evaluate(rhs, vars)
            } else {
                Ok(left)
            }
        }
        Expr::Or(lhs, rhs) => {
            let left = evaluate(lhs, vars)?;
            if left.is_truthy() {
                Ok(left)
            } else {
                evaluate(rhs, vars)
            }
        }
        Expr::Call { function, args } => call(*function, args, vars),
    }
}

fn arithmetic(op: BinaryOp, lhs: f64, rhs: f64) -> Result<f64, ExpressionError> {
    match op {
        BinaryOp::Add => Ok(lhs + rhs),
        BinaryOp::Sub => Ok(lhs - rhs),
        BinaryOp::Mul => Ok(lhs * rhs),
        BinaryOp::Div => {
            if rhs == 0.0 {
                Err(ExpressionError::DivisionByZero)
            } else {
                Ok(lhs / rhs)
            }
        }
        BinaryOp::Rem => {
            if rhs == 0.0 {
                Err(ExpressionError::DivisionByZero)
            } else {
                // Result takes the sign of the divisor
                Ok(rhs.mul_add(-(lhs / rhs).floor(), lhs))
            }
        }
    }
}

fn compare(op: CompareOp, lhs: f64, rhs: f64) -> bool {
    #[allow(clippy::float_cmp)]
    match op {
        CompareOp::Lt => lhs < rhs,
        CompareOp::Le => lhs <= rhs,
        CompareOp::Gt => lhs > rhs,
        CompareOp::Ge => lhs >= rhs,
        CompareOp::Eq => lhs == rhs,
        CompareOp::Ne => lhs != rhs,
    }
}

fn call(function: Builtin, args: &[Expr], vars: &dyn Variables) -> Result<Value, ExpressionError> {
    let values = args
        .iter()
        .map(|arg| evaluate(arg, vars).map(Value::as_number))
        .collect::<Result<Vec<_>, _>>()?;

    let result = match function {
        Builtin::Abs => values.first().map(|value| value.abs()),
        Builtin::Min => values.iter().copied().reduce(f64::min),
        Builtin::Max => values.iter().copied().reduce(f64::max),
    };

    result
        .map(Value::Number)
        .ok_or_else(|| ExpressionError::Arity {
            name: function.name().to_owned(),
            given: values.len(),
        })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::super::lexer::tokenize;
    use super::super::parser::parse;
    use super::*;

    fn eval(source: &str, vars: &[(&str, f64)]) -> Result<Value, ExpressionError> {
        let context: HashMap<String, f64> = vars
            .iter()
            .map(|(name, value)| ((*name).to_owned(), *value))
            .collect();
        let expr = parse(&tokenize(source)?, source.len())?;
        evaluate(&expr, &context)
    }

    #[test]
    fn test_chained_comparison_matches_pairwise_conjunction() {
        assert_eq!(
            eval("100 <= angle <= 160", &[("angle", 130.0)]),
            Ok(Value::Bool(true))
        );
        assert_eq!(
            eval("100 <= angle <= 160", &[("angle", 161.0)]),
            Ok(Value::Bool(false))
        );
        assert_eq!(
            eval("100 <= angle <= 160", &[("angle", 100.0)]),
            Ok(Value::Bool(true))
        );
    }

    #[test]
    fn test_short_circuit_skips_unknown_variables() {
        assert_eq!(
            eval("angle > 90 or missing > 1", &[("angle", 120.0)]),
            Ok(Value::Bool(true))
        );
        assert_eq!(
            eval("angle < 90 and missing > 1", &[("angle", 120.0)]),
            Ok(Value::Bool(false))
        );
    }

    #[test]
    fn test_builtins_and_arithmetic() {
        assert_eq!(
            eval(
                "abs(a - b) > 30 and max(a, b, 5) == 100 and min(a, b) == 40",
                &[("a", 100.0), ("b", 40.0)]
            ),
            Ok(Value::Bool(true))
        );
        assert_eq!(eval("7 % 3", &[]), Ok(Value::Number(1.0)));
        assert_eq!(eval("-7 % 3", &[]), Ok(Value::Number(2.0)));
        assert_eq!(eval("2 + 3 * 4", &[]), Ok(Value::Number(14.0)));
    }

    #[test]
    fn test_runtime_errors() {
        assert_eq!(
            eval("angle > 3", &[]),
            Err(ExpressionError::UnknownVariable {
                name: "angle".to_owned()
            })
        );
        assert_eq!(eval("1 / 0", &[]), Err(ExpressionError::DivisionByZero));
    }

    #[test]
    fn test_booleans_act_as_one_and_zero() {
        assert_eq!(eval("True + 1", &[]), Ok(Value::Number(2.0)));
        assert_eq!(eval("False * 5 - True", &[]), Ok(Value::Number(-1.0)));
        assert_eq!(eval("True < 2", &[]), Ok(Value::Bool(true)));
        assert_eq!(eval("(a > 1) + (b > 1) >= 2", &[("a", 3.0), ("b", 4.0)]), Ok(Value::Bool(true)));
        assert_eq!(eval("max(True, 0.5)", &[]), Ok(Value::Number(1.0)));
    }

    #[test]
    fn test_not_and_truthiness() {
        assert_eq!(eval("not 0", &[]), Ok(Value::Bool(true)));
        assert_eq!(eval("not (1 > 0)", &[]), Ok(Value::Bool(false)));
        assert!(eval("counter", &[("counter", 2.0)]).unwrap().is_truthy());
        assert_eq!(eval("True == 1", &[]), Ok(Value::Bool(true)));
    }
}
