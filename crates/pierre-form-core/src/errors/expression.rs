// ABOUTME: Error types for the restricted condition expression language
// ABOUTME: Covers denylist hits, syntax errors, unknown names, arity, and runtime faults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Failures while compiling or evaluating a condition expression
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExpressionError {
    /// Raw text contains a denylisted fragment
    #[error("Unsafe expression: contains forbidden fragment '{fragment}'")]
    Unsafe {
        /// The first denylisted fragment found
        fragment: String,
    },

    /// Text does not match the expression grammar
    #[error("Syntax error at offset {position}: {message}")]
    Syntax {
        /// Byte offset into the expression text
        position: usize,
        /// What the parser expected or found
        message: String,
    },

    /// Variable is not present in the evaluation context
    #[error("Unknown variable '{name}'")]
    UnknownVariable {
        /// Variable name
        name: String,
    },

    /// Function is not one of the allowed built-ins
    #[error("Unknown function '{name}' (allowed: abs, min, max)")]
    UnknownFunction {
        /// Function name
        name: String,
    },

    /// Built-in called with an unsupported number of arguments
    #[error("Function '{name}' does not accept {given} argument(s)")]
    Arity {
        /// Function name
        name: String,
        /// Number of arguments supplied
        given: usize,
    },

    /// Division or modulo by zero
    #[error("Division by zero")]
    DivisionByZero,
}
