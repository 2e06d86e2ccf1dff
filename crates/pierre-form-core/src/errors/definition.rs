// ABOUTME: Error types for loading and validating exercise definition documents
// ABOUTME: Separates not-found, parse, I/O, and multi-violation validation failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::io;
use std::path::PathBuf;

use super::ErrorCode;

/// Errors raised while resolving, reading, parsing, or validating a definition
#[derive(Debug, thiserror::Error)]
pub enum DefinitionError {
    /// No document exists for the requested exercise identifier
    #[error("Exercise definition not found: {exercise} (looked in {path})")]
    NotFound {
        /// Requested exercise identifier
        exercise: String,
        /// Path that was searched
        path: PathBuf,
    },

    /// Identifier contains characters outside `[A-Za-z0-9_-]`
    #[error("Invalid exercise identifier '{exercise}'")]
    InvalidIdentifier {
        /// Rejected identifier
        exercise: String,
    },

    /// Document exists but could not be read
    #[error("Failed to read exercise definition {path}: {source}")]
    Io {
        /// Path of the unreadable document
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: io::Error,
    },

    /// Document is not well-formed YAML for the definition schema
    #[error("Invalid exercise definition document {source_name}: {message}")]
    Parse {
        /// File path or in-memory source label
        source_name: String,
        /// Parser message
        message: String,
    },

    /// Document parsed but violates one or more schema rules
    #[error("Exercise definition '{exercise}' has {} validation error(s)", violations.len())]
    Validation {
        /// Exercise name (or source label when the name itself is missing)
        exercise: String,
        /// Every violation found, in discovery order
        violations: Vec<String>,
    },
}

impl DefinitionError {
    /// Error code used when converting to `AppError`
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound { .. } => ErrorCode::ResourceNotFound,
            Self::InvalidIdentifier { .. } => ErrorCode::InvalidInput,
            Self::Io { .. } => ErrorCode::StorageError,
            Self::Parse { .. } => ErrorCode::InvalidFormat,
            Self::Validation { .. } => ErrorCode::ConfigInvalid,
        }
    }

    /// Violations carried by a validation failure, empty otherwise
    #[must_use]
    pub fn violations(&self) -> &[String] {
        match self {
            Self::Validation { violations, .. } => violations,
            _ => &[],
        }
    }
}
