// ABOUTME: Shared exercise vocabulary: movement kinds, feedback severities, and form grades
// ABOUTME: Serializable enums consumed by the loader, the engine, and presentation layers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::scoring::grades;

/// How an exercise is counted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    /// Discrete repetitions counted on phase transitions
    #[default]
    Repetition,
    /// Sustained holds counted once the target time is reached
    Duration,
}

impl MovementKind {
    /// Parse the `type` field of a definition
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "repetition" => Some(Self::Repetition),
            "duration" => Some(Self::Duration),
            _ => None,
        }
    }

    /// Name as written in definitions
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Repetition => "repetition",
            Self::Duration => "duration",
        }
    }
}

impl fmt::Display for MovementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity attached to a feedback rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational hint
    Info,
    /// Form problem worth correcting
    #[default]
    Warning,
    /// Form problem that risks injury
    Error,
}

impl Severity {
    /// Parse a severity label
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "info" => Some(Self::Info),
            "warning" => Some(Self::Warning),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    /// Label as written in definitions
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// One active feedback message for the current frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackMessage {
    /// Rule name from the definition
    pub name: String,
    /// Text shown to the athlete
    pub message: String,
    /// Rule severity
    pub severity: Severity,
}

/// Letter grade derived from a form score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FormGrade {
    /// 90 and above
    A,
    /// 80 to 89
    B,
    /// 70 to 79
    C,
    /// 60 to 69
    D,
    /// Below 60
    F,
}

impl FormGrade {
    /// Grade for a 0-100 score
    #[must_use]
    pub const fn from_score(score: u32) -> Self {
        if score >= grades::A_MIN {
            Self::A
        } else if score >= grades::B_MIN {
            Self::B
        } else if score >= grades::C_MIN {
            Self::C
        } else if score >= grades::D_MIN {
            Self::D
        } else {
            Self::F
        }
    }

    /// Single-letter label
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        }
    }

    /// RGB colour used by overlays to render the score
    #[must_use]
    pub const fn color_rgb(self) -> (u8, u8, u8) {
        match self {
            Self::A => (0, 255, 0),
            Self::B => (255, 255, 0),
            Self::C => (255, 165, 0),
            Self::D => (255, 100, 0),
            Self::F => (255, 0, 0),
        }
    }
}

impl fmt::Display for FormGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
