// ABOUTME: Core data models shared by the form engine and its callers
// ABOUTME: Pose input types plus exercise vocabulary (kinds, severities, grades)
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Joint scheme, landmarks, and per-frame pose input
pub mod pose;

/// Movement kinds, feedback severities, and form grades
pub mod exercise;

pub use exercise::{FeedbackMessage, FormGrade, MovementKind, Severity};
pub use pose::{Joint, Landmark, Point, PoseFrame};
