// ABOUTME: Core types and constants for the Pierre form engine
// ABOUTME: Foundation crate with error handling, joint scheme, and scoring constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Pierre Form Core
//!
//! Foundation crate providing shared types and constants for the Pierre
//! exercise form engine. It changes rarely, so the engine crate rebuilds
//! incrementally on top of it.
//!
//! ## Modules
//!
//! - **errors**: `AppError`, `ErrorCode`, and the definition/expression error enums
//! - **constants**: Scoring weights, schema defaults, safety denylist, environment keys
//! - **models**: Pose input (`Joint`, `Landmark`, `PoseFrame`) and exercise vocabulary

/// Unified error handling system with standard error codes
pub mod errors;

/// Engine constants organized by domain
pub mod constants;

/// Core data models (pose input, severities, grades)
pub mod models;
