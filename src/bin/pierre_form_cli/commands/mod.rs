// ABOUTME: Re-exports command modules for pierre-form-cli
// ABOUTME: Exercise inspection/validation and trace replay commands
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub mod exercises;
pub mod replay;
