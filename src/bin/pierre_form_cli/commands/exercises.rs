// ABOUTME: Exercise listing, info, and validation commands for pierre-form-cli
// ABOUTME: Reads definitions through the loader and reports every violation found
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use pierre_form_core::errors::{AppResult, DefinitionError};
use pierre_form_engine::definition::DefinitionLoader;
use tracing::warn;

use crate::helpers::display::{display_exercise_info, display_exercise_list, display_validation};

/// List available exercises
pub fn list(loader: &DefinitionLoader, json: bool) -> AppResult<()> {
    let catalog = loader.all_exercise_info();
    if json {
        println!("{}", serde_json::to_string_pretty(&catalog)?);
    } else {
        display_exercise_list(loader.directory(), &catalog);
    }
    Ok(())
}

/// Show presentation info for one exercise
pub fn info(loader: &DefinitionLoader, exercise: &str, json: bool) -> AppResult<()> {
    let info = loader.exercise_info(exercise)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        display_exercise_info(exercise, &info);
    }
    Ok(())
}

/// Validate the named exercises, or all of them; returns the failure count
pub fn validate(loader: &DefinitionLoader, exercises: &[String]) -> usize {
    let targets = if exercises.is_empty() {
        loader.available_exercises()
    } else {
        exercises.to_vec()
    };

    if targets.is_empty() {
        warn!(dir = %loader.directory().display(), "No exercise definitions found");
    }

    let mut failed = 0;
    for exercise in &targets {
        let outcome: Result<(), DefinitionError> = loader.load(exercise).map(|_| ());
        if outcome.is_err() {
            failed += 1;
        }
        display_validation(exercise, outcome.as_ref().err());
    }
    failed
}
