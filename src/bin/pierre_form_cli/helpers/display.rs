// ABOUTME: Output formatting helpers for pierre-form-cli
// ABOUTME: Consistent terminal rendering of exercise catalogs, validation results, and summaries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::BTreeMap;
use std::path::Path;

use pierre_form_core::errors::DefinitionError;
use pierre_form_engine::definition::ExerciseInfo;
use pierre_form_engine::engine::SessionSummary;

/// Display the exercise catalog
pub fn display_exercise_list(dir: &Path, catalog: &BTreeMap<String, ExerciseInfo>) {
    println!("\nExercises in {}", dir.display());
    println!("{}", "=".repeat(60));
    if catalog.is_empty() {
        println!("   (none)");
        return;
    }
    for (exercise, info) in catalog {
        println!(
            "   {exercise:<20} {:<24} {}",
            info.display_name,
            info.kind.as_str()
        );
    }
}

/// Display presentation info for one exercise
pub fn display_exercise_info(exercise: &str, info: &ExerciseInfo) {
    println!("\n{} ({exercise})", info.display_name);
    println!("{}", "=".repeat(60));
    println!("   Type: {}", info.kind.as_str());
    println!("   Difficulty: {}", info.difficulty);
    println!("   Equipment: {}", info.equipment);
    println!(
        "   Default: {} sets x {} reps, rest {}",
        info.default_sets, info.default_reps, info.rest_time
    );
    if !info.target_muscles.is_empty() {
        println!("   Target muscles: {}", info.target_muscles.join(", "));
    }
    if !info.description.is_empty() {
        println!("\n   {}", info.description);
    }
    if !info.benefits.is_empty() {
        println!("\n   Benefits:");
        for benefit in &info.benefits {
            println!("   • {benefit}");
        }
    }
}

/// Display one validation outcome
pub fn display_validation(exercise: &str, error: Option<&DefinitionError>) {
    match error {
        None => println!("OK      {exercise}"),
        Some(DefinitionError::Validation { violations, .. }) => {
            println!("INVALID {exercise}");
            for violation in violations {
                println!("        - {violation}");
            }
        }
        Some(other) => println!("ERROR   {exercise}: {other}"),
    }
}

/// Display a replayed session summary
pub fn display_replay_summary(trace: &Path, summary: &SessionSummary) {
    println!("\n{} ({})", summary.display_name, trace.display());
    println!("{}", "=".repeat(60));
    println!("   Reps: {}", summary.counter);
    if let Some(sides) = &summary.sides {
        for (side, status) in sides {
            println!("   {side}: {} reps", status.counter);
        }
    }
    println!("   Frames: {}", summary.frames_processed);
    println!(
        "   Form: {} avg, last {} ({})",
        summary.average_score, summary.form_score, summary.grade
    );
    if let Some(result) = summary.calibration.result {
        println!(
            "   Calibration: {:.1}° - {:.1}°",
            result.min_angle, result.max_angle
        );
    }
    if !summary.rep_durations.is_empty() {
        let durations: Vec<String> = summary
            .rep_durations
            .iter()
            .map(|d| format!("{d:.2}s"))
            .collect();
        println!("   Rep durations: {}", durations.join(", "));
    }
}
