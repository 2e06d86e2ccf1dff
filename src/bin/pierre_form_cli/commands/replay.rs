// ABOUTME: Trace replay command for pierre-form-cli
// ABOUTME: Resolves each trace's exercise, replays traces in parallel, prints summaries or frames
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::path::{Path, PathBuf};
use std::sync::Arc;

use pierre_form_core::errors::{AppError, AppResult};
use pierre_form_engine::definition::{DefinitionLoader, ExerciseDefinition};
use pierre_form_engine::replay::{replay_all, PoseTrace};

use crate::helpers::display::display_replay_summary;

/// Replay traces and print the results
pub fn run(
    loader: &DefinitionLoader,
    traces: &[PathBuf],
    exercise_override: Option<&str>,
    print_frames: bool,
) -> AppResult<()> {
    let jobs = traces
        .iter()
        .map(|path| load_job(loader, path, exercise_override))
        .collect::<AppResult<Vec<_>>>()?;

    let reports = replay_all(&jobs);

    for (path, report) in traces.iter().zip(&reports) {
        if print_frames {
            println!("{}", serde_json::to_string_pretty(report)?);
        } else {
            display_replay_summary(path, &report.summary);
        }
    }
    Ok(())
}

fn load_job(
    loader: &DefinitionLoader,
    path: &Path,
    exercise_override: Option<&str>,
) -> AppResult<(Arc<ExerciseDefinition>, PoseTrace)> {
    let trace = PoseTrace::from_path(path)?;
    let exercise = trace
        .exercise
        .clone()
        .or_else(|| exercise_override.map(str::to_owned))
        .ok_or_else(|| {
            AppError::invalid_input(format!(
                "Trace {} names no exercise; pass --exercise",
                path.display()
            ))
        })?;
    let definition = loader.load(&exercise)?;
    Ok((definition, trace))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn bundled() -> DefinitionLoader {
        DefinitionLoader::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("definitions"))
    }

    fn write_trace(dir: &Path, exercise: Option<&str>) -> PathBuf {
        let path = dir.join("trace.json");
        let named = exercise.map_or_else(String::new, |name| format!(r#""exercise": "{name}","#));
        fs::write(&path, format!(r#"{{{named} "width": 640, "height": 480, "frames": []}}"#))
            .unwrap();
        path
    }

    #[test]
    fn test_trace_exercise_wins_over_flag() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_trace(dir.path(), Some("plank"));

        let (definition, _) = load_job(&bundled(), &path, Some("squat")).unwrap();
        assert_eq!(definition.name, "plank");
    }

    #[test]
    fn test_flag_fills_in_for_unnamed_trace() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_trace(dir.path(), None);

        let (definition, _) = load_job(&bundled(), &path, Some("squat")).unwrap();
        assert_eq!(definition.name, "squat");
        assert!(load_job(&bundled(), &path, None).is_err());
    }
}
