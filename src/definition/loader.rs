// ABOUTME: Locates exercise definition documents by identifier and loads them
// ABOUTME: Directory listing, info projection, and YAML parsing into validated definitions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use pierre_form_core::constants::documents;
use pierre_form_core::errors::DefinitionError;
use tracing::{debug, warn};

use super::schema::{parse_document, RawDocument};
use super::validation::{build_definition, project_info, BuildDefaults};
use super::{ExerciseDefinition, ExerciseInfo};
use crate::config::EngineConfig;
use crate::logging::FormLogger;

/// Loads definitions from a directory of `<identifier>.yaml` documents
#[derive(Debug, Clone)]
pub struct DefinitionLoader {
    dir: PathBuf,
    build_defaults: BuildDefaults,
}

impl DefinitionLoader {
    /// Loader over `dir` with built-in defaults
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            build_defaults: BuildDefaults::default(),
        }
    }

    /// Loader using the configured directory and debounce default
    #[must_use]
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.definitions_dir.clone())
            .with_default_min_rep_duration(config.default_min_rep_duration)
    }

    /// Override the debounce applied when a document sets none
    #[must_use]
    pub const fn with_default_min_rep_duration(mut self, duration: Duration) -> Self {
        self.build_defaults.min_rep_duration = duration;
        self
    }

    /// Directory searched for documents
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.dir
    }

    /// Load and validate the definition for an exercise identifier
    ///
    /// # Errors
    ///
    /// `InvalidIdentifier` for identifiers outside `[A-Za-z0-9_-]`,
    /// `NotFound` when no document exists, and `Io`, `Parse`, or
    /// `Validation` for unreadable or invalid documents.
    pub fn load(&self, exercise: &str) -> Result<Arc<ExerciseDefinition>, DefinitionError> {
        let path = self.resolve(exercise)?;
        self.load_from_path(&path)
    }

    /// Load and validate a document at an explicit path
    ///
    /// # Errors
    ///
    /// `Io`, `Parse`, or `Validation` as for [`Self::load`].
    pub fn load_from_path(&self, path: &Path) -> Result<Arc<ExerciseDefinition>, DefinitionError> {
        let yaml = read_document(path)?;
        let definition = self.parse_definition(&yaml, &path.display().to_string())?;
        FormLogger::log_definition_loaded(
            &definition.name,
            definition.variant.label(),
            definition.states.len(),
            definition.feedback.len(),
        );
        Ok(Arc::new(definition))
    }

    /// Parse and validate an in-memory document
    ///
    /// # Errors
    ///
    /// `Parse` for malformed YAML and `Validation` for schema violations.
    pub fn parse_definition(
        &self,
        yaml: &str,
        source_name: &str,
    ) -> Result<ExerciseDefinition, DefinitionError> {
        let raw = parse_raw(yaml, source_name)?;
        build_definition(raw, source_name, self.build_defaults)
    }

    /// Sorted identifiers of every document in the directory
    ///
    /// Empty when the directory does not exist or cannot be read.
    #[must_use]
    pub fn available_exercises(&self) -> Vec<String> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(dir = %self.dir.display(), error = %e, "Definitions directory unavailable");
                return Vec::new();
            }
        };

        let mut names: Vec<String> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && has_definition_extension(path))
            .filter_map(|path| {
                path.file_stem()
                    .and_then(|stem| stem.to_str())
                    .filter(|stem| is_valid_identifier(stem))
                    .map(str::to_owned)
            })
            .collect();
        names.sort();
        names.dedup();
        names
    }

    /// Presentation info for one exercise without full validation
    ///
    /// # Errors
    ///
    /// `InvalidIdentifier`, `NotFound`, `Io`, or `Parse`.
    pub fn exercise_info(&self, exercise: &str) -> Result<ExerciseInfo, DefinitionError> {
        let path = self.resolve(exercise)?;
        let yaml = read_document(&path)?;
        let raw = parse_raw(&yaml, &path.display().to_string())?;
        Ok(project_info(&raw, exercise))
    }

    /// Info for every available exercise; unreadable documents are skipped
    #[must_use]
    pub fn all_exercise_info(&self) -> BTreeMap<String, ExerciseInfo> {
        self.available_exercises()
            .into_iter()
            .filter_map(|exercise| match self.exercise_info(&exercise) {
                Ok(info) => Some((exercise, info)),
                Err(e) => {
                    warn!(exercise = %exercise, error = %e, "Skipping unreadable exercise definition");
                    None
                }
            })
            .collect()
    }

    fn resolve(&self, exercise: &str) -> Result<PathBuf, DefinitionError> {
        if !is_valid_identifier(exercise) {
            return Err(DefinitionError::InvalidIdentifier {
                exercise: exercise.to_owned(),
            });
        }

        let primary = self
            .dir
            .join(format!("{exercise}.{}", documents::EXTENSION));
        if primary.is_file() {
            return Ok(primary);
        }
        let alternate = self
            .dir
            .join(format!("{exercise}.{}", documents::ALT_EXTENSION));
        if alternate.is_file() {
            return Ok(alternate);
        }

        Err(DefinitionError::NotFound {
            exercise: exercise.to_owned(),
            path: primary,
        })
    }
}

/// Identifiers are file stems: ASCII letters, digits, `_` and `-`
#[must_use]
pub fn is_valid_identifier(exercise: &str) -> bool {
    !exercise.is_empty()
        && exercise
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn has_definition_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext == documents::EXTENSION || ext == documents::ALT_EXTENSION)
}

fn read_document(path: &Path) -> Result<String, DefinitionError> {
    fs::read_to_string(path).map_err(|source| DefinitionError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_raw(yaml: &str, source_name: &str) -> Result<RawDocument, DefinitionError> {
    parse_document(yaml).map_err(|e| DefinitionError::Parse {
        source_name: source_name.to_owned(),
        message: e.to_string(),
    })
}
