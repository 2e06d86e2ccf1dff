// ABOUTME: Variable sources for condition evaluation
// ABOUTME: Flat name-to-number context plus a borrowed overlay for per-call bindings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::HashMap;

/// Anything conditions can read variables from
pub trait Variables {
    /// Value bound to `name`, if any
    fn lookup(&self, name: &str) -> Option<f64>;
}

impl Variables for HashMap<String, f64> {
    fn lookup(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}

/// Flat evaluation context built once per frame
///
/// Holds `<angle>_angle`, `angle`, and `<joint>_x` / `<joint>_y` entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvaluationContext {
    values: HashMap<String, f64>,
}

impl EvaluationContext {
    /// Empty context
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a variable, replacing any previous value
    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.values.insert(name.into(), value);
    }

    /// Value of a variable
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Whether a variable is bound
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of bound variables
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when nothing is bound
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over bindings in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(name, value)| (name.as_str(), *value))
    }
}

impl Variables for EvaluationContext {
    fn lookup(&self, name: &str) -> Option<f64> {
        self.get(name)
    }
}

impl FromIterator<(String, f64)> for EvaluationContext {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Extra bindings layered over a borrowed base context
///
/// Bindings shadow the base. Used to bind `angle` to one side's angle and
/// to inject running counters without cloning the frame context.
#[derive(Debug)]
pub struct Overlay<'a, V: Variables + ?Sized> {
    base: &'a V,
    bindings: Vec<(String, f64)>,
}

impl<'a, V: Variables + ?Sized> Overlay<'a, V> {
    /// Overlay with no bindings yet
    pub const fn new(base: &'a V) -> Self {
        Self {
            base,
            bindings: Vec::new(),
        }
    }

    /// Add a binding; later bindings win over earlier ones
    #[must_use]
    pub fn bind(mut self, name: impl Into<String>, value: f64) -> Self {
        self.bindings.push((name.into(), value));
        self
    }

    /// Add a binding only when a value is present
    #[must_use]
    pub fn bind_opt(self, name: impl Into<String>, value: Option<f64>) -> Self {
        match value {
            Some(value) => self.bind(name, value),
            None => self,
        }
    }
}

impl<V: Variables + ?Sized> Variables for Overlay<'_, V> {
    fn lookup(&self, name: &str) -> Option<f64> {
        self.bindings
            .iter()
            .rev()
            .find(|(bound, _)| bound == name)
            .map(|(_, value)| *value)
            .or_else(|| self.base.lookup(name))
    }
}
