// ABOUTME: Per-angle moving-average smoothing over a bounded history
// ABOUTME: Each angle name keeps its own window so angles never bleed into each other
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::{HashMap, VecDeque};

/// Moving average of the last `window` raw values, tracked per angle name
#[derive(Debug, Clone)]
pub struct AngleSmoother {
    window: usize,
    history: HashMap<String, VecDeque<f64>>,
}

impl AngleSmoother {
    /// Smoother averaging up to `window` samples (at least one)
    #[must_use]
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
            history: HashMap::new(),
        }
    }

    /// Record a raw value and return the mean of the retained history
    pub fn push(&mut self, name: &str, raw: f64) -> f64 {
        let window = self.window;
        let buffer = self
            .history
            .entry(name.to_owned())
            .or_insert_with(|| VecDeque::with_capacity(window));
        buffer.push_back(raw);
        while buffer.len() > window {
            buffer.pop_front();
        }
        buffer.iter().sum::<f64>() / buffer.len() as f64
    }

    /// Retained samples for one angle, oldest first
    #[must_use]
    pub fn history(&self, name: &str) -> Vec<f64> {
        self.history
            .get(name)
            .map(|buffer| buffer.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Window size
    #[must_use]
    pub const fn window(&self) -> usize {
        self.window
    }

    /// Forget every sample
    pub fn clear(&mut self) {
        self.history.clear();
    }
}
