//! Plot configuration types
//!
//! This module defines the small set of knobs the pipeline exposes. Everything
//! else (output format, destinations, logging) belongs to the application layer.

use serde::{Deserialize, Serialize};

/// How time expressions are evaluated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpressionMode {
    /// Substring constant lookup, `-` joined fragments are summed
    #[default]
    Legacy,
    /// Tokenized left-to-right evaluation with real subtraction
    Strict,
}

/// Configuration for the plot pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlotConfig {
    /// Time expression evaluation mode
    #[serde(default)]
    pub expression_mode: ExpressionMode,

    /// Point cap of the plain (transition-free) segmenter
    #[serde(default = "default_max_plain_points")]
    pub max_plain_points: usize,

    /// Optional: only emit waveforms for these signals
    #[serde(default, alias = "signals")]
    pub signal_filter: Option<Vec<String>>,
}

fn default_max_plain_points() -> usize {
    crate::segmenter::DEFAULT_MAX_PLAIN_POINTS
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            expression_mode: ExpressionMode::default(),
            max_plain_points: default_max_plain_points(),
            signal_filter: None,
        }
    }
}

impl PlotConfig {
    /// Create a new plot configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the expression mode
    pub fn with_expression_mode(mut self, mode: ExpressionMode) -> Self {
        self.expression_mode = mode;
        self
    }

    /// Builder method: set the plain segmenter point cap
    pub fn with_max_plain_points(mut self, max_points: usize) -> Self {
        self.max_plain_points = max_points;
        self
    }

    /// Builder method: only emit the named signals
    pub fn with_signal_filter(mut self, signals: Vec<String>) -> Self {
        self.signal_filter = Some(signals);
        self
    }

    /// Check if a signal should be emitted
    pub fn should_plot_signal(&self, name: &str) -> bool {
        match &self.signal_filter {
            Some(names) => names.iter().any(|n| n == name),
            None => true,
        }
    }
}
