//! Core types for the signal plot library
//!
//! This module defines the logic states read from signal documents, the plot
//! primitives the segmenters emit, and the error type shared by every stage of
//! the pipeline. Nothing here holds state across document loads.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Result type for plot operations
pub type Result<T> = std::result::Result<T, PlotError>;

/// Errors that can occur while loading and plotting a signal document
///
/// Every variant is fatal to the load as a whole: a malformed signal poisons
/// the entire document and no partial signal set is returned.
#[derive(Debug, thiserror::Error)]
pub enum PlotError {
    #[error("Failed to parse '{input}': {reason}")]
    Parse { input: String, reason: String },

    #[error("Missing required attribute '{attribute}' on <{element}>")]
    MissingAttribute { element: String, attribute: String },

    #[error("Duplicate timeline key '{key}' in signal '{signal}'")]
    DuplicateKey { signal: String, key: String },

    #[error("Duplicate signal name: {0}")]
    DuplicateSignal(String),

    #[error("Failed to parse XML document: {0}")]
    Xml(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl PlotError {
    pub(crate) fn parse(input: impl Into<String>, reason: impl Into<String>) -> Self {
        PlotError::Parse {
            input: input.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn missing_attribute(element: &str, attribute: &str) -> Self {
        PlotError::MissingAttribute {
            element: element.to_string(),
            attribute: attribute.to_string(),
        }
    }
}

/// Asserted level of a signal at a sample point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicState {
    /// Signal is high
    True,
    /// Signal is low
    False,
    /// Signal changes level; resolved relative to the previous state
    Transition,
}

impl LogicState {
    /// Parse the `logic` attribute text of a sample point.
    ///
    /// Matching is case-insensitive. Any text containing `transition` or the
    /// historical misspelling `transistion` is a transition marker.
    pub fn parse(text: &str) -> Result<Self> {
        let normalized = text.trim().to_lowercase();
        match normalized.as_str() {
            "true" => Ok(LogicState::True),
            "false" => Ok(LogicState::False),
            _ if crate::transition::is_transition_marker(&normalized) => Ok(LogicState::Transition),
            _ => Err(PlotError::parse(
                text,
                "logic must be 'true', 'false' or 'transition'",
            )),
        }
    }

    pub fn is_transition(self) -> bool {
        self == LogicState::Transition
    }

    /// Absolute level implied by this state (transitions start low)
    pub fn level(self) -> f64 {
        match self {
            LogicState::True => HIGH,
            LogicState::False | LogicState::Transition => LOW,
        }
    }
}

impl FromStr for LogicState {
    type Err = PlotError;

    fn from_str(s: &str) -> Result<Self> {
        LogicState::parse(s)
    }
}

impl fmt::Display for LogicState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicState::True => write!(f, "true"),
            LogicState::False => write!(f, "false"),
            LogicState::Transition => write!(f, "transition"),
        }
    }
}

/// Plot level of a high signal
pub const HIGH: f64 = 1.0;
/// Plot level of a low signal
pub const LOW: f64 = 0.0;

/// Convert a resolved time in milliseconds to plot seconds
pub fn ms_to_seconds(milliseconds: f64) -> f64 {
    milliseconds / 1000.0
}

/// A single point of a step waveform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotPoint {
    /// Time in seconds
    pub x: f64,
    /// Level, either 0.0 or 1.0
    pub y: f64,
    /// Remark of the originating sample point (empty if none)
    pub tag: String,
}

impl PlotPoint {
    pub fn new(x: f64, y: f64, tag: impl Into<String>) -> Self {
        Self {
            x,
            y,
            tag: tag.into(),
        }
    }
}

/// Visual style of a segment, interpreted only by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentStyle {
    /// Plain step line
    Line,
    /// Step line with the area under it filled (transition ramps)
    Fill,
}

impl fmt::Display for SegmentStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentStyle::Line => write!(f, "line"),
            SegmentStyle::Fill => write!(f, "fill"),
        }
    }
}

/// A contiguous run of points drawn with forward-step interpolation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotSegment {
    pub style: SegmentStyle,
    pub points: Vec<PlotPoint>,
}

impl PlotSegment {
    pub fn new(style: SegmentStyle, points: Vec<PlotPoint>) -> Self {
        Self { style, points }
    }

    pub fn line(points: Vec<PlotPoint>) -> Self {
        Self::new(SegmentStyle::Line, points)
    }

    pub fn fill(points: Vec<PlotPoint>) -> Self {
        Self::new(SegmentStyle::Fill, points)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Smallest and largest x of the segment, if it has points
    pub fn x_range(&self) -> Option<(f64, f64)> {
        let first = self.points.first()?.x;
        Some(
            self.points
                .iter()
                .fold((first, first), |(lo, hi), p| (lo.min(p.x), hi.max(p.x))),
        )
    }
}
