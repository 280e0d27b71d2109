//! Per-signal timelines
//!
//! A timeline is the chronological sequence of resolved sample points of one
//! signal, keyed by the formatted resolved time. Around every transition a
//! second entry keyed `<time>t` is recorded so the segmenter can draw the ramp
//! separately from the flat parts on either side.
//!
//! Insertion order is playback order. Times are expected to be authored in
//! non-decreasing order and are never re-sorted.

use crate::config::ExpressionMode;
use crate::constants::ConstantTable;
use crate::document::SignalDecl;
use crate::expression;
use crate::types::{ms_to_seconds, LogicState, PlotError, Result};
use indexmap::IndexMap;
use serde::Serialize;

/// Suffix appended to the key of the synthetic entry around a transition
pub const TRANSITION_KEY_SUFFIX: char = 't';

/// One resolved entry of a signal timeline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEntry {
    /// Formatted resolved time, possibly suffixed with `t`
    pub key: String,
    /// Resolved time in milliseconds
    pub time_ms: f64,
    pub logic: LogicState,
    /// Sample remark (empty if none)
    pub remark: String,
    /// True for the `t`-suffixed duplicate recorded around a transition
    pub synthetic: bool,
}

impl TimelineEntry {
    /// Resolved time in plot seconds
    pub fn seconds(&self) -> f64 {
        ms_to_seconds(self.time_ms)
    }
}

/// Ordered timeline of one signal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalTimeline {
    name: String,
    remark: Option<String>,
    entries: IndexMap<String, TimelineEntry>,
}

impl SignalTimeline {
    fn new(name: &str, remark: Option<String>) -> Self {
        Self {
            name: name.to_string(),
            remark,
            entries: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn remark(&self) -> Option<&str> {
        self.remark.as_deref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in playback order
    pub fn entries(&self) -> impl Iterator<Item = &TimelineEntry> + '_ {
        self.entries.values()
    }

    /// Keys in playback order
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&TimelineEntry> {
        self.entries.get(key)
    }

    fn insert(&mut self, entry: TimelineEntry) -> Result<()> {
        if self.entries.contains_key(&entry.key) {
            return Err(PlotError::DuplicateKey {
                signal: self.name.clone(),
                key: entry.key,
            });
        }
        self.entries.insert(entry.key.clone(), entry);
        Ok(())
    }
}

/// Format a resolved time as a timeline key (`10.0`, `0.5`, `1250.0`)
pub fn format_time_key(time_ms: f64) -> String {
    format!("{:?}", time_ms)
}

/// Builds signal timelines against one resolved constant table
pub struct TimelineBuilder<'a> {
    constants: &'a ConstantTable,
    mode: ExpressionMode,
}

impl<'a> TimelineBuilder<'a> {
    pub fn new(constants: &'a ConstantTable, mode: ExpressionMode) -> Self {
        Self { constants, mode }
    }

    /// Resolve every sample point of `signal` in document order
    pub fn build(&self, signal: &SignalDecl) -> Result<SignalTimeline> {
        let mut timeline = SignalTimeline::new(&signal.name, signal.remark.clone());
        let mut prev_logic: Option<LogicState> = None;

        for sample in &signal.samples {
            let time_ms = expression::evaluate(&sample.time, self.constants, self.mode)?;
            let key = format_time_key(time_ms);
            let remark = sample.remark.clone().unwrap_or_default();

            let needs_duplicate = prev_logic.is_some_and(LogicState::is_transition)
                || sample.logic.is_transition();

            timeline.insert(TimelineEntry {
                key: key.clone(),
                time_ms,
                logic: sample.logic,
                remark: remark.clone(),
                synthetic: false,
            })?;

            if needs_duplicate {
                timeline.insert(TimelineEntry {
                    key: format!("{}{}", key, TRANSITION_KEY_SUFFIX),
                    time_ms,
                    logic: sample.logic,
                    remark,
                    synthetic: true,
                })?;
            }

            prev_logic = Some(sample.logic);
        }

        log::debug!(
            "Built timeline for '{}': {} samples, {} entries",
            timeline.name,
            signal.samples.len(),
            timeline.len()
        );

        Ok(timeline)
    }
}
