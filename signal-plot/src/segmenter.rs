//! Waveform segmentation
//!
//! Turns a signal timeline into forward-step plot segments. Two strategies
//! exist and are selected per signal:
//!
//! - **Transition-aware**: for timelines containing transition markers. The
//!   timeline is split into several segments; the two points right after a
//!   transition form a `fill` segment (the ramp), everything else is drawn as
//!   `line` segments.
//! - **Plain**: for transition-free timelines. A single `line` segment made of
//!   at most `max_plain_points` points.
//!
//! # Levels
//!
//! True is `1.0`, False and Transition are `0.0`. An entry following a
//! transition takes `1.0` if it is explicitly True, otherwise it flips the
//! previous level.

use crate::timeline::{SignalTimeline, TimelineEntry};
use crate::transition::has_transition;
use crate::types::{LogicState, PlotPoint, PlotSegment, HIGH};
use serde::Serialize;

/// Default point cap of the plain strategy
pub const DEFAULT_MAX_PLAIN_POINTS: usize = 20;

/// Segmentation strategy used for a signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    TransitionAware,
    Plain,
}

impl Strategy {
    /// Pick the strategy for a timeline
    pub fn for_timeline(timeline: &SignalTimeline) -> Self {
        if has_transition(timeline) {
            Strategy::TransitionAware
        } else {
            Strategy::Plain
        }
    }
}

/// Segment a timeline with the strategy it calls for
pub fn segment_timeline(
    timeline: &SignalTimeline,
    max_plain_points: usize,
) -> (Strategy, Vec<PlotSegment>) {
    let strategy = Strategy::for_timeline(timeline);
    let segments = match strategy {
        Strategy::TransitionAware => transition_plot_lines(timeline),
        Strategy::Plain => square_wave(timeline, max_plain_points),
    };

    log::debug!(
        "Segmented '{}' with {:?} strategy: {} segments",
        timeline.name(),
        strategy,
        segments.len()
    );

    (strategy, segments)
}

/// Tracks the previous entry to resolve levels relative to transitions
#[derive(Debug, Default)]
struct LevelTracker {
    prev_logic: Option<LogicState>,
    prev_y: f64,
}

impl LevelTracker {
    fn next(&mut self, logic: LogicState) -> f64 {
        let y = match self.prev_logic {
            Some(LogicState::Transition) if logic == LogicState::True => HIGH,
            Some(LogicState::Transition) => HIGH - self.prev_y,
            _ => logic.level(),
        };

        self.prev_logic = Some(logic);
        self.prev_y = y;
        y
    }
}

/// Resolve every entry to a plot point, paired with the entry it came from
fn resolve_points(
    timeline: &SignalTimeline,
) -> impl Iterator<Item = (&TimelineEntry, PlotPoint)> + '_ {
    let mut levels = LevelTracker::default();
    timeline.entries().map(move |entry| {
        let y = levels.next(entry.logic);
        (entry, PlotPoint::new(entry.seconds(), y, entry.remark.clone()))
    })
}

/// State of the segment currently being filled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentState {
    /// Collecting points of a line segment
    Open,
    /// A transition opened a new segment; the next point closes it as a fill
    AwaitingFillClose,
}

/// What to do with the open segment after appending a point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentAction {
    Extend,
    CloseLine,
    CloseFill,
}

impl SegmentState {
    /// Transition function of the segmentation state machine.
    ///
    /// `open_len` is the number of points in the open segment, including the
    /// one just appended.
    pub fn step(self, is_transition: bool, open_len: usize) -> (SegmentState, SegmentAction) {
        match self {
            SegmentState::AwaitingFillClose => (SegmentState::Open, SegmentAction::CloseFill),
            SegmentState::Open if is_transition && open_len != 1 => {
                (SegmentState::Open, SegmentAction::CloseLine)
            }
            SegmentState::Open if is_transition => {
                (SegmentState::AwaitingFillClose, SegmentAction::Extend)
            }
            SegmentState::Open => (SegmentState::Open, SegmentAction::Extend),
        }
    }
}

/// Transition-aware segmentation.
///
/// Points still open after the last entry are emitted as a final line segment.
pub fn transition_plot_lines(timeline: &SignalTimeline) -> Vec<PlotSegment> {
    let mut segments = Vec::new();
    let mut open: Vec<PlotPoint> = Vec::new();
    let mut state = SegmentState::Open;

    for (entry, point) in resolve_points(timeline) {
        open.push(point);

        let (next, action) = state.step(entry.logic.is_transition(), open.len());
        state = next;

        match action {
            SegmentAction::Extend => {}
            SegmentAction::CloseLine => segments.push(PlotSegment::line(std::mem::take(&mut open))),
            SegmentAction::CloseFill => segments.push(PlotSegment::fill(std::mem::take(&mut open))),
        }
    }

    if !open.is_empty() {
        segments.push(PlotSegment::line(open));
    }

    segments
}

/// Plain segmentation: one line segment of at most `max_points` points
pub fn square_wave(timeline: &SignalTimeline, max_points: usize) -> Vec<PlotSegment> {
    if timeline.len() > max_points {
        log::warn!(
            "Signal '{}' has {} entries, plotting only the first {}",
            timeline.name(),
            timeline.len(),
            max_points
        );
    }

    let points: Vec<PlotPoint> = resolve_points(timeline)
        .take(max_points)
        .map(|(_, point)| point)
        .collect();

    if points.is_empty() {
        return Vec::new();
    }

    vec![PlotSegment::line(points)]
}
