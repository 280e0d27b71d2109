//! Transition marker detection

use crate::timeline::SignalTimeline;

/// Accepted spellings of the transition logic value
pub const TRANSITION_SPELLINGS: [&str; 2] = ["transition", "transistion"];

/// True if `text` names a transition (case-insensitive substring match)
pub fn is_transition_marker(text: &str) -> bool {
    let lower = text.to_lowercase();
    TRANSITION_SPELLINGS.iter().any(|s| lower.contains(s))
}

/// True if any entry of the timeline is a transition marker
pub fn has_transition(timeline: &SignalTimeline) -> bool {
    timeline.entries().any(|entry| entry.logic.is_transition())
}
