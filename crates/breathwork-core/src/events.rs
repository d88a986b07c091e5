use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{Phase, TimerState};

/// Every state change of a breathing session produces an Event.
/// The CLI prints them; anything driving a display can poll them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        pattern: String,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    SessionPaused {
        remaining_secs: u64,
        phase: Phase,
        at: DateTime<Utc>,
    },
    SessionReset {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    PhaseChanged {
        from: Phase,
        to: Phase,
        /// Length of the new phase in seconds.
        phase_secs: u32,
        /// Whether a breathing cue should fire for this transition.
        cue: bool,
        at: DateTime<Utc>,
    },
    SessionCompleted {
        pattern: String,
        elapsed_secs: u64,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        phase: Phase,
        phase_label: String,
        phase_progress: f64,
        remaining_secs: u64,
        total_secs: u64,
        session_progress_pct: f64,
        at: DateTime<Utc>,
    },
}
