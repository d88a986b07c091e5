//! Breathing session timer.
//!
//! Combines the session countdown with the [`PhaseClock`]. Like the phase
//! clock it owns no thread: whoever drives it calls `tick()` once per
//! [`TICK_MS`], usually from a [`Ticker`](super::Ticker).
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//!            |
//!            v
//!        Completed          (reset() returns any state to Idle)
//! ```
//!
//! Completion is driven only by the countdown reaching zero; the phase clock
//! is forced to `Completed` wherever it happens to be.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::phase::{Phase, PhaseClock};
use crate::events::Event;
use crate::pattern::BreathingPattern;

/// Length of one tick in milliseconds (10 Hz).
pub const TICK_MS: u64 = 100;
/// Shortest selectable session, in minutes.
pub const MIN_DURATION_MIN: u32 = 1;
/// Longest selectable session, in minutes.
pub const MAX_DURATION_MIN: u32 = 60;
/// Quick-pick session lengths, in minutes.
pub const DURATION_PRESETS_MIN: [u32; 7] = [1, 3, 5, 10, 15, 20, 30];

/// Clamp a requested session length into the selectable range.
pub fn clamp_duration_min(minutes: i64) -> u32 {
    minutes.clamp(i64::from(MIN_DURATION_MIN), i64::from(MAX_DURATION_MIN)) as u32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreathingTimer {
    pattern: BreathingPattern,
    duration_min: u32,
    state: TimerState,
    /// Remaining session time in milliseconds.
    remaining_ms: u64,
    phase: PhaseClock,
    /// When the session was first started; cleared by `reset()`.
    #[serde(default)]
    started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    cues: bool,
}

impl BreathingTimer {
    /// Create an idle timer. `duration_min` is clamped to 1..=60.
    pub fn new(pattern: BreathingPattern, duration_min: u32) -> Self {
        let duration_min = clamp_duration_min(duration_min.into());
        Self {
            pattern,
            duration_min,
            state: TimerState::Idle,
            remaining_ms: total_ms(duration_min),
            phase: PhaseClock::new(),
            started_at: None,
            cues: false,
        }
    }

    /// Flag phase-change events as cue-worthy.
    pub fn with_cues(mut self, enabled: bool) -> Self {
        self.cues = enabled;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn pattern(&self) -> &BreathingPattern {
        &self.pattern
    }

    pub fn duration_min(&self) -> u32 {
        self.duration_min
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn is_completed(&self) -> bool {
        self.state == TimerState::Completed
    }

    pub fn phase(&self) -> Phase {
        self.phase.phase()
    }

    /// 0.0 ..= 1.0 progress within the current phase.
    pub fn phase_progress(&self) -> f64 {
        self.phase.progress(&self.pattern)
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    /// Remaining time rounded up to the next whole second, for display.
    pub fn remaining_secs(&self) -> u64 {
        self.remaining_ms.div_ceil(1000)
    }

    pub fn total_secs(&self) -> u64 {
        u64::from(self.duration_min) * 60
    }

    /// Seconds of the session that have been used up.
    pub fn elapsed_secs(&self) -> u64 {
        if self.is_completed() {
            self.total_secs()
        } else {
            self.total_secs().saturating_sub(self.remaining_secs())
        }
    }

    /// 0.0 ..= 100.0 progress across the whole session.
    pub fn session_progress_pct(&self) -> f64 {
        let total = self.total_secs();
        if total == 0 {
            return 0.0;
        }
        (self.elapsed_secs() as f64 / total as f64 * 100.0).min(100.0)
    }

    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.state,
            phase: self.phase(),
            phase_label: self.phase().label().to_string(),
            phase_progress: self.phase_progress(),
            remaining_secs: self.remaining_secs(),
            total_secs: self.total_secs(),
            session_progress_pct: self.session_progress_pct(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start or resume the countdown. No-op when running or completed.
    pub fn start(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Idle | TimerState::Paused => {
                self.state = TimerState::Running;
                self.started_at.get_or_insert_with(Utc::now);
                Some(Event::SessionStarted {
                    pattern: self.pattern.name.clone(),
                    remaining_secs: self.remaining_secs(),
                    at: Utc::now(),
                })
            }
            TimerState::Running | TimerState::Completed => None,
        }
    }

    /// Stop the countdown. The current phase starts over on resume.
    pub fn pause(&mut self) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        self.state = TimerState::Paused;
        self.phase.restart_phase();
        Some(Event::SessionPaused {
            remaining_secs: self.remaining_secs(),
            phase: self.phase(),
            at: Utc::now(),
        })
    }

    pub fn reset(&mut self) -> Event {
        self.state = TimerState::Idle;
        self.remaining_ms = total_ms(self.duration_min);
        self.phase.reset();
        self.started_at = None;
        Event::SessionReset {
            remaining_secs: self.remaining_secs(),
            at: Utc::now(),
        }
    }

    /// Advance by one tick. Returns `SessionCompleted` on the tick that
    /// empties the countdown, otherwise `PhaseChanged` when a phase ended.
    pub fn tick(&mut self) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        let from = self.phase();
        self.remaining_ms = self.remaining_ms.saturating_sub(TICK_MS);
        let changed = self.phase.advance(&self.pattern, TICK_MS);

        if self.remaining_ms == 0 {
            self.state = TimerState::Completed;
            self.phase.complete();
            tracing::info!(
                pattern = %self.pattern.name,
                minutes = self.duration_min,
                "Breathing session completed"
            );
            return Some(Event::SessionCompleted {
                pattern: self.pattern.name.clone(),
                elapsed_secs: self.elapsed_secs(),
                at: Utc::now(),
            });
        }

        changed.map(|to| {
            tracing::debug!(?from, ?to, "Phase changed");
            Event::PhaseChanged {
                from,
                to,
                phase_secs: self.pattern.duration_of(to),
                cue: self.cues,
                at: Utc::now(),
            }
        })
    }
}

fn total_ms(duration_min: u32) -> u64 {
    u64::from(duration_min) * 60 * 1000
}
