//! Breathing phase state machine.
//!
//! ```text
//! Inhale -> Hold -> Exhale -> HoldEmpty -> Inhale ...
//!        \________/        \____________/
//!   (skipped when hold = 0)   (skipped when hold_empty = 0)
//! ```
//!
//! `Completed` is never reached by the cycle itself; only the session
//! countdown puts the clock there.

use serde::{Deserialize, Serialize};

use crate::pattern::BreathingPattern;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    Inhale,
    Hold,
    Exhale,
    HoldEmpty,
    Completed,
}

impl Phase {
    /// Instruction shown to the user for this phase.
    pub fn label(self) -> &'static str {
        match self {
            Phase::Inhale => "Breathe In",
            Phase::Hold => "Hold",
            Phase::Exhale => "Breathe Out",
            Phase::HoldEmpty => "Hold Empty",
            Phase::Completed => "Completed",
        }
    }

    /// The phase that follows this one under `pattern`. Zero-length holds are
    /// skipped.
    pub fn next(self, pattern: &BreathingPattern) -> Phase {
        match self {
            Phase::Inhale if pattern.hold > 0 => Phase::Hold,
            Phase::Inhale | Phase::Hold => Phase::Exhale,
            Phase::Exhale if pattern.hold_empty > 0 => Phase::HoldEmpty,
            Phase::Exhale | Phase::HoldEmpty => Phase::Inhale,
            Phase::Completed => Phase::Completed,
        }
    }
}

/// Progress through a phase of `duration_secs`, clamped to 0.0..=1.0.
pub fn phase_progress(elapsed_ms: u64, duration_secs: u32) -> f64 {
    if duration_secs == 0 {
        return 0.0;
    }
    let duration_ms = u64::from(duration_secs) * 1000;
    (elapsed_ms as f64 / duration_ms as f64).min(1.0)
}

/// Current phase plus the time spent in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseClock {
    phase: Phase,
    elapsed_ms: u64,
}

impl Default for PhaseClock {
    fn default() -> Self {
        Self {
            phase: Phase::Inhale,
            elapsed_ms: 0,
        }
    }
}

impl PhaseClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn progress(&self, pattern: &BreathingPattern) -> f64 {
        phase_progress(self.elapsed_ms, pattern.duration_of(self.phase))
    }

    /// Add `dt_ms` to the current phase. Returns the new phase when the
    /// current one ran out; progress for the new phase starts at zero.
    pub fn advance(&mut self, pattern: &BreathingPattern, dt_ms: u64) -> Option<Phase> {
        if self.phase == Phase::Completed {
            return None;
        }
        let duration_ms = u64::from(pattern.duration_of(self.phase)) * 1000;
        if duration_ms > 0 {
            self.elapsed_ms += dt_ms;
            if self.elapsed_ms < duration_ms {
                return None;
            }
        }
        self.phase = self.phase.next(pattern);
        self.elapsed_ms = 0;
        Some(self.phase)
    }

    /// Restart the current phase from its beginning.
    pub fn restart_phase(&mut self) {
        self.elapsed_ms = 0;
    }

    pub fn complete(&mut self) {
        self.phase = Phase::Completed;
        self.elapsed_ms = 0;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
