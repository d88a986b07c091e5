mod engine;
mod phase;
mod ticker;

pub use engine::{
    clamp_duration_min, BreathingTimer, TimerState, DURATION_PRESETS_MIN, MAX_DURATION_MIN,
    MIN_DURATION_MIN, TICK_MS,
};
pub use phase::{phase_progress, Phase, PhaseClock};
pub use ticker::{run_session, RunOutcome, Ticker, TICK_INTERVAL};
