//! # Breathwork Core Library
//!
//! Core logic for a guided breathing timer. The CLI binary is a thin layer
//! over this crate.
//!
//! ## Architecture
//!
//! - **Timer**: a tick-driven session countdown wrapped around a breathing
//!   phase state machine, plus a tokio tick source that drives it at 10 Hz
//! - **Patterns**: built-in and user-defined phase durations, with selection
//! - **Stats**: totals, today's count and the day streak over the history
//! - **Storage**: SQLite key-value store for patterns and sessions, TOML config
//!
//! ## Key Components
//!
//! - [`BreathingTimer`]: session countdown + phase clock
//! - [`Ticker`]: start/stop periodic tick source
//! - [`PatternRegistry`]: built-in and custom patterns
//! - [`SessionTracker`]: persisted patterns and history
//! - [`MeditationStats`]: derived engagement statistics

pub mod error;
pub mod events;
pub mod pattern;
pub mod session;
pub mod stats;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use events::Event;
pub use pattern::{
    builtin_patterns, BreathingPattern, CustomPattern, PatternDraft, PatternRegistry,
    PatternSource,
};
pub use session::MeditationSession;
pub use stats::{MeditationStats, TotalDuration};
pub use storage::{Config, Database, SessionTracker};
pub use timer::{run_session, BreathingTimer, Phase, PhaseClock, RunOutcome, Ticker, TimerState};
