//! Records of finished (or abandoned) breathing sessions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pattern::BreathingPattern;
use crate::timer::BreathingTimer;

/// One session attempt. Written once and appended to the history; never
/// edited afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeditationSession {
    pub id: String,
    pub pattern: BreathingPattern,
    pub start_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    pub completed: bool,
    /// Seconds actually spent breathing.
    #[serde(rename = "duration")]
    pub duration_secs: u64,
}

impl MeditationSession {
    /// Build the record for `timer` as it stands at `ended_at`.
    ///
    /// A timer that was never started is recorded as starting and ending at
    /// `ended_at` with zero duration.
    pub fn from_timer(timer: &BreathingTimer, ended_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            pattern: timer.pattern().clone(),
            start_time: timer.started_at().unwrap_or(ended_at),
            end_time: Some(ended_at),
            completed: timer.is_completed(),
            duration_secs: timer.elapsed_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::builtin_patterns;

    #[test]
    fn completed_timer_records_full_duration() {
        let mut timer = BreathingTimer::new(builtin_patterns()[2].clone(), 1);
        timer.start();
        while !timer.is_completed() {
            timer.tick();
        }
        let ended = Utc::now();
        let session = MeditationSession::from_timer(&timer, ended);
        assert!(session.completed);
        assert_eq!(session.duration_secs, 60);
        assert_eq!(session.pattern.name, "Calm Focus");
        assert!(session.start_time <= ended);
    }

    #[test]
    fn early_end_records_elapsed_only() {
        let mut timer = BreathingTimer::new(builtin_patterns()[0].clone(), 5);
        timer.start();
        for _ in 0..125 {
            timer.tick();
        }
        timer.pause();
        let session = MeditationSession::from_timer(&timer, Utc::now());
        assert!(!session.completed);
        assert_eq!(session.duration_secs, 12);
    }

    #[test]
    fn serializes_with_textual_times() {
        let timer = BreathingTimer::new(builtin_patterns()[0].clone(), 1);
        let session = MeditationSession::from_timer(&timer, Utc::now());
        let json = serde_json::to_value(&session).unwrap();
        assert!(json["startTime"].is_string());
        assert_eq!(json["duration"], 0);
        let back: MeditationSession = serde_json::from_value(json).unwrap();
        assert_eq!(back, session);
    }
}
