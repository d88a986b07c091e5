//! Engagement statistics over the session history.
//!
//! Everything here is a pure function of the history and "now"; nothing is
//! cached or persisted.

use chrono::{DateTime, Local, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

use crate::session::MeditationSession;

/// Total practice time, rounded to whole minutes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalDuration {
    pub hours: u64,
    pub minutes: u64,
    pub total_minutes: u64,
}

impl TotalDuration {
    pub fn from_secs(secs: u64) -> Self {
        let total_minutes = (secs + 30) / 60;
        Self {
            hours: total_minutes / 60,
            minutes: total_minutes % 60,
            total_minutes,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeditationStats {
    pub total_sessions: usize,
    pub today_sessions: usize,
    pub total_duration: TotalDuration,
    /// Consecutive days with at least one session, ending today or yesterday.
    pub streak: u32,
}

impl MeditationStats {
    /// Stats as of now, in the local time zone.
    pub fn compute(sessions: &[MeditationSession]) -> Self {
        Self::compute_at(sessions, Local::now())
    }

    /// Stats as of `now`. Calendar days are taken in `now`'s time zone.
    pub fn compute_at<Tz: TimeZone>(sessions: &[MeditationSession], now: DateTime<Tz>) -> Self {
        let tz = now.timezone();
        let today = now.date_naive();
        let days: Vec<NaiveDate> = sessions
            .iter()
            .map(|s| s.start_time.with_timezone(&tz).date_naive())
            .collect();

        Self {
            total_sessions: sessions.len(),
            today_sessions: days.iter().filter(|d| **d == today).count(),
            total_duration: TotalDuration::from_secs(
                sessions.iter().map(|s| s.duration_secs).sum(),
            ),
            streak: streak(days, today),
        }
    }
}

/// Length of the run of consecutive days ending at the most recent session
/// day. Zero unless that day is `today` or yesterday.
pub fn streak(mut days: Vec<NaiveDate>, today: NaiveDate) -> u32 {
    days.sort_unstable_by(|a, b| b.cmp(a));
    let Some(&latest) = days.first() else {
        return 0;
    };
    if (today - latest).num_days() > 1 {
        return 0;
    }

    let mut streak = 1;
    let mut current = latest;
    for &day in &days[1..] {
        match (current - day).num_days() {
            1 => {
                streak += 1;
                current = day;
            }
            0 => {}
            _ => break,
        }
    }
    streak
}
