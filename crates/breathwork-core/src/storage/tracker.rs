//! Session tracking: custom patterns and session history backed by the kv store.
//!
//! The tracker owns both persisted collections. They are read once by
//! [`SessionTracker::load`] and each mutation rewrites the affected key in
//! full. Unreadable stored data is logged and treated as empty.

use chrono::{DateTime, TimeZone};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::Database;
use crate::error::Result;
use crate::pattern::{BreathingPattern, CustomPattern, PatternDraft, PatternRegistry};
use crate::session::MeditationSession;
use crate::stats::MeditationStats;

/// Key holding the JSON array of custom patterns.
pub const CUSTOM_PATTERNS_KEY: &str = "custom-breathing-patterns";
/// Key holding the JSON array of recorded sessions.
pub const SESSIONS_KEY: &str = "meditation-sessions";

#[derive(Debug, Clone, Default)]
pub struct SessionTracker {
    patterns: PatternRegistry,
    sessions: Vec<MeditationSession>,
}

impl SessionTracker {
    /// Read both collections from `db`, falling back to empty ones.
    pub fn load(db: &Database) -> Self {
        let custom: Vec<CustomPattern> = load_list(db, CUSTOM_PATTERNS_KEY);
        let sessions: Vec<MeditationSession> = load_list(db, SESSIONS_KEY);
        tracing::debug!(
            custom_patterns = custom.len(),
            sessions = sessions.len(),
            "Loaded session tracker"
        );
        Self {
            patterns: PatternRegistry::new(custom),
            sessions,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn patterns(&self) -> &PatternRegistry {
        &self.patterns
    }

    pub fn sessions(&self) -> &[MeditationSession] {
        &self.sessions
    }

    pub fn stats(&self) -> MeditationStats {
        MeditationStats::compute(&self.sessions)
    }

    pub fn stats_at<Tz: TimeZone>(&self, now: DateTime<Tz>) -> MeditationStats {
        MeditationStats::compute_at(&self.sessions, now)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Select a pattern by selection key, custom id or name. Not persisted
    /// here; the selection lives in the config.
    pub fn select_pattern(&mut self, key: &str) -> Result<&BreathingPattern> {
        self.patterns.select_key(key)
    }

    pub fn create_pattern(&mut self, db: &Database, draft: PatternDraft) -> Result<CustomPattern> {
        let created = self.patterns.create(draft).clone();
        self.save_patterns(db)?;
        Ok(created)
    }

    pub fn update_pattern(
        &mut self,
        db: &Database,
        id: &str,
        draft: PatternDraft,
    ) -> Result<CustomPattern> {
        let updated = self.patterns.update(id, draft)?.clone();
        self.save_patterns(db)?;
        Ok(updated)
    }

    /// Delete a custom pattern. Returns `true` if the selection fell back to
    /// the default pattern.
    pub fn delete_pattern(&mut self, db: &Database, id: &str) -> Result<bool> {
        let fell_back = self.patterns.delete(id)?;
        self.save_patterns(db)?;
        Ok(fell_back)
    }

    /// Append a session to the history.
    pub fn record_session(&mut self, db: &Database, session: MeditationSession) -> Result<()> {
        self.sessions.push(session);
        save_list(db, SESSIONS_KEY, &self.sessions)
    }

    fn save_patterns(&self, db: &Database) -> Result<()> {
        save_list(db, CUSTOM_PATTERNS_KEY, self.patterns.custom())
    }
}

fn load_list<T: DeserializeOwned>(db: &Database, key: &str) -> Vec<T> {
    let raw = match db.kv_get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(err) => {
            tracing::warn!(key, error = %err, "Failed to read stored list, starting empty");
            return Vec::new();
        }
    };
    serde_json::from_str(&raw).unwrap_or_else(|err| {
        tracing::warn!(key, error = %err, "Failed to parse stored list, starting empty");
        Vec::new()
    })
}

fn save_list<T: Serialize>(db: &Database, key: &str, items: &[T]) -> Result<()> {
    let json = serde_json::to_string(items)?;
    db.kv_set(key, &json)?;
    tracing::debug!(key, count = items.len(), "Saved list");
    Ok(())
}
