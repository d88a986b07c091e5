pub mod config;
pub mod pattern;
pub mod session;
pub mod stats;

use breathwork_core::{Config, Database, SessionTracker};

/// Everything a command needs: the kv database, the tracker loaded from it,
/// and the config, with the configured pattern selected.
pub struct Workspace {
    pub db: Database,
    pub tracker: SessionTracker,
    pub config: Config,
}

impl Workspace {
    pub fn open() -> Result<Self, Box<dyn std::error::Error>> {
        let db = Database::open()?;
        let mut tracker = SessionTracker::load(&db);
        let config = Config::load()?;
        if let Err(err) = tracker.select_pattern(&config.session.pattern) {
            tracing::warn!(
                pattern = %config.session.pattern,
                error = %err,
                "Configured pattern not found, using default"
            );
        }
        Ok(Self {
            db,
            tracker,
            config,
        })
    }

    /// Persist the tracker's current selection into the config. Custom
    /// patterns are stored by id so a repeated name cannot hijack it.
    pub fn save_selection(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let selected = self.tracker.patterns().selected().selection_key();
        if self.config.session.pattern != selected {
            self.config.session.pattern = selected;
            self.config.save()?;
        }
        Ok(())
    }
}

/// Format seconds as `m:ss`.
pub fn format_clock(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_format() {
        assert_eq!(format_clock(0), "0:00");
        assert_eq!(format_clock(65), "1:05");
        assert_eq!(format_clock(3_600), "60:00");
    }
}
