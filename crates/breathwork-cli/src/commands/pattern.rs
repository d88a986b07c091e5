use breathwork_core::{BreathingPattern, PatternDraft, ValidationError};
use clap::{Args, Subcommand};
use serde::Serialize;

use super::Workspace;

#[derive(Subcommand)]
pub enum PatternAction {
    /// List built-in and custom patterns
    List,
    /// Show one pattern by name or custom id
    Show { pattern: String },
    /// Create a custom pattern and select it
    Create {
        #[command(flatten)]
        values: PatternArgs,
    },
    /// Edit a custom pattern by id and select it
    Edit {
        id: String,
        #[command(flatten)]
        values: PatternArgs,
    },
    /// Delete a custom pattern by id
    Delete { id: String },
    /// Select the pattern used for new sessions, by name or custom id
    Select { pattern: String },
}

/// Phase durations in seconds. Out-of-range values are clamped
/// (inhale/exhale 1-20, holds 0-20).
#[derive(Args)]
pub struct PatternArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    inhale: Option<i64>,
    #[arg(long)]
    hold: Option<i64>,
    #[arg(long)]
    exhale: Option<i64>,
    #[arg(long)]
    hold_empty: Option<i64>,
}

impl PatternArgs {
    fn apply(self, mut draft: PatternDraft) -> PatternDraft {
        if let Some(name) = self.name {
            draft.name = name;
        }
        draft.inhale = self.inhale.unwrap_or(draft.inhale);
        draft.hold = self.hold.unwrap_or(draft.hold);
        draft.exhale = self.exhale.unwrap_or(draft.exhale);
        draft.hold_empty = self.hold_empty.unwrap_or(draft.hold_empty);
        draft
    }
}

#[derive(Serialize)]
struct PatternView {
    #[serde(flatten)]
    pattern: BreathingPattern,
    cycle: u32,
    selected: bool,
}

impl PatternView {
    fn new(pattern: BreathingPattern, selected: &BreathingPattern) -> Self {
        Self {
            cycle: pattern.cycle(),
            selected: pattern == *selected,
            pattern,
        }
    }
}

pub fn run(action: PatternAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut ws = Workspace::open()?;

    match action {
        PatternAction::List => {
            let selected = ws.tracker.patterns().selected().clone();
            let views: Vec<PatternView> = ws
                .tracker
                .patterns()
                .all()
                .into_iter()
                .map(|p| PatternView::new(p, &selected))
                .collect();
            println!("{}", serde_json::to_string_pretty(&views)?);
        }
        PatternAction::Show { pattern } => {
            let pattern = ws
                .tracker
                .patterns()
                .resolve(&pattern)
                .ok_or(ValidationError::UnknownPattern(pattern))?;
            let view = PatternView::new(pattern, ws.tracker.patterns().selected());
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
        PatternAction::Create { values } => {
            let created = ws
                .tracker
                .create_pattern(&ws.db, values.apply(PatternDraft::default()))?;
            ws.save_selection()?;
            println!("{}", serde_json::to_string_pretty(&created)?);
        }
        PatternAction::Edit { id, values } => {
            let existing = ws
                .tracker
                .patterns()
                .find_custom(&id)
                .map(BreathingPattern::from)
                .ok_or_else(|| ValidationError::UnknownPatternId(id.clone()))?;
            let draft = values.apply(PatternDraft::from_pattern(&existing));
            let updated = ws.tracker.update_pattern(&ws.db, &id, draft)?;
            ws.save_selection()?;
            println!("{}", serde_json::to_string_pretty(&updated)?);
        }
        PatternAction::Delete { id } => {
            let fell_back = ws.tracker.delete_pattern(&ws.db, &id)?;
            if fell_back {
                ws.save_selection()?;
                eprintln!(
                    "deleted the selected pattern; now using \"{}\"",
                    ws.tracker.patterns().selected().name
                );
            }
            println!("deleted {id}");
        }
        PatternAction::Select { pattern } => {
            let selected = ws.tracker.select_pattern(&pattern)?.name.clone();
            ws.save_selection()?;
            println!("selected {selected}");
        }
    }
    Ok(())
}
