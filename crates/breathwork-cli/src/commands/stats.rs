use clap::Subcommand;

use super::Workspace;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Totals, today's count and the current day streak
    Summary,
    /// Every recorded session, oldest first
    History {
        /// Only the most recent N sessions
        #[arg(long)]
        last: Option<usize>,
    },
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let ws = Workspace::open()?;

    match action {
        StatsAction::Summary => {
            let stats = ws.tracker.stats();
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        StatsAction::History { last } => {
            let sessions = ws.tracker.sessions();
            let skip = last.map_or(0, |n| sessions.len().saturating_sub(n));
            println!("{}", serde_json::to_string_pretty(&sessions[skip..])?);
        }
    }
    Ok(())
}
