use std::collections::BTreeMap;
use std::io::Write;

use breathwork_core::timer::clamp_duration_min;
use breathwork_core::{
    run_session, BreathingPattern, BreathingTimer, Event, MeditationSession, Phase, RunOutcome,
    Ticker, ValidationError,
};
use chrono::Utc;
use clap::Subcommand;
use serde::Serialize;

use super::{format_clock, Workspace};

#[derive(Subcommand)]
pub enum SessionAction {
    /// Run a live session at 10 Hz; Ctrl-C ends it early
    Run {
        /// Pattern name or custom id (defaults to the selected pattern)
        #[arg(long)]
        pattern: Option<String>,
        /// Session length in minutes, 1-60 (defaults to config)
        #[arg(long)]
        minutes: Option<i64>,
        /// Do not add the session to the history
        #[arg(long)]
        no_record: bool,
        /// Print events as JSON lines
        #[arg(long)]
        json: bool,
    },
    /// Tick a session through offline and summarize its phases
    Plan {
        #[arg(long)]
        pattern: Option<String>,
        #[arg(long)]
        minutes: Option<i64>,
    },
}

#[derive(Serialize)]
struct SessionPlan {
    pattern: BreathingPattern,
    cycle_secs: u32,
    duration_min: u32,
    ticks: u64,
    full_cycles: u64,
    phase_changes: u64,
    phases_entered: BTreeMap<String, u64>,
    final_phase: Phase,
}

fn resolve_pattern(
    ws: &Workspace,
    name: Option<&str>,
) -> Result<BreathingPattern, ValidationError> {
    match name {
        Some(name) => ws
            .tracker
            .patterns()
            .resolve(name)
            .ok_or_else(|| ValidationError::UnknownPattern(name.to_string())),
        None => Ok(ws.tracker.patterns().selected().clone()),
    }
}

fn build_timer(
    ws: &Workspace,
    pattern: Option<&str>,
    minutes: Option<i64>,
) -> Result<BreathingTimer, ValidationError> {
    let pattern = resolve_pattern(ws, pattern)?;
    let minutes = minutes.map_or(ws.config.session.duration_min, clamp_duration_min);
    Ok(BreathingTimer::new(pattern, minutes).with_cues(ws.config.cues.enabled))
}

fn print_event(timer: &BreathingTimer, event: &Event, json: bool) {
    if json {
        if let Ok(line) = serde_json::to_string(event) {
            println!("{line}");
        }
        return;
    }
    let clock = format_clock(timer.remaining_secs());
    match event {
        Event::SessionStarted { pattern, .. } => {
            println!(
                "{pattern}: {} minute(s), {}s cycle. Ctrl-C to end early.",
                timer.duration_min(),
                timer.pattern().cycle()
            );
            println!("{clock}  {}", timer.phase().label());
        }
        Event::PhaseChanged {
            to, phase_secs, cue, ..
        } => {
            if *cue {
                print!("\x07");
            }
            println!("{clock}  {} ({phase_secs}s)", to.label());
        }
        Event::SessionPaused { .. } => println!("{clock}  Ended early"),
        Event::SessionCompleted { elapsed_secs, .. } => {
            println!("Completed {}", format_clock(*elapsed_secs));
        }
        Event::SessionReset { .. } | Event::StateSnapshot { .. } => {}
    }
    if let Err(err) = std::io::stdout().flush() {
        tracing::debug!(error = %err, "Failed to flush stdout");
    }
}

/// Whether a finished `session run` belongs in the history. Runs ended
/// before a whole second elapsed are dropped.
fn should_record(outcome: RunOutcome, timer: &BreathingTimer, no_record: bool) -> bool {
    !no_record && (outcome == RunOutcome::Completed || timer.elapsed_secs() > 0)
}

fn plan(timer: &mut BreathingTimer) -> SessionPlan {
    let mut ticks = 0;
    let mut phase_changes = 0;
    let mut phases_entered = BTreeMap::new();
    let mut enter = |phase: Phase| {
        let key = serde_json::to_value(phase)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default();
        *phases_entered.entry(key).or_insert(0) += 1;
    };

    enter(timer.phase());
    timer.start();
    while !timer.is_completed() {
        ticks += 1;
        if let Some(Event::PhaseChanged { to, .. }) = timer.tick() {
            phase_changes += 1;
            enter(to);
        }
    }

    let cycle_secs = timer.pattern().cycle();
    SessionPlan {
        pattern: timer.pattern().clone(),
        cycle_secs,
        duration_min: timer.duration_min(),
        ticks,
        full_cycles: timer.total_secs() / u64::from(cycle_secs.max(1)),
        phase_changes,
        phases_entered,
        final_phase: timer.phase(),
    }
}

pub fn run(action: SessionAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut ws = Workspace::open()?;

    match action {
        SessionAction::Run {
            pattern,
            minutes,
            no_record,
            json,
        } => {
            let mut timer = build_timer(&ws, pattern.as_deref(), minutes)?;
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            let mut ticker = Ticker::default();
            let interrupt = async {
                if let Err(err) = tokio::signal::ctrl_c().await {
                    tracing::warn!(error = %err, "Failed to listen for Ctrl-C");
                    std::future::pending::<()>().await;
                }
            };
            let outcome = runtime.block_on(run_session(
                &mut timer,
                &mut ticker,
                interrupt,
                |timer, event| print_event(timer, event, json),
            ));

            if json {
                println!("{}", serde_json::to_string(&timer.snapshot())?);
            }
            if !should_record(outcome, &timer, no_record) {
                return Ok(());
            }
            let session = MeditationSession::from_timer(&timer, Utc::now());
            if json {
                println!("{}", serde_json::to_string(&session)?);
            }
            ws.tracker.record_session(&ws.db, session)?;
        }
        SessionAction::Plan { pattern, minutes } => {
            let mut timer = build_timer(&ws, pattern.as_deref(), minutes)?;
            let plan = plan(&mut timer);
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
    }
    Ok(())
}
