//! Periodic tick source.
//!
//! A [`Ticker`] is acquired with `start()` and released with `stop()`; every
//! path that ends a session must call `stop()`. Ticks arrive on a channel so
//! the consumer keeps sole ownership of the timer state.

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use super::engine::{BreathingTimer, TICK_MS};
use crate::events::Event;

/// Period of the session ticker.
pub const TICK_INTERVAL: Duration = Duration::from_millis(TICK_MS);

const CHANNEL_CAPACITY: usize = 16;

#[derive(Debug)]
pub struct Ticker {
    period: Duration,
    task: Option<JoinHandle<()>>,
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new(TICK_INTERVAL)
    }
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Self { period, task: None }
    }

    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Spawn the tick task. Returns `None` if it is already running.
    ///
    /// Must be called from inside a tokio runtime.
    pub fn start(&mut self) -> Option<mpsc::Receiver<Instant>> {
        if self.is_active() {
            return None;
        }
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let period = self.period;
        self.task = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                let at = interval.tick().await;
                if tx.send(at).await.is_err() {
                    break;
                }
            }
        }));
        tracing::debug!(period_ms = period.as_millis() as u64, "Ticker started");
        Some(rx)
    }

    /// Abort the tick task. Safe to call when already stopped.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            tracing::debug!("Ticker stopped");
        }
    }
}

/// How a driven session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The countdown reached zero.
    Completed,
    /// `interrupt` resolved first; the timer was paused.
    Interrupted,
}

/// Start `timer` and feed it ticks from `ticker` until it completes or
/// `interrupt` resolves. Every event, including the start and pause events,
/// is handed to `on_event`. The ticker is stopped on both exits.
pub async fn run_session<F, I>(
    timer: &mut BreathingTimer,
    ticker: &mut Ticker,
    interrupt: I,
    mut on_event: F,
) -> RunOutcome
where
    F: FnMut(&BreathingTimer, &Event),
    I: Future<Output = ()>,
{
    if let Some(event) = timer.start() {
        on_event(&*timer, &event);
    }
    if timer.is_completed() {
        return RunOutcome::Completed;
    }
    ticker.stop();
    let Some(mut ticks) = ticker.start() else {
        return RunOutcome::Interrupted;
    };
    tokio::pin!(interrupt);

    let outcome = loop {
        tokio::select! {
            tick = ticks.recv() => {
                if tick.is_none() {
                    if let Some(event) = timer.pause() {
                        on_event(&*timer, &event);
                    }
                    break RunOutcome::Interrupted;
                }
                if let Some(event) = timer.tick() {
                    on_event(&*timer, &event);
                }
                if timer.is_completed() {
                    break RunOutcome::Completed;
                }
            }
            () = &mut interrupt => {
                if let Some(event) = timer.pause() {
                    on_event(&*timer, &event);
                }
                break RunOutcome::Interrupted;
            }
        }
    };
    ticker.stop();
    outcome
}
