//! Reset scheduler implementation

use std::fmt;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::catalog::ResetOutcome;
use crate::domain::{NotificationTime, Settings, format_countdown, format_date};
use crate::error::TrackerResult;
use crate::state::StateManager;

use super::clock::Clock;
use super::config::{ResetTrigger, SchedulerConfig};
use super::notifier::{NotificationOutcome, Reminder};

/// Where the scheduler is in its tick cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerPhase {
    /// Waiting for the next tick
    Idle,
    /// Evaluating whether a reset is due and applying it in the same step
    DueCheck,
    /// Reset committed, sending the reminder
    Notify,
}

impl fmt::Display for SchedulerPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedulerPhase::Idle => write!(f, "idle"),
            SchedulerPhase::DueCheck => write!(f, "due-check"),
            SchedulerPhase::Notify => write!(f, "notify"),
        }
    }
}

/// Result of one scheduler tick
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Nothing to do this tick
    NotDue,
    /// Items were reset; carries what happened to the reminder
    Reset {
        outcome: ResetOutcome,
        notification: NotificationOutcome,
    },
    /// The due check or reset failed; retried on the next tick
    Failed { error: String },
}

/// When the next reset fires and how long until then
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextReset {
    pub at: NaiveDateTime,
    #[serde(skip)]
    pub remaining: TimeDelta,
    /// `HH:MM:SS`
    pub countdown: String,
}

/// Next scheduled reset strictly after `now`
pub fn next_reset(now: NaiveDateTime, settings: &Settings) -> NextReset {
    let at = settings.notification_time.next_after(now);
    let remaining = at - now;
    NextReset {
        at,
        remaining,
        countdown: format_countdown(remaining),
    }
}

/// Snapshot of the reset schedule as shown to the user
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleStatus {
    /// Current time in the configured clock format
    pub clock: String,
    /// Today as `DD/MM/YY`
    pub date: String,
    pub notification_time: NotificationTime,
    pub notifications: bool,
    pub last_reset_date: Option<NaiveDate>,
    /// Today has not been reset yet
    pub reset_pending: bool,
    pub next_reset: NextReset,
}

impl ScheduleStatus {
    pub fn new(now: NaiveDateTime, settings: &Settings) -> Self {
        Self {
            clock: settings.format_clock(now),
            date: format_date(now.date()),
            notification_time: settings.notification_time,
            notifications: settings.notifications,
            last_reset_date: settings.last_reset_date,
            reset_pending: settings.reset_pending_on(now.date()),
            next_reset: next_reset(now, settings),
        }
    }
}

/// Drives the once-a-day reset
///
/// Each tick asks the state actor to check and reset in one serialized step,
/// so a user request can never interleave between the due check and the reset.
/// A failed tick leaves the last reset date untouched and is retried on the
/// next tick. A failed startup catch-up is retried the same way, with the
/// startup trigger, until it succeeds.
pub struct ResetScheduler {
    config: SchedulerConfig,
    state: StateManager,
    clock: Arc<dyn Clock>,
    reminder: Reminder,
    phase: SchedulerPhase,
    catch_up_pending: bool,
}

impl ResetScheduler {
    pub fn new(config: SchedulerConfig, state: StateManager, clock: Arc<dyn Clock>, reminder: Reminder) -> Self {
        debug!(?config, "ResetScheduler::new: called");
        Self {
            config,
            state,
            clock,
            reminder,
            phase: SchedulerPhase::Idle,
            catch_up_pending: false,
        }
    }

    pub fn phase(&self) -> SchedulerPhase {
        self.phase
    }

    /// True while a failed startup catch-up still has to be retried
    pub fn catch_up_pending(&self) -> bool {
        self.catch_up_pending
    }

    fn enter(&mut self, phase: SchedulerPhase) {
        debug!(from = %self.phase, to = %phase, "ResetScheduler: phase change");
        self.phase = phase;
    }

    /// Reset right away if today has not been reset yet. Never notifies.
    pub async fn startup_catch_up(&mut self) -> TrackerResult<Option<ResetOutcome>> {
        debug!(enabled = self.config.startup_catch_up, "startup_catch_up: called");
        if !self.config.startup_catch_up {
            return Ok(None);
        }

        let now = self.clock.now();
        self.enter(SchedulerPhase::DueCheck);
        let result = self.state.reset_if_due(now, ResetTrigger::Startup).await;
        self.enter(SchedulerPhase::Idle);
        self.catch_up_pending = result.is_err();

        let outcome = result?.map(|due| due.outcome);
        if let Some(outcome) = &outcome {
            info!(cleared = outcome.cleared, date = %outcome.last_reset_date, "Startup catch-up reset");
        }
        Ok(outcome)
    }

    /// Run one due check, resetting and notifying if due
    ///
    /// While a startup catch-up is pending the startup trigger is evaluated
    /// instead, and a reset it causes does not notify.
    pub async fn tick(&mut self) -> TickOutcome {
        let now = self.clock.now();
        let trigger = if self.catch_up_pending {
            ResetTrigger::Startup
        } else {
            ResetTrigger::Scheduled(self.config.trigger)
        };

        self.enter(SchedulerPhase::DueCheck);
        let result = self.state.reset_if_due(now, trigger).await;
        if result.is_ok() && self.catch_up_pending {
            debug!("tick: pending startup catch-up completed");
            self.catch_up_pending = false;
        }

        let outcome = match result {
            Ok(None) => TickOutcome::NotDue,
            Ok(Some(due)) => {
                info!(
                    cleared = due.outcome.cleared,
                    date = %due.outcome.last_reset_date,
                    ?trigger,
                    "Daily reset"
                );
                let notification = if trigger.notifies() {
                    self.enter(SchedulerPhase::Notify);
                    self.reminder.send(due.settings.notifications).await
                } else {
                    NotificationOutcome::Disabled
                };
                TickOutcome::Reset {
                    outcome: due.outcome,
                    notification,
                }
            }
            Err(e) => {
                warn!(error = %e, retryable = e.is_retryable(), "Reset tick failed, retrying next tick");
                TickOutcome::Failed { error: e.to_string() }
            }
        };

        self.enter(SchedulerPhase::Idle);
        outcome
    }

    /// Tick until a shutdown signal arrives
    pub async fn run(&mut self, mut shutdown_rx: mpsc::Receiver<()>) {
        debug!("run: called");
        info!(tick_ms = self.config.tick_ms, trigger = ?self.config.trigger, "ResetScheduler starting");

        if let Err(e) = self.startup_catch_up().await {
            warn!(error = %e, "Startup catch-up failed, scheduled ticks will retry");
        }

        let mut interval = tokio::time::interval(self.config.tick_interval());
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.tick().await;
                }
                _ = shutdown_rx.recv() => {
                    debug!("run: shutdown signal received");
                    info!("ResetScheduler stopping");
                    break;
                }
            }
        }
    }
}
