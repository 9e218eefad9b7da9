//! Scheduler configuration and reset trigger rules

use std::time::Duration;

use chrono::NaiveDateTime;
use eyre::Result;
use serde::{Deserialize, Serialize};

use crate::domain::Settings;

/// Longest allowed tick; the due check must run at least once per minute
pub const MAX_TICK_MS: u64 = 60_000;

/// When a scheduled tick considers the daily reset due
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TriggerPolicy {
    /// Due once the configured time has passed today and no reset happened yet
    #[default]
    CatchUp,
    /// Due only while the wall clock reads the configured hour and minute
    ExactMinute,
}

/// What asked for the due check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetTrigger {
    /// Process start; due whenever today has not been reset yet
    Startup,
    /// Periodic tick evaluated under a policy
    Scheduled(TriggerPolicy),
}

impl ResetTrigger {
    /// Check if a reset is due at `now` given the current settings
    pub fn is_due(&self, now: NaiveDateTime, settings: &Settings) -> bool {
        if !settings.reset_pending_on(now.date()) {
            return false;
        }
        match self {
            ResetTrigger::Startup => true,
            ResetTrigger::Scheduled(TriggerPolicy::CatchUp) => now >= settings.notification_time.on(now.date()),
            ResetTrigger::Scheduled(TriggerPolicy::ExactMinute) => settings.notification_time.matches_minute(now),
        }
    }

    /// Whether a reset from this trigger announces itself with a notification
    pub fn notifies(&self) -> bool {
        matches!(self, ResetTrigger::Scheduled(_))
    }
}

/// Scheduler configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Interval between due checks in milliseconds
    #[serde(rename = "tick-ms")]
    pub tick_ms: u64,

    pub trigger: TriggerPolicy,

    /// Reset immediately at startup if today has not been reset
    #[serde(rename = "startup-catch-up")]
    pub startup_catch_up: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_ms: 1000,
            trigger: TriggerPolicy::default(),
            startup_catch_up: true,
        }
    }
}

impl SchedulerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.tick_ms == 0 || self.tick_ms > MAX_TICK_MS {
            return Err(eyre::eyre!(
                "scheduler.tick-ms must be between 1 and {}, got {}",
                MAX_TICK_MS,
                self.tick_ms
            ));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}
