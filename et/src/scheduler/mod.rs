//! Daily reset scheduling
//!
//! Ticks on an interval, checks whether the day's reset is due, clears every
//! item's checked flag and sends the reminder.

mod clock;
mod config;
mod core;
mod notifier;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{MAX_TICK_MS, ResetTrigger, SchedulerConfig, TriggerPolicy};
pub use self::core::{NextReset, ResetScheduler, ScheduleStatus, SchedulerPhase, TickOutcome, next_reset};
pub use notifier::{
    CommandNotifier, LogNotifier, NotificationOutcome, NotificationPermission, Notifier, NotifyError, REMINDER_BODY,
    REMINDER_TITLE, Reminder,
};
