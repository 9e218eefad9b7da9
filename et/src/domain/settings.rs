//! Singleton user settings and clock helpers

use std::fmt;
use std::str::FromStr;

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{TrackerError, TrackerResult};

/// Daily notification/reset time as wall-clock hour and minute
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NotificationTime {
    hour: u8,
    minute: u8,
}

impl NotificationTime {
    /// Build from hour (0-23) and minute (0-59)
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        (hour < 24 && minute < 60).then_some(Self { hour, minute })
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    /// Check if a wall-clock instant falls within this (hour, minute)
    pub fn matches_minute(&self, now: NaiveDateTime) -> bool {
        now.hour() == u32::from(self.hour) && now.minute() == u32::from(self.minute)
    }

    /// The scheduled instant on the given date
    pub fn on(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(self.as_time())
    }

    /// Next scheduled instant strictly after `now`
    pub fn next_after(&self, now: NaiveDateTime) -> NaiveDateTime {
        let today = self.on(now.date());
        if today > now {
            today
        } else {
            // Day arithmetic only fails at the end of chrono's calendar range
            now.date()
                .checked_add_days(Days::new(1))
                .map(|tomorrow| self.on(tomorrow))
                .unwrap_or(today)
        }
    }

    fn as_time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(u32::from(self.hour), u32::from(self.minute), 0).unwrap_or(NaiveTime::MIN)
    }
}

impl Default for NotificationTime {
    fn default() -> Self {
        Self { hour: 8, minute: 0 }
    }
}

impl fmt::Display for NotificationTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for NotificationTime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (hour, minute) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| format!("expected HH:MM, got '{}'", s))?;

        if hour.is_empty() || hour.len() > 2 || minute.len() != 2 {
            return Err(format!("expected HH:MM, got '{}'", s));
        }

        let hour: u8 = hour.parse().map_err(|_| format!("invalid hour in '{}'", s))?;
        let minute: u8 = minute.parse().map_err(|_| format!("invalid minute in '{}'", s))?;

        Self::new(hour, minute).ok_or_else(|| format!("time out of range: '{}'", s))
    }
}

impl TryFrom<String> for NotificationTime {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<NotificationTime> for String {
    fn from(value: NotificationTime) -> Self {
        value.to_string()
    }
}

/// UI color theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// The singleton settings record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Daily time at which items reset and the reminder fires
    pub notification_time: NotificationTime,

    /// Clock display mode
    pub is_24_hour_format: bool,

    /// Whether the daily reminder is shown
    pub notifications: bool,

    /// Whether check animations are shown
    pub animations: bool,

    pub theme: Theme,

    /// Calendar date of the most recent reset; only the reset path writes it
    pub last_reset_date: Option<NaiveDate>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            notification_time: NotificationTime::default(),
            is_24_hour_format: true,
            notifications: true,
            animations: false,
            theme: Theme::Light,
            last_reset_date: None,
        }
    }
}

impl Settings {
    /// Apply a partial update, validating every provided field first
    pub fn apply(&mut self, update: SettingsUpdate) -> TrackerResult<()> {
        let notification_time = update
            .notification_time
            .map(|raw| {
                raw.parse::<NotificationTime>()
                    .map_err(|msg| TrackerError::validation("notificationTime", msg))
            })
            .transpose()?;

        if let Some(time) = notification_time {
            self.notification_time = time;
        }
        if let Some(is_24h) = update.is_24_hour_format {
            self.is_24_hour_format = is_24h;
        }
        if let Some(notifications) = update.notifications {
            self.notifications = notifications;
        }
        if let Some(animations) = update.animations {
            self.animations = animations;
        }
        if let Some(theme) = update.theme {
            self.theme = theme;
        }
        Ok(())
    }

    /// Check if no reset has been recorded on or after `date`
    pub fn reset_pending_on(&self, date: NaiveDate) -> bool {
        self.last_reset_date.is_none_or(|last| last < date)
    }

    /// Format a wall-clock time using the configured clock mode
    pub fn format_clock(&self, now: NaiveDateTime) -> String {
        format_clock(now, self.is_24_hour_format)
    }
}

/// Partial settings update. `lastResetDate` is intentionally absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    #[serde(default)]
    pub notification_time: Option<String>,

    #[serde(default)]
    pub is_24_hour_format: Option<bool>,

    #[serde(default)]
    pub notifications: Option<bool>,

    #[serde(default)]
    pub animations: Option<bool>,

    #[serde(default)]
    pub theme: Option<Theme>,
}

/// `HH:MM` in 24h mode, `h:MM AM/PM` in 12h mode
pub fn format_clock(now: NaiveDateTime, is_24_hour_format: bool) -> String {
    if is_24_hour_format {
        format!("{:02}:{:02}", now.hour(), now.minute())
    } else {
        let (is_pm, hour) = now.hour12();
        format!("{}:{:02} {}", hour, now.minute(), if is_pm { "PM" } else { "AM" })
    }
}

/// `DD/MM/YY`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%y").to_string()
}

/// `HH:MM:SS`, clamped at zero
pub fn format_countdown(remaining: TimeDelta) -> String {
    let total = remaining.num_seconds().max(0);
    format!("{:02}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
}
