//! Reminder delivery
//!
//! A [`Notifier`] shows a title/body pair to the user. [`Reminder`] wraps one
//! with the two gates every reminder passes: the user's `notifications`
//! setting and the platform permission state. Delivery failures are reported
//! as an outcome and never surface as errors to the reset path.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{NotificationBackend, NotificationsConfig};

/// Fixed reminder title
pub const REMINDER_TITLE: &str = "Essential Tracker";

/// Fixed reminder body
pub const REMINDER_BODY: &str = "Time to check your daily essentials!";

const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Failed to run notifier: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Notifier exited with {0}")]
    Exit(String),

    #[error("Notifier timed out after {0:?}")]
    Timeout(Duration),
}

/// Platform permission to display notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationPermission {
    #[default]
    Granted,
    Denied,
    /// Never asked; treated as not granted
    Default,
}

/// Something that can show a notification
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError>;
}

/// Writes reminders to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError> {
        info!(%title, %body, "Notification");
        Ok(())
    }
}

/// Runs an external program (e.g. `notify-send`) with title and body as arguments
#[derive(Debug, Clone)]
pub struct CommandNotifier {
    program: String,
    timeout: Duration,
}

impl CommandNotifier {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }

    /// Kill the program if it has not exited after `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl Notifier for CommandNotifier {
    async fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError> {
        debug!(program = %self.program, "CommandNotifier::notify: called");
        let output = tokio::time::timeout(
            self.timeout,
            tokio::process::Command::new(&self.program)
                .arg(title)
                .arg(body)
                .kill_on_drop(true)
                .output(),
        )
        .await
        .map_err(|_| NotifyError::Timeout(self.timeout))??;

        if !output.status.success() {
            return Err(NotifyError::Exit(output.status.to_string()));
        }
        Ok(())
    }
}

/// What happened to a reminder
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum NotificationOutcome {
    Sent,
    /// The `notifications` setting is off
    Disabled,
    /// The platform has not granted permission
    NotPermitted { permission: NotificationPermission },
    Failed { error: String },
}

/// Gated reminder sender
#[derive(Clone)]
pub struct Reminder {
    notifier: Arc<dyn Notifier>,
    permission: NotificationPermission,
}

impl Reminder {
    pub fn new(notifier: Arc<dyn Notifier>, permission: NotificationPermission) -> Self {
        Self { notifier, permission }
    }

    /// Build the configured notifier backend
    pub fn from_config(config: &NotificationsConfig) -> Self {
        let notifier: Arc<dyn Notifier> = match config.backend {
            NotificationBackend::Log => Arc::new(LogNotifier),
            NotificationBackend::Command => Arc::new(
                CommandNotifier::new(config.command.clone()).with_timeout(Duration::from_secs(config.timeout_secs)),
            ),
        };
        Self::new(notifier, config.permission)
    }

    /// Send the daily reminder if `enabled` and permitted
    pub async fn send(&self, enabled: bool) -> NotificationOutcome {
        debug!(enabled, permission = ?self.permission, "Reminder::send: called");
        if !enabled {
            return NotificationOutcome::Disabled;
        }
        if self.permission != NotificationPermission::Granted {
            info!(permission = ?self.permission, "Notification permission not granted, skipping reminder");
            return NotificationOutcome::NotPermitted {
                permission: self.permission,
            };
        }

        match self.notifier.notify(REMINDER_TITLE, REMINDER_BODY).await {
            Ok(()) => NotificationOutcome::Sent,
            Err(e) => {
                warn!(error = %e, "Failed to deliver reminder");
                NotificationOutcome::Failed { error: e.to_string() }
            }
        }
    }
}
