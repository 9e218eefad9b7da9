//! Essential Tracker configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::scheduler::{NotificationPermission, SchedulerConfig};

/// Main Essential Tracker configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage backend configuration
    pub storage: StorageConfig,

    /// HTTP server configuration
    pub server: ServerConfig,

    /// Daily reset scheduling
    pub scheduler: SchedulerConfig,

    /// Reminder delivery
    pub notifications: NotificationsConfig,
}

impl Config {
    /// Validate configuration before use
    ///
    /// Call this early in startup to fail fast with clear error messages.
    pub fn validate(&self) -> Result<()> {
        self.scheduler.validate()?;
        if self.notifications.backend == NotificationBackend::Command && self.notifications.command.trim().is_empty() {
            return Err(eyre::eyre!("notifications.command must be set when backend is 'command'"));
        }
        if self.notifications.timeout_secs == 0 {
            return Err(eyre::eyre!("notifications.timeout-secs must be at least 1"));
        }
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .essential-tracker.yml
        let local_config = PathBuf::from(".essential-tracker.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/essential-tracker/essential-tracker.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("essential-tracker").join("essential-tracker.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Which store backs the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StorageBackend {
    /// Volatile; contents vanish on exit
    Memory,
    #[default]
    Sqlite,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,

    /// SQLite database file
    pub path: PathBuf,

    /// Seed the default categories and items into a fresh store
    #[serde(rename = "seed-defaults")]
    pub seed_defaults: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        // Use XDG data directory (~/.local/share/essential-tracker on Linux)
        let path = dirs::data_dir()
            .map(|d| d.join("essential-tracker"))
            .unwrap_or_else(|| PathBuf::from(".essential-tracker"))
            .join("tracker.db");

        Self {
            backend: StorageBackend::default(),
            path,
            seed_defaults: true,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

impl ServerConfig {
    /// `host:port` to bind; host names are resolved by the listener
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// How reminders are delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationBackend {
    /// Write the reminder to the log
    #[default]
    Log,
    /// Run an external program with title and body as arguments
    Command,
}

/// Notification configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationsConfig {
    pub backend: NotificationBackend,

    /// Program run by the command backend
    pub command: String,

    /// Seconds the command may run before it is killed
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Platform permission state the notifier starts with
    pub permission: NotificationPermission,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            backend: NotificationBackend::default(),
            command: "notify-send".to_string(),
            timeout_secs: 10,
            permission: NotificationPermission::Granted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::TriggerPolicy;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.storage.backend, StorageBackend::Sqlite);
        assert!(config.storage.path.ends_with("tracker.db"));
        assert!(config.storage.seed_defaults);
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.scheduler.tick_ms, 1000);
        assert_eq!(config.scheduler.trigger, TriggerPolicy::CatchUp);
        assert_eq!(config.notifications.backend, NotificationBackend::Log);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_config() {
        let yaml = r#"
storage:
  backend: memory
  path: /tmp/et/test.db
  seed-defaults: false

server:
  host: 0.0.0.0
  port: 8080

scheduler:
  tick-ms: 500
  trigger: exact-minute
  startup-catch-up: false

notifications:
  backend: command
  command: /usr/bin/true
  timeout-secs: 3
  permission: denied
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.storage.path, PathBuf::from("/tmp/et/test.db"));
        assert!(!config.storage.seed_defaults);
        assert_eq!(config.server.addr(), "0.0.0.0:8080");
        assert_eq!(config.scheduler.tick_ms, 500);
        assert_eq!(config.scheduler.trigger, TriggerPolicy::ExactMinute);
        assert!(!config.scheduler.startup_catch_up);
        assert_eq!(config.notifications.backend, NotificationBackend::Command);
        assert_eq!(config.notifications.permission, NotificationPermission::Denied);
        assert_eq!(config.notifications.timeout_secs, 3);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let yaml = r#"
server:
  port: 5050
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        // Specified value
        assert_eq!(config.server.port, 5050);

        // Defaults for unspecified
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.storage.backend, StorageBackend::Sqlite);
        assert!(config.scheduler.startup_catch_up);
        assert_eq!(config.notifications.command, "notify-send");
        assert_eq!(config.notifications.timeout_secs, 10);
    }

    #[test]
    fn test_validate_rejects_slow_tick() {
        let mut config = Config::default();
        config.scheduler.tick_ms = 120_000;
        assert!(config.validate().is_err());

        config.scheduler.tick_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_requires_command() {
        let mut config = Config::default();
        config.notifications.backend = NotificationBackend::Command;
        config.notifications.command = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_notify_timeout() {
        let mut config = Config::default();
        config.notifications.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_explicit_path() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("et.yml");
        std::fs::write(&path, "server:\n  port: 6001\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.server.port, 6001);

        let missing = temp.path().join("missing.yml");
        assert!(Config::load(Some(&missing)).is_err());
    }
}
