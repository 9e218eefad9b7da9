//! CLI command definitions and output rendering

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::debug;

use crate::catalog::{CategoryView, ResetOutcome};
use crate::scheduler::ScheduleStatus;

/// Essential Tracker - daily essentials checklist
#[derive(Parser)]
#[command(
    name = "et",
    about = "Daily essentials checklist that resets itself once a day",
    version = env!("CARGO_PKG_VERSION"),
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute (defaults to `serve`)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP API and the daily reset scheduler
    Serve {
        /// Override the configured port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show the reset schedule
    Status {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// List categories and their items
    List {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Uncheck every item now
    Reset,

    /// Show logs
    Logs {
        /// Follow log output (like tail -f)
        #[arg(short, long)]
        follow: bool,

        /// Number of lines to show
        #[arg(short, long, default_value = "50")]
        lines: usize,
    },
}

/// Output format for status/list commands
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        debug!(%s, "OutputFormat::from_str: called");
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {}. Use: text or json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Get the log file path
pub fn get_log_path() -> PathBuf {
    debug!("get_log_path: called");
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("essential-tracker")
        .join("logs")
        .join("et.log")
}

/// Render the schedule for `et status`
pub fn render_status(status: &ScheduleStatus) -> String {
    let mut out = String::new();
    out.push_str(&format!("{} {}  {}\n", "Now:".bold(), status.clock, status.date));
    out.push_str(&format!(
        "{} {} ({})\n",
        "Reset time:".bold(),
        status.notification_time,
        if status.notifications {
            "reminder on".green()
        } else {
            "reminder off".dimmed()
        }
    ));
    let last = status
        .last_reset_date
        .map(|d| d.to_string())
        .unwrap_or_else(|| "never".to_string());
    out.push_str(&format!("{} {}\n", "Last reset:".bold(), last));
    out.push_str(&format!(
        "{} {} (in {})",
        "Next reset:".bold(),
        status.next_reset.at.format("%Y-%m-%d %H:%M"),
        status.next_reset.countdown.cyan()
    ));
    if status.reset_pending {
        out.push_str(&format!("\n{}", "Today's reset has not run yet".yellow()));
    }
    out
}

/// Render categories and items for `et list`
pub fn render_views(views: &[CategoryView]) -> String {
    if views.is_empty() {
        return "No categories.".dimmed().to_string();
    }

    let mut lines = Vec::new();
    for view in views {
        let done = view.items.iter().filter(|i| i.checked).count();
        let header = format!("{} ({}/{})", view.category.name, done, view.items.len());
        lines.push(if view.all_checked {
            header.green().bold().to_string()
        } else {
            header.bold().to_string()
        });
        for item in &view.items {
            let marker = if item.checked { "[x]".green() } else { "[ ]".dimmed() };
            lines.push(format!("  {} {}", marker, item.name));
        }
    }
    lines.join("\n")
}

/// Render the result of `et reset`
pub fn render_reset(outcome: &ResetOutcome) -> String {
    format!(
        "{} Cleared {} checked item(s), last reset {}",
        "✓".green(),
        outcome.cleared,
        outcome.last_reset_date
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, Item};

    #[test]
    fn test_cli_parse_no_command() {
        let cli = Cli::parse_from(["et"]);
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_cli_parse_serve_port() {
        let cli = Cli::parse_from(["et", "serve", "--port", "6000"]);
        assert!(matches!(cli.command, Some(Command::Serve { port: Some(6000) })));
    }

    #[test]
    fn test_cli_parse_status_json() {
        let cli = Cli::parse_from(["et", "-v", "status", "--format", "json"]);
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Some(Command::Status {
                format: OutputFormat::Json
            })
        ));
    }

    #[test]
    fn test_cli_parse_global_config() {
        let cli = Cli::parse_from(["et", "reset", "-c", "/tmp/et.yml"]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/et.yml")));
        assert!(matches!(cli.command, Some(Command::Reset)));
    }

    #[test]
    fn test_cli_parse_logs() {
        let cli = Cli::parse_from(["et", "logs", "-f", "-n", "10"]);
        assert!(matches!(
            cli.command,
            Some(Command::Logs {
                follow: true,
                lines: 10
            })
        ));
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("plain".parse::<OutputFormat>(), Ok(OutputFormat::Text));
        assert!("table".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Json.to_string(), "json");
    }

    #[test]
    fn test_log_path() {
        assert!(get_log_path().ends_with("essential-tracker/logs/et.log"));
    }

    #[test]
    fn test_render_views() {
        colored::control::set_override(false);
        let category = Category::new("Keys", "key", "yellow");
        let mut house = Item::new("House Keys", category.id.clone());
        house.checked = true;
        let car = Item::new("Car Keys", category.id.clone());
        let view = CategoryView {
            category,
            items: vec![house, car],
            all_checked: false,
        };

        let out = render_views(&[view]);
        assert_eq!(out, "Keys (1/2)\n  [x] House Keys\n  [ ] Car Keys");
        assert_eq!(render_views(&[]), "No categories.");
    }
}
