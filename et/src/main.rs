//! Essential Tracker - daily essentials checklist
//!
//! CLI entry point for serving the API and inspecting the checklist.

use std::fs;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use eyre::{Context, Result};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use essential_tracker::cli::{Cli, Command, OutputFormat, get_log_path, render_reset, render_status, render_views};
use essential_tracker::config::Config;
use essential_tracker::scheduler::{Clock, Reminder, ResetScheduler, ScheduleStatus, SystemClock};
use essential_tracker::server::{self, ApiState};
use essential_tracker::state::StateManager;

fn setup_logging(verbose: bool) -> Result<()> {
    // Note: Can't log params here since logging isn't initialized yet
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("essential-tracker")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    let log_file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("et.log"))
        .context("Failed to open log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose).context("Failed to setup logging")?;

    // Load configuration
    let mut config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Some(Command::Serve { port }) => {
            debug!(?port, "main: matched Serve command");
            if let Some(port) = port {
                config.server.port = port;
            }
            cmd_serve(&config).await
        }
        None => {
            debug!("main: no command specified, serving");
            cmd_serve(&config).await
        }
        Some(Command::Status { format }) => {
            debug!(?format, "main: matched Status command");
            cmd_status(&config, format).await
        }
        Some(Command::List { format }) => {
            debug!(?format, "main: matched List command");
            cmd_list(&config, format).await
        }
        Some(Command::Reset) => {
            debug!("main: matched Reset command");
            cmd_reset(&config).await
        }
        Some(Command::Logs { follow, lines }) => {
            debug!(follow, lines, "main: matched Logs command");
            cmd_logs(follow, lines)
        }
    }
}

/// Run the state actor, the reset scheduler and the HTTP server until signalled
async fn cmd_serve(config: &Config) -> Result<()> {
    debug!("cmd_serve: called");
    config.validate().context("Invalid configuration")?;

    let state = StateManager::open(&config.storage).context("Failed to open store")?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let reminder = Reminder::from_config(&config.notifications);

    // Scheduler
    let (scheduler_tx, scheduler_rx) = mpsc::channel::<()>(1);
    let mut scheduler = ResetScheduler::new(config.scheduler.clone(), state.clone(), clock.clone(), reminder.clone());
    let scheduler_handle = tokio::spawn(async move { scheduler.run(scheduler_rx).await });

    // HTTP server
    let (server_tx, server_rx) = mpsc::channel::<()>(1);
    let api = ApiState::new(state.clone(), clock, reminder);
    let addr = config.server.addr();
    let mut server_handle = tokio::spawn(async move { server::run_server(&addr, api, server_rx).await });

    println!("Essential Tracker listening on http://{}", config.server.addr());
    info!("Running. Press Ctrl+C to stop.");

    // The server only returns early if it failed (e.g. the port is taken)
    let server_result = tokio::select! {
        joined = &mut server_handle => {
            debug!("cmd_serve: HTTP server exited before shutdown");
            Some(joined.context("HTTP server task panicked").and_then(|r| r))
        }
        signal = wait_for_signal() => {
            signal?;
            None
        }
    };

    info!("Shutting down...");
    let _ = scheduler_tx.send(()).await;
    let _ = scheduler_handle.await;
    debug!("cmd_serve: scheduler finished");

    let server_result = match server_result {
        Some(result) => result,
        None => {
            let _ = server_tx.send(()).await;
            server_handle.await.context("HTTP server task panicked").and_then(|r| r)
        }
    };

    state.shutdown().await?;
    debug!("cmd_serve: shutdown complete");
    server_result
}

async fn wait_for_signal() -> Result<()> {
    debug!("wait_for_signal: setting up signal handlers");
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut sigint = signal(SignalKind::interrupt())?;
        let mut sigterm = signal(SignalKind::terminate())?;

        tokio::select! {
            _ = sigint.recv() => {
                debug!("wait_for_signal: SIGINT received, initiating shutdown");
                warn!("SIGINT received");
            }
            _ = sigterm.recv() => {
                debug!("wait_for_signal: SIGTERM received, initiating shutdown");
                warn!("SIGTERM received");
            }
        }
    }

    #[cfg(not(unix))]
    {
        debug!("wait_for_signal: waiting for ctrl_c (non-Unix)");
        tokio::signal::ctrl_c().await?;
    }

    Ok(())
}

/// Show the reset schedule
async fn cmd_status(config: &Config, format: OutputFormat) -> Result<()> {
    debug!(?format, "cmd_status: called");
    let state = StateManager::open(&config.storage).context("Failed to open store")?;
    let settings = state.get_settings().await?;
    let status = ScheduleStatus::new(SystemClock.now(), &settings);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&status)?),
        OutputFormat::Text => println!("{}", render_status(&status)),
    }

    state.shutdown().await?;
    Ok(())
}

/// List categories with their items
async fn cmd_list(config: &Config, format: OutputFormat) -> Result<()> {
    debug!(?format, "cmd_list: called");
    let state = StateManager::open(&config.storage).context("Failed to open store")?;
    let views = state.category_views().await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&views)?),
        OutputFormat::Text => println!("{}", render_views(&views)),
    }

    state.shutdown().await?;
    Ok(())
}

/// Uncheck every item now
async fn cmd_reset(config: &Config) -> Result<()> {
    debug!("cmd_reset: called");
    let state = StateManager::open(&config.storage).context("Failed to open store")?;
    let outcome = state.reset(SystemClock.now().date()).await?;
    println!("{}", render_reset(&outcome));
    state.shutdown().await?;
    Ok(())
}

/// Show logs
fn cmd_logs(follow: bool, lines: usize) -> Result<()> {
    debug!(follow, lines, "cmd_logs: called");
    let log_path = get_log_path();

    if !log_path.exists() {
        debug!(?log_path, "cmd_logs: log file does not exist");
        println!("No log file found at: {}", log_path.display());
        return Ok(());
    }

    if follow {
        debug!(?log_path, "cmd_logs: following log file");
        println!("Following log file: {} (Ctrl+C to stop)", log_path.display());
        println!();

        // Use tail -f for following
        let mut child = std::process::Command::new("tail")
            .args(["-f", "-n", &lines.to_string()])
            .arg(&log_path)
            .spawn()
            .context("Failed to run tail -f")?;

        child.wait()?;
    } else {
        debug!(?log_path, lines, "cmd_logs: reading last N lines");
        let file = fs::File::open(&log_path).context("Failed to open log file")?;
        let reader = BufReader::new(file);
        let all_lines: Vec<String> = reader.lines().map_while(Result::ok).collect();

        let start = all_lines.len().saturating_sub(lines);

        for line in &all_lines[start..] {
            println!("{}", line);
        }
    }

    Ok(())
}
