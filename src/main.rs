//! sparkdeck - Spark playground cluster console
//!
//! A terminal console for a Spark cluster management backend: edit the worker
//! pool, start and stop the cluster, follow its logs and manage notebooks.
//!
//! ## Usage
//!
//! ```bash
//! # Start the interactive console
//! sparkdeck
//!
//! # Against another backend, with verbose logging
//! sparkdeck --api-base http://spark-host:8000 -v
//!
//! # One-shot output for scripts
//! sparkdeck status
//! sparkdeck logs
//! sparkdeck notebooks
//! ```

use std::io::Write;
use std::panic;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use sparkdeck_client::{ClusterApi, HttpClusterApi};
use sparkdeck_console::{Console, Runtime, SystemBrowser, channel};
use sparkdeck_core::{DeckConfig, LogGuard, init_logging};
use sparkdeck_tui::App;
use tracing::{error, info};

/// Spark playground cluster console
///
/// Interactive terminal console for configuring workers, controlling the
/// cluster lifecycle, tailing logs and managing notebooks.
#[derive(Parser, Debug)]
#[command(name = "sparkdeck")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging (increases log level)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Directory for log files (defaults to ~/.sparkdeck/logs/)
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Configuration file (defaults to ~/.sparkdeck/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL, overriding the config file and SPARKDECK_API_BASE
    #[arg(long, global = true)]
    api_base: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Print the cluster status and exit
    Status,
    /// Print the cluster logs and exit
    Logs,
    /// List notebooks and exit
    Notebooks,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let _guard = match setup_logging(&cli) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            return ExitCode::from(1);
        }
    };

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            eprintln!("Error: {}", e);
            if let Some(hint) = e.guidance() {
                eprintln!("Hint: {}", hint);
            }
            return ExitCode::from(2);
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to start async runtime: {}", e);
            return ExitCode::from(1);
        }
    };

    let result = match cli.command {
        Some(command) => runtime.block_on(run_command(command, &config)),
        None => {
            install_panic_hook();
            info!(api = %config.api_base_url, "Starting sparkdeck console");
            runtime.block_on(run_console(config))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("sparkdeck error: {:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

/// Install a panic hook that restores the terminal before printing the panic message.
fn install_panic_hook() {
    let original_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        sparkdeck_tui::reset_terminal();
        let _ = crossterm::execute!(std::io::stdout(), crossterm::cursor::Show);
        let _ = std::io::stdout().flush();
        original_hook(panic_info);
    }));
}

/// Set up logging based on CLI arguments.
///
/// The stderr layer is only enabled for one-shot commands; the console owns
/// the terminal.
fn setup_logging(cli: &Cli) -> sparkdeck_core::Result<LogGuard> {
    let debug = cli.verbose > 0;
    init_logging(cli.log_dir.clone(), debug, cli.command.is_some())
}

fn load_config(cli: &Cli) -> sparkdeck_core::Result<DeckConfig> {
    DeckConfig::load(cli.config.as_deref(), cli.api_base.as_deref())
}

fn build_client(config: &DeckConfig) -> anyhow::Result<HttpClusterApi> {
    HttpClusterApi::new(&config.api_base_url, config.request_timeout())
        .with_context(|| format!("invalid backend URL {}", config.api_base_url))
}

/// Run the interactive console until the operator quits.
async fn run_console(config: DeckConfig) -> anyhow::Result<()> {
    let api: Arc<dyn ClusterApi> = Arc::new(build_client(&config)?);
    let (tx, rx) = channel();
    let runtime = Runtime::new(api, Arc::new(SystemBrowser), tx);

    let mut app = App::new(Console::new(&config), config.api_base_url.clone());
    app.run(runtime, rx, &config.polling).await?;
    info!("sparkdeck console exited normally");
    Ok(())
}

/// Print one piece of authoritative state and exit.
async fn run_command(command: Command, config: &DeckConfig) -> anyhow::Result<()> {
    let api = build_client(config)?;
    let mut stdout = std::io::stdout().lock();

    match command {
        Command::Status => {
            let status = api.cluster_status().await.context("fetching cluster status")?;
            let state = if status.running { "Online" } else { "Offline" };
            writeln!(stdout, "Cluster: {}", state)?;
            writeln!(stdout, "Workers: {}", status.worker_count)?;
            if let Some(url) = status.master_url.as_deref() {
                writeln!(stdout, "Master:  {}", url)?;
            }
            if let Some(url) = status.master_ui_url.as_deref().or(config.master_ui_url.as_deref())
                && status.running
            {
                writeln!(stdout, "UI:      {}", url)?;
            }
            for worker in &status.workers {
                writeln!(stdout, "  {} {}", worker.name, worker.ui_url.as_deref().unwrap_or("-"))?;
            }
        }
        Command::Logs => {
            let lines = api.cluster_logs().await.context("fetching cluster logs")?;
            if lines.is_empty() {
                writeln!(stdout, "{}", sparkdeck_console::logs::EMPTY_PLACEHOLDER)?;
            }
            for line in &lines {
                writeln!(stdout, "{}", sparkdeck_console::logs::sanitize_line(line))?;
            }
        }
        Command::Notebooks => {
            let notebooks = api.list_notebooks().await.context("listing notebooks")?;
            if notebooks.is_empty() {
                writeln!(stdout, "{}", sparkdeck_console::notebooks::EMPTY_MESSAGE)?;
            }
            for notebook in &notebooks {
                writeln!(stdout, "{}  {}", notebook.id, notebook.name)?;
                writeln!(stdout, "    {}", sparkdeck_console::notebooks::meta_line(notebook))?;
            }
        }
    }

    Ok(())
}
