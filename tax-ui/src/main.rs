use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};

use tax_ui::app;
use tax_ui::config::{ENDPOINT_ENV, Settings};
use tax_ui::controller::FormController;
use tax_ui::logging;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Income tax calculator.
///
/// Sends an income to the tax service and prints the computed tax. Without
/// `--income` it prompts for one income per line until `quit`.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// TOML settings file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Calculator backend: `http` or `local`.
    #[arg(long)]
    backend: Option<String>,

    /// URL of the tax service's calculate-tax route.
    #[arg(long)]
    endpoint: Option<String>,

    /// Give up on a request after this many seconds. Waits forever by default.
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Submit this income once and exit.
    #[arg(long)]
    income: Option<String>,

    /// Log level or filter directive (e.g. `debug`, `warn,tax_client=debug`).
    #[arg(long)]
    log_level: Option<String>,

    /// Append logs to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Suppress log output on the console.
    #[arg(long, default_value_t = false)]
    quiet: bool,
}

impl Cli {
    fn overrides(&self) -> Settings {
        Settings {
            backend: self.backend.clone(),
            endpoint: self.endpoint.clone(),
            timeout_secs: self.timeout_secs,
            log_level: self.log_level.clone(),
            log_file: self.log_file.clone(),
        }
    }
}

fn resolve_settings(cli: &Cli) -> anyhow::Result<Settings> {
    let file = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };

    Ok(file
        .with_endpoint_env(std::env::var(ENDPOINT_ENV).ok())
        .merge(cli.overrides()))
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    logging::init_logging();

    let cli = Cli::parse();
    let settings = resolve_settings(&cli)?;

    if let Some(level) = &settings.log_level {
        logging::set_log_level(level)?;
    }
    if let Some(path) = &settings.log_file {
        logging::enable_file_logging(path)?;
    }
    if cli.quiet {
        logging::set_console_enabled(false)?;
    }

    let result = run_session(&cli, &settings).await;
    logging::disable_file_logging();
    result
}

/// Builds the calculator and runs one-shot or interactive mode.
async fn run_session(
    cli: &Cli,
    settings: &Settings,
) -> anyhow::Result<ExitCode> {
    let service_config = settings.service_config();
    debug!(?service_config, "resolved calculator configuration");

    let calculator = app::build_registry()
        .create(&service_config)
        .await
        .with_context(|| format!("cannot create '{}' calculator", service_config.backend))?;
    let mut controller = FormController::new(Arc::from(calculator));

    let ansi = io::stdout().is_terminal();
    let mut stdout = io::stdout();

    match &cli.income {
        Some(income) => {
            let produced = app::submit_and_render(&mut controller, income, &mut stdout, ansi).await?;
            Ok(if produced { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        None => {
            info!(backend = %service_config.backend, "tax calculator ready");
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            app::run_interactive(&mut controller, stdin, &mut stdout, ansi).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
