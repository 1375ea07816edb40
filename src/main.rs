// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HealthPlanet export CLI
//!
//! `auth` performs the one-time OAuth authorization and stores the
//! credential; `dump` exports body-composition measurements as CSV.

use anyhow::Context;
use chrono::{FixedOffset, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use healthplanet_export::{
    config::Config,
    error::{AppError, Result},
    models::DateWindow,
    services::csv,
    AppState,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "healthplanet-export",
    version,
    about = "Export HealthPlanet body-composition measurements as CSV"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Config file path
    #[arg(short = 'c', long, default_value = "config.yml", global = true)]
    config: PathBuf,

    /// Enable debug logging
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Authorize this tool with HealthPlanet and store the credential
    Auth,

    /// Export measurements as CSV
    Dump {
        /// First day (YYYY-MM-DD); defaults to 90 days before --to
        #[arg(short = 'f', long)]
        from: Option<NaiveDate>,

        /// Last day, inclusive (YYYY-MM-DD); defaults to today
        #[arg(short = 't', long)]
        to: Option<NaiveDate>,

        /// Output file; standard output when omitted
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_json);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Aborting");
            if let Some(hint) = recovery_hint(&e) {
                tracing::warn!("{}", hint);
            }
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(&cli.config)?;
    tracing::debug!(
        config = %cli.config.display(),
        base_url = %config.base_url,
        token_file = %config.token_file.display(),
        "Configuration loaded"
    );

    let state = AppState::new(config);

    match cli.command {
        Command::Auth => run_auth(&state).await,
        Command::Dump { from, to, output } => run_dump(&state, from, to, output).await,
    }
}

/// Interactive authorization-code flow.
async fn run_auth(state: &AppState) -> Result<()> {
    let url = state.tokens.authorization_url(&state.config.scope)?;

    println!("Open the following URL in a browser and grant access:\n{}\n", url);
    print!("Then enter the code from the redirect URL: ");
    io::stdout().flush().context("Failed to write prompt")?;

    let mut code = String::new();
    io::stdin()
        .lock()
        .read_line(&mut code)
        .context("Failed to read authorization code")?;

    state.tokens.authorize(code.trim()).await?;
    println!(
        "Authorization successful, credential stored at {}",
        state.config.token_file.display()
    );
    Ok(())
}

/// Fetch, reconcile and write the CSV.
async fn run_dump(
    state: &AppState,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    output: Option<PathBuf>,
) -> Result<()> {
    let to = to.unwrap_or_else(|| today_in(&state.config.utc_offset));
    let window = DateWindow::ending_at(to, from)?;
    tracing::info!(from = %window.from(), to = %window.to(), "Exporting measurements");

    let innerscan = state
        .fetcher
        .fetch_measurements(&window, &state.config.utc_offset)
        .await?;
    let text = csv::render_with_section(&innerscan.records);

    match output {
        Some(path) => {
            std::fs::write(&path, text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!(
                path = %path.display(),
                records = innerscan.records.len(),
                "CSV written"
            );
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(text.as_bytes())
                .and_then(|()| stdout.flush())
                .context("Failed to write CSV to standard output")?;
        }
    }
    Ok(())
}

/// What the user should do next, for failures that need a new authorization.
fn recovery_hint(e: &AppError) -> Option<&'static str> {
    match e {
        AppError::CredentialMissing(_) => Some("Run the `auth` command to authorize"),
        _ if e.requires_reauthorization() => {
            Some("Remove the token file and run the `auth` command again")
        }
        _ => None,
    }
}

/// Current calendar day at `offset`, matching how measurement days are derived.
fn today_in(offset: &FixedOffset) -> NaiveDate {
    Utc::now().with_timezone(offset).date_naive()
}

/// Initialize logging on standard error (standard output carries the CSV).
fn init_logging(verbose: bool, json: bool) {
    let default_filter = if verbose {
        "healthplanet_export=debug,info"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(false)
            .with_current_span(true)
            .flatten_event(true)
            .with_writer(io::stderr)
    });
    let text_layer = (!json).then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(io::stderr)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}
