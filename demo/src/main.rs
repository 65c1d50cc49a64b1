//! claimcheck — command-line host
//!
//! Verifies a claim against the configured service and prints the result as
//! a blocking alert, or runs the reference scenarios against a scripted
//! service.
//!
//! Usage:
//!   cargo run -p claimcheck-demo -- check "The Earth is flat"
//!   cargo run -p claimcheck-demo -- --endpoint http://127.0.0.1:9000/verify check "..."
//!   cargo run -p claimcheck-demo -- show-config
//!   cargo run -p claimcheck-demo -- run-all
//!   cargo run -p claimcheck-demo -- flat-earth

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use claimcheck_capture::{Delivery, TriggerCapture};
use claimcheck_client::http::HttpVerificationClient;
use claimcheck_contracts::{
    config::ClaimcheckConfig,
    error::{ClaimcheckError, ClaimcheckResult},
};
use claimcheck_core::Relay;
use claimcheck_notify::{render::AlertRenderer, surface::NotificationSurface};
use claimcheck_scenarios::scenarios::{
    dwell_expiry, empty_selection, flat_earth, repeat_request, stacking, unreachable_service,
};

// ── CLI definition ────────────────────────────────────────────────────────────

/// claimcheck — verify a claim and show the verdict.
#[derive(Parser)]
#[command(
    name = "claimcheck",
    version,
    about = "Send a claim to a fact-checking service and show the verdict",
    long_about = "Sends a claim to a fact-checking service and shows the verdict, a summary,\n\
                  and reference links. The scenario subcommands run the full pipeline\n\
                  against a scripted service and need no network."
)]
struct Cli {
    /// TOML configuration file. Every key is optional.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Override `[service] endpoint` from the configuration.
    #[arg(long, global = true, value_name = "URL")]
    endpoint: Option<String>,

    /// Log at debug level (overrides RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Verify a claim and print the verdict.
    Check {
        /// The claim. Multiple words are joined with spaces.
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        text: Vec<String>,

        /// Render links as clickable terminal hyperlinks (OSC 8).
        #[arg(long)]
        hyperlinks: bool,
    },
    /// Print the effective configuration as TOML.
    ShowConfig,
    /// Run every reference scenario in sequence.
    RunAll,
    /// Scenario 1: hotkey on "The Earth is flat".
    FlatEarth,
    /// Scenario 2: the service is not reachable.
    UnreachableService,
    /// Scenario 3: triggers with nothing selected.
    EmptySelection,
    /// Scenario 4: a second result replaces the first.
    Stacking,
    /// Scenario 5: the same claim twice, two outcomes.
    RepeatRequest,
    /// Scenario 6: an untouched notification fades and disappears.
    DwellExpiry,
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    let Cli {
        config,
        endpoint,
        verbose,
        command,
    } = Cli::parse();

    // Logs go to stderr; stdout carries the alerts.
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let result = match command {
        Command::Check { text, hyperlinks } => {
            match load_config(config.as_deref(), endpoint.as_deref()) {
                Ok(config) => check(&config, &text.join(" "), hyperlinks).await,
                Err(e) => Err(e),
            }
        }
        Command::ShowConfig => {
            load_config(config.as_deref(), endpoint.as_deref()).and_then(|c| show_config(&c))
        }
        scenario => run_scenarios(scenario).await,
    };

    if let Err(e) = result {
        eprintln!("claimcheck: {e}");
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>, endpoint: Option<&str>) -> ClaimcheckResult<ClaimcheckConfig> {
    let mut config = ClaimcheckConfig::load(path)?;
    if let Some(endpoint) = endpoint {
        config.service.endpoint = endpoint.to_string();
        config.validate()?;
    }
    Ok(config)
}

// ── check ─────────────────────────────────────────────────────────────────────

async fn check(config: &ClaimcheckConfig, text: &str, hyperlinks: bool) -> ClaimcheckResult<()> {
    let client = HttpVerificationClient::new(&config.service)?;
    debug!(endpoint = client.endpoint(), "using verification service");
    let relay = Relay::spawn(Arc::new(client), config.relay.queue_capacity);

    let surface = Arc::new(NotificationSurface::new(
        Arc::new(AlertRenderer::new(std::io::stdout(), hyperlinks)),
        config.notification.clone().into(),
    ));
    let capture = TriggerCapture::new(relay, &surface, config.capture.hotkey);

    // A rejected trigger has already printed its notice.
    match capture.submit(text).settled().await {
        Some(Delivery::Dropped) => Err(ClaimcheckError::Channel {
            reason: "the verification result was abandoned".to_string(),
        }),
        _ => Ok(()),
    }
}

fn show_config(config: &ClaimcheckConfig) -> ClaimcheckResult<()> {
    let text = toml::to_string_pretty(config).map_err(|e| ClaimcheckError::Config {
        reason: format!("failed to serialize configuration: {e}"),
    })?;
    print!("{text}");
    Ok(())
}

// ── Scenario dispatch ─────────────────────────────────────────────────────────

async fn run_scenarios(command: Command) -> ClaimcheckResult<()> {
    print_banner();
    match command {
        Command::RunAll => run_all().await?,
        Command::FlatEarth => flat_earth::run_scenario().await?,
        Command::UnreachableService => unreachable_service::run_scenario().await?,
        Command::EmptySelection => empty_selection::run_scenario().await?,
        Command::Stacking => stacking::run_scenario().await?,
        Command::RepeatRequest => repeat_request::run_scenario().await?,
        Command::DwellExpiry => dwell_expiry::run_scenario().await?,
        Command::Check { .. } | Command::ShowConfig => {}
    }
    println!("All selected scenarios completed.");
    Ok(())
}

/// Runs every scenario even after a failure, then reports the first one.
async fn run_all() -> ClaimcheckResult<()> {
    let results = [
        flat_earth::run_scenario().await,
        unreachable_service::run_scenario().await,
        empty_selection::run_scenario().await,
        stacking::run_scenario().await,
        repeat_request::run_scenario().await,
        dwell_expiry::run_scenario().await,
    ];
    results.into_iter().collect()
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("claimcheck — reference scenarios");
    println!("================================");
    println!();
    println!("Pipeline per trigger:");
    println!("  [1] Capture reads the selection and trims it; blank text stops here");
    println!("  [2] One checkFact request goes to the relay with a fresh exchange id");
    println!("  [3] The relay calls the service and always sends exactly one reply");
    println!("  [4] The page replaces any current notification with the result");
    println!("  [5] After the dwell time the notification fades and is removed");
    println!();
}
