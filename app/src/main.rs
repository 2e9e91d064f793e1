// In app/src/main.rs

use std::str::FromStr;

use anyhow::{Context, Result};
use app_config::Settings;
use clap::{Parser, Subcommand};
use engine::{RefreshMode, Session};
use tokio::io::BufReader;
use tracing_subscriber::prelude::*;

mod report;
mod watch;

// --- Command-Line Interface Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = "EMA crossover signal desk for Binance spot candles.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Runs a single refresh and prints the dashboard.
    Once {
        /// Print the snapshot as JSON instead of tables.
        #[arg(long)]
        json: bool,
    },

    /// Refreshes periodically and accepts operator commands on stdin.
    ///
    /// Commands: `r` / `refresh`, `c` / `clear`, `q` / `quit`.
    Watch,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from a .env file, if it exists.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let settings = app_config::load_settings().context("Failed to load configuration")?;

    let default_level =
        tracing::Level::from_str(&settings.app.log_level).unwrap_or(tracing::Level::INFO);
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(
            tracing_subscriber::filter::Targets::new()
                .with_target("reqwest", tracing::Level::WARN)
                .with_target("hyper", tracing::Level::WARN)
                .with_default(default_level),
        );
    tracing_subscriber::registry().with(fmt_layer).init();

    tracing::info!(environment = %settings.app.environment, "Starting crossover desk");

    let client = api_client::new(&settings.binance)?;
    let session = Session::new(&settings, Box::new(client))?;

    match cli.command {
        Commands::Once { json } => run_once(&session, &settings, json).await,
        Commands::Watch => {
            let input = watch::OperatorInput::new(BufReader::new(tokio::io::stdin()));
            let shutdown = async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::warn!(error = %e, "Ctrl-C handler unavailable.");
                    std::future::pending::<()>().await;
                }
            };
            watch::run_watch(&session, &settings, input, shutdown).await
        }
    }
}

async fn run_once(session: &Session, settings: &Settings, json: bool) -> Result<()> {
    let snapshot = session
        .refresh(RefreshMode::Forced)
        .await
        .with_context(|| format!("Refresh failed for {} {}", session.symbol(), session.interval()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        println!("{}", report::render_dashboard(&snapshot, settings.session.candle_view));
    }
    Ok(())
}
