// In app/src/main.rs

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use app_config::Settings;
use clap::{Parser, Subcommand};
use core_types::{Symbol, SystemClock};
use engine::{Engine, EngineConfig, Services};
use notifier::{LogNotifier, Notifier, WeChatNotifier};
use tracing_subscriber::prelude::*;

// --- Command-Line Interface Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = "Ten-day moving-average crossover alerts for A-share stocks.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluates the given symbols once, or the configured watchlist when none are given.
    Evaluate {
        /// Exchange-qualified tickers, e.g. 600549.SH.
        symbols: Vec<String>,
    },

    /// Evaluates the watchlist on a fixed interval until interrupted.
    Watch,

    /// Prints the display snapshot of one symbol as JSON.
    Status {
        symbol: String,

        /// Number of recent trading days to include.
        #[arg(short, long)]
        days: Option<usize>,
    },

    /// Marks an alert as handled.
    Ack {
        id: i64,
    },
}

// --- Main Application Entry Point ---

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from a .env file, if it exists.
    dotenvy::dotenv().ok();

    // Parse command-line arguments.
    let cli = Cli::parse();

    let settings = app_config::load_settings()?;
    init_tracing(&settings);
    tracing::info!(environment = %settings.app.environment, "Starting ten-day line monitor");

    let engine = build_engine(&settings).await?;

    match cli.command {
        Commands::Evaluate { symbols } => {
            let symbols = if symbols.is_empty() {
                settings.monitor.watchlist()?
            } else {
                parse_symbols(&symbols)?
            };
            run_batch(&engine, &symbols).await;
        }
        Commands::Watch => {
            handle_watch(&engine, &settings).await?;
        }
        Commands::Status { symbol, days } => {
            let snapshot = engine.latest_state(&Symbol::parse(&symbol)?, days).await?;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        Commands::Ack { id } => {
            if engine.acknowledge(id).await? {
                tracing::info!(alert_id = id, "Alert acknowledged.");
            } else {
                anyhow::bail!("No unhandled alert with id {}", id);
            }
        }
    }

    Ok(())
}

fn init_tracing(settings: &Settings) {
    let level = settings.app.log_level.parse::<tracing::Level>().unwrap_or(tracing::Level::INFO);
    let fmt_layer = tracing_subscriber::fmt::layer().with_filter(
        tracing_subscriber::filter::Targets::new()
            .with_target("sqlx::query", tracing::Level::WARN) // Disable sqlx query debug logs
            .with_default(level),
    );
    tracing_subscriber::registry().with(fmt_layer).init();
}

/// Wires the store, market-data client and notifier into an engine.
async fn build_engine(settings: &Settings) -> Result<Engine> {
    let db = Arc::new(database::connect(&settings.database).await?);
    let source = Arc::new(api_client::ApiClient::new(&settings.market_data)?);

    let notifier: Arc<dyn Notifier> = match &settings.notifier.wechat {
        Some(wechat) => Arc::new(WeChatNotifier::new(wechat)?),
        None => {
            tracing::warn!("No WeChat credentials configured. Alerts will only be logged.");
            Arc::new(LogNotifier)
        }
    };

    let services = Services {
        quotes: db.clone(),
        alerts: db,
        source,
        notifier,
        clock: Arc::new(SystemClock),
    };

    Ok(Engine::new(&EngineConfig::from_settings(settings), services)?)
}

fn parse_symbols(raw: &[String]) -> Result<Vec<Symbol>> {
    Ok(raw.iter().map(|s| Symbol::parse(s)).collect::<core_types::Result<Vec<_>>>()?)
}

/// Runs one batch. Per-symbol failures are logged by the engine and do not stop the run.
async fn run_batch(engine: &Engine, symbols: &[Symbol]) {
    let outcomes = engine.evaluate_all(symbols).await;
    let raised = outcomes.iter().filter(|(_, r)| matches!(r, Ok(Some(_)))).count();
    let failed = outcomes.iter().filter(|(_, r)| r.is_err()).count();
    tracing::info!(symbols = symbols.len(), raised, failed, "Batch finished.");
}

// --- "Watch" Subcommand Logic ---

async fn handle_watch(engine: &Engine, settings: &Settings) -> Result<()> {
    let symbols = settings.monitor.watchlist()?;
    let interval = Duration::from_secs(settings.monitor.poll_interval_secs);
    tracing::info!(count = symbols.len(), interval_secs = interval.as_secs(), "Watching symbols.");

    loop {
        run_batch(engine, &symbols).await;

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted, stopping the watch loop.");
                return Ok(());
            }
        }
    }
}
