//! # tape-runner
//!
//! Main entry point for the tape market-data simulation service.
//!
//! Seeds the price table, starts the tick loop (simulate → evaluate alerts →
//! broadcast), and serves the WebSocket feed until interrupted.
//!
//! # Usage
//!
//! ```bash
//! tape-runner --config config.json --log-level info
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

use tape_core::config::AppConfig;
use tape_engine::alerts::{AlertEvaluator, AlertStore, JsonAlertStore, StaticAlertStore};
use tape_engine::engine::MarketEngine;
use tape_engine::hub::BroadcastHub;
use tape_engine::simulator::PriceSimulator;
use tape_engine::table::PriceTable;

/// Simulated market data feed & broadcast server.
#[derive(Parser)]
#[command(name = "tape-runner", about = "Simulated market data feed & broadcast server")]
struct Cli {
    /// Configuration file path (JSON). Built-in defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Optional log directory for file output.
    #[arg(long)]
    log_dir: Option<String>,

    /// Listen address override (host:port).
    #[arg(long)]
    listen: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Initialize logging
    tape_core::logging::init_logging(&cli.log_level, cli.log_dir.as_deref(), "tape-runner");
    info!("tape-runner starting — log_level={}", cli.log_level);

    // 2. Load configuration
    let config = match &cli.config {
        Some(path) => {
            let config = tape_core::config::load_config(path)?;
            info!("config loaded from {}", path.display());
            config
        }
        None => AppConfig::default(),
    };

    // 3. Seed the price table and wire up the engine
    let instruments = config.effective_instruments();
    let table = PriceTable::new(&instruments);
    info!("price table seeded with {} instruments", table.len());

    let hub = Arc::new(BroadcastHub::new());

    let store: Arc<dyn AlertStore> = match config.alerts_path.as_deref() {
        Some(path) => {
            info!("alert store: JSON file {path}");
            Arc::new(JsonAlertStore::new(path))
        }
        None => {
            info!("alert store: none configured, alerts disabled");
            Arc::new(StaticAlertStore::new(Vec::new()))
        }
    };
    let evaluator = AlertEvaluator::new(store, config.effective_alert_timeout());
    let simulator = PriceSimulator::new(config.effective_drift(), config.effective_volatility());

    let engine = MarketEngine::new(
        table,
        simulator,
        evaluator,
        hub.clone(),
        config.effective_tick_interval(),
    );
    let table_handle = engine.table();

    // 4. Bind the feed endpoint and start both tasks
    let listen_addr = cli.listen.clone().unwrap_or_else(|| config.effective_listen_addr());
    let listener = TcpListener::bind(&listen_addr).await?;

    let engine_task = tokio::spawn(engine.run());
    let server_task = tokio::spawn(tape_engine::ws::serve(listener, table_handle, hub));

    // 5. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    info!("shutdown signal received");

    engine_task.abort();
    server_task.abort();
    info!("stopped — goodbye");
    Ok(())
}
