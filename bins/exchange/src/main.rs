//! Matching engine demo binary.
//!
//! Wires configuration and logging together, builds a store from the
//! configured backend, and drives a handful of submissions for manual
//! inspection. Not a normative interface - see `matching_engine::MatchingEngine::submit`.

use anyhow::{Context, Result};
use cli::{Cli, Commands};
use common::{OrderType, Side, Symbol};
use config::{generate_default_config, load_config, save_config, validate_config, MasterConfig};
use matching_engine::{create_store, MatchingEngine};
use observability::{init_logging, LogFormat};
use std::path::Path;
use tracing::{debug, info};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging("exchange", LogFormat::Pretty)?;

    info!("exchange starting");

    let cli = Cli::parse_args();
    debug!(?cli, "CLI arguments parsed");

    match cli.command {
        Commands::Run { config } => run_command(config).await,
        Commands::Validate { config } => validate_command(config).await,
        Commands::Init { output } => init_command(output).await,
    }
}

async fn run_command<P: AsRef<Path>>(config_path: P) -> Result<()> {
    let config_path = config_path.as_ref();
    let config: MasterConfig = if config_path.exists() {
        load_config(config_path)?
    } else {
        info!(?config_path, "no config file found, using defaults");
        generate_default_config()
    };

    let engine = MatchingEngine::new(config.matching_engine.publishing.clone());
    let store = create_store(&config.matching_engine.orderbook_store, engine)
        .await
        .context("failed to create matching store")?;

    let symbol = Symbol::from(
        config
            .exchange
            .symbols
            .first()
            .cloned()
            .unwrap_or_else(|| "BTCUSD".to_string()),
    );

    println!("Submitting sample orders for {}", symbol);

    let resting = store
        .submit(&symbol, OrderType::Limit, 1, Side::Sell, 100, 10)
        .await?;
    println!("  sell 10 @ 100 -> {:?}", resting);

    let crossing = store
        .submit(&symbol, OrderType::Limit, 2, Side::Buy, 100, 4)
        .await?;
    println!("  buy 4 @ 100 -> {:?}", crossing);

    let snapshot = store.snapshot(&symbol, 10).await?;
    println!("  book: {} bids, {} asks", snapshot.bids.len(), snapshot.asks.len());

    let trades = store.recent_trades(&symbol, 10).await?;
    println!("  {} trade(s) recorded", trades.len());

    Ok(())
}

async fn validate_command<P: AsRef<Path>>(config_path: P) -> Result<()> {
    let config_path = config_path.as_ref();
    info!(?config_path, "validating configuration");

    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            println!("[error] failed to load configuration: {}", e);
            return Err(e);
        }
    };

    let report = validate_config(&config);

    println!("\n=== Configuration Validation Report ===\n");

    if !report.warnings.is_empty() {
        println!("Warnings ({}):", report.warnings.len());
        for warning in &report.warnings {
            println!("  [warn] [{}] {}", warning.field, warning.message);
        }
        println!();
    }

    if !report.errors.is_empty() {
        println!("Errors ({}):", report.errors.len());
        for err in &report.errors {
            println!("  [error] {}", err);
        }
        println!();
        anyhow::bail!("configuration validation failed");
    }

    println!("[ok] Configuration is valid!");
    println!();
    println!("Exchange: {}", config.exchange.name);
    println!("Symbols: {}", config.exchange.symbols.join(", "));
    println!("Store: {}", config.matching_engine.orderbook_store.store_type);
    println!(
        "Snapshot depth: {}, throttle: {}ms",
        config.matching_engine.publishing.snapshot_depth,
        config.matching_engine.publishing.snapshot_throttle_ms
    );

    Ok(())
}

async fn init_command<P: AsRef<Path>>(output_path: P) -> Result<()> {
    let output_path = output_path.as_ref();
    info!(?output_path, "writing default configuration");

    let config = generate_default_config();

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory: {:?}", parent))?;
        }
    }

    save_config(&config, output_path)?;

    println!("[ok] Configuration file created successfully!");
    println!();
    println!("Location: {:?}", output_path);
    println!();
    println!(
        "Run 'exchange validate --config {:?}' to check it, or 'exchange run --config {:?}' to try it.",
        output_path, output_path
    );

    Ok(())
}
