//! HomeVal service binary.
//!
//! Trains both estimators from the configured CSV snapshots at startup,
//! then serves the prediction API.
//!
//! # Usage
//!
//! ```bash
//! # Defaults: ./homeval.toml if present, datasets under dataset/,
//! # stores under db/, listening on 127.0.0.1:8000
//! cargo run --release
//!
//! # Explicit config and bind address
//! cargo run --release -- --config deploy/homeval.toml --addr 0.0.0.0:8000
//! ```
//!
//! # Environment Variables
//!
//! - `HOMEVAL_CONFIG`: path to a TOML config file
//! - `HOMEVAL_CORS_ORIGINS`: comma-separated allowed CORS origins
//! - `RUST_LOG`: logging level (default: info)

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use homeval::api::{create_app, AppState};
use homeval::store::RecordStore;
use homeval::{ModelContext, ServiceConfig};

#[derive(Parser, Debug)]
#[command(name = "homeval")]
#[command(about = "Residential price estimation and sale-potential scoring service")]
#[command(version)]
struct CliArgs {
    /// Path to a TOML config file (overrides HOMEVAL_CONFIG and ./homeval.toml)
    #[arg(short, long)]
    config: Option<String>,

    /// Override the server bind address (default from config, "127.0.0.1:8000")
    #[arg(short, long)]
    addr: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();

    let config = match &args.config {
        Some(path) => ServiceConfig::from_file(path)?,
        None => {
            let config = ServiceConfig::load()?;
            config.validate()?;
            config
        }
    };
    let addr = args.addr.clone().unwrap_or_else(|| config.server.addr.clone());

    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    info!("  HomeVal — Residential Property Intelligence");
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    // Training runs synchronously before the server accepts traffic; a
    // service with no model has nothing useful to serve.
    let train_config = config.clone();
    let ctx = tokio::task::spawn_blocking(move || ModelContext::from_files(&train_config))
        .await
        .context("training task panicked")?
        .context("failed to train models from snapshots")?;
    info!(models = %ctx.summary(), "estimators ready");

    let price_store = RecordStore::open(&config.data.price_store)
        .with_context(|| format!("failed to open price store {}", config.data.price_store))?;
    let sale_store = RecordStore::open(&config.data.sale_store)
        .with_context(|| format!("failed to open sale store {}", config.data.sale_store))?;

    let state = AppState {
        ctx: Arc::new(ctx),
        price_store: Arc::new(Mutex::new(price_store)),
        sale_store: Arc::new(Mutex::new(sale_store)),
    };
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("API listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("received Ctrl-C, shutting down");
    }
}
