//! strapd - Strap history ingestion daemon
//!
//! Serves `POST /parser/parse-history`, which decodes a captured WHOOP
//! history stream into heart-rate and R-R samples.
//!
//! Usage:
//!   strapd [OPTIONS] [config.toml]
//!
//! If no config file is provided, defaults are used: port 8000 on all
//! interfaces, staging in the OS temp directory.

mod config;

use std::path::PathBuf;
use std::sync::Arc;

use strap_api::{create_router, AppState};
use strap_proto::WhoopHistoryDecoder;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::StrapdConfig;

/// Parsed command-line arguments
struct Args {
    /// Daemon config file (TOML)
    config_path: Option<PathBuf>,
}

fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut result = Args { config_path: None };

    for arg in &args {
        match arg.as_str() {
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            arg if !arg.starts_with('-') => {
                // Positional argument = config file
                result.config_path = Some(PathBuf::from(arg));
            }
            _ => {
                tracing::warn!("Unknown argument: {}", arg);
            }
        }
    }

    result
}

fn print_help() {
    eprintln!(
        r#"strapd - Strap history ingestion daemon

Usage: strapd [OPTIONS] [config.toml]

Options:
  -h, --help    Print this help message

Config file (all keys optional):
  [server]
  host = "0.0.0.0"
  port = 8000

  [staging]
  dir = "/var/tmp/strapd"     # default: OS temp directory
  prefix = "history-"
  suffix = ".bin"

  [upload]
  max_bytes = 67108864

Logging is controlled with RUST_LOG, e.g. RUST_LOG=strapd=debug,strap_core=debug
"#
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "strapd=info,strap_api=info,strap_core=info,strap_proto=info,tower_http=info"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting strapd (strap history ingestion daemon)");

    let args = parse_args();

    let config = match args.config_path {
        Some(ref path) => {
            tracing::info!("Loading config from: {}", path.display());
            StrapdConfig::load(path)?
        }
        None => {
            tracing::info!("No config file provided, using defaults");
            StrapdConfig::default()
        }
    };

    let staging = config.staging_area()?;
    tracing::info!(
        dir = %staging.dir().display(),
        max_upload_bytes = config.upload.max_bytes,
        "Staging uploads"
    );

    let state = AppState::new(Arc::new(staging), Arc::new(WhoopHistoryDecoder::new()))
        .with_upload_limit(config.upload.max_bytes);
    let app = create_router(state);

    let addr = config.listen_addr();
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("strapd stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
