//! IPMI collector sidecar (v1)
//!
//! Owns the collector's configuration file and applies runtime updates with
//! all-or-nothing semantics.
//!
//! # Architecture Overview
//!
//! ```text
//!   sidecar-cli / control plane
//!          │  PUT /api/v1/config, POST /api/v1/config/reset
//!          ▼
//!   ┌──────────────┐     ┌──────────────────────────┐     ┌───────────────┐
//!   │  admin API   │────▶│ ConfigTransactionManager │────▶│ ipmi.yml      │
//!   └──────────────┘     │  zone check → validate   │     └───────────────┘
//!          ▲             │  snapshot → write        │
//!          │             │  handshake → commit/undo │
//!   GET runtime-info     └────────────┬─────────────┘
//!          │                          │ ReloadGate
//!   ┌──────┴───────┐                  ▼
//!   │ RuntimeState │     ┌──────────────────────────┐     ┌───────────────┐
//!   │ zone + ts    │     │    CollectorReloader     │────▶│ collector     │
//!   └──────────────┘     └──────────────────────────┘     │ POST /-/reload│
//!                                                         └───────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use ipmi_sidecar::config::{load_config, SidecarConfig};
use ipmi_sidecar::lifecycle::{signals, startup, Shutdown};
use ipmi_sidecar::observability::logging;

#[derive(Parser)]
#[command(name = "ipmi-sidecar")]
#[command(about = "Transactional config reload sidecar for the IPMI collector", long_about = None)]
struct Args {
    /// Sidecar settings file (TOML). Built-in defaults when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => SidecarConfig::default(),
    };

    logging::init(&config.observability.log_level);
    tracing::info!("ipmi-sidecar v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        config_file = %config.collector.config_file,
        reload_url = %config.collector.reload_url,
        admin_address = %config.admin.bind_address,
        handshake_timeout_secs = config.transaction.handshake_timeout_secs,
        "Configuration loaded"
    );

    let shutdown = Shutdown::new();
    let _signals = signals::spawn_signal_handler(shutdown.clone());
    startup::run(config, shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
