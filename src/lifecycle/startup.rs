//! Startup orchestration.
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The reloader task is running before the admin listener accepts requests

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::net::TcpListener;
use url::Url;

use crate::admin::{self, AppState};
use crate::collector::CollectorReloader;
use crate::config::SidecarConfig;
use crate::lifecycle::shutdown::Shutdown;
use crate::observability::metrics;
use crate::reload::reload_gate;
use crate::transaction::ConfigTransactionManager;

/// Fatal errors while bringing the sidecar up.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid address {0:?}")]
    Address(String),

    #[error("invalid reload URL: {0}")]
    ReloadUrl(#[from] url::ParseError),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("failed to install metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Run the sidecar until `shutdown` fires.
pub async fn run(config: SidecarConfig, shutdown: Shutdown) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        let addr: SocketAddr = config
            .observability
            .metrics_address
            .parse()
            .map_err(|_| StartupError::Address(config.observability.metrics_address.clone()))?;
        metrics::init_metrics(addr)?;
    }

    let manager = Arc::new(ConfigTransactionManager::new(&config.collector.config_file));
    tracing::info!(
        config_file = %config.collector.config_file,
        brand = %manager.runtime_info().brand,
        "Config transaction manager ready"
    );

    let (gate, requests) = reload_gate();
    let reloader = CollectorReloader::new(
        Url::parse(&config.collector.reload_url)?,
        Duration::from_secs(config.collector.reload_timeout_secs),
    )?;
    let reloader_task = tokio::spawn(reloader.serve(requests, shutdown.subscribe()));

    if config.admin.enabled {
        let listener = TcpListener::bind(&config.admin.bind_address).await?;
        let state = AppState::new(
            manager,
            gate,
            Duration::from_secs(config.transaction.handshake_timeout_secs),
            &config.admin.api_key,
        );
        admin::serve(listener, state, shutdown.subscribe()).await?;
    } else {
        tracing::warn!("Admin API disabled, no configuration updates will be accepted");
        let mut stop = shutdown.subscribe();
        let _ = stop.recv().await;
        drop(gate);
    }

    if let Err(e) = reloader_task.await {
        tracing::error!(error = %e, "Collector reloader task failed");
    }
    Ok(())
}
