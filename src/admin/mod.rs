//! Admin HTTP API: query and command surface of the sidecar.
//!
//! ```text
//! GET  /api/v1/runtime-info    → RuntimeInfo
//! GET  /api/v1/last-update-ts  → {last_update_ts}
//! PUT  /api/v1/config          {zone_id, yaml} → 204
//! POST /api/v1/config/reset    {zone_id}       → 204
//! ```

pub mod auth;
pub mod handlers;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::reload::ReloadGate;
use crate::transaction::ConfigTransactionManager;

use self::auth::admin_auth_middleware;
use self::handlers::*;

/// Shared state injected into admin handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub manager: Arc<ConfigTransactionManager>,
    pub gate: ReloadGate,
    pub handshake_timeout: Duration,
    pub api_key: Arc<str>,
}

impl AppState {
    pub fn new(
        manager: Arc<ConfigTransactionManager>,
        gate: ReloadGate,
        handshake_timeout: Duration,
        api_key: &str,
    ) -> Self {
        Self {
            manager,
            gate,
            handshake_timeout,
            api_key: Arc::from(api_key),
        }
    }
}

pub fn setup_admin_router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/runtime-info", get(get_runtime_info))
        .route("/api/v1/last-update-ts", get(get_last_update_ts))
        .route("/api/v1/config", put(update_config))
        .route("/api/v1/config/reset", post(reset_config))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            admin_auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the admin API until `shutdown` fires.
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!(address = %addr, "Admin API listening");

    axum::serve(listener, setup_admin_router(state))
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
        })
        .await?;

    tracing::info!("Admin API stopped");
    Ok(())
}
