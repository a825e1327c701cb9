//! Metrics collection and exposition.
//!
//! # Metrics
//! - `sidecar_config_transactions_total` (counter): transactions by op, outcome
//! - `sidecar_config_transaction_duration_seconds` (histogram): end-to-end latency by op
//! - `sidecar_config_rollbacks_total` (counter): snapshot restores by op, result

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener on `addr`.
///
/// Must run inside a tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record a finished transaction. `outcome` is "committed" or an error kind.
pub fn record_transaction(op: &'static str, outcome: &'static str, start: Instant) {
    metrics::counter!(
        "sidecar_config_transactions_total",
        "op" => op,
        "outcome" => outcome
    )
    .increment(1);
    metrics::histogram!("sidecar_config_transaction_duration_seconds", "op" => op)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_rollback(op: &'static str, restored: bool) {
    let result = if restored { "restored" } else { "failed" };
    metrics::counter!("sidecar_config_rollbacks_total", "op" => op, "result" => result)
        .increment(1);
}
