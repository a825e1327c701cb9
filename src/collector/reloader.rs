//! Collaborator that answers reload requests by triggering the collector's
//! HTTP reload endpoint.

use std::time::Duration;

use tokio::sync::broadcast;
use url::Url;

use crate::reload::handshake::{ReloadError, ReloadRequests};

/// Serves the reload gate against a running collector.
#[derive(Debug, Clone)]
pub struct CollectorReloader {
    client: reqwest::Client,
    reload_url: Url,
}

impl CollectorReloader {
    pub fn new(reload_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, reload_url })
    }

    pub fn reload_url(&self) -> &Url {
        &self.reload_url
    }

    /// Ask the collector to re-read its configuration file.
    pub async fn reload(&self) -> Result<(), ReloadError> {
        let res = self
            .client
            .post(self.reload_url.clone())
            .send()
            .await
            .map_err(|e| ReloadError::rejected(format!("collector unreachable: {e}")))?;

        let status = res.status();
        if status.is_success() {
            return Ok(());
        }

        let body = res.text().await.unwrap_or_default();
        Err(ReloadError::rejected(format!(
            "collector returned {}: {}",
            status,
            body.trim()
        )))
    }

    /// Answer every request on the gate until shutdown or until all gates are dropped.
    pub async fn serve(self, mut requests: ReloadRequests, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(reload_url = %self.reload_url, "Collector reloader started");

        loop {
            tokio::select! {
                request = requests.recv() => {
                    let Some(request) = request else {
                        tracing::info!("Reload gate closed");
                        break;
                    };
                    let outcome = self.reload().await;
                    match &outcome {
                        Ok(()) => tracing::info!(request_id = %request.id(), "Collector reloaded"),
                        Err(e) => tracing::warn!(request_id = %request.id(), error = %e, "Collector reload failed"),
                    }
                    request.respond(outcome);
                }
                _ = shutdown.recv() => {
                    tracing::info!("Collector reloader stopping");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reload::{reload_gate, ReloadContext};
    use crate::reload::handshake::request_reload;
    use crate::error::SidecarError;
    use axum::{http::StatusCode, routing::post, Router};
    use tokio::net::TcpListener;

    async fn start_collector(status: StatusCode) -> Url {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new().route("/-/reload", post(move || async move { (status, "reload result") }));
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Url::parse(&format!("http://{addr}/-/reload")).unwrap()
    }

    #[tokio::test]
    async fn test_reload_success() {
        let url = start_collector(StatusCode::OK).await;
        let reloader = CollectorReloader::new(url, Duration::from_secs(5)).unwrap();
        reloader.reload().await.unwrap();
    }

    #[tokio::test]
    async fn test_reload_error_status() {
        let url = start_collector(StatusCode::INTERNAL_SERVER_ERROR).await;
        let reloader = CollectorReloader::new(url, Duration::from_secs(5)).unwrap();
        let err = reloader.reload().await.unwrap_err();
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_serve_answers_gate() {
        let url = start_collector(StatusCode::OK).await;
        let reloader = CollectorReloader::new(url, Duration::from_secs(5)).unwrap();
        let (gate, requests) = reload_gate();
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let task = tokio::spawn(reloader.serve(requests, shutdown_rx));

        request_reload(&gate, &ReloadContext::with_timeout(Duration::from_secs(5)))
            .await
            .unwrap();

        shutdown_tx.send(()).unwrap();
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_unreachable_collector_rejects() {
        // Nothing listens on this port once the listener is dropped.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let url = Url::parse(&format!("http://{addr}/-/reload")).unwrap();
        let reloader = CollectorReloader::new(url, Duration::from_secs(2)).unwrap();
        let (gate, requests) = reload_gate();
        let (_shutdown_tx, shutdown_rx) = broadcast::channel(1);
        tokio::spawn(reloader.serve(requests, shutdown_rx));

        let err = request_reload(&gate, &ReloadContext::with_timeout(Duration::from_secs(5)))
            .await
            .unwrap_err();
        assert!(matches!(err, SidecarError::HandshakeFailed(ReloadError::Rejected(_))));
    }
}
