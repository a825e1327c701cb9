//! Single round-trip reload handshake.

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

use crate::error::SidecarError;
use crate::reload::context::ReloadContext;

/// Failure reported for one reload request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReloadError {
    /// Nobody is reading the gate any more.
    #[error("reload gate closed")]
    GateClosed,

    /// The collaborator dropped the request without replying.
    #[error("reload request abandoned without a response")]
    Abandoned,

    /// The collector reload itself failed.
    #[error("{0}")]
    Rejected(String),
}

impl ReloadError {
    pub fn rejected(reason: impl std::fmt::Display) -> Self {
        ReloadError::Rejected(reason.to_string())
    }
}

/// One request to reload the collector, carrying its one-shot responder.
#[derive(Debug)]
pub struct ReloadRequest {
    id: Uuid,
    responder: oneshot::Sender<Result<(), ReloadError>>,
}

impl ReloadRequest {
    fn new() -> (Self, oneshot::Receiver<Result<(), ReloadError>>) {
        let (responder, response) = oneshot::channel();
        (
            Self {
                id: Uuid::new_v4(),
                responder,
            },
            response,
        )
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Deliver the single outcome for this request.
    ///
    /// A reply to a requester that already gave up is discarded.
    pub fn respond(self, outcome: Result<(), ReloadError>) {
        if self.responder.send(outcome).is_err() {
            tracing::debug!(request_id = %self.id, "Reload response arrived after requester gave up");
        }
    }

    pub fn succeed(self) {
        self.respond(Ok(()));
    }

    pub fn fail(self, error: ReloadError) {
        self.respond(Err(error));
    }
}

/// Sending half of the gate, held by whoever invokes the manager.
#[derive(Debug, Clone)]
pub struct ReloadGate {
    tx: mpsc::Sender<ReloadRequest>,
}

/// Receiving half of the gate, held by the collaborator.
#[derive(Debug)]
pub struct ReloadRequests {
    rx: mpsc::Receiver<ReloadRequest>,
}

impl ReloadRequests {
    pub async fn recv(&mut self) -> Option<ReloadRequest> {
        self.rx.recv().await
    }
}

/// Create a gate that holds at most one pending request.
pub fn reload_gate() -> (ReloadGate, ReloadRequests) {
    let (tx, rx) = mpsc::channel(1);
    (ReloadGate { tx }, ReloadRequests { rx })
}

/// Ask the collaborator to reload and wait for its single answer.
///
/// Returns `Canceled`/`Timeout` if `ctx` expires first; a late answer is
/// never observed.
pub async fn request_reload(gate: &ReloadGate, ctx: &ReloadContext) -> Result<(), SidecarError> {
    let (request, response) = ReloadRequest::new();
    let request_id = request.id();

    tokio::select! {
        sent = gate.tx.send(request) => {
            sent.map_err(|_| SidecarError::HandshakeFailed(ReloadError::GateClosed))?;
        }
        interrupt = ctx.expired() => return Err(interrupt),
    }
    tracing::debug!(request_id = %request_id, "Reload request delivered, awaiting collector");

    tokio::select! {
        biased;
        outcome = response => match outcome {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(SidecarError::HandshakeFailed(e)),
            Err(_) => Err(SidecarError::HandshakeFailed(ReloadError::Abandoned)),
        },
        interrupt = ctx.expired() => Err(interrupt),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_successful_round_trip() {
        let (gate, mut requests) = reload_gate();
        tokio::spawn(async move {
            if let Some(req) = requests.recv().await {
                req.succeed();
            }
        });

        request_reload(&gate, &ReloadContext::background()).await.unwrap();
    }

    #[tokio::test]
    async fn test_rejection_is_surfaced() {
        let (gate, mut requests) = reload_gate();
        tokio::spawn(async move {
            if let Some(req) = requests.recv().await {
                req.fail(ReloadError::rejected("on purpose"));
            }
        });

        let err = request_reload(&gate, &ReloadContext::background()).await.unwrap_err();
        match err {
            SidecarError::HandshakeFailed(ReloadError::Rejected(msg)) => assert_eq!(msg, "on purpose"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_dropped_request_is_abandoned() {
        let (gate, mut requests) = reload_gate();
        tokio::spawn(async move {
            let _ = requests.recv().await;
        });

        let err = request_reload(&gate, &ReloadContext::background()).await.unwrap_err();
        assert!(matches!(err, SidecarError::HandshakeFailed(ReloadError::Abandoned)));
    }

    #[tokio::test]
    async fn test_closed_gate() {
        let (gate, requests) = reload_gate();
        drop(requests);

        let err = request_reload(&gate, &ReloadContext::background()).await.unwrap_err();
        assert!(matches!(err, SidecarError::HandshakeFailed(ReloadError::GateClosed)));
    }

    #[tokio::test]
    async fn test_silent_collaborator_times_out() {
        let (gate, mut requests) = reload_gate();
        let holder = tokio::spawn(async move {
            // Hold the request without answering.
            let req = requests.recv().await;
            tokio::time::sleep(Duration::from_millis(200)).await;
            req
        });

        let ctx = ReloadContext::with_timeout(Duration::from_millis(30));
        let err = request_reload(&gate, &ctx).await.unwrap_err();
        assert!(matches!(err, SidecarError::Timeout));

        // The late reply goes nowhere.
        if let Some(req) = holder.await.unwrap() {
            req.succeed();
        }
    }

    #[tokio::test]
    async fn test_cancel_while_waiting() {
        let (gate, mut requests) = reload_gate();
        let ctx = ReloadContext::background();
        let canceler = ctx.clone();
        let _holder = tokio::spawn(async move {
            let req = requests.recv().await;
            canceler.cancel();
            tokio::time::sleep(Duration::from_secs(1)).await;
            drop(req);
        });

        let err = request_reload(&gate, &ctx).await.unwrap_err();
        assert!(matches!(err, SidecarError::Canceled));
    }
}
