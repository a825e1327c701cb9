//! Cancellation and deadline context for a transaction.

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::SidecarError;

/// Bounds how long a transaction may wait on the collector.
///
/// Clones share the same cancellation token.
#[derive(Debug, Clone)]
pub struct ReloadContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl ReloadContext {
    /// A context that is never canceled and has no deadline.
    pub fn background() -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: None,
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::background().timeout(timeout)
    }

    /// Derive a context from an existing token, e.g. a shutdown token.
    pub fn with_token(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    /// Tighten the deadline to `timeout` from now. An earlier deadline wins.
    ///
    /// A timeout too large to represent as an instant adds no deadline.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            return self;
        };
        self.deadline = Some(match self.deadline {
            Some(existing) if existing < deadline => existing,
            _ => deadline,
        });
        self
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// The interruption already in effect, if any.
    pub fn interruption(&self) -> Option<SidecarError> {
        if self.token.is_cancelled() {
            return Some(SidecarError::Canceled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(SidecarError::Timeout),
            _ => None,
        }
    }

    /// Resolves once the context is canceled or its deadline passes.
    pub async fn expired(&self) -> SidecarError {
        match self.deadline {
            Some(deadline) => tokio::select! {
                _ = self.token.cancelled() => SidecarError::Canceled,
                _ = tokio::time::sleep_until(deadline) => SidecarError::Timeout,
            },
            None => {
                self.token.cancelled().await;
                SidecarError::Canceled
            }
        }
    }
}

impl Default for ReloadContext {
    fn default() -> Self {
        Self::background()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_background_is_not_interrupted() {
        let ctx = ReloadContext::background();
        assert!(ctx.interruption().is_none());
    }

    #[test]
    fn test_cancel_is_shared_between_clones() {
        let ctx = ReloadContext::background();
        let clone = ctx.clone();
        clone.cancel();
        assert!(matches!(ctx.interruption(), Some(SidecarError::Canceled)));
    }

    #[test]
    fn test_earlier_deadline_wins() {
        let ctx = ReloadContext::with_timeout(Duration::ZERO).timeout(Duration::from_secs(60));
        assert!(matches!(ctx.interruption(), Some(SidecarError::Timeout)));
    }

    #[test]
    fn test_unrepresentable_timeout_adds_no_deadline() {
        let ctx = ReloadContext::with_timeout(Duration::MAX);
        assert!(ctx.deadline.is_none());
        assert!(ctx.interruption().is_none());

        let ctx = ReloadContext::with_timeout(Duration::ZERO).timeout(Duration::MAX);
        assert!(matches!(ctx.interruption(), Some(SidecarError::Timeout)));
    }

    #[tokio::test]
    async fn test_expired_reports_timeout() {
        let ctx = ReloadContext::with_timeout(Duration::from_millis(20));
        assert!(matches!(ctx.expired().await, SidecarError::Timeout));
    }

    #[tokio::test]
    async fn test_expired_reports_cancel() {
        let token = CancellationToken::new();
        let ctx = ReloadContext::with_token(token.clone()).timeout(Duration::from_secs(60));
        token.cancel();
        assert!(matches!(ctx.expired().await, SidecarError::Canceled));
    }
}
