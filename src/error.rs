//! Error taxonomy for configuration transactions.
//!
//! Every variant is returned to the immediate caller. Only `Persistence` and
//! `RollbackFailed` can leave the config file disagreeing with the runtime
//! binding; all other failures leave file and state byte-identical.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::collector::document::DocumentError;
use crate::reload::handshake::ReloadError;

/// Errors returned by the config transaction manager.
#[derive(Debug, Error)]
pub enum SidecarError {
    /// The command targets a zone other than the one already bound.
    #[error("zone id mismatch: bound to {bound:?}, command targets {requested:?}")]
    ZoneMismatch { bound: String, requested: String },

    /// The payload failed syntactic validation.
    #[error("invalid collector config: {0}")]
    InvalidConfig(#[source] DocumentError),

    /// The current file could not be read, so nothing was written.
    #[error("failed to read {path} before writing: {source}")]
    Snapshot {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing the new body failed.
    ///
    /// A failed write may leave the file with partial content.
    #[error("failed to persist {path}: {source}")]
    Persistence {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The collector reported that the reload failed.
    #[error("collector reload failed: {0}")]
    HandshakeFailed(#[source] ReloadError),

    /// The caller canceled while the transaction was pending.
    #[error("canceled while waiting for collector reload")]
    Canceled,

    /// The caller's deadline expired while the transaction was pending.
    #[error("timed out waiting for collector reload")]
    Timeout,

    /// Restoring the snapshot failed after `cause` aborted the transaction.
    #[error("rollback of {path} failed after {cause}: {source}")]
    RollbackFailed {
        path: PathBuf,
        cause: Box<SidecarError>,
        #[source]
        source: io::Error,
    },
}

impl SidecarError {
    /// Stable label for API error bodies and metric labels.
    pub fn kind(&self) -> &'static str {
        match self {
            SidecarError::ZoneMismatch { .. } => "zone_mismatch",
            SidecarError::InvalidConfig(_) => "invalid_config",
            SidecarError::Snapshot { .. } => "snapshot",
            SidecarError::Persistence { .. } => "persistence",
            SidecarError::HandshakeFailed(_) => "handshake_failed",
            SidecarError::Canceled => "canceled",
            SidecarError::Timeout => "timeout",
            SidecarError::RollbackFailed { .. } => "rollback_failed",
        }
    }

    /// Whether the config file may no longer match the runtime binding.
    pub fn is_degraded(&self) -> bool {
        matches!(
            self,
            SidecarError::Persistence { .. } | SidecarError::RollbackFailed { .. }
        )
    }
}

/// Result type for config transactions.
pub type SidecarResult<T> = Result<T, SidecarError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SidecarError::ZoneMismatch {
            bound: "default".into(),
            requested: "default2".into(),
        };
        assert_eq!(
            err.to_string(),
            "zone id mismatch: bound to \"default\", command targets \"default2\""
        );

        let err = SidecarError::HandshakeFailed(ReloadError::rejected("on purpose"));
        assert!(err.to_string().contains("on purpose"));
    }

    #[test]
    fn test_rollback_failure_keeps_cause() {
        let err = SidecarError::RollbackFailed {
            path: PathBuf::from("/tmp/ipmi.yml"),
            cause: Box::new(SidecarError::Timeout),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
        };
        assert_eq!(err.kind(), "rollback_failed");
        assert!(err.is_degraded());
        assert!(err.to_string().contains("timed out"));
        assert!(err.to_string().contains("read-only"));
    }

    #[test]
    fn test_recoverable_kinds() {
        assert!(!SidecarError::Canceled.is_degraded());
        assert!(!SidecarError::Timeout.is_degraded());
        assert_eq!(SidecarError::Canceled.kind(), "canceled");
    }

    #[test]
    fn test_snapshot_failure_is_not_degraded() {
        let err = SidecarError::Snapshot {
            path: PathBuf::from("/tmp/ipmi.yml"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "no read access"),
        };
        assert_eq!(err.kind(), "snapshot");
        assert!(!err.is_degraded());
        assert!(err.to_string().contains("before writing"));
    }
}
