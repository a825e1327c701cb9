//! Config transaction manager.
//!
//! Owns the collector's config file and the runtime zone binding. Both
//! `update_config_reload` and `reset_config_reload` run the same sequence:
//! zone check, validation, snapshot, write, reload handshake, then commit or
//! roll back. Whole transactions are serialized; reads of the runtime state
//! are not.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::Instrument;
use uuid::Uuid;

use crate::collector::document::{self, RESET_BODY};
use crate::error::{SidecarError, SidecarResult};
use crate::observability::metrics;
use crate::reload::context::ReloadContext;
use crate::reload::handshake::{request_reload, ReloadGate};
use crate::runtime::state::{next_timestamp, RuntimeInfo, RuntimeState};
use crate::transaction::snapshot::{RollbackGuard, Snapshot};

/// Proposed configuration for a zone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateConfigCmd {
    pub zone_id: String,
    pub yaml: String,
}

/// Kind of transaction, used for logs and metric labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Update,
    Reset,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Update => "update",
            Operation::Reset => "reset",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Applies configuration changes with all-or-nothing semantics.
#[derive(Debug)]
pub struct ConfigTransactionManager {
    config_file: PathBuf,
    state: Arc<RuntimeState>,
    txn_lock: Mutex<()>,
}

impl ConfigTransactionManager {
    /// Manager over `config_file` with a fresh, unbound runtime state.
    pub fn new(config_file: impl Into<PathBuf>) -> Self {
        Self::with_state(config_file, Arc::new(RuntimeState::new()))
    }

    pub fn with_state(config_file: impl Into<PathBuf>, state: Arc<RuntimeState>) -> Self {
        Self {
            config_file: config_file.into(),
            state,
            txn_lock: Mutex::new(()),
        }
    }

    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    pub fn runtime_info(&self) -> RuntimeInfo {
        self.state.read()
    }

    pub fn last_update_ts(&self) -> Option<DateTime<Utc>> {
        self.state.last_update_ts()
    }

    /// Write `cmd.yaml`, have the collector reload it, then bind `cmd.zone_id`.
    pub async fn update_config_reload(
        &self,
        ctx: &ReloadContext,
        cmd: &UpdateConfigCmd,
        gate: &ReloadGate,
    ) -> SidecarResult<()> {
        self.transact(ctx, Operation::Update, &cmd.zone_id, &cmd.yaml, gate)
            .await
    }

    /// Write the empty configuration, have the collector reload it, then unbind.
    pub async fn reset_config_reload(
        &self,
        ctx: &ReloadContext,
        zone_id: &str,
        gate: &ReloadGate,
    ) -> SidecarResult<()> {
        self.transact(ctx, Operation::Reset, zone_id, RESET_BODY, gate)
            .await
    }

    async fn transact(
        &self,
        ctx: &ReloadContext,
        op: Operation,
        zone_id: &str,
        body: &str,
        gate: &ReloadGate,
    ) -> SidecarResult<()> {
        let span = tracing::info_span!(
            "config_txn",
            txn_id = %Uuid::new_v4(),
            op = %op,
            zone_id = %zone_id,
        );

        async move {
            let start = Instant::now();
            let result = self.run(ctx, op, zone_id, body, gate).await;
            match &result {
                Ok(()) => {
                    tracing::info!("Config transaction committed");
                    metrics::record_transaction(op.as_str(), "committed", start);
                }
                Err(e) => {
                    if e.is_degraded() {
                        tracing::error!(error = %e, kind = e.kind(), "Config transaction failed");
                    } else {
                        tracing::warn!(error = %e, kind = e.kind(), "Config transaction rejected");
                    }
                    metrics::record_transaction(op.as_str(), e.kind(), start);
                }
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn run(
        &self,
        ctx: &ReloadContext,
        op: Operation,
        zone_id: &str,
        body: &str,
        gate: &ReloadGate,
    ) -> SidecarResult<()> {
        if let Some(interrupt) = ctx.interruption() {
            return Err(interrupt);
        }

        let _serial = tokio::select! {
            guard = self.txn_lock.lock() => guard,
            interrupt = ctx.expired() => return Err(interrupt),
        };

        let current = self.state.read();
        check_zone(&current.zone_id, zone_id)?;

        if op == Operation::Update {
            document::parse(body).map_err(SidecarError::InvalidConfig)?;
        }

        let snapshot =
            Snapshot::capture(&self.config_file).map_err(|source| SidecarError::Snapshot {
                path: self.config_file.clone(),
                source,
            })?;

        fs::write(&self.config_file, body).map_err(|source| SidecarError::Persistence {
            path: self.config_file.clone(),
            source,
        })?;
        let guard = RollbackGuard::arm(&self.config_file, snapshot);
        tracing::debug!(path = ?self.config_file, bytes = body.len(), "Config file written");

        match request_reload(gate, ctx).await {
            Ok(()) => {
                guard.commit();
                match op {
                    Operation::Update => self
                        .state
                        .commit(zone_id.to_string(), Some(next_timestamp(current.last_update_ts))),
                    Operation::Reset => self.state.commit(String::new(), None),
                }
                Ok(())
            }
            Err(cause) => match guard.rollback() {
                Ok(()) => {
                    tracing::info!(cause = %cause, "Config file restored from snapshot");
                    metrics::record_rollback(op.as_str(), true);
                    Err(cause)
                }
                Err(source) => {
                    metrics::record_rollback(op.as_str(), false);
                    Err(SidecarError::RollbackFailed {
                        path: self.config_file.clone(),
                        cause: Box::new(cause),
                        source,
                    })
                }
            },
        }
    }
}

/// An unbound state accepts any zone; a bound one only itself.
fn check_zone(bound: &str, requested: &str) -> SidecarResult<()> {
    if bound.is_empty() || bound == requested {
        return Ok(());
    }
    Err(SidecarError::ZoneMismatch {
        bound: bound.to_string(),
        requested: requested.to_string(),
    })
}
