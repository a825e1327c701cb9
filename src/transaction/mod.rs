//! Transactional config updates.
//!
//! # Data Flow
//! ```text
//! update / reset command
//!     → serialize against other transactions (async mutex)
//!     → zone check against RuntimeState
//!     → collector::document validation (update only)
//!     → snapshot.rs capture current bytes
//!     → write new body
//!     → reload::handshake request_reload
//!     → ok:  commit RuntimeState, keep file
//!     → err: restore snapshot, state untouched
//! ```
//!
//! # Design Decisions
//! - State advances only after the collector confirmed the reload
//! - A failed restore is reported as its own error, wrapping the cause
//! - A write failure is reported as-is; the file may be partial

pub mod manager;
pub mod snapshot;

pub use manager::{ConfigTransactionManager, Operation, UpdateConfigCmd};
pub use snapshot::{RollbackGuard, Snapshot};
