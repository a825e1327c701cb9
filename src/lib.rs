//! Transactional configuration-reload sidecar for an IPMI collector.

pub mod admin;
pub mod collector;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod observability;
pub mod reload;
pub mod runtime;
pub mod transaction;

pub use config::SidecarConfig;
pub use error::{SidecarError, SidecarResult};
pub use lifecycle::Shutdown;
pub use reload::{reload_gate, ReloadContext, ReloadError, ReloadGate, ReloadRequest, ReloadRequests};
pub use runtime::{RuntimeInfo, RuntimeState, BRAND};
pub use transaction::{ConfigTransactionManager, UpdateConfigCmd};
