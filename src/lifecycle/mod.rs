//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Metrics → Runtime state + manager → Reload gate
//!     → Collector reloader task → Admin listener
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Broadcast → Admin stops accepting → Reloader exits
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listeners start last (requests only when the gate is served)
//! - An in-flight transaction finishes or rolls back before the server exits

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
