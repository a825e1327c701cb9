//! Reload handshake with the external collector.
//!
//! # Data Flow
//! ```text
//! transaction manager
//!     → handshake.rs builds ReloadRequest (one-shot responder)
//!     → ReloadGate (mpsc) ─────────────▶ collaborator (ReloadRequests)
//!                                          reloads collector
//!     ← exactly one Result<(), ReloadError> ◀┘
//!
//! context.rs bounds every wait (cancellation token + deadline)
//! ```
//!
//! # Design Decisions
//! - The gate is owned by the caller, never by the manager
//! - `ReloadRequest::respond` consumes the request: one reply per request
//! - A dropped responder or closed gate is a failure, not a hang

pub mod context;
pub mod handshake;

pub use context::ReloadContext;
pub use handshake::{reload_gate, ReloadError, ReloadGate, ReloadRequest, ReloadRequests};
