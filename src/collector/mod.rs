//! The external collector, as seen from the sidecar.
//!
//! - document.rs: shape check of the collector's YAML file
//! - reloader.rs: default collaborator behind the reload gate

pub mod document;
pub mod reloader;

pub use document::{CollectorDocument, DocumentError, RESET_BODY};
pub use reloader::CollectorReloader;
