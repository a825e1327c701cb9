//! Process-lifetime runtime state.
//!
//! # Data Flow
//! ```text
//! transaction manager (after confirmed reload)
//!     → state.rs commit(zone_id, timestamp)
//!     → atomic swap of Arc<ZoneBinding>
//!     → query surface observes new binding
//! ```
//!
//! # Design Decisions
//! - Zone binding and timestamp live in one value and are swapped together
//! - Readers never take a lock and never see a torn binding
//! - Nothing here is persisted; a restart begins unbound

pub mod state;

pub use state::{RuntimeInfo, RuntimeState, BRAND};
