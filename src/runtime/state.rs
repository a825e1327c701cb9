//! Zone binding and last-update timestamp.

use std::sync::Arc;

use arc_swap::ArcSwap;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Vendor/product identifier reported by the query surface.
pub const BRAND: &str = "ipmi_exporter";

/// Consistent view of the runtime state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeInfo {
    pub brand: String,
    /// Empty when unbound.
    pub zone_id: String,
    /// `None` until the first successful update.
    pub last_update_ts: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
struct ZoneBinding {
    zone_id: String,
    last_update_ts: Option<DateTime<Utc>>,
}

/// Guarded holder of the zone binding.
///
/// Owned by exactly one transaction manager; independent config files get
/// independent instances.
#[derive(Debug)]
pub struct RuntimeState {
    brand: &'static str,
    binding: ArcSwap<ZoneBinding>,
}

impl RuntimeState {
    /// Create an unbound state carrying the default brand.
    pub fn new() -> Self {
        Self::with_brand(BRAND)
    }

    pub fn with_brand(brand: &'static str) -> Self {
        Self {
            brand,
            binding: ArcSwap::from_pointee(ZoneBinding::default()),
        }
    }

    /// Snapshot brand, zone and timestamp.
    pub fn read(&self) -> RuntimeInfo {
        let binding = self.binding.load();
        RuntimeInfo {
            brand: self.brand.to_string(),
            zone_id: binding.zone_id.clone(),
            last_update_ts: binding.last_update_ts,
        }
    }

    pub fn last_update_ts(&self) -> Option<DateTime<Utc>> {
        self.binding.load().last_update_ts
    }

    /// Replace zone and timestamp together.
    ///
    /// Only the transaction manager calls this, after the collector confirmed
    /// the reload.
    pub(crate) fn commit(&self, zone_id: String, last_update_ts: Option<DateTime<Utc>>) {
        self.binding.store(Arc::new(ZoneBinding {
            zone_id,
            last_update_ts,
        }));
    }
}

impl Default for RuntimeState {
    fn default() -> Self {
        Self::new()
    }
}

/// Timestamp for the next commit, strictly after `previous`.
pub(crate) fn next_timestamp(previous: Option<DateTime<Utc>>) -> DateTime<Utc> {
    let now = Utc::now();
    match previous {
        Some(prev) if now <= prev => prev + Duration::nanoseconds(1),
        _ => now,
    }
}
