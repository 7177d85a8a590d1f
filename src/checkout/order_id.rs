//! Order identifier generation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Generates `ORD-<unix-millis>-<seq>` identifiers.
///
/// Timestamp-derived so ids sort roughly by creation time for humans,
/// with a process-wide sequence so two orders landing on the same
/// millisecond cannot collide.
pub struct OrderIds {
    seq: AtomicU64,
}

impl Default for OrderIds {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderIds {
    pub fn new() -> Self {
        OrderIds {
            seq: AtomicU64::new(1),
        }
    }

    pub fn next(&self) -> String {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        let n = self.seq.fetch_add(1, Ordering::Relaxed);
        format!("ORD-{}-{:04}", millis, n)
    }
}
