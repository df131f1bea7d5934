//! First-seen device discovery cache
//!
//! Explicit state owned by the orchestration layer, injected into the
//! publish path. The decode pipeline stays side-effect-free; this cache is
//! the only place "have we announced this device" lives, and it has a
//! single writer because files are processed one at a time.

use std::collections::HashSet;

use tracing::debug;

/// Membership set of device ids that have already been announced.
#[derive(Debug, Default)]
pub struct DiscoveryCache {
    seen: HashSet<String>,
}

impl DiscoveryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check-and-insert in one step. Returns true exactly once per device
    /// id: on the call that first inserted it.
    pub fn check_and_insert(&mut self, device_id: &str) -> bool {
        let first_seen = self.seen.insert(device_id.to_string());
        if first_seen {
            debug!("New device discovered: {}", device_id);
        }
        first_seen
    }

    /// Whether a device has been seen, without recording it.
    pub fn contains(&self, device_id: &str) -> bool {
        self.seen.contains(device_id)
    }

    /// Number of known devices.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_insert_reports_true_once() {
        let mut cache = DiscoveryCache::new();
        assert!(cache.check_and_insert("0x00001"));
        assert!(!cache.check_and_insert("0x00001"));
        assert!(!cache.check_and_insert("0x00001"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_distinct_devices_tracked_separately() {
        let mut cache = DiscoveryCache::new();
        assert!(cache.check_and_insert("0x00001"));
        assert!(cache.check_and_insert("0xa5e1a"));
        assert!(cache.contains("0x00001"));
        assert!(cache.contains("0xa5e1a"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_contains_does_not_record() {
        let cache = DiscoveryCache::new();
        assert!(!cache.contains("0x00001"));
        assert!(cache.is_empty());
    }
}
