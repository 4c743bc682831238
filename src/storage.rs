// Key-value storage and clock seams.
//
// The browser shell persists three string keys; everything in this crate
// that touches them goes through these traits so the suppression rule and
// the session restore path are testable without real storage or real dates.

use std::collections::HashMap;

use parking_lot::RwLock;

/// Storage key for the bearer credential.
pub const AUTH_TOKEN_KEY: &str = "pms.auth_token";
/// Storage key for the tenant (hotel) identifier.
pub const TENANT_ID_KEY: &str = "pms.hotel_id";
/// Storage key for the subscription modal's "last shown day" marker.
pub const GATE_MARKER_KEY: &str = "pms.subscription_modal_shown";

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// Day marker source. Markers are opaque strings compared for equality,
/// never parsed, so any stable per-day format works.
pub trait Clock: Send + Sync {
    fn today_marker(&self) -> String;
}

/// Real clock: one marker per UTC calendar day.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today_marker(&self) -> String {
        chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string()
    }
}

/// In-memory store for tests and the demo client.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.write().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.write().remove(key);
    }
}

/// Clock pinned to a fixed marker, for tests.
#[derive(Debug, Clone)]
pub struct FixedClock(pub String);

impl Clock for FixedClock {
    fn today_marker(&self) -> String {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trips_and_removes() {
        let store = MemoryStore::new();
        assert_eq!(store.get(AUTH_TOKEN_KEY), None);
        store.set(AUTH_TOKEN_KEY, "token-123");
        assert_eq!(store.get(AUTH_TOKEN_KEY), Some("token-123".to_string()));
        store.remove(AUTH_TOKEN_KEY);
        assert_eq!(store.get(AUTH_TOKEN_KEY), None);
    }

    #[test]
    fn system_clock_emits_one_marker_per_day() {
        let clock = SystemClock;
        assert_eq!(clock.today_marker(), clock.today_marker());
    }
}
