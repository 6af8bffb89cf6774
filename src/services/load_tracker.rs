//! Stale-response guard for page loads
//!
//! A load key names one view instance: the session, the browser view token
//! and the page. Every load of a key takes a ticket; when a newer load of
//! the same key starts, older tickets stop being current and their results
//! are dropped instead of overwriting newer state.
//!
//! An entry lives only while a load for its key is in flight, so the map
//! stays as small as the number of concurrent loads.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Proof of which load generation a result belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    key: String,
    generation: u64,
}

#[derive(Default)]
struct Generations {
    /// Latest generation handed out per key
    latest: HashMap<String, u64>,
    /// Shared across keys so a generation is never reused after its entry
    /// is removed
    counter: u64,
}

#[derive(Clone, Default)]
pub struct LoadTracker {
    inner: Arc<Mutex<Generations>>,
}

impl LoadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new load for `key`, superseding any in flight.
    pub fn begin(&self, key: &str) -> LoadTicket {
        let mut inner = self.inner.lock();
        inner.counter += 1;
        let generation = inner.counter;
        inner.latest.insert(key.to_string(), generation);
        LoadTicket {
            key: key.to_string(),
            generation,
        }
    }

    pub fn is_current(&self, ticket: &LoadTicket) -> bool {
        self.inner.lock().latest.get(&ticket.key) == Some(&ticket.generation)
    }

    /// Keep `value` only if `ticket` is still the latest load for its key.
    /// Settling the latest load releases the key.
    pub fn settle<T>(&self, ticket: &LoadTicket, value: T) -> Option<T> {
        let mut inner = self.inner.lock();
        if inner.latest.get(&ticket.key) == Some(&ticket.generation) {
            inner.latest.remove(&ticket.key);
            return Some(value);
        }
        drop(inner);

        tracing::debug!(
            key = %ticket.key,
            generation = ticket.generation,
            "Discarding stale load result"
        );
        None
    }

    /// Keys with a load in flight.
    pub fn in_flight(&self) -> usize {
        self.inner.lock().latest.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_load_supersedes_older() {
        let tracker = LoadTracker::new();
        let first = tracker.begin("s1:tab-a:reconciliations");
        let second = tracker.begin("s1:tab-a:reconciliations");

        assert_eq!(tracker.settle(&first, "old"), None);
        assert_eq!(tracker.settle(&second, "new"), Some("new"));
    }

    #[test]
    fn keys_are_independent() {
        let tracker = LoadTracker::new();
        let etl = tracker.begin("s1:tab-a:etl");
        let _forex = tracker.begin("s1:tab-a:forex");
        let _other_tab = tracker.begin("s1:tab-b:etl");
        assert!(tracker.is_current(&etl));
    }

    #[test]
    fn settled_keys_are_released() {
        let tracker = LoadTracker::new();
        let first = tracker.begin("s1:tab-a:etl");
        let second = tracker.begin("s1:tab-a:etl");
        let other = tracker.begin("s2:tab-a:etl");
        assert_eq!(tracker.in_flight(), 2);

        assert_eq!(tracker.settle(&second, 2), Some(2));
        assert_eq!(tracker.settle(&other, 3), Some(3));
        assert_eq!(tracker.settle(&first, 1), None);
        assert_eq!(tracker.in_flight(), 0);
    }

    #[test]
    fn stale_ticket_stays_stale_after_key_is_reused() {
        let tracker = LoadTracker::new();
        let stale = tracker.begin("s1:tab-a:etl");
        let newer = tracker.begin("s1:tab-a:etl");
        assert_eq!(tracker.settle(&newer, "newer"), Some("newer"));

        // the key is free again; a fresh load must not revive `stale`
        let fresh = tracker.begin("s1:tab-a:etl");
        assert_eq!(tracker.settle(&stale, "stale"), None);
        assert_eq!(tracker.settle(&fresh, "fresh"), Some("fresh"));
    }
}
