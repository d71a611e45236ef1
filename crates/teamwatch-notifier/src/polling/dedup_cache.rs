//! Dedup Cache
//!
//! Time-bounded set of session ids already notified. Shared between the
//! status poller (insert) and the cache sweeper (evict); the map itself is
//! never handed out, so "is this new?" is always answered and recorded
//! under a single exclusive lock.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use teamwatch_core::SessionRecord;

#[derive(Debug, Default)]
pub struct DedupCache {
    /// session_id -> first-seen time
    entries: RwLock<HashMap<String, DateTime<Utc>>>,
}

impl DedupCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `session_id` has been recorded and not yet evicted
    pub fn exists(&self, session_id: &str) -> bool {
        self.entries.read().contains_key(session_id)
    }

    /// Record `session_id`, keeping the original first-seen time if present
    pub fn insert(&self, session_id: &str, at: DateTime<Utc>) {
        self.insert_if_absent(session_id, at);
    }

    /// Atomically record `session_id` if it is not already present.
    ///
    /// Returns `true` when the id was new, i.e. the caller owns the
    /// notification for it.
    pub fn insert_if_absent(&self, session_id: &str, at: DateTime<Utc>) -> bool {
        let mut entries = self.entries.write();
        if entries.contains_key(session_id) {
            return false;
        }
        entries.insert(session_id.to_string(), at);
        true
    }

    /// First-seen record for `session_id`
    pub fn get(&self, session_id: &str) -> Option<SessionRecord> {
        self.entries
            .read()
            .get(session_id)
            .map(|at| SessionRecord::new(session_id, *at))
    }

    /// Drop every record older than `window` at `now`; returns how many were removed
    pub fn evict_older_than(&self, window: Duration, now: DateTime<Utc>) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|session_id, at| {
            !SessionRecord::new(session_id.as_str(), *at).is_expired(window, now)
        });
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
