//! Session value objects

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A tracked member currently engaged in a session (an in-progress game).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveSession {
    /// Member that is playing
    pub member_id: String,

    /// Session (game) id, the deduplication key
    pub session_id: String,
}

impl ActiveSession {
    pub fn new(member_id: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            member_id: member_id.into(),
            session_id: session_id.into(),
        }
    }
}

/// First observation of a session, kept by the dedup cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session_id: String,
    pub first_seen_at: DateTime<Utc>,
}

impl SessionRecord {
    pub fn new(session_id: impl Into<String>, first_seen_at: DateTime<Utc>) -> Self {
        Self {
            session_id: session_id.into(),
            first_seen_at,
        }
    }

    /// Whether the record is strictly older than `window` at `now`.
    ///
    /// A record stamped in the future is never expired.
    pub fn is_expired(&self, window: std::time::Duration, now: DateTime<Utc>) -> bool {
        (now - self.first_seen_at)
            .to_std()
            .map(|age| age > window)
            .unwrap_or(false)
    }
}
