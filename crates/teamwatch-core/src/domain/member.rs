//! TrackedMember entity - a team member whose live status is polled

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A member of the tracked team.
///
/// Identity is `external_id` (the platform user id). Members are immutable
/// once created; a fresh roster snapshot replaces them wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackedMember {
    /// Platform user id (lowercase Lichess id)
    pub external_id: String,

    /// Display name as reported by the roster source
    pub display_name: String,
}

impl TrackedMember {
    pub fn new(external_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            external_id: external_id.into(),
            display_name: display_name.into(),
        }
    }
}

/// Immutable roster snapshot.
///
/// Shared by reference so that a replacement is a single pointer swap and a
/// reader never sees a mix of two snapshots.
pub type Roster = Arc<[TrackedMember]>;

/// Collect the external ids of a roster in order.
pub fn roster_ids(roster: &[TrackedMember]) -> Vec<&str> {
    roster.iter().map(|m| m.external_id.as_str()).collect()
}
