//! Lichess API clients
//!
//! - `status` - batched user status lookup (who is playing which game)
//! - `team` - team roster stream
//!
//! The polling loops depend on the [`StatusSource`] and [`RosterSource`]
//! traits so tests can substitute scripted sources.

mod status;
mod team;

pub use status::{build_status_url, PlayerStatus, StatusFetcher};
pub use team::{TeamMemberRecord, TeamRosterSource};

use async_trait::async_trait;
use teamwatch_core::{ActiveSession, TrackedMember};

use crate::error::FetchError;

/// Source of live session status for a batch of members.
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Return the members of `member_ids` that are currently in a session.
    ///
    /// Members not in a session are absent from the result.
    async fn fetch_active(&self, member_ids: &[&str]) -> Result<Vec<ActiveSession>, FetchError>;
}

/// Source of the authoritative team membership.
#[async_trait]
pub trait RosterSource: Send + Sync {
    async fn fetch_members(&self) -> Result<Vec<TrackedMember>, FetchError>;
}
