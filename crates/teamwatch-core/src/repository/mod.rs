//! Repository traits for data access
//!
//! These traits define the persistence contract the notifier relies on
//! without specifying the implementation (SQLite, in-memory, REST, etc.)

use async_trait::async_trait;

use crate::domain::{Subscriber, TrackedMember};

/// Result type for repository operations
pub type RepoResult<T> = anyhow::Result<T>;

/// Tracked member repository trait
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Get the external ids of every persisted member
    async fn list_known_ids(&self) -> RepoResult<Vec<String>>;

    /// Insert a member.
    ///
    /// Inserting an id that already exists is a no-op, not an error.
    async fn insert(&self, member: &TrackedMember) -> RepoResult<()>;
}

/// Subscriber registry trait
#[async_trait]
pub trait SubscriberRepository: Send + Sync {
    /// Get the recipient ids of all active subscribers
    async fn list_active_ids(&self) -> RepoResult<Vec<i64>>;

    /// Get a subscriber by recipient id
    async fn get(&self, recipient_id: i64) -> RepoResult<Option<Subscriber>>;

    /// Create the subscriber or mark an existing one active
    async fn activate(&self, recipient_id: i64) -> RepoResult<()>;

    /// Mark a subscriber inactive. Unknown ids are ignored.
    async fn deactivate(&self, recipient_id: i64) -> RepoResult<()>;

    /// Count active subscribers
    async fn count_active(&self) -> RepoResult<usize>;
}
