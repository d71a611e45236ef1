//! SQLite implementation of MemberRepository.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use rusqlite::params;
use teamwatch_core::{MemberRepository, TrackedMember};
use tokio::sync::Mutex;

use crate::Database;

/// SQLite-backed tracked member repository.
///
/// Rows are insert-only: a member already present is left untouched.
pub struct SqliteMemberRepository {
    db: Arc<Mutex<Database>>,
}

impl SqliteMemberRepository {
    pub fn new(db: Arc<Mutex<Database>>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MemberRepository for SqliteMemberRepository {
    async fn list_known_ids(&self) -> Result<Vec<String>> {
        let db = self.db.lock().await;
        let conn = db.connection();

        let mut stmt = conn.prepare("SELECT external_id FROM tracked_members")?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;

        Ok(ids)
    }

    async fn insert(&self, member: &TrackedMember) -> Result<()> {
        let db = self.db.lock().await;
        let conn = db.connection();

        conn.execute(
            "INSERT INTO tracked_members (external_id, display_name, created_at)
             VALUES (?, ?, datetime('now'))
             ON CONFLICT(external_id) DO NOTHING",
            params![member.external_id, member.display_name],
        )?;

        Ok(())
    }
}
