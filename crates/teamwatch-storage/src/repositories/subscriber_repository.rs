//! SQLite implementation of SubscriberRepository.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};
use teamwatch_core::{Subscriber, SubscriberRepository};
use tokio::sync::Mutex;

use crate::Database;

/// SQLite-backed subscriber registry.
pub struct SqliteSubscriberRepository {
    db: Arc<Mutex<Database>>,
}

impl SqliteSubscriberRepository {
    pub fn new(db: Arc<Mutex<Database>>) -> Self {
        Self { db }
    }
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(raw)?.with_timezone(&Utc))
}

#[async_trait]
impl SubscriberRepository for SqliteSubscriberRepository {
    async fn list_active_ids(&self) -> Result<Vec<i64>> {
        let db = self.db.lock().await;
        let conn = db.connection();

        let mut stmt = conn.prepare(
            "SELECT recipient_id FROM subscribers WHERE is_active = 1 ORDER BY recipient_id",
        )?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<i64>, _>>()?;

        Ok(ids)
    }

    async fn get(&self, recipient_id: i64) -> Result<Option<Subscriber>> {
        let db = self.db.lock().await;
        let conn = db.connection();

        let row = conn
            .query_row(
                "SELECT recipient_id, is_active, created_at, updated_at FROM subscribers WHERE recipient_id = ?",
                params![recipient_id],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, bool>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                },
            )
            .optional()?;

        row.map(|(recipient_id, is_active, created_at, updated_at)| {
            Ok(Subscriber {
                recipient_id,
                is_active,
                created_at: parse_timestamp(&created_at)?,
                updated_at: parse_timestamp(&updated_at)?,
            })
        })
        .transpose()
    }

    async fn activate(&self, recipient_id: i64) -> Result<()> {
        let db = self.db.lock().await;
        let conn = db.connection();
        let now = Utc::now().to_rfc3339();

        conn.execute(
            "INSERT INTO subscribers (recipient_id, is_active, created_at, updated_at)
             VALUES (?1, 1, ?2, ?2)
             ON CONFLICT(recipient_id) DO UPDATE SET is_active = 1, updated_at = excluded.updated_at",
            params![recipient_id, now],
        )?;

        Ok(())
    }

    async fn deactivate(&self, recipient_id: i64) -> Result<()> {
        let db = self.db.lock().await;
        let conn = db.connection();

        conn.execute(
            "UPDATE subscribers SET is_active = 0, updated_at = ? WHERE recipient_id = ?",
            params![Utc::now().to_rfc3339(), recipient_id],
        )?;

        Ok(())
    }

    async fn count_active(&self) -> Result<usize> {
        let db = self.db.lock().await;
        let conn = db.connection();

        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM subscribers WHERE is_active = 1",
            [],
            |row| row.get(0),
        )?;

        Ok(usize::try_from(count)?)
    }
}
