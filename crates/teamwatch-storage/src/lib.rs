//! TeamWatch Storage Layer
//!
//! SQLite persistence for the tracked team roster and the subscriber registry.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                 Notifier / Bot                       │
//! ├──────────────────────────────────────────────────────┤
//! │               Repository Traits                      │
//! │      (MemberRepository, SubscriberRepository)        │
//! ├──────────────────────────────────────────────────────┤
//! │            SQLite Implementations                    │
//! │ (SqliteMemberRepository, SqliteSubscriberRepository) │
//! ├──────────────────────────────────────────────────────┤
//! │                   Database                           │
//! │                   (SQLite)                           │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use teamwatch_storage::{Database, SqliteMemberRepository, SqliteSubscriberRepository};
//! use std::sync::Arc;
//! use tokio::sync::Mutex;
//!
//! let db = Arc::new(Mutex::new(Database::open(&path)?));
//! let members = SqliteMemberRepository::new(db.clone());
//! let subscribers = SqliteSubscriberRepository::new(db);
//! ```

mod database;
mod repositories;

pub use database::Database;
pub use repositories::*;

/// Default database file name.
pub const DATABASE_FILE: &str = "teamwatch.db";

/// Get the default database path for the current platform.
pub fn default_database_path() -> Option<std::path::PathBuf> {
    dirs::data_local_dir().map(|p| p.join("teamwatch").join(DATABASE_FILE))
}
