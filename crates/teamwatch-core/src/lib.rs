//! # TeamWatch Core Library
//!
//! Domain types and contracts shared by the notifier engine, the storage
//! layer and the bot binary.
//!
//! ## Modules
//!
//! - `domain` - Core entities (TrackedMember, Subscriber, SessionRecord)
//! - `repository` - Data access traits
//! - `service` - Pure domain rules (roster diffing)

pub mod domain;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use domain::*;
pub use repository::*;
pub use service::*;
