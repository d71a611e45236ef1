//! Domain entities and value objects
//!
//! - Entities (TrackedMember, Subscriber)
//! - Value Objects (ActiveSession, SessionRecord, Roster)

mod member;
mod session;
mod subscriber;

pub use member::*;
pub use session::*;
pub use subscriber::*;
