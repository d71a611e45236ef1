//! Repository implementations using SQLite.

mod member_repository;
mod subscriber_repository;

pub use member_repository::SqliteMemberRepository;
pub use subscriber_repository::SqliteSubscriberRepository;
