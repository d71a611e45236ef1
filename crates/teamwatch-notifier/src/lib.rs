//! TeamWatch Notifier
//!
//! Watches a Lichess team and pushes a link to every new game its members
//! start to the bot's subscribers:
//! - Roster refresh from the team endpoint (persisted, diffed, handed off)
//! - Status polling with a time-bounded dedup cache
//! - Fanout to active subscribers over a message transport
//! - Telegram front end for subscribe/unsubscribe and admin commands

pub mod bot;
pub mod config;
pub mod engine;
pub mod error;
pub mod lichess;
pub mod polling;
pub mod telegram;
pub mod transport;

/// User agent sent on every outbound HTTP request
pub const USER_AGENT: &str = concat!("TeamWatch/", env!("CARGO_PKG_VERSION"));

pub use bot::{Command, CommandDispatcher, MaintenanceMode, UpdateListener};
pub use config::{ConfigError, NotifierConfig};
pub use engine::{DependenciesBuilder, NotifierDependencies, NotifierEngine};
pub use error::{FetchError, TransportError};
pub use lichess::{RosterSource, StatusFetcher, StatusSource, TeamRosterSource};
pub use polling::{
    roster_mailbox, CacheSweeper, DedupCache, FanoutReport, NotificationFanout, RefreshOutcome,
    RosterMailbox, RosterPublisher, RosterRefresher, StatusPoller, TickOutcome,
};
pub use telegram::TelegramClient;
pub use transport::MessageTransport;
