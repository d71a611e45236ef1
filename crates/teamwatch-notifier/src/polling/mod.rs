//! Polling engine
//!
//! ```text
//!  RosterRefresher ──publish──▶ [roster mailbox] ──try_take──▶ StatusPoller
//!   (5 min)                      (single slot)                  (6 s)
//!                                                                 │
//!                                   StatusSource ◀──fetch─────────┤
//!                                   DedupCache   ◀──insert_if_absent
//!                                   Fanout       ◀──notify (new games)
//!                                                                 │
//!                                   CacheSweeper ◀──spawned once──┘
//!                                   (30 min, evicts > 1 h)
//! ```

mod dedup_cache;
mod fanout;
mod mailbox;
mod roster_refresher;
mod status_poller;
mod sweeper;

pub use dedup_cache::DedupCache;
pub use fanout::{FanoutReport, NotificationFanout};
pub use mailbox::{roster_mailbox, RosterMailbox, RosterPublisher};
pub use roster_refresher::{RefreshOutcome, RosterRefresher};
pub use status_poller::{StatusPoller, TickOutcome};
pub use sweeper::CacheSweeper;

use tokio::task::JoinHandle;

/// Aborts the wrapped task when dropped
pub(crate) struct AbortOnDrop(pub(crate) JoinHandle<()>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}
