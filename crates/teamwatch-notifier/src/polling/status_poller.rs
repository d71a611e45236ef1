//! Status Poller
//!
//! Each tick is exactly one of:
//! - absorb a freshly published roster (and skip fetching this tick), or
//! - fetch status for the current roster and notify about new games.
//!
//! The roster is an immutable snapshot held by reference, so a fetch always
//! runs against one whole roster even if a new one is published meanwhile.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use teamwatch_core::{roster_ids, Roster, TrackedMember};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use super::{AbortOnDrop, CacheSweeper, DedupCache, NotificationFanout, RosterMailbox};
use crate::lichess::StatusSource;

/// What a single tick did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// A new roster was installed; no fetch this tick
    RosterReplaced { members: usize },
    /// Status was fetched
    Polled {
        /// Members reported in a session
        active: usize,
        /// Sessions seen for the first time and fanned out
        notified: Vec<String>,
    },
    /// Status fetch failed; retried on the next tick
    FetchFailed,
    /// Nothing to poll yet
    Idle,
}

pub struct StatusPoller {
    cache: Arc<DedupCache>,
    status: Arc<dyn StatusSource>,
    fanout: Arc<NotificationFanout>,
    mailbox: RosterMailbox,
    roster: Roster,
    interval: Duration,
    sweeper: Option<CacheSweeper>,
}

impl StatusPoller {
    pub fn new(
        cache: Arc<DedupCache>,
        status: Arc<dyn StatusSource>,
        fanout: Arc<NotificationFanout>,
        mailbox: RosterMailbox,
        interval: Duration,
    ) -> Self {
        Self {
            cache,
            status,
            fanout,
            mailbox,
            roster: Vec::<TrackedMember>::new().into(),
            interval,
            sweeper: None,
        }
    }

    /// Start from a known roster instead of waiting for the first refresh
    pub fn with_initial_roster(mut self, roster: Roster) -> Self {
        self.roster = roster;
        self
    }

    /// Sweeper started alongside the poll loop
    pub fn with_sweeper(mut self, sweeper: CacheSweeper) -> Self {
        self.sweeper = Some(sweeper);
        self
    }

    /// Roster currently being polled
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Run one tick using the current time
    pub async fn tick(&mut self) -> TickOutcome {
        self.tick_at(Utc::now()).await
    }

    /// Run one tick, stamping newly seen sessions with `now`
    pub async fn tick_at(&mut self, now: DateTime<Utc>) -> TickOutcome {
        if let Some(roster) = self.mailbox.try_take() {
            if !roster.is_empty() {
                info!(
                    previous = self.roster.len(),
                    members = roster.len(),
                    "[StatusPoller] Roster replaced"
                );
                self.roster = roster;
                return TickOutcome::RosterReplaced {
                    members: self.roster.len(),
                };
            }
            warn!("[StatusPoller] Ignoring empty roster snapshot");
        }

        if self.roster.is_empty() {
            return TickOutcome::Idle;
        }

        let roster = self.roster.clone();
        let ids = roster_ids(&roster);

        let sessions = match self.status.fetch_active(&ids).await {
            Ok(sessions) => sessions,
            Err(e) => {
                warn!(
                    error = %e,
                    timeout = e.is_timeout(),
                    "[StatusPoller] Status fetch failed, waiting for next tick"
                );
                return TickOutcome::FetchFailed;
            }
        };

        let mut notified = Vec::new();
        for session in &sessions {
            if !self.cache.insert_if_absent(&session.session_id, now) {
                continue;
            }

            info!(
                member_id = %session.member_id,
                session_id = %session.session_id,
                "[StatusPoller] New game detected"
            );
            let report = self.fanout.notify(&session.session_id).await;
            debug!(
                session_id = %session.session_id,
                delivered = report.delivered,
                failed = report.failed,
                "[StatusPoller] Fanout complete"
            );
            notified.push(session.session_id.clone());
        }

        TickOutcome::Polled {
            active: sessions.len(),
            notified,
        }
    }

    /// Spawn the poll loop (and its cache sweeper). Runs until aborted.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn run(mut self) {
        let _sweeper = self.sweeper.take().map(|s| AbortOnDrop(s.spawn()));

        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            interval_secs = self.interval.as_secs(),
            members = self.roster.len(),
            "[StatusPoller] Started"
        );

        loop {
            interval.tick().await;
            self.tick().await;
        }
    }
}
