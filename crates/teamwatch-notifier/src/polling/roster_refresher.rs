//! Roster Refresher
//!
//! Periodically pulls the team roster, persists members not seen before and
//! hands the full roster to the status poller.

use std::sync::Arc;
use std::time::Duration;

use teamwatch_core::{filter_new_members, MemberRepository, Roster, TrackedMember};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use super::RosterPublisher;
use crate::lichess::RosterSource;

/// Result of one refresh
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Roster published to the poller
    Published {
        members: usize,
        inserted: usize,
        failed_inserts: usize,
    },
    /// The source returned no members; nothing published
    EmptyRoster,
    /// The source could not be reached or decoded; nothing published
    FetchFailed,
}

pub struct RosterRefresher {
    source: Arc<dyn RosterSource>,
    members: Arc<dyn MemberRepository>,
    publisher: RosterPublisher,
    interval: Duration,
}

impl RosterRefresher {
    pub fn new(
        source: Arc<dyn RosterSource>,
        members: Arc<dyn MemberRepository>,
        publisher: RosterPublisher,
        interval: Duration,
    ) -> Self {
        Self {
            source,
            members,
            publisher,
            interval,
        }
    }

    /// Fetch, persist new members, publish.
    pub async fn refresh_once(&self) -> RefreshOutcome {
        let fetched = match self.source.fetch_members().await {
            Ok(members) => members,
            Err(e) => {
                warn!(error = %e, "[RosterRefresher] Failed to fetch team members");
                return RefreshOutcome::FetchFailed;
            }
        };

        if fetched.is_empty() {
            // A real team is never empty; keep polling the previous roster
            warn!("[RosterRefresher] Roster source returned no members, keeping current roster");
            return RefreshOutcome::EmptyRoster;
        }

        let (inserted, failed_inserts) = self.persist_new_members(&fetched).await;

        let roster: Roster = fetched.into();
        let members = roster.len();
        self.publisher.publish(roster);

        info!(
            members,
            inserted,
            failed_inserts,
            "[RosterRefresher] Roster published"
        );

        RefreshOutcome::Published {
            members,
            inserted,
            failed_inserts,
        }
    }

    async fn persist_new_members(&self, fetched: &[TrackedMember]) -> (usize, usize) {
        let known = match self.members.list_known_ids().await {
            Ok(ids) => ids,
            Err(e) => {
                error!(
                    error = %e,
                    "[RosterRefresher] Failed to load known members, skipping persistence"
                );
                return (0, 0);
            }
        };

        let new_members = filter_new_members(&known, fetched);
        debug!(
            known = known.len(),
            new = new_members.len(),
            "[RosterRefresher] Diffed roster"
        );

        let mut inserted = 0;
        let mut failed = 0;
        for member in &new_members {
            match self.members.insert(member).await {
                Ok(()) => inserted += 1,
                Err(e) => {
                    error!(
                        member_id = %member.external_id,
                        error = %e,
                        "[RosterRefresher] Failed to insert member"
                    );
                    failed += 1;
                }
            }
        }

        (inserted, failed)
    }

    /// Spawn the refresh loop. The first refresh runs immediately.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(self.interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            info!(
                interval_secs = self.interval.as_secs(),
                "[RosterRefresher] Started"
            );

            loop {
                interval.tick().await;
                self.refresh_once().await;
            }
        })
    }
}
