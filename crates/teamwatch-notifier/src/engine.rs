//! Notifier engine
//!
//! Wires the roster refresher, status poller and cache sweeper around one
//! shared dedup cache and one roster mailbox, and owns their tasks.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use teamwatch_core::{MemberRepository, SubscriberRepository};
use tokio::task::JoinHandle;
use tracing::info;

use crate::config::NotifierConfig;
use crate::lichess::{RosterSource, StatusSource};
use crate::polling::{
    roster_mailbox, CacheSweeper, DedupCache, NotificationFanout, RosterRefresher, StatusPoller,
};
use crate::transport::MessageTransport;

/// Everything the engine talks to
#[derive(Clone)]
pub struct NotifierDependencies {
    pub member_repo: Arc<dyn MemberRepository>,
    pub subscriber_repo: Arc<dyn SubscriberRepository>,
    pub status_source: Arc<dyn StatusSource>,
    pub roster_source: Arc<dyn RosterSource>,
    pub transport: Arc<dyn MessageTransport>,
}

/// Builder for [`NotifierDependencies`]
#[derive(Default)]
pub struct DependenciesBuilder {
    member_repo: Option<Arc<dyn MemberRepository>>,
    subscriber_repo: Option<Arc<dyn SubscriberRepository>>,
    status_source: Option<Arc<dyn StatusSource>>,
    roster_source: Option<Arc<dyn RosterSource>>,
    transport: Option<Arc<dyn MessageTransport>>,
}

impl DependenciesBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_member_repo(mut self, repo: Arc<dyn MemberRepository>) -> Self {
        self.member_repo = Some(repo);
        self
    }

    pub fn with_subscriber_repo(mut self, repo: Arc<dyn SubscriberRepository>) -> Self {
        self.subscriber_repo = Some(repo);
        self
    }

    pub fn with_status_source(mut self, source: Arc<dyn StatusSource>) -> Self {
        self.status_source = Some(source);
        self
    }

    pub fn with_roster_source(mut self, source: Arc<dyn RosterSource>) -> Self {
        self.roster_source = Some(source);
        self
    }

    pub fn with_transport(mut self, transport: Arc<dyn MessageTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn build(self) -> Result<NotifierDependencies> {
        Ok(NotifierDependencies {
            member_repo: self
                .member_repo
                .ok_or_else(|| anyhow!("member_repo is required"))?,
            subscriber_repo: self
                .subscriber_repo
                .ok_or_else(|| anyhow!("subscriber_repo is required"))?,
            status_source: self
                .status_source
                .ok_or_else(|| anyhow!("status_source is required"))?,
            roster_source: self
                .roster_source
                .ok_or_else(|| anyhow!("roster_source is required"))?,
            transport: self
                .transport
                .ok_or_else(|| anyhow!("transport is required"))?,
        })
    }
}

/// Running notifier. Dropping it stops every loop.
pub struct NotifierEngine {
    cache: Arc<DedupCache>,
    fanout: Arc<NotificationFanout>,
    tasks: Vec<JoinHandle<()>>,
}

impl NotifierEngine {
    /// Spawn the refresher and the poller (which owns the sweeper).
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(config: &NotifierConfig, deps: NotifierDependencies) -> Self {
        let cache = Arc::new(DedupCache::new());
        let fanout = Arc::new(NotificationFanout::new(
            deps.subscriber_repo.clone(),
            deps.transport.clone(),
            config.game_base_url.clone(),
        ));
        let (publisher, mailbox) = roster_mailbox();

        let refresher = RosterRefresher::new(
            deps.roster_source.clone(),
            deps.member_repo.clone(),
            publisher,
            config.roster_refresh_interval,
        );

        let sweeper = CacheSweeper::new(
            cache.clone(),
            config.sweep_interval,
            config.retention_window,
        );
        let poller = StatusPoller::new(
            cache.clone(),
            deps.status_source.clone(),
            fanout.clone(),
            mailbox,
            config.poll_interval,
        )
        .with_sweeper(sweeper);

        let tasks = vec![refresher.spawn(), poller.spawn()];

        info!(
            team = %config.team_id,
            poll_secs = config.poll_interval.as_secs(),
            refresh_secs = config.roster_refresh_interval.as_secs(),
            "[Engine] Notifier started"
        );

        Self {
            cache,
            fanout,
            tasks,
        }
    }

    /// Dedup cache shared with the poller and sweeper
    pub fn cache(&self) -> Arc<DedupCache> {
        self.cache.clone()
    }

    /// Fanout used for game links (reused for admin broadcasts)
    pub fn fanout(&self) -> Arc<NotificationFanout> {
        self.fanout.clone()
    }

    /// Stop every loop and wait for the tasks to finish
    pub async fn shutdown(mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
            // Aborted tasks resolve with a cancellation error
            let _ = task.await;
        }
        info!("[Engine] Notifier stopped");
    }
}

impl Drop for NotifierEngine {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}
