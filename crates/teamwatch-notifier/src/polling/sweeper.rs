//! Cache Sweeper - periodic eviction of expired dedup records

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use super::DedupCache;

pub struct CacheSweeper {
    cache: Arc<DedupCache>,
    interval: Duration,
    retention: Duration,
}

impl CacheSweeper {
    pub fn new(cache: Arc<DedupCache>, interval: Duration, retention: Duration) -> Self {
        Self {
            cache,
            interval,
            retention,
        }
    }

    /// Evict records older than the retention window at `now`
    pub fn sweep_at(&self, now: DateTime<Utc>) -> usize {
        let evicted = self.cache.evict_older_than(self.retention, now);
        if evicted > 0 {
            info!(
                evicted,
                remaining = self.cache.len(),
                "[CacheSweeper] Evicted expired sessions"
            );
        } else {
            debug!(remaining = self.cache.len(), "[CacheSweeper] Nothing to evict");
        }
        evicted
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(self.interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // First tick completes immediately; the cache is empty at startup
            interval.tick().await;

            loop {
                interval.tick().await;
                self.sweep_at(Utc::now());
            }
        })
    }
}
