//! Notification Fanout
//!
//! Delivers one game link per active subscriber. Subscribers are looked up
//! on every call so (un)subscribes take effect on the next game.

use std::sync::Arc;

use teamwatch_core::SubscriberRepository;
use tracing::{debug, error, info, warn};

use crate::transport::MessageTransport;

/// Outcome of one fanout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FanoutReport {
    pub delivered: usize,
    pub failed: usize,
}

pub struct NotificationFanout {
    subscribers: Arc<dyn SubscriberRepository>,
    transport: Arc<dyn MessageTransport>,
    game_base_url: String,
}

impl NotificationFanout {
    pub fn new(
        subscribers: Arc<dyn SubscriberRepository>,
        transport: Arc<dyn MessageTransport>,
        game_base_url: impl Into<String>,
    ) -> Self {
        Self {
            subscribers,
            transport,
            game_base_url: game_base_url.into(),
        }
    }

    /// Link sent for a session
    pub fn session_link(&self, session_id: &str) -> String {
        format!("{}{}", self.game_base_url, session_id)
    }

    /// Notify every active subscriber about `session_id`.
    ///
    /// A failed send is logged and does not stop delivery to the others.
    pub async fn notify(&self, session_id: &str) -> FanoutReport {
        let text = self.session_link(session_id);
        self.broadcast(&text, None).await
    }

    /// Send `text` to every active subscriber except `skip`.
    pub async fn broadcast(&self, text: &str, skip: Option<i64>) -> FanoutReport {
        let mut report = FanoutReport::default();

        let recipients = match self.subscribers.list_active_ids().await {
            Ok(ids) => ids,
            Err(e) => {
                error!(error = %e, "[Fanout] Failed to load active subscribers");
                return report;
            }
        };

        for recipient_id in recipients.into_iter().filter(|id| Some(*id) != skip) {
            match self.transport.send(recipient_id, text).await {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    warn!(recipient_id, error = %e, "[Fanout] Delivery failed, continuing");
                    report.failed += 1;
                }
            }
        }

        if report.failed > 0 {
            info!(
                delivered = report.delivered,
                failed = report.failed,
                "[Fanout] Broadcast finished with failures"
            );
        } else {
            debug!(delivered = report.delivered, "[Fanout] Broadcast finished");
        }

        report
    }
}
