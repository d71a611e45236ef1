//! Update Listener - long-polls the Bot API and answers commands

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::CommandDispatcher;
use crate::error::TransportError;
use crate::telegram::{TelegramClient, Update};
use crate::transport::MessageTransport;

/// Server-side wait for each `getUpdates` call
const DEFAULT_LONG_POLL: Duration = Duration::from_secs(60);

/// Pause after a failed `getUpdates` before trying again
const ERROR_BACKOFF: Duration = Duration::from_secs(5);

pub struct UpdateListener {
    client: Arc<TelegramClient>,
    dispatcher: Arc<CommandDispatcher>,
    long_poll: Duration,
    offset: Option<i64>,
}

impl UpdateListener {
    pub fn new(client: Arc<TelegramClient>, dispatcher: Arc<CommandDispatcher>) -> Self {
        Self {
            client,
            dispatcher,
            long_poll: DEFAULT_LONG_POLL,
            offset: None,
        }
    }

    pub fn with_long_poll(mut self, long_poll: Duration) -> Self {
        self.long_poll = long_poll;
        self
    }

    /// Next update id to request
    pub fn offset(&self) -> Option<i64> {
        self.offset
    }

    /// Fetch one batch of updates and answer every command in it.
    ///
    /// Returns how many updates were consumed. The offset advances past every
    /// update, including ones that are not commands or whose reply failed.
    pub async fn poll_once(&mut self) -> Result<usize, TransportError> {
        let updates = self.client.get_updates(self.offset, self.long_poll).await?;

        for update in &updates {
            self.offset = Some(update.update_id + 1);
            self.handle_update(update).await;
        }

        Ok(updates.len())
    }

    async fn handle_update(&self, update: &Update) {
        let Some(message) = &update.message else {
            return;
        };
        let Some(text) = message.text.as_deref() else {
            return;
        };

        let sender_id = message.sender_id();
        let Some(reply) = self.dispatcher.dispatch(sender_id, text).await else {
            debug!(update_id = update.update_id, "[Listener] Ignoring non-command message");
            return;
        };

        if let Err(e) = self.client.send(message.chat.id, &reply).await {
            warn!(chat_id = message.chat.id, error = %e, "[Listener] Failed to send reply");
        }
    }

    /// Spawn the listen loop. Runs until aborted.
    pub fn spawn(mut self) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!(
                long_poll_secs = self.long_poll.as_secs(),
                "[Listener] Started"
            );

            loop {
                if let Err(e) = self.poll_once().await {
                    warn!(error = %e, "[Listener] getUpdates failed, backing off");
                    tokio::time::sleep(ERROR_BACKOFF).await;
                }
            }
        })
    }
}
