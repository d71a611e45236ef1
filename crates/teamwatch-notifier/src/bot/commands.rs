//! Chat command handling
//!
//! The dispatcher turns one incoming command into at most one reply. It never
//! talks to the transport itself except through the fanout, for the admin
//! maintenance broadcast.

use std::sync::Arc;

use teamwatch_core::SubscriberRepository;
use tracing::{debug, error, info, warn};

use super::MaintenanceMode;
use crate::polling::{DedupCache, NotificationFanout};

pub const START_TEXT: &str = "You will now receive a link to every game a team member starts. \
Type /stop to stop receiving notifications.";

pub const ALREADY_SUBSCRIBED_TEXT: &str =
    "You are already subscribed. Type /stop to stop receiving notifications.";

pub const STOP_TEXT: &str =
    "Sorry to see you leave. You won't receive notifications anymore. Type /start to subscribe again.";

pub const HELP_TEXT: &str = "/start - receive game links\n\
/stop - stop receiving game links\n\
/subscribers - number of subscribers\n\
/cache - number of games seen in the last hour";

pub const UNKNOWN_TEXT: &str = "I don't know that command";

pub const MAINTENANCE_TEXT: &str =
    "The bot is under maintenance. Notifications will resume shortly.";

pub const FAILURE_TEXT: &str = "Something went wrong, please try again later.";

/// A parsed chat command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Stop,
    Subscribers,
    Cache,
    /// Admin: enter maintenance mode and broadcast the text
    Maintenance(String),
    /// Admin: leave maintenance mode
    Resume,
    Help,
    Unknown(String),
}

impl Command {
    /// Parse a message text. Returns `None` when the text is not a command.
    ///
    /// Accepts the `/name@botname args` form group chats produce.
    pub fn parse(text: &str) -> Option<Self> {
        let rest = text.trim().strip_prefix('/')?;
        let (head, args) = match rest.split_once(char::is_whitespace) {
            Some((head, args)) => (head, args.trim()),
            None => (rest, ""),
        };
        let name = head
            .split_once('@')
            .map_or(head, |(name, _)| name)
            .to_ascii_lowercase();

        let command = match name.as_str() {
            "start" => Command::Start,
            "stop" => Command::Stop,
            // "team" and "map" are the names the bot launched with
            "subscribers" | "team" => Command::Subscribers,
            "cache" | "map" => Command::Cache,
            "maintenance" => Command::Maintenance(args.to_string()),
            "resume" => Command::Resume,
            "help" => Command::Help,
            _ => Command::Unknown(name),
        };
        Some(command)
    }

    fn is_admin_only(&self) -> bool {
        matches!(self, Command::Maintenance(_) | Command::Resume)
    }
}

pub struct CommandDispatcher {
    subscribers: Arc<dyn SubscriberRepository>,
    cache: Arc<DedupCache>,
    fanout: Arc<NotificationFanout>,
    maintenance: MaintenanceMode,
    admin_id: Option<i64>,
}

impl CommandDispatcher {
    pub fn new(
        subscribers: Arc<dyn SubscriberRepository>,
        cache: Arc<DedupCache>,
        fanout: Arc<NotificationFanout>,
        maintenance: MaintenanceMode,
        admin_id: Option<i64>,
    ) -> Self {
        Self {
            subscribers,
            cache,
            fanout,
            maintenance,
            admin_id,
        }
    }

    pub fn maintenance(&self) -> &MaintenanceMode {
        &self.maintenance
    }

    fn is_admin(&self, sender_id: i64) -> bool {
        self.admin_id == Some(sender_id)
    }

    /// Handle a raw message text from `sender_id`. Non-command text is ignored.
    pub async fn dispatch(&self, sender_id: i64, text: &str) -> Option<String> {
        let command = Command::parse(text)?;
        Some(self.handle(sender_id, command).await)
    }

    /// Handle a parsed command, returning the reply text
    pub async fn handle(&self, sender_id: i64, command: Command) -> String {
        let is_admin = self.is_admin(sender_id);

        if command.is_admin_only() && !is_admin {
            warn!(sender_id, ?command, "[Bot] Admin command from non-admin");
            return UNKNOWN_TEXT.to_string();
        }

        if self.maintenance.is_enabled() && !is_admin {
            debug!(sender_id, "[Bot] Command during maintenance");
            return MAINTENANCE_TEXT.to_string();
        }

        match command {
            Command::Start => self.start(sender_id).await,
            Command::Stop => match self.subscribers.deactivate(sender_id).await {
                Ok(()) => {
                    info!(sender_id, "[Bot] Subscriber deactivated");
                    STOP_TEXT.to_string()
                }
                Err(e) => {
                    error!(sender_id, error = %e, "[Bot] Failed to deactivate subscriber");
                    FAILURE_TEXT.to_string()
                }
            },
            Command::Subscribers => match self.subscribers.count_active().await {
                Ok(count) => format!("There are {} subscribers", count),
                Err(e) => {
                    error!(error = %e, "[Bot] Failed to count subscribers");
                    FAILURE_TEXT.to_string()
                }
            },
            Command::Cache => format!("There are {} games in the cache", self.cache.len()),
            Command::Maintenance(text) => self.enter_maintenance(sender_id, &text).await,
            Command::Resume => {
                if self.maintenance.set(false) {
                    info!("[Bot] Maintenance mode disabled");
                    "Maintenance mode disabled".to_string()
                } else {
                    "Maintenance mode was not enabled".to_string()
                }
            }
            Command::Help => HELP_TEXT.to_string(),
            Command::Unknown(name) => {
                debug!(sender_id, command = %name, "[Bot] Unknown command");
                UNKNOWN_TEXT.to_string()
            }
        }
    }

    async fn start(&self, sender_id: i64) -> String {
        match self.subscribers.get(sender_id).await {
            Ok(Some(subscriber)) if subscriber.is_active => {
                debug!(sender_id, "[Bot] Already subscribed");
                return ALREADY_SUBSCRIBED_TEXT.to_string();
            }
            Ok(_) => {}
            Err(e) => {
                error!(sender_id, error = %e, "[Bot] Failed to look up subscriber");
                return FAILURE_TEXT.to_string();
            }
        }

        match self.subscribers.activate(sender_id).await {
            Ok(()) => {
                info!(sender_id, "[Bot] Subscriber activated");
                START_TEXT.to_string()
            }
            Err(e) => {
                error!(sender_id, error = %e, "[Bot] Failed to activate subscriber");
                FAILURE_TEXT.to_string()
            }
        }
    }

    async fn enter_maintenance(&self, admin_id: i64, text: &str) -> String {
        if text.is_empty() {
            return "Usage: /maintenance <message to broadcast>".to_string();
        }

        self.maintenance.set(true);
        let report = self.fanout.broadcast(text, Some(admin_id)).await;
        info!(
            delivered = report.delivered,
            failed = report.failed,
            "[Bot] Maintenance mode enabled, notice broadcast"
        );

        format!(
            "Maintenance mode enabled. Notice sent to {} subscribers ({} failed)",
            report.delivered, report.failed
        )
    }
}
