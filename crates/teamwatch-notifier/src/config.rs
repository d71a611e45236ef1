//! Notifier configuration
//!
//! Defaults mirror the cadence the bot has always run with; every endpoint
//! is overridable so tests can point the clients at a mock server.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Interval between status polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(6);

/// Interval between roster refreshes
pub const DEFAULT_ROSTER_REFRESH_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Interval between dedup cache sweeps
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(30 * 60);

/// How long a seen session suppresses repeat notifications
pub const DEFAULT_RETENTION_WINDOW: Duration = Duration::from_secs(60 * 60);

/// Per-request timeout for platform calls
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Runtime configuration for the notifier and bot.
#[derive(Debug, Clone)]
pub struct NotifierConfig {
    /// Telegram bot token
    pub telegram_token: String,
    /// Telegram Bot API base url
    pub telegram_api_url: String,
    /// Optional Lichess API token (sent as bearer on roster requests)
    pub lichess_token: Option<String>,
    /// Lichess API base url
    pub lichess_api_url: String,
    /// Lichess team slug whose members are tracked
    pub team_id: String,
    /// Player ids tracked in addition to the team roster
    pub extra_members: Vec<String>,
    /// Prefix prepended to a game id to build the notification link
    pub game_base_url: String,
    /// Recipient allowed to run maintenance commands
    pub admin_id: Option<i64>,
    /// SQLite database location (None = platform default)
    pub database_path: Option<PathBuf>,
    pub poll_interval: Duration,
    pub roster_refresh_interval: Duration,
    pub sweep_interval: Duration,
    pub retention_window: Duration,
    pub request_timeout: Duration,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            telegram_token: String::new(),
            telegram_api_url: "https://api.telegram.org".to_string(),
            lichess_token: None,
            lichess_api_url: "https://lichess.org".to_string(),
            team_id: "nyumbani-mates".to_string(),
            extra_members: Vec::new(),
            game_base_url: "https://lichess.org/".to_string(),
            admin_id: None,
            database_path: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            roster_refresh_interval: DEFAULT_ROSTER_REFRESH_INTERVAL,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            retention_window: DEFAULT_RETENTION_WINDOW,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl NotifierConfig {
    /// Build the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        config.telegram_token = get("TG_BOT_TOKEN").ok_or(ConfigError::Missing("TG_BOT_TOKEN"))?;

        if let Some(url) = get("TELEGRAM_API_URL") {
            config.telegram_api_url = url;
        }
        config.lichess_token = get("LICHESS_TOKEN");
        if let Some(url) = get("LICHESS_API_URL") {
            config.lichess_api_url = url;
        }
        if let Some(team) = get("LICHESS_TEAM") {
            config.team_id = team;
        }
        if let Some(extra) = get("TEAMWATCH_EXTRA_MEMBERS") {
            config.extra_members = extra
                .split(',')
                .map(|id| id.trim().to_lowercase())
                .filter(|id| !id.is_empty())
                .collect();
        }
        if let Some(base) = get("GAME_BASE_URL") {
            config.game_base_url = base;
        }
        if let Some(raw) = get("TEAMWATCH_ADMIN_ID") {
            let id = raw.parse::<i64>().map_err(|_| ConfigError::Invalid {
                name: "TEAMWATCH_ADMIN_ID",
                value: raw.clone(),
            })?;
            config.admin_id = Some(id);
        }
        config.database_path = get("TEAMWATCH_DB").map(PathBuf::from);

        Ok(config)
    }

    /// Team members endpoint (NDJSON)
    pub fn team_members_url(&self) -> String {
        format!(
            "{}/api/team/{}/users",
            self.lichess_api_url.trim_end_matches('/'),
            self.team_id
        )
    }

    /// Batched user status endpoint
    pub fn status_url(&self) -> String {
        format!("{}/api/users/status", self.lichess_api_url.trim_end_matches('/'))
    }
}
