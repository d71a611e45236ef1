//! Batched user status fetcher
//!
//! One GET per tick for the whole roster:
//! `/api/users/status?ids=a,b,c&withGameIds=true`

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use teamwatch_core::ActiveSession;
use tracing::debug;
use url::Url;

use super::StatusSource;
use crate::error::FetchError;

/// Status entry returned for each queried user
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStatus {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub online: bool,
    #[serde(default)]
    pub playing: bool,
    /// Current game id; absent or empty when not playing
    #[serde(default)]
    pub playing_id: Option<String>,
}

impl PlayerStatus {
    fn into_active_session(self) -> Option<ActiveSession> {
        match self.playing_id {
            Some(game_id) if !game_id.is_empty() => Some(ActiveSession::new(self.id, game_id)),
            _ => None,
        }
    }
}

/// Build the batched status url, or `None` when there is nothing to query.
pub fn build_status_url(status_endpoint: &str, member_ids: &[&str]) -> Result<Option<Url>, FetchError> {
    if member_ids.is_empty() {
        return Ok(None);
    }

    let mut url = Url::parse(status_endpoint)?;
    url.query_pairs_mut()
        .append_pair("ids", &member_ids.join(","))
        .append_pair("withGameIds", "true");

    Ok(Some(url))
}

/// Fetches live status for a batch of members
pub struct StatusFetcher {
    http_client: reqwest::Client,
    status_endpoint: String,
}

impl StatusFetcher {
    /// Create a fetcher with its own client bounded by `timeout`
    pub fn new(status_endpoint: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(crate::USER_AGENT)
            .build()
            .map_err(FetchError::Request)?;

        Ok(Self::with_client(http_client, status_endpoint))
    }

    /// Create with a custom HTTP client (useful for testing)
    pub fn with_client(http_client: reqwest::Client, status_endpoint: impl Into<String>) -> Self {
        Self {
            http_client,
            status_endpoint: status_endpoint.into(),
        }
    }
}

#[async_trait]
impl StatusSource for StatusFetcher {
    async fn fetch_active(&self, member_ids: &[&str]) -> Result<Vec<ActiveSession>, FetchError> {
        let Some(url) = build_status_url(&self.status_endpoint, member_ids)? else {
            return Ok(Vec::new());
        };

        let response = self
            .http_client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let statuses: Vec<PlayerStatus> = response.json().await?;

        debug!(
            queried = member_ids.len(),
            returned = statuses.len(),
            "[StatusFetcher] Fetched member statuses"
        );

        Ok(statuses
            .into_iter()
            .filter_map(PlayerStatus::into_active_session)
            .collect())
    }
}
