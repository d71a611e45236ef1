//! Team roster source
//!
//! The team members endpoint streams one JSON object per line (NDJSON).
//! Lines are decoded as they arrive; a malformed line is logged and skipped
//! so a single bad record cannot empty the roster.

use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use serde::Deserialize;
use teamwatch_core::TrackedMember;
use tracing::{debug, warn};

use super::RosterSource;
use crate::error::FetchError;

/// One line of the team members stream
#[derive(Debug, Clone, Deserialize)]
pub struct TeamMemberRecord {
    pub id: String,
    #[serde(alias = "name")]
    pub username: String,
}

impl From<TeamMemberRecord> for TrackedMember {
    fn from(record: TeamMemberRecord) -> Self {
        TrackedMember::new(record.id, record.username)
    }
}

/// Fetches the current team membership
pub struct TeamRosterSource {
    http_client: reqwest::Client,
    members_url: String,
    token: Option<String>,
    extra_members: Vec<String>,
}

impl TeamRosterSource {
    pub fn new(members_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(crate::USER_AGENT)
            .build()
            .map_err(FetchError::Request)?;

        Ok(Self::with_client(http_client, members_url))
    }

    /// Create with a custom HTTP client (useful for testing)
    pub fn with_client(http_client: reqwest::Client, members_url: impl Into<String>) -> Self {
        Self {
            http_client,
            members_url: members_url.into(),
            token: None,
            extra_members: Vec::new(),
        }
    }

    /// Send `Authorization: Bearer <token>` with roster requests
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// Players tracked even though they are not on the team
    pub fn with_extra_members(mut self, extra_members: Vec<String>) -> Self {
        self.extra_members = extra_members;
        self
    }

    /// Add the extra members missing from `members`.
    ///
    /// An empty team fetch stays empty so it is never mistaken for a roster
    /// made of the extras alone.
    fn append_extra_members(&self, members: &mut Vec<TrackedMember>) {
        if members.is_empty() {
            if !self.extra_members.is_empty() {
                warn!("[TeamRoster] Team stream returned no members, not adding extra members");
            }
            return;
        }
        for id in &self.extra_members {
            if !members.iter().any(|m| &m.external_id == id) {
                members.push(TrackedMember::new(id.clone(), id.clone()));
            }
        }
    }

    fn push_line(line: &[u8], members: &mut Vec<TrackedMember>) {
        if line.iter().all(u8::is_ascii_whitespace) {
            return;
        }
        match serde_json::from_slice::<TeamMemberRecord>(line) {
            Ok(record) => members.push(record.into()),
            Err(e) => warn!(error = %e, "[TeamRoster] Skipping malformed member record"),
        }
    }
}

#[async_trait]
impl RosterSource for TeamRosterSource {
    async fn fetch_members(&self) -> Result<Vec<TrackedMember>, FetchError> {
        let mut request = self
            .http_client
            .get(&self.members_url)
            .header("Accept", "application/x-ndjson");

        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let mut members = Vec::new();
        let mut buffer: Vec<u8> = Vec::new();
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            buffer.extend_from_slice(&chunk?);
            while let Some(pos) = buffer.iter().position(|b| *b == b'\n') {
                let line: Vec<u8> = buffer.drain(..=pos).collect();
                Self::push_line(&line, &mut members);
            }
        }
        Self::push_line(&buffer, &mut members);

        self.append_extra_members(&mut members);

        debug!(count = members.len(), "[TeamRoster] Fetched team members");

        Ok(members)
    }
}
