use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::types::{ApiResponse, SendMessageRequest, Update};
use crate::error::TransportError;
use crate::transport::MessageTransport;

/// Slack added on top of the long-poll window before the HTTP call times out
const LONG_POLL_GRACE: Duration = Duration::from_secs(10);

/// Client for the Telegram Bot API
pub struct TelegramClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl TelegramClient {
    /// Create a client for `token` against `api_url` (normally `https://api.telegram.org`)
    pub fn new(api_url: &str, token: &str, timeout: Duration) -> Result<Self, TransportError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(crate::USER_AGENT)
            .build()?;

        Ok(Self::with_client(http_client, api_url, token))
    }

    /// Create with a custom HTTP client (useful for testing)
    pub fn with_client(http_client: reqwest::Client, api_url: &str, token: &str) -> Self {
        Self {
            http_client,
            base_url: format!("{}/bot{}", api_url.trim_end_matches('/'), token),
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/{}", self.base_url, method)
    }

    async fn read_response<T>(response: reqwest::Response) -> Result<T, TransportError>
    where
        T: serde::de::DeserializeOwned,
    {
        let status = response.status();
        let body: ApiResponse<T> = response.json().await?;

        match body {
            ApiResponse {
                ok: true,
                result: Some(result),
                ..
            } => Ok(result),
            ApiResponse { description, .. } => Err(TransportError::Rejected {
                status,
                description: description.unwrap_or_else(|| "no description".to_string()),
            }),
        }
    }

    /// Long-poll for updates newer than `offset`.
    ///
    /// Blocks server side for up to `long_poll` when nothing is pending.
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        long_poll: Duration,
    ) -> Result<Vec<Update>, TransportError> {
        let mut query: Vec<(&str, String)> = vec![
            ("timeout", long_poll.as_secs().to_string()),
            ("allowed_updates", r#"["message"]"#.to_string()),
        ];
        if let Some(offset) = offset {
            query.push(("offset", offset.to_string()));
        }

        let response = self
            .http_client
            .get(self.method_url("getUpdates"))
            .query(&query)
            .timeout(long_poll + LONG_POLL_GRACE)
            .send()
            .await?;

        Self::read_response(response).await
    }
}

#[async_trait]
impl MessageTransport for TelegramClient {
    async fn send(&self, recipient_id: i64, text: &str) -> Result<(), TransportError> {
        let response = self
            .http_client
            .post(self.method_url("sendMessage"))
            .json(&SendMessageRequest {
                chat_id: recipient_id,
                text,
                disable_web_page_preview: false,
            })
            .send()
            .await?;

        let _: serde_json::Value = Self::read_response(response).await?;
        debug!(recipient_id, "[Telegram] Message delivered");
        Ok(())
    }
}
