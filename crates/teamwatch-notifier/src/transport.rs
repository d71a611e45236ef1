//! Outbound message transport contract

use async_trait::async_trait;

use crate::error::TransportError;

/// Delivers a text message to a numeric recipient.
#[async_trait]
pub trait MessageTransport: Send + Sync {
    async fn send(&self, recipient_id: i64, text: &str) -> Result<(), TransportError>;
}
