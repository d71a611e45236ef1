//! Subscriber entity - a chat that receives game notifications

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A messaging recipient that opted in to notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscriber {
    /// Numeric recipient id (Telegram chat/user id)
    pub recipient_id: i64,

    /// Whether notifications are currently delivered
    pub is_active: bool,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Subscriber {
    /// Create a new, active subscriber
    pub fn new(recipient_id: i64) -> Self {
        let now = Utc::now();
        Self {
            recipient_id,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}
