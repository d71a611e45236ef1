//! Telegram Bot API client
//!
//! Only the two calls the bot needs: `sendMessage` (the outbound transport)
//! and long-polling `getUpdates` (inbound commands).

mod client;
mod types;

pub use client::TelegramClient;
pub use types::{Chat, Message, Update, User};
