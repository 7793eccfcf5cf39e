use async_trait::async_trait;

use crate::{
    domain::{ChatId, MessageRef},
    Result,
};

/// Outbound messaging port.
///
/// Telegram is the only implementation; tests substitute a recording fake.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    /// Send an HTML message to a chat (a private chat when `chat_id` is a user id).
    async fn send_html(&self, chat_id: ChatId, html: &str) -> Result<MessageRef>;

    /// Reply to a specific message in its chat.
    async fn reply_html(&self, to: MessageRef, html: &str) -> Result<MessageRef>;
}
