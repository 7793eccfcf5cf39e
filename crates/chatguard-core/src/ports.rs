use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    domain::{ChatId, ChatRole, UserId},
    Result,
};

/// Membership queries and mutations on the remote chat service.
///
/// Implementations must not retry mutations; a failure is reported as-is.
#[async_trait]
pub trait ChatAdminPort: Send + Sync {
    async fn get_role(&self, chat_id: ChatId, user_id: UserId) -> Result<ChatRole>;

    /// Ban permanently (no expiry).
    async fn ban_user(&self, chat_id: ChatId, user_id: UserId) -> Result<()>;

    async fn unban_user(&self, chat_id: ChatId, user_id: UserId, only_if_banned: bool)
        -> Result<()>;

    /// Set the user's send-message capability, optionally until `until`.
    async fn restrict(
        &self,
        chat_id: ChatId,
        user_id: UserId,
        until: Option<DateTime<Utc>>,
        can_send: bool,
    ) -> Result<()>;
}
