//! Telegram adapter (teloxide).
//!
//! This crate implements the `chatguard-core` ports over the Telegram Bot API.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use teloxide::{
    prelude::*,
    types::{ChatMemberKind, ChatPermissions, ParseMode},
};

use tokio::time::sleep;

pub mod handlers;
pub mod router;

use chatguard_core::{
    domain::{ChatId, ChatRole, MessageId, MessageRef, UserId, UserRef},
    errors::Error,
    messaging::port::MessagingPort,
    ports::ChatAdminPort,
    Result,
};

fn tg_chat(chat_id: ChatId) -> teloxide::types::ChatId {
    teloxide::types::ChatId(chat_id.0)
}

fn tg_user(user_id: UserId) -> teloxide::types::UserId {
    teloxide::types::UserId(user_id.0 as u64)
}

fn tg_msg_id(message_id: MessageId) -> teloxide::types::MessageId {
    teloxide::types::MessageId(message_id.0)
}

pub(crate) fn user_ref(user: &teloxide::types::User) -> UserRef {
    UserRef::new(user.id.0 as i64, user.full_name())
}

/// API errors are the service refusing the request; everything else is transport.
pub(crate) fn map_request_error(e: teloxide::RequestError) -> Error {
    match e {
        teloxide::RequestError::Api(api) => Error::Rejected(api.to_string()),
        migrated @ teloxide::RequestError::MigrateToChatId(_) => {
            Error::Rejected(migrated.to_string())
        }
        other => Error::Transport(format!("telegram error: {other}")),
    }
}

fn role_from_kind(kind: &ChatMemberKind) -> ChatRole {
    match kind {
        ChatMemberKind::Owner(_) => ChatRole::Owner,
        ChatMemberKind::Administrator(_) => ChatRole::Administrator,
        ChatMemberKind::Member => ChatRole::Member,
        ChatMemberKind::Restricted(_) => ChatRole::Restricted,
        ChatMemberKind::Left => ChatRole::Left,
        ChatMemberKind::Banned(_) => ChatRole::Banned,
    }
}

fn send_permissions(can_send: bool) -> ChatPermissions {
    if can_send {
        ChatPermissions::SEND_MESSAGES
            | ChatPermissions::SEND_MEDIA_MESSAGES
            | ChatPermissions::SEND_POLLS
            | ChatPermissions::SEND_OTHER_MESSAGES
            | ChatPermissions::ADD_WEB_PAGE_PREVIEWS
    } else {
        ChatPermissions::empty()
    }
}

#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    /// Outgoing messages get one retry on flood control; mutations never go through here.
    async fn with_retry<T, Fut>(&self, mut op: impl FnMut() -> Fut) -> Result<T>
    where
        Fut: std::future::IntoFuture<Output = std::result::Result<T, teloxide::RequestError>>,
        Fut::IntoFuture: Send,
    {
        const MAX_RETRIES: usize = 1;
        let mut attempts = 0usize;
        loop {
            match op().await {
                Ok(v) => return Ok(v),
                Err(e) => match e {
                    teloxide::RequestError::RetryAfter(d) if attempts < MAX_RETRIES => {
                        attempts += 1;
                        sleep(d).await;
                        continue;
                    }
                    other => return Err(map_request_error(other)),
                },
            }
        }
    }
}

#[async_trait]
impl MessagingPort for TelegramMessenger {
    async fn send_html(&self, chat_id: ChatId, html: &str) -> Result<MessageRef> {
        let msg = self
            .with_retry(|| {
                self.bot
                    .send_message(tg_chat(chat_id), html.to_string())
                    .parse_mode(ParseMode::Html)
            })
            .await?;

        Ok(MessageRef {
            chat_id,
            message_id: MessageId(msg.id.0),
        })
    }

    async fn reply_html(&self, to: MessageRef, html: &str) -> Result<MessageRef> {
        let msg = self
            .with_retry(|| {
                self.bot
                    .send_message(tg_chat(to.chat_id), html.to_string())
                    .parse_mode(ParseMode::Html)
                    .reply_to_message_id(tg_msg_id(to.message_id))
            })
            .await?;

        Ok(MessageRef {
            chat_id: to.chat_id,
            message_id: MessageId(msg.id.0),
        })
    }
}

/// Membership queries and mutations over the Bot API.
#[derive(Clone)]
pub struct TelegramChatAdmin {
    bot: Bot,
}

impl TelegramChatAdmin {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl ChatAdminPort for TelegramChatAdmin {
    async fn get_role(&self, chat_id: ChatId, user_id: UserId) -> Result<ChatRole> {
        let member = self
            .bot
            .get_chat_member(tg_chat(chat_id), tg_user(user_id))
            .await
            .map_err(map_request_error)?;
        Ok(role_from_kind(&member.kind))
    }

    async fn ban_user(&self, chat_id: ChatId, user_id: UserId) -> Result<()> {
        self.bot
            .ban_chat_member(tg_chat(chat_id), tg_user(user_id))
            .await
            .map_err(map_request_error)?;
        Ok(())
    }

    async fn unban_user(
        &self,
        chat_id: ChatId,
        user_id: UserId,
        only_if_banned: bool,
    ) -> Result<()> {
        self.bot
            .unban_chat_member(tg_chat(chat_id), tg_user(user_id))
            .only_if_banned(only_if_banned)
            .await
            .map_err(map_request_error)?;
        Ok(())
    }

    async fn restrict(
        &self,
        chat_id: ChatId,
        user_id: UserId,
        until: Option<DateTime<Utc>>,
        can_send: bool,
    ) -> Result<()> {
        let mut req = self.bot.restrict_chat_member(
            tg_chat(chat_id),
            tg_user(user_id),
            send_permissions(can_send),
        );
        if let Some(until) = until {
            req = req.until_date(until);
        }
        req.await.map_err(map_request_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use teloxide::ApiError;

    #[test]
    fn api_errors_are_rejections() {
        let err = map_request_error(teloxide::RequestError::Api(ApiError::BotBlocked));
        assert!(err.is_rejected());
        assert!(!err.is_transport());
    }

    #[test]
    fn maps_unit_member_kinds() {
        assert_eq!(role_from_kind(&ChatMemberKind::Member), ChatRole::Member);
        assert_eq!(role_from_kind(&ChatMemberKind::Left), ChatRole::Left);
    }

    #[test]
    fn mute_clears_every_send_permission() {
        assert!(send_permissions(false).is_empty());
        let full = send_permissions(true);
        assert!(full.contains(ChatPermissions::SEND_MESSAGES));
        assert!(full.contains(ChatPermissions::SEND_OTHER_MESSAGES));
        assert!(!full.contains(ChatPermissions::PIN_MESSAGES));
    }
}
