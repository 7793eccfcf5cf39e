/// Telegram user id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UserId(pub i64);

/// Telegram chat id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

/// Telegram message id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageId(pub i32);

/// A stable reference to a Telegram message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageRef {
    pub chat_id: ChatId,
    pub message_id: MessageId,
}

/// A user as seen in an incoming message: id plus the name used for mentions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserRef {
    pub id: UserId,
    pub display_name: String,
}

impl UserRef {
    pub fn new(id: i64, display_name: impl Into<String>) -> Self {
        Self {
            id: UserId(id),
            display_name: display_name.into(),
        }
    }
}

/// Membership standing of a user in a chat.
///
/// Always read fresh from the remote service; never cached locally.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChatRole {
    Member,
    Administrator,
    Owner,
    Restricted,
    Left,
    Banned,
}

impl ChatRole {
    pub fn is_admin(self) -> bool {
        matches!(self, ChatRole::Administrator | ChatRole::Owner)
    }
}
