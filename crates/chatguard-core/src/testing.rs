//! Recording fakes for the remote ports.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    domain::{ChatId, ChatRole, MessageId, MessageRef, UserId},
    errors::Error,
    messaging::port::MessagingPort,
    ports::ChatAdminPort,
    Result,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AdminCall {
    GetRole(ChatId, UserId),
    Ban(ChatId, UserId),
    Unban(ChatId, UserId, bool),
    Restrict(ChatId, UserId, Option<DateTime<Utc>>, bool),
}

impl AdminCall {
    fn is_mutation(&self) -> bool {
        !matches!(self, AdminCall::GetRole(..))
    }
}

/// Chat admin fake: unknown users are plain members.
#[derive(Default)]
pub struct FakeChatAdmin {
    roles: HashMap<UserId, ChatRole>,
    role_errors: HashMap<UserId, Error>,
    mutation_error: Option<Error>,
    calls: Mutex<Vec<AdminCall>>,
}

impl FakeChatAdmin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_role(mut self, user: UserId, role: ChatRole) -> Self {
        self.roles.insert(user, role);
        self
    }

    pub fn with_role_error(mut self, user: UserId, err: Error) -> Self {
        self.role_errors.insert(user, err);
        self
    }

    /// Every mutation (ban/unban/restrict) fails with `err`.
    pub fn failing_mutations(mut self, err: Error) -> Self {
        self.mutation_error = Some(err);
        self
    }

    pub fn calls(&self) -> Vec<AdminCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn mutations(&self) -> Vec<AdminCall> {
        self.calls()
            .into_iter()
            .filter(AdminCall::is_mutation)
            .collect()
    }

    fn record(&self, call: AdminCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn mutate(&self, call: AdminCall) -> Result<()> {
        self.record(call);
        match &self.mutation_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ChatAdminPort for FakeChatAdmin {
    async fn get_role(&self, chat_id: ChatId, user_id: UserId) -> Result<ChatRole> {
        self.record(AdminCall::GetRole(chat_id, user_id));
        if let Some(err) = self.role_errors.get(&user_id) {
            return Err(err.clone());
        }
        Ok(self
            .roles
            .get(&user_id)
            .copied()
            .unwrap_or(ChatRole::Member))
    }

    async fn ban_user(&self, chat_id: ChatId, user_id: UserId) -> Result<()> {
        self.mutate(AdminCall::Ban(chat_id, user_id))
    }

    async fn unban_user(
        &self,
        chat_id: ChatId,
        user_id: UserId,
        only_if_banned: bool,
    ) -> Result<()> {
        self.mutate(AdminCall::Unban(chat_id, user_id, only_if_banned))
    }

    async fn restrict(
        &self,
        chat_id: ChatId,
        user_id: UserId,
        until: Option<DateTime<Utc>>,
        can_send: bool,
    ) -> Result<()> {
        self.mutate(AdminCall::Restrict(chat_id, user_id, until, can_send))
    }
}

#[derive(Default)]
pub struct FakeMessenger {
    next_id: Mutex<i32>,
    failing_chats: HashSet<ChatId>,
    sends: Mutex<Vec<(ChatId, String)>>,
    replies: Mutex<Vec<(MessageRef, String)>>,
}

impl FakeMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sends (not replies) to `chat_id` fail, like a user who never started the bot.
    pub fn failing_sends_to(mut self, chat_id: ChatId) -> Self {
        self.failing_chats.insert(chat_id);
        self
    }

    pub fn sends(&self) -> Vec<(ChatId, String)> {
        self.sends.lock().unwrap().clone()
    }

    pub fn replies(&self) -> Vec<(MessageRef, String)> {
        self.replies.lock().unwrap().clone()
    }

    fn alloc(&self, chat_id: ChatId) -> MessageRef {
        let mut guard = self.next_id.lock().unwrap();
        *guard += 1;
        MessageRef {
            chat_id,
            message_id: MessageId(*guard),
        }
    }
}

#[async_trait]
impl MessagingPort for FakeMessenger {
    async fn send_html(&self, chat_id: ChatId, html: &str) -> Result<MessageRef> {
        if self.failing_chats.contains(&chat_id) {
            return Err(Error::Rejected(
                "Forbidden: bot can't initiate conversation with a user".to_string(),
            ));
        }
        self.sends.lock().unwrap().push((chat_id, html.to_string()));
        Ok(self.alloc(chat_id))
    }

    async fn reply_html(&self, to: MessageRef, html: &str) -> Result<MessageRef> {
        self.replies.lock().unwrap().push((to, html.to_string()));
        Ok(self.alloc(to.chat_id))
    }
}
