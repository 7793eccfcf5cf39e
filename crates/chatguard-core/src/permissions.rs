use tracing::warn;

use crate::{
    domain::{ChatId, UserId},
    moderation::error::{DeniedParty, ModerationError},
    ports::ChatAdminPort,
    Result,
};

/// Admin checks for the bot and the invoking user.
///
/// Every call hits the remote service: privileges can change between messages.
pub struct PermissionGate<'a> {
    admin: &'a dyn ChatAdminPort,
    bot_id: UserId,
}

impl<'a> PermissionGate<'a> {
    pub fn new(admin: &'a dyn ChatAdminPort, bot_id: UserId) -> Self {
        Self { admin, bot_id }
    }

    /// One role lookup; administrators and owners count as admins.
    pub async fn is_admin(&self, chat_id: ChatId, user_id: UserId) -> Result<bool> {
        let role = self.admin.get_role(chat_id, user_id).await?;
        Ok(role.is_admin())
    }

    pub async fn is_bot_admin(&self, chat_id: ChatId) -> Result<bool> {
        self.is_admin(chat_id, self.bot_id).await
    }

    /// Require both the bot and `actor_id` to be admins of `chat_id`, bot first.
    ///
    /// A failed lookup denies access and is reported as `PermissionLookup`.
    pub async fn check_admin(
        &self,
        chat_id: ChatId,
        actor_id: UserId,
    ) -> std::result::Result<(), ModerationError> {
        let bot_admin = self.is_bot_admin(chat_id).await.map_err(|e| {
            warn!(chat_id = chat_id.0, error = %e, "bot role lookup failed");
            ModerationError::PermissionLookup(e)
        })?;
        if !bot_admin {
            warn!(chat_id = chat_id.0, "bot is not an administrator");
            return Err(ModerationError::PermissionDenied(DeniedParty::Bot));
        }

        let actor_admin = self.is_admin(chat_id, actor_id).await.map_err(|e| {
            warn!(chat_id = chat_id.0, actor = actor_id.0, error = %e, "actor role lookup failed");
            ModerationError::PermissionLookup(e)
        })?;
        if !actor_admin {
            warn!(chat_id = chat_id.0, actor = actor_id.0, "actor is not an administrator");
            return Err(ModerationError::PermissionDenied(DeniedParty::Actor));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ChatRole;
    use crate::errors::Error;
    use crate::testing::{AdminCall, FakeChatAdmin};

    const CHAT: ChatId = ChatId(-100);
    const BOT: UserId = UserId(1);
    const ACTOR: UserId = UserId(2);

    #[tokio::test]
    async fn owners_and_administrators_pass() {
        let admin = FakeChatAdmin::new()
            .with_role(BOT, ChatRole::Administrator)
            .with_role(ACTOR, ChatRole::Owner);
        let gate = PermissionGate::new(&admin, BOT);

        gate.check_admin(CHAT, ACTOR).await.unwrap();
        assert_eq!(
            admin.calls(),
            vec![AdminCall::GetRole(CHAT, BOT), AdminCall::GetRole(CHAT, ACTOR)]
        );
    }

    #[tokio::test]
    async fn bot_check_runs_first_and_short_circuits() {
        let admin = FakeChatAdmin::new()
            .with_role(BOT, ChatRole::Member)
            .with_role(ACTOR, ChatRole::Owner);
        let gate = PermissionGate::new(&admin, BOT);

        let err = gate.check_admin(CHAT, ACTOR).await.unwrap_err();
        assert!(matches!(
            err,
            ModerationError::PermissionDenied(DeniedParty::Bot)
        ));
        assert_eq!(admin.calls(), vec![AdminCall::GetRole(CHAT, BOT)]);
    }

    #[tokio::test]
    async fn bot_denial_wins_even_when_actor_is_not_admin_either() {
        let admin = FakeChatAdmin::new();
        let gate = PermissionGate::new(&admin, BOT);

        let err = gate.check_admin(CHAT, ACTOR).await.unwrap_err();
        assert!(matches!(
            err,
            ModerationError::PermissionDenied(DeniedParty::Bot)
        ));
    }

    #[tokio::test]
    async fn non_admin_actor_is_denied() {
        let admin = FakeChatAdmin::new()
            .with_role(BOT, ChatRole::Administrator)
            .with_role(ACTOR, ChatRole::Restricted);
        let gate = PermissionGate::new(&admin, BOT);

        let err = gate.check_admin(CHAT, ACTOR).await.unwrap_err();
        assert!(matches!(
            err,
            ModerationError::PermissionDenied(DeniedParty::Actor)
        ));
    }

    #[tokio::test]
    async fn failed_lookup_fails_closed() {
        let admin = FakeChatAdmin::new()
            .with_role(BOT, ChatRole::Administrator)
            .with_role_error(ACTOR, Error::Transport("timeout".to_string()));
        let gate = PermissionGate::new(&admin, BOT);

        assert!(gate.is_admin(CHAT, ACTOR).await.is_err());
        let err = gate.check_admin(CHAT, ACTOR).await.unwrap_err();
        assert!(matches!(
            err,
            ModerationError::PermissionLookup(Error::Transport(_))
        ));
    }
}
