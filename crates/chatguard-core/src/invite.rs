use tracing::{error, info};

use crate::{
    domain::{ChatId, UserId},
    formatting::escape_html,
    messaging::port::MessagingPort,
};

/// Sends the chat invite link to a user's private chat after an unban.
///
/// Best-effort: delivery failures are logged, never returned.
pub struct InviteNotifier<'a> {
    messenger: &'a dyn MessagingPort,
    invite_link: &'a str,
}

impl<'a> InviteNotifier<'a> {
    pub fn new(messenger: &'a dyn MessagingPort, invite_link: &'a str) -> Self {
        Self {
            messenger,
            invite_link,
        }
    }

    pub async fn notify(&self, user_id: UserId) {
        let html = escape_html(self.invite_link);
        match self.messenger.send_html(ChatId(user_id.0), &html).await {
            Ok(_) => info!(user_id = user_id.0, "invite sent"),
            Err(e) => error!(user_id = user_id.0, error = %e, "failed to send invite"),
        }
    }
}
