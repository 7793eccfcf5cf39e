use std::sync::Arc;

use teloxide::{prelude::*, types::Message};
use tracing::{error, info};

use chatguard_core::{
    domain::{ChatId, MessageId, MessageRef},
    formatting::escape_html,
    messaging::types::{ChatKind, IncomingCommand},
    moderation::ModerationKind,
};

use crate::router::AppState;

const START_TEXT: &str = "This bot was made to keep a friendly atmosphere in the chat ☺️";
const GROUP_ONLY_TEXT: &str = "😔 <b>The bot only works in groups</b>";
const HELP_HTML: &str = "<b>Available Commands:</b>
<b>/help</b> - Shows this list of commands.
<b>/info</b> - Sends information about the bot to your private messages.

<b>Admin Commands</b> (reply to the user's message):
<b>/mute &lt;time&gt; [reason]</b> - Mutes the user. Time is a number followed by s, m, h, d, w, M or y (e.g. 30m, 2h, 7d).
<b>/unmute</b> - Removes all restrictions from the user, allowing them to speak again.
<b>/ban [reason]</b> - Bans the user permanently.
<b>/unban</b> - Lifts the ban and sends the user an invite link.";

pub async fn handle_command(cmd: IncomingCommand, state: Arc<AppState>) -> ResponseResult<()> {
    match (cmd.chat_kind, cmd.name.as_str()) {
        (ChatKind::Private, "start") => reply(&state, &cmd, &escape_html(START_TEXT)).await,
        (ChatKind::Private, _) => reply(&state, &cmd, GROUP_ONLY_TEXT).await,
        (ChatKind::Group, "help") => reply(&state, &cmd, HELP_HTML).await,
        (ChatKind::Group, "info") => send_info(&state, &cmd).await,
        (ChatKind::Group, name) => {
            if let Some(kind) = ModerationKind::from_command(name) {
                // Outcome is logged and answered inside the engine.
                let _ = state.engine.handle(kind, &cmd).await;
            }
        }
    }
    Ok(())
}

pub async fn reply_group_only(msg: &Message, state: &AppState) -> ResponseResult<()> {
    let to = MessageRef {
        chat_id: ChatId(msg.chat.id.0),
        message_id: MessageId(msg.id.0),
    };
    if let Err(e) = state.messenger.reply_html(to, GROUP_ONLY_TEXT).await {
        error!(chat_id = to.chat_id.0, error = %e, "failed to reply in private chat");
    }
    Ok(())
}

async fn send_info(state: &AppState, cmd: &IncomingCommand) {
    let private_chat = ChatId(cmd.sender.id.0);
    let text = match state
        .messenger
        .send_html(private_chat, &escape_html(&state.cfg.info_text))
        .await
    {
        Ok(_) => {
            info!(user_id = cmd.sender.id.0, "info sent");
            "Information sent to your private messages."
        }
        Err(e) => {
            error!(user_id = cmd.sender.id.0, error = %e, "failed to send info");
            "Failed to send information to your private messages."
        }
    };
    reply(state, cmd, text).await;
}

async fn reply(state: &AppState, cmd: &IncomingCommand, html: &str) {
    if let Err(e) = state.messenger.reply_html(cmd.message, html).await {
        error!(chat_id = cmd.chat_id().0, command = %cmd.name, error = %e, "failed to reply");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_lists_every_moderation_command() {
        for cmd in ["/mute", "/unmute", "/ban", "/unban", "/info"] {
            assert!(HELP_HTML.contains(cmd), "{cmd}");
        }
    }

    #[test]
    fn help_html_has_balanced_bold_tags() {
        assert_eq!(HELP_HTML.matches("<b>").count(), HELP_HTML.matches("</b>").count());
        assert!(!HELP_HTML.contains("<time>"));
    }
}
