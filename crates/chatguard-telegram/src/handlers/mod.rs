//! Telegram update handlers.
//!
//! Routing by chat type happens here; moderation itself lives in
//! `chatguard-core`.

use std::sync::Arc;

use teloxide::{prelude::*, types::Message};
use tracing::debug;

use chatguard_core::{
    domain::{ChatId, MessageId, MessageRef},
    messaging::types::{parse_command, ChatKind, IncomingCommand},
};

use crate::router::AppState;
use crate::user_ref;

mod commands;

pub async fn handle_message(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let chat_kind = if msg.chat.is_private() {
        ChatKind::Private
    } else {
        ChatKind::Group
    };

    let command = msg
        .text()
        .filter(|text| text.starts_with('/'))
        .and_then(|text| incoming_command(&msg, chat_kind, text));

    match (command, chat_kind) {
        (Some(cmd), _) if !cmd.is_addressed_to(state.bot_username.as_deref()) => {
            debug!(
                chat_id = msg.chat.id.0,
                command = %cmd.name,
                mention = ?cmd.mention,
                "ignoring command addressed to another bot"
            );
            Ok(())
        }
        (Some(cmd), _) => commands::handle_command(cmd, state).await,
        (None, ChatKind::Private) => commands::reply_group_only(&msg, &state).await,
        (None, ChatKind::Group) => {
            debug!(chat_id = msg.chat.id.0, "ignoring non-command group message");
            Ok(())
        }
    }
}

fn incoming_command(msg: &Message, chat_kind: ChatKind, text: &str) -> Option<IncomingCommand> {
    let sender = msg.from()?;
    let parsed = parse_command(text);

    Some(IncomingCommand {
        message: MessageRef {
            chat_id: ChatId(msg.chat.id.0),
            message_id: MessageId(msg.id.0),
        },
        chat_kind,
        sender: user_ref(sender),
        reply_target: msg
            .reply_to_message()
            .and_then(|reply| reply.from())
            .map(user_ref),
        name: parsed.name,
        mention: parsed.mention,
        args: parsed.args,
    })
}
