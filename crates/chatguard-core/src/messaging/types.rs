use crate::domain::{ChatId, MessageRef, UserRef};

/// Where a message was posted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChatKind {
    Private,
    Group,
}

/// A slash command received from a chat, with everything the moderation core needs.
///
/// Telegram-specific fields stay in the Telegram adapter.
#[derive(Clone, Debug)]
pub struct IncomingCommand {
    pub message: MessageRef,
    pub chat_kind: ChatKind,
    pub sender: UserRef,
    /// Author of the message this command replies to, if any.
    pub reply_target: Option<UserRef>,
    /// Lower-cased command name without the leading `/` or `@botname`.
    pub name: String,
    /// The `botname` of `/cmd@botname`, as written.
    pub mention: Option<String>,
    /// Trimmed text after the command token (empty when absent).
    pub args: String,
}

impl IncomingCommand {
    pub fn chat_id(&self) -> ChatId {
        self.message.chat_id
    }

    /// Whether this bot should act on the command.
    ///
    /// Unaddressed commands are for everyone; `/cmd@name` only for the bot called `name`
    /// (case-insensitive). With no known username, addressed commands are never ours.
    pub fn is_addressed_to(&self, username: Option<&str>) -> bool {
        match (self.mention.as_deref(), username) {
            (None, _) => true,
            (Some(mention), Some(username)) => mention.eq_ignore_ascii_case(username),
            (Some(_), None) => false,
        }
    }
}

/// A command token split into its parts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedCommand {
    pub name: String,
    pub mention: Option<String>,
    pub args: String,
}

/// Split raw command text.
///
/// Telegram may send `/cmd@botname arg1 ...`.
pub fn parse_command(text: &str) -> ParsedCommand {
    let mut parts = text.trim().splitn(2, char::is_whitespace);
    let first = parts.next().unwrap_or("").trim();
    let args = parts.next().unwrap_or("").trim().to_string();

    let (name, mention) = match first.trim_start_matches('/').split_once('@') {
        Some((name, mention)) => (name, Some(mention.to_string())),
        None => (first.trim_start_matches('/'), None),
    };

    ParsedCommand {
        name: name.to_lowercase(),
        mention,
        args,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::domain::MessageId;

    fn addressed(mention: Option<&str>) -> IncomingCommand {
        IncomingCommand {
            message: MessageRef {
                chat_id: ChatId(-1),
                message_id: MessageId(1),
            },
            chat_kind: ChatKind::Group,
            sender: UserRef::new(2, "Mod"),
            reply_target: None,
            name: "ban".to_string(),
            mention: mention.map(str::to_string),
            args: String::new(),
        }
    }

    #[test]
    fn parses_bare_and_addressed_commands() {
        assert_eq!(
            parse_command("/ban"),
            ParsedCommand {
                name: "ban".to_string(),
                mention: None,
                args: String::new(),
            }
        );
        assert_eq!(
            parse_command("/Mute@guard_bot 2h  spam here "),
            ParsedCommand {
                name: "mute".to_string(),
                mention: Some("guard_bot".to_string()),
                args: "2h  spam here".to_string(),
            }
        );
        assert_eq!(parse_command("  /unmute\n").name, "unmute");
    }

    #[test]
    fn commands_for_other_bots_are_not_ours() {
        let cmd = addressed(parse_command("/ban@OtherBot").mention.as_deref());
        assert!(!cmd.is_addressed_to(Some("guard_bot")));
        assert!(!cmd.is_addressed_to(None));
    }

    #[test]
    fn own_mention_matches_case_insensitively() {
        assert!(addressed(Some("Guard_Bot")).is_addressed_to(Some("guard_bot")));
        assert!(addressed(None).is_addressed_to(Some("guard_bot")));
        assert!(addressed(None).is_addressed_to(None));
    }
}
