use std::fmt;

use crate::{
    domain::{ChatId, MessageRef, UserRef},
    messaging::types::IncomingCommand,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModerationKind {
    Ban,
    Unban,
    Mute,
    Unmute,
}

impl ModerationKind {
    pub fn from_command(name: &str) -> Option<Self> {
        match name {
            "ban" => Some(Self::Ban),
            "unban" => Some(Self::Unban),
            "mute" => Some(Self::Mute),
            "unmute" => Some(Self::Unmute),
            _ => None,
        }
    }

    pub fn verb(self) -> &'static str {
        match self {
            Self::Ban => "ban",
            Self::Unban => "unban",
            Self::Mute => "mute",
            Self::Unmute => "unmute",
        }
    }
}

impl fmt::Display for ModerationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

/// One moderation command, built per invocation and dropped when it completes.
#[derive(Clone, Debug)]
pub struct ModerationRequest {
    pub kind: ModerationKind,
    pub chat_id: ChatId,
    /// The command message; failures are posted as replies to it.
    pub command: MessageRef,
    pub actor: UserRef,
    pub target: Option<UserRef>,
    /// Duration token (`/mute` only).
    pub duration: Option<String>,
    pub reason: Option<String>,
}

impl ModerationRequest {
    pub fn from_command(kind: ModerationKind, cmd: &IncomingCommand) -> Self {
        let (duration, reason) = match kind {
            ModerationKind::Mute => split_mute_args(&cmd.args),
            ModerationKind::Ban => (None, non_empty(&cmd.args)),
            ModerationKind::Unban | ModerationKind::Unmute => (None, None),
        };

        Self {
            kind,
            chat_id: cmd.chat_id(),
            command: cmd.message,
            actor: cmd.sender.clone(),
            target: cmd.reply_target.clone(),
            duration,
            reason,
        }
    }
}

/// `"2h spam links"` -> `(Some("2h"), Some("spam links"))`, split on the first space.
fn split_mute_args(args: &str) -> (Option<String>, Option<String>) {
    let args = args.trim();
    if args.is_empty() {
        return (None, None);
    }
    match args.split_once(' ') {
        Some((token, reason)) => (Some(token.to_string()), non_empty(reason)),
        None => (Some(args.to_string()), None),
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}
