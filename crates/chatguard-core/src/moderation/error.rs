use std::fmt;

use crate::{errors::Error, moderation::request::ModerationKind};

/// Who failed the admin check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeniedParty {
    Bot,
    Actor,
}

impl fmt::Display for DeniedParty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeniedParty::Bot => f.write_str("bot lacks admin rights"),
            DeniedParty::Actor => f.write_str("actor lacks admin rights"),
        }
    }
}

/// Why a moderation request did not go through.
#[derive(Debug, thiserror::Error)]
pub enum ModerationError {
    #[error("command must reply to the target user's message")]
    MissingTarget,

    #[error("command arguments are missing")]
    MissingArguments,

    #[error("cannot {0} an administrator")]
    TargetIsAdmin(ModerationKind),

    #[error("unparseable duration: {0:?}")]
    UnparseableDuration(String),

    #[error("mute duration {0:?} is outside the restriction window")]
    DurationOutOfRange(String),

    #[error("permission denied: {0}")]
    PermissionDenied(DeniedParty),

    #[error("admin lookup failed: {0}")]
    PermissionLookup(#[source] Error),

    #[error("{kind} failed: {source}")]
    Remote {
        kind: ModerationKind,
        #[source]
        source: Error,
    },
}

impl ModerationError {
    /// The text shown to the chat, without the failure marker.
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingTarget => "You need to do this in reply to the user's message!".to_string(),
            Self::MissingArguments => {
                "You need to specify the command arguments, e.g. /mute 2h spam".to_string()
            }
            Self::TargetIsAdmin(kind) => format!("You cannot {kind} an administrator!"),
            Self::UnparseableDuration(_) => {
                "Could not parse the duration. Use a number followed by s, m, h, d, w, M or y (e.g. 30m, 2h, 7d)."
                    .to_string()
            }
            Self::DurationOutOfRange(label) => format!(
                "A mute must last between 30 seconds and 366 days, not {label}"
            ),
            Self::PermissionDenied(DeniedParty::Bot) => {
                "The bot is not an administrator of this chat!".to_string()
            }
            Self::PermissionDenied(DeniedParty::Actor) => {
                "You are not an administrator!".to_string()
            }
            Self::PermissionLookup(e) => {
                format!("Could not verify administrator rights: {}", e.detail())
            }
            Self::Remote { kind, source } if source.is_rejected() => {
                format!("Failed to {kind} the user: {}", source.detail())
            }
            Self::Remote { source, .. } => format!("An error occurred: {}", source.detail()),
        }
    }
}
