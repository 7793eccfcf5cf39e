use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use crate::{
    domain::{ChatId, UserId, UserRef},
    duration::parse_duration,
    errors::Error,
    formatting::{error_html, escape_html, mention_html},
    invite::InviteNotifier,
    messaging::{port::MessagingPort, types::IncomingCommand},
    moderation::{
        error::ModerationError,
        request::{ModerationKind, ModerationRequest},
    },
    permissions::PermissionGate,
    ports::ChatAdminPort,
};

/// Telegram treats restrictions shorter than this, or longer than the maximum, as permanent.
const MIN_MUTE_SECS: i64 = 30;
const MAX_MUTE_SECS: i64 = 366 * 24 * 60 * 60;

/// Process-wide handles, built once at startup and shared by every request.
pub struct ModerationContext {
    pub admin: Arc<dyn ChatAdminPort>,
    pub messenger: Arc<dyn MessagingPort>,
    pub bot_id: UserId,
    pub invite_link: String,
}

/// How a request that did not fail ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Mutation applied; the HTML confirmation to post in the chat.
    Succeeded(String),
    /// The service rejected a mute restriction (target left, already restricted, ...).
    /// Deliberately neither confirmed nor reported.
    Ignored { detail: String },
}

pub type ActionResult = std::result::Result<ActionOutcome, ModerationError>;

pub struct ModerationEngine {
    ctx: Arc<ModerationContext>,
}

impl ModerationEngine {
    pub fn new(ctx: Arc<ModerationContext>) -> Self {
        Self { ctx }
    }

    fn gate(&self) -> PermissionGate<'_> {
        PermissionGate::new(self.ctx.admin.as_ref(), self.ctx.bot_id)
    }

    fn invites(&self) -> InviteNotifier<'_> {
        InviteNotifier::new(self.ctx.messenger.as_ref(), &self.ctx.invite_link)
    }

    /// Run a moderation command end to end and post its single response.
    ///
    /// Never fails: every error is turned into a reply to the command message.
    pub async fn handle(&self, kind: ModerationKind, cmd: &IncomingCommand) -> ActionResult {
        let req = ModerationRequest::from_command(kind, cmd);
        info!(
            kind = %req.kind,
            chat_id = req.chat_id.0,
            actor = req.actor.id.0,
            target = ?req.target.as_ref().map(|t| t.id.0),
            "moderation command received"
        );

        let result = self.execute(&req).await;
        self.respond(&req, &result).await;
        result
    }

    pub async fn execute(&self, req: &ModerationRequest) -> ActionResult {
        self.execute_at(req, Utc::now()).await
    }

    /// Validate and perform `req`; `now` anchors mute expiry.
    pub async fn execute_at(&self, req: &ModerationRequest, now: DateTime<Utc>) -> ActionResult {
        // A bare /mute makes no remote calls.
        if req.kind == ModerationKind::Mute && req.duration.is_none() {
            return Err(ModerationError::MissingArguments);
        }

        self.gate().check_admin(req.chat_id, req.actor.id).await?;
        let target = req.target.as_ref().ok_or(ModerationError::MissingTarget)?;

        match req.kind {
            ModerationKind::Ban => self.ban(req, target).await,
            ModerationKind::Unban => self.unban(req, target).await,
            ModerationKind::Mute => self.mute(req, target, now).await,
            ModerationKind::Unmute => self.unmute(req, target).await,
        }
    }

    async fn ban(&self, req: &ModerationRequest, target: &UserRef) -> ActionResult {
        self.ensure_not_admin(req.chat_id, target, req.kind).await?;

        self.ctx
            .admin
            .ban_user(req.chat_id, target.id)
            .await
            .map_err(|source| remote(req.kind, source))?;
        info!(chat_id = req.chat_id.0, target = target.id.0, "user banned");

        let mut html = format!(
            "🚫 {} is banned permanently\n👤 Moderator: {}",
            mention_html(target),
            mention_html(&req.actor)
        );
        if let Some(reason) = req.reason.as_deref() {
            push_reason(&mut html, reason);
        }
        Ok(ActionOutcome::Succeeded(html))
    }

    async fn unban(&self, req: &ModerationRequest, target: &UserRef) -> ActionResult {
        // only_if_banned: lifting a ban that does not exist is a no-op, not a kick.
        self.ctx
            .admin
            .unban_user(req.chat_id, target.id, true)
            .await
            .map_err(|source| remote(req.kind, source))?;
        info!(chat_id = req.chat_id.0, target = target.id.0, "ban lifted");

        self.invites().notify(target.id).await;

        Ok(ActionOutcome::Succeeded(format!(
            "✅ Ban lifted for {}",
            mention_html(target)
        )))
    }

    async fn mute(
        &self,
        req: &ModerationRequest,
        target: &UserRef,
        now: DateTime<Utc>,
    ) -> ActionResult {
        self.ensure_not_admin(req.chat_id, target, req.kind).await?;

        let token = req.duration.as_deref().unwrap_or_default();
        let parsed = parse_duration(token, now)
            .ok_or_else(|| ModerationError::UnparseableDuration(token.to_string()))?;
        if !(MIN_MUTE_SECS..=MAX_MUTE_SECS).contains(&parsed.seconds) {
            return Err(ModerationError::DurationOutOfRange(parsed.label));
        }

        match self
            .ctx
            .admin
            .restrict(req.chat_id, target.id, Some(parsed.expiry), false)
            .await
        {
            Ok(()) => {}
            Err(e) if e.is_rejected() => {
                warn!(
                    chat_id = req.chat_id.0,
                    target = target.id.0,
                    error = %e,
                    "mute rejected by the service; ignoring"
                );
                return Ok(ActionOutcome::Ignored {
                    detail: e.detail().to_string(),
                });
            }
            Err(e) => return Err(remote(req.kind, e)),
        }
        info!(
            chat_id = req.chat_id.0,
            target = target.id.0,
            until = %parsed.expiry,
            "user muted"
        );

        let mut html = format!(
            "🔇 {} has been muted for {}",
            mention_html(target),
            parsed.label
        );
        match req.reason.as_deref() {
            Some(reason) => push_reason(&mut html, reason),
            None => html.push('!'),
        }
        Ok(ActionOutcome::Succeeded(html))
    }

    async fn unmute(&self, req: &ModerationRequest, target: &UserRef) -> ActionResult {
        self.ctx
            .admin
            .restrict(req.chat_id, target.id, None, true)
            .await
            .map_err(|source| remote(req.kind, source))?;
        info!(chat_id = req.chat_id.0, target = target.id.0, "restrictions lifted");

        Ok(ActionOutcome::Succeeded(format!(
            "🎉 All restrictions have been lifted from <b>{}</b>!",
            mention_html(target)
        )))
    }

    async fn ensure_not_admin(
        &self,
        chat_id: ChatId,
        target: &UserRef,
        kind: ModerationKind,
    ) -> Result<(), ModerationError> {
        let is_admin = self
            .gate()
            .is_admin(chat_id, target.id)
            .await
            .map_err(ModerationError::PermissionLookup)?;
        if is_admin {
            return Err(ModerationError::TargetIsAdmin(kind));
        }
        Ok(())
    }

    async fn respond(&self, req: &ModerationRequest, result: &ActionResult) {
        let messenger = &self.ctx.messenger;
        let sent = match result {
            Ok(ActionOutcome::Succeeded(html)) => messenger.send_html(req.chat_id, html).await,
            Ok(ActionOutcome::Ignored { .. }) => return,
            Err(e) => {
                info!(kind = %req.kind, chat_id = req.chat_id.0, error = %e, "moderation command failed");
                messenger
                    .reply_html(req.command, &error_html(&e.user_message()))
                    .await
            }
        };

        if let Err(e) = sent {
            error!(kind = %req.kind, chat_id = req.chat_id.0, error = %e, "failed to send moderation response");
        }
    }
}

fn remote(kind: ModerationKind, source: Error) -> ModerationError {
    ModerationError::Remote { kind, source }
}

fn push_reason(html: &mut String, reason: &str) {
    html.push_str("\nReason: ");
    html.push_str(&escape_html(reason));
}
