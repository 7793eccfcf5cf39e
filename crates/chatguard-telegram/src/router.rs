use std::sync::Arc;

use teloxide::{dispatching::Dispatcher, dptree, prelude::*};
use tracing::{info, warn};

use chatguard_core::{
    bootstrap::{self, RetryPolicy},
    config::Config,
    messaging::port::MessagingPort,
    moderation::{ModerationContext, ModerationEngine},
    ports::ChatAdminPort,
    Result,
};

use crate::handlers;
use crate::{map_request_error, TelegramChatAdmin, TelegramMessenger};

#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<Config>,
    pub messenger: Arc<dyn MessagingPort>,
    pub engine: Arc<ModerationEngine>,
    /// From `get_me`; `/cmd@name` is only handled when `name` matches.
    pub bot_username: Option<String>,
}

impl AppState {
    pub fn new(cfg: Arc<Config>, bot: Bot, bot_username: Option<String>) -> Self {
        let messenger: Arc<dyn MessagingPort> = Arc::new(TelegramMessenger::new(bot.clone()));
        let admin: Arc<dyn ChatAdminPort> = Arc::new(TelegramChatAdmin::new(bot));

        let engine = Arc::new(ModerationEngine::new(Arc::new(ModerationContext {
            admin,
            messenger: messenger.clone(),
            bot_id: cfg.bot_id,
            invite_link: cfg.chat_link.clone(),
        })));

        Self {
            cfg,
            messenger,
            engine,
            bot_username,
        }
    }
}

pub async fn run_polling(cfg: Arc<Config>) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.telegram_bot_token.clone());

    let bot_username = match bot.get_me().await {
        Ok(me) => {
            info!(username = ?me.user.username, bot_id = cfg.bot_id.0, "chatguard started");
            me.user.username.clone()
        }
        Err(e) => {
            warn!(error = %e, "get_me failed; commands addressed with @username will be ignored");
            None
        }
    };

    // Best-effort: the polling listener clears the webhook again when it starts.
    let policy = RetryPolicy::new(cfg.bootstrap_attempts, cfg.bootstrap_retry_delay);
    bootstrap::run("clear webhook", policy, || {
        let bot = bot.clone();
        async move { clear_webhook(&bot).await }
    })
    .await;

    let state = Arc::new(AppState::new(cfg, bot.clone(), bot_username));

    let handler =
        dptree::entry().branch(Update::filter_message().endpoint(handlers::handle_message));

    info!("starting long polling");
    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .build()
        .dispatch()
        .await;

    Ok(())
}

async fn clear_webhook(bot: &Bot) -> Result<()> {
    bot.delete_webhook()
        .drop_pending_updates(true)
        .await
        .map_err(map_request_error)?;
    Ok(())
}
