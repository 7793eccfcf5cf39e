use std::{env, fs, path::Path, time::Duration};

use crate::{domain::UserId, errors::Error, Result};

const DEFAULT_INFO_TEXT: &str = "This bot keeps the chat friendly.";

/// Typed configuration, loaded once at process start.
#[derive(Clone, Debug)]
pub struct Config {
    pub telegram_bot_token: String,
    /// Parsed from the numeric prefix of the token (`<id>:<secret>`).
    pub bot_id: UserId,
    pub chat_link: String,
    pub info_text: String,

    // Startup webhook clearing
    pub bootstrap_attempts: u32,
    pub bootstrap_retry_delay: Duration,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));
        Self::from_lookup(env_str)
    }

    /// Build the config from an arbitrary key lookup (the environment in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let telegram_bot_token = required(&lookup, "TELEGRAM_BOT_TOKEN")?;
        let chat_link = required(&lookup, "CHAT_LINK")?;

        let bot_id = bot_id_from_token(&telegram_bot_token).ok_or_else(|| {
            Error::Config("TELEGRAM_BOT_TOKEN must look like `<bot id>:<secret>`".to_string())
        })?;

        let info_text = lookup("BOT_INFO_TEXT")
            .and_then(non_empty)
            .unwrap_or_else(|| DEFAULT_INFO_TEXT.to_string());

        let bootstrap_attempts = parse_u64(&lookup, "BOOTSTRAP_ATTEMPTS")
            .unwrap_or(3)
            .clamp(1, u32::MAX as u64) as u32;
        let bootstrap_retry_delay =
            Duration::from_secs(parse_u64(&lookup, "BOOTSTRAP_RETRY_DELAY_SECS").unwrap_or(5));

        Ok(Self {
            telegram_bot_token,
            bot_id,
            chat_link,
            info_text,
            bootstrap_attempts,
            bootstrap_retry_delay,
        })
    }
}

fn required(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String> {
    lookup(key)
        .and_then(non_empty)
        .map(|s| s.trim().to_string())
        .ok_or_else(|| Error::Config(format!("{key} environment variable is required")))
}

fn bot_id_from_token(token: &str) -> Option<UserId> {
    let (id, secret) = token.split_once(':')?;
    if secret.is_empty() {
        return None;
    }
    id.parse::<i64>().ok().filter(|id| *id > 0).map(UserId)
}

fn parse_u64(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<u64> {
    lookup(key).and_then(|s| s.trim().parse::<u64>().ok())
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        env::set_var(key, val);
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
