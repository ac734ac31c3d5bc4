//! Base config: Telegram connection, logging, database, bot identity. Loaded from env.

use anyhow::{Context, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct BaseConfig {
    /// BOT_TOKEN
    pub bot_token: String,
    /// TELEGRAM_API_URL or TELOXIDE_API_URL
    pub telegram_api_url: Option<String>,
    /// LOG_FILE
    pub log_file: String,
    /// SQLite file for the configuration store (DATABASE_URL)
    pub database_url: String,
    /// ADMIN_ID: user allowed to run /prompt, /themes, /test
    pub admin_id: i64,
    /// CHANNEL: where scheduled posts go
    pub channel: String,
    /// BLOG_AUTHOR_NAME: display name of channel posts forwarded to the discussion group
    pub blog_author_name: String,
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

impl BaseConfig {
    /// Load from environment variables. `token` overrides BOT_TOKEN if provided.
    pub fn load(token: Option<String>) -> Result<Self> {
        let bot_token = match token {
            Some(token) => token,
            None => env::var("BOT_TOKEN").context("BOT_TOKEN not set")?,
        };
        let admin_id = env::var("ADMIN_ID")
            .context("ADMIN_ID not set")?
            .trim()
            .parse::<i64>()
            .context("ADMIN_ID must be a numeric user id")?;
        let telegram_api_url = env::var("TELEGRAM_API_URL")
            .or_else(|_| env::var("TELOXIDE_API_URL"))
            .ok();

        Ok(Self {
            bot_token,
            telegram_api_url,
            log_file: var_or("LOG_FILE", "logs/motya.log"),
            database_url: var_or("DATABASE_URL", "./data/motya.db"),
            admin_id,
            channel: var_or("CHANNEL", "@motya_blog"),
            blog_author_name: var_or("BLOG_AUTHOR_NAME", "Telegram"),
        })
    }

    /// Validate config (e.g. telegram_api_url must be valid URL if set).
    pub fn validate(&self) -> Result<()> {
        if let Some(ref url_str) = self.telegram_api_url {
            if reqwest::Url::parse(url_str).is_err() {
                anyhow::bail!(
                    "TELEGRAM_API_URL (or TELOXIDE_API_URL) is set but not a valid URL: {}",
                    url_str
                );
            }
        }
        if !self.channel.starts_with('@') {
            anyhow::bail!("CHANNEL must be a channel username starting with @: {}", self.channel);
        }
        Ok(())
    }
}
