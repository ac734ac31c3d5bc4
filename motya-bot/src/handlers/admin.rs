//! Admin-only commands: `/prompt`, `/themes`, `/test`. Other users fall through to the rest of
//! the chain.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use super::command::parse_command;
use crate::app::AppContext;
use crate::core::{Destination, Handler, HandlerResponse, Message, Result};
use crate::jobs::{send_news, send_post};

pub const PROMPT_UPDATED: &str = "обновил 🤗";
pub const THEMES_ADDED: &str = "добавил темы 🤗";
pub const NO_PROMPT: &str = "промпт ещё не задан";
pub const NO_THEMES: &str = "тем пока нет";
pub const TESTING: &str = "тестирую...";

pub struct AdminHandler {
    ctx: Arc<AppContext>,
}

impl AdminHandler {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self { ctx }
    }

    async fn prompt(&self, message: &Message, new_prompt: &str) -> Result<String> {
        let ctx = &self.ctx;
        let current = ctx.store.main_prompt().await?;
        ctx.bot
            .reply_to(message, current.as_deref().unwrap_or(NO_PROMPT))
            .await?;
        if new_prompt.is_empty() {
            return Ok(current.unwrap_or_default());
        }
        ctx.store.set_main_prompt(new_prompt).await?;
        if let Err(e) = ctx.model.reset_model(new_prompt).await {
            warn!(error = %e, "Model reset failed, new prompt is stored");
        }
        info!("Main prompt updated");
        ctx.bot.reply_to(message, PROMPT_UPDATED).await?;
        Ok(PROMPT_UPDATED.to_string())
    }

    async fn themes(&self, message: &Message, new_themes: &str) -> Result<String> {
        let ctx = &self.ctx;
        let current = ctx.store.themes().await?;
        let listing = if current.is_empty() {
            NO_THEMES.to_string()
        } else {
            current.join("\n")
        };
        ctx.bot.reply_to(message, &listing).await?;
        if new_themes.is_empty() {
            return Ok(listing);
        }
        let themes: Vec<String> = new_themes.split(',').map(|t| t.trim().to_string()).collect();
        ctx.store.add_themes(&themes).await?;
        ctx.bot.reply_to(message, THEMES_ADDED).await?;
        Ok(THEMES_ADDED.to_string())
    }

    /// Publishes a post and a news item to the admin's private chat.
    async fn test(&self, message: &Message) -> Result<String> {
        let destination = Destination::Chat(message.user.id);
        self.ctx.bot.send_message(&destination, TESTING).await?;
        send_post(&self.ctx, &destination).await?;
        send_news(&self.ctx, &destination).await?;
        Ok(TESTING.to_string())
    }
}

#[async_trait]
impl Handler for AdminHandler {
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        if !self.ctx.is_admin(message.user.id) {
            return Ok(HandlerResponse::Ignore);
        }
        let Some((cmd, args)) = parse_command(&message.content) else {
            return Ok(HandlerResponse::Ignore);
        };
        let reply = match cmd.as_str() {
            "prompt" => self.prompt(message, &args).await?,
            "themes" => self.themes(message, &args).await?,
            "test" => self.test(message).await?,
            _ => return Ok(HandlerResponse::Ignore),
        };
        Ok(HandlerResponse::Reply(reply))
    }
}
