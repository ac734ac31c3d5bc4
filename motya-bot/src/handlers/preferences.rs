//! `/style` and `/res`: a user's default image settings.

use std::sync::Arc;

use async_trait::async_trait;
use prompt::Resolution;

use super::command::{parse_command, validate_resolution};
use super::conversation::check_message_rate;
use crate::app::AppContext;
use crate::core::{Handler, HandlerResponse, Message, Result};

pub const STYLE_SET: &str = "поменял стандартный стиль 🥰";
pub const RESOLUTION_RESET: &str = "поставил стандартное разрешение изображения ✅🥰";
pub const RESOLUTION_SET: &str = "поменял стандартное разрешение изображения 🥰";

pub struct PreferencesHandler {
    ctx: Arc<AppContext>,
}

impl PreferencesHandler {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self { ctx }
    }

    async fn set_resolution(&self, user_id: i64, args: &str) -> Result<&'static str> {
        if args.is_empty() {
            self.ctx
                .store
                .set_resolution(user_id, Resolution::default())
                .await?;
            return Ok(RESOLUTION_RESET);
        }
        let values: Vec<&str> = args.split_whitespace().collect();
        let resolution = validate_resolution(&values)?;
        self.ctx.store.set_resolution(user_id, resolution).await?;
        Ok(RESOLUTION_SET)
    }
}

#[async_trait]
impl Handler for PreferencesHandler {
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        let Some((cmd, args)) = parse_command(&message.content) else {
            return Ok(HandlerResponse::Ignore);
        };
        if cmd != "style" && cmd != "res" {
            return Ok(HandlerResponse::Ignore);
        }
        if !check_message_rate(&self.ctx, message).await? {
            return Ok(HandlerResponse::Stop);
        }

        let reply = if cmd == "style" {
            self.ctx.store.set_style(message.user.id, &args).await?;
            STYLE_SET
        } else {
            self.set_resolution(message.user.id, &args).await?
        };
        self.ctx.bot.reply_to(message, reply).await?;
        Ok(HandlerResponse::Reply(reply.to_string()))
    }
}
