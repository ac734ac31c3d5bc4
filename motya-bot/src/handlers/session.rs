//! `/clear` and `/ask`.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::command::parse_command;
use super::conversation::{check_message_rate, reply_with_history, ASK_HELP};
use crate::app::AppContext;
use crate::core::{Handler, HandlerResponse, Message, Result};

pub const CLEARED: &str = "отчистил историю сообщений 🫡";

pub struct ClearHandler {
    ctx: Arc<AppContext>,
}

impl ClearHandler {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Handler for ClearHandler {
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        match parse_command(&message.content) {
            Some((cmd, _)) if cmd == "clear" => {
                self.ctx.sessions.clear(message.chat.id).await;
                info!(chat_id = message.chat.id, "History cleared");
                self.ctx.bot.reply_to(message, CLEARED).await?;
                Ok(HandlerResponse::Reply(CLEARED.to_string()))
            }
            _ => Ok(HandlerResponse::Ignore),
        }
    }
}

/// Asks a question with the chat's history; the way to talk to the bot in groups.
pub struct AskHandler {
    ctx: Arc<AppContext>,
}

impl AskHandler {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Handler for AskHandler {
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        let Some((cmd, question)) = parse_command(&message.content) else {
            return Ok(HandlerResponse::Ignore);
        };
        if cmd != "ask" {
            return Ok(HandlerResponse::Ignore);
        }
        if question.is_empty() {
            self.ctx.bot.reply_to(message, ASK_HELP).await?;
            return Ok(HandlerResponse::Reply(ASK_HELP.to_string()));
        }
        if !check_message_rate(&self.ctx, message).await? {
            return Ok(HandlerResponse::Stop);
        }
        let answer = reply_with_history(&self.ctx, message, &question).await?;
        Ok(HandlerResponse::Reply(answer))
    }
}
