use std::sync::Arc;

use async_trait::async_trait;

use super::command::parse_command;
use crate::app::AppContext;
use crate::core::{Handler, HandlerResponse, Message, Result};

pub const GREETING: &str = "приветик, новый друг! 🐾 меня зовут мотя, я маленький тушканчик 🐹 \
и только начинаю узнавать этот большой мир 🌍можешь смело задавать мне любые вопросы! \n\n\
кстати! подпишись на мой <a href=\"https://t.me/motya_blog\">блог</a>! 😇";

/// `/start`: greeting.
pub struct StartHandler {
    ctx: Arc<AppContext>,
}

impl StartHandler {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Handler for StartHandler {
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        match parse_command(&message.content) {
            Some((cmd, _)) if cmd == "start" => {
                self.ctx.bot.reply_to(message, GREETING).await?;
                Ok(HandlerResponse::Reply(GREETING.to_string()))
            }
            _ => Ok(HandlerResponse::Ignore),
        }
    }
}
