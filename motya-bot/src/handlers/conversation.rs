//! Conversational replies: private chats, replies to the bot or its blog posts, and `/ask`.

use std::sync::Arc;

use async_trait::async_trait;
use prompt::exchange;
use tracing::{info, instrument, warn};

use super::command::parse_command;
use crate::app::AppContext;
use crate::core::{Handler, HandlerResponse, Message, ReplyContext, Result};

pub const PLACEHOLDER: &str = "секундочку 🐾 ...";
pub const MESSAGE_SPAM: &str = "ой 🙄 пожалуйста, не пишите мне так часто, я не успеваю 😣";
pub const ASK_HELP: &str = "на что вы хотите чтобы я ответил? 🤓";

const MESSAGE_KEY: &str = "message";

/// False (after telling the user) when the user writes faster than the message rate.
pub(crate) async fn check_message_rate(ctx: &AppContext, message: &Message) -> Result<bool> {
    let allowed = ctx
        .throttle
        .allow(MESSAGE_KEY, message.user.id, ctx.settings.throttle_rate_message)
        .await;
    if !allowed {
        info!(user_id = message.user.id, "Message throttled");
        ctx.bot.reply_to(message, MESSAGE_SPAM).await?;
    }
    Ok(allowed)
}

async fn typing(ctx: &AppContext, message: &Message) {
    if let Err(e) = ctx.bot.send_typing(&message.chat).await {
        warn!(error = %e, "Failed to send typing action");
    }
}

/// Answers `text` with the chat's history and records the exchange.
#[instrument(skip(ctx, message, text), fields(user_id = message.user.id, chat_id = message.chat.id))]
pub(crate) async fn reply_with_history(
    ctx: &AppContext,
    message: &Message,
    text: &str,
) -> Result<String> {
    typing(ctx, message).await;
    let session = ctx.sessions.session(message.chat.id).await;
    let mut history = session.lock().await;
    let answer = ctx
        .model
        .answer_with_history(text, &history.snapshot())
        .await?;
    ctx.bot.reply_to(message, &answer).await?;
    history.add(exchange(text, answer.clone()));
    Ok(answer)
}

/// Answers a single prompt built from the message; the user's text and the answer still go to
/// the chat's history. The session stays locked for the whole turn.
async fn reply_once(ctx: &AppContext, message: &Message, prompt: &str) -> Result<String> {
    typing(ctx, message).await;
    let session = ctx.sessions.session(message.chat.id).await;
    let mut history = session.lock().await;
    let answer = ctx.model.answer(prompt).await?;
    ctx.bot.reply_to(message, &answer).await?;
    history.add(exchange(message.content.clone(), answer.clone()));
    Ok(answer)
}

/// Plain text: every message in private chats; in groups only replies to the bot or its posts.
pub struct ConversationHandler {
    ctx: Arc<AppContext>,
}

impl ConversationHandler {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self { ctx }
    }

    async fn answer_privately(&self, message: &Message) -> Result<HandlerResponse> {
        let ctx = &self.ctx;
        info!(user_id = message.user.id, chat_id = message.chat.id, "Answering privately");
        let placeholder = ctx
            .bot
            .send_message_and_return_id(&message.chat, PLACEHOLDER)
            .await?;
        let result = reply_with_history(ctx, message, &message.content).await;
        if let Err(e) = ctx.bot.delete_message(&message.chat, &placeholder).await {
            warn!(error = %e, "Failed to delete placeholder");
        }
        Ok(HandlerResponse::Reply(result?))
    }

    async fn answer_reply(&self, message: &Message, reply: &ReplyContext) -> Result<HandlerResponse> {
        let ctx = &self.ctx;
        let from_blog = reply.author_name == ctx.settings.blog_author_name;
        let from_bot = ctx.bot_user_id().await == Some(reply.author_id);
        if !from_blog && !from_bot {
            return Ok(HandlerResponse::Ignore);
        }
        if !check_message_rate(ctx, message).await? {
            return Ok(HandlerResponse::Stop);
        }

        let answer = if from_blog {
            let prompt = format!("ты писал про: {}, ответь на: {}", reply.content, message.content);
            reply_once(ctx, message, &prompt).await?
        } else if reply.has_caption {
            let last_image = ctx
                .store
                .user_config(message.user.id)
                .await?
                .last_image
                .unwrap_or_default();
            let prompt = format!(
                "ты нарисовал рисунок по запросу: '{}', ответь на: {}",
                last_image, message.content
            );
            reply_once(ctx, message, &prompt).await?
        } else {
            reply_with_history(ctx, message, &message.content).await?
        };
        Ok(HandlerResponse::Reply(answer))
    }
}

#[async_trait]
impl Handler for ConversationHandler {
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        if message.content.trim().is_empty() || parse_command(&message.content).is_some() {
            return Ok(HandlerResponse::Ignore);
        }
        if message.chat.is_private() {
            if !check_message_rate(&self.ctx, message).await? {
                return Ok(HandlerResponse::Stop);
            }
            return self.answer_privately(message).await;
        }
        match &message.reply_to {
            Some(reply) => self.answer_reply(message, reply).await,
            None => Ok(HandlerResponse::Ignore),
        }
    }
}
