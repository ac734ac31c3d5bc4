//! What users see when a handler fails.

use image_generation_client::ImageGenerationError;
use llm_client::BackendError;
use tracing::error;

use crate::core::{Bot, BotError, HandlerError, Message};

pub const CONNECTION_ERROR: &str = "не могу найти свой карандаш и краски 😭";
pub const UNAVAILABLE_ERROR: &str = "ой, у меня сейчас не получается ответить 😔 попробуй чуть позже";
pub const GENERIC_ERROR: &str = "что-то пошло не так 😵 попробуй ещё раз";

pub fn user_message(err: &BotError) -> String {
    match err {
        BotError::Image(ImageGenerationError::Generation(detail))
        | BotError::Handler(HandlerError::InvalidArguments(detail)) => {
            format!("ошибка 🥶 {}", detail)
        }
        BotError::Image(ImageGenerationError::Connection(_))
        | BotError::Model(BackendError::Connectivity(_)) => CONNECTION_ERROR.to_string(),
        BotError::Model(_) => UNAVAILABLE_ERROR.to_string(),
        _ => GENERIC_ERROR.to_string(),
    }
}

/// Logs the failure and replies to the message with its user-facing text.
pub async fn report(bot: &dyn Bot, message: &Message, err: &BotError) {
    error!(
        user_id = message.user.id,
        chat_id = message.chat.id,
        error = %err,
        "Handler failed"
    );
    if let Err(e) = bot.reply_to(message, &user_message(err)).await {
        error!(error = %e, "Failed to report error to user");
    }
}
