use async_trait::async_trait;
use tracing::{debug, info};

use crate::core::{Handler, HandlerResponse, Message, Result};

/// Logs each incoming message and how the chain ended.
pub struct LoggingHandler;

#[async_trait]
impl Handler for LoggingHandler {
    async fn before(&self, message: &Message) -> Result<bool> {
        info!(
            user_id = message.user.id,
            chat_id = message.chat.id,
            chat_type = %message.chat.chat_type,
            is_reply = message.reply_to.is_some(),
            "Received message"
        );
        Ok(true)
    }

    async fn after(&self, message: &Message, response: &HandlerResponse) -> Result<()> {
        let outcome = match response {
            HandlerResponse::Reply(_) => "replied",
            HandlerResponse::Stop => "stopped",
            HandlerResponse::Continue | HandlerResponse::Ignore => "ignored",
        };
        debug!(message_id = %message.id, outcome = outcome, "Message processed");
        Ok(())
    }
}
