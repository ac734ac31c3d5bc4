//! Motya's message pipeline.
//!
//! Three passes over the registered handlers: every `before` gate in order, then `handle` until
//! one of them answers with a final response, then every `after` in reverse order.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::core::{Handler, HandlerResponse, Message, Result};

#[derive(Clone, Default)]
pub struct HandlerChain {
    handlers: Vec<Arc<dyn Handler>>,
}

impl HandlerChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_handler(mut self, handler: Arc<dyn Handler>) -> Self {
        self.handlers.push(handler);
        self
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Names in registration order.
    pub fn handler_names(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|h| h.name()).collect()
    }

    #[instrument(skip(self, message), fields(user_id = message.user.id, chat_id = message.chat.id))]
    pub async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        if let Some(gate) = self.gate(message).await? {
            info!(handler = gate, "message dropped by before hook");
            return Ok(HandlerResponse::Stop);
        }

        let response = self.dispatch(message).await?;

        for h in self.handlers.iter().rev() {
            h.after(message, &response).await?;
        }
        Ok(response)
    }

    /// Name of the first handler whose `before` refused the message.
    async fn gate(&self, message: &Message) -> Result<Option<&'static str>> {
        for h in &self.handlers {
            if !h.before(message).await? {
                return Ok(Some(h.name()));
            }
        }
        Ok(None)
    }

    async fn dispatch(&self, message: &Message) -> Result<HandlerResponse> {
        for h in &self.handlers {
            let response = h.handle(message).await?;
            debug!(handler = h.name(), ?response, "handle");
            if response.is_final() {
                info!(handler = h.name(), "message handled");
                return Ok(response);
            }
        }
        Ok(HandlerResponse::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Chat, User};

    struct Silent;

    #[async_trait::async_trait]
    impl Handler for Silent {}

    #[tokio::test]
    async fn test_chain_of_silent_handlers_continues() {
        let chain = HandlerChain::new()
            .add_handler(Arc::new(Silent))
            .add_handler(Arc::new(Silent));
        assert_eq!(chain.handler_names(), vec!["Silent", "Silent"]);

        let user = User {
            id: 7,
            username: None,
            first_name: None,
            last_name: None,
        };
        let message = Message::text("1", user, Chat::private(7), "мур");
        let response = chain.handle(&message).await.unwrap();
        assert_eq!(response, HandlerResponse::Continue);
    }
}
