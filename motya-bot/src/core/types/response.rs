//! What a handler did with an incoming message.

/// Outcome of one handler. `Stop` and `Reply` end the handle phase; `Reply` keeps the text that
/// went out so `after` hooks (logging, history) can see it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerResponse {
    Continue,
    Stop,
    /// Not addressed to this handler.
    Ignore,
    Reply(String),
}

impl HandlerResponse {
    /// True when no later handler should see the message.
    pub fn is_final(&self) -> bool {
        matches!(self, HandlerResponse::Stop | HandlerResponse::Reply(_))
    }

    pub fn reply_text(&self) -> Option<&str> {
        match self {
            HandlerResponse::Reply(text) => Some(text),
            _ => None,
        }
    }
}
