//! Message type for the core model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{chat::Chat, user::User};

/// The message a user replied to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyContext {
    pub id: String,
    pub author_id: i64,
    pub author_is_bot: bool,
    /// Full name of the author; channel posts forwarded to a discussion group carry the
    /// service account's name.
    pub author_name: String,
    /// Text, or caption for media messages.
    pub content: String,
    /// True when the replied-to message is media with a caption (e.g. a drawing sent by the bot).
    pub has_caption: bool,
}

/// A single incoming message with user, chat, content and optional reply context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub user: User,
    pub chat: Chat,
    pub content: String,
    pub message_type: String,
    pub created_at: DateTime<Utc>,
    pub reply_to: Option<ReplyContext>,
}

impl Message {
    /// A text message; used by adapters and tests.
    pub fn text(id: impl Into<String>, user: User, chat: Chat, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            user,
            chat,
            content: content.into(),
            message_type: "text".to_string(),
            created_at: Utc::now(),
            reply_to: None,
        }
    }

    pub fn with_reply_to(mut self, reply: ReplyContext) -> Self {
        self.reply_to = Some(reply);
        self
    }
}
