//! Publish surface.
//!
//! [`Bot`] is transport-agnostic; `telegram::TelegramBotAdapter` implements it with teloxide and
//! tests substitute a recording mock.

use async_trait::async_trait;

use super::error::{BotError, Result};
use super::types::{Chat, Message};

/// Where a message goes: a chat by id or a channel by `@username`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Chat(i64),
    Channel(String),
}

impl From<&Chat> for Destination {
    fn from(chat: &Chat) -> Self {
        Destination::Chat(chat.id)
    }
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Destination::Chat(id) => write!(f, "{}", id),
            Destination::Channel(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Photo,
    Document,
    Animation,
}

/// A file sent as a reply.
#[derive(Debug, Clone)]
pub struct OutgoingFile {
    pub kind: FileKind,
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub caption: Option<String>,
    /// Animation size hints.
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl OutgoingFile {
    pub fn new(kind: FileKind, bytes: Vec<u8>, file_name: impl Into<String>) -> Self {
        Self {
            kind,
            bytes,
            file_name: file_name.into(),
            caption: None,
            width: None,
            height: None,
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }
}

/// Abstraction for sending messages. Text is HTML formatted.
#[async_trait]
pub trait Bot: Send + Sync {
    async fn send_message(&self, destination: &Destination, text: &str) -> Result<()>;
    /// Sends a message and returns its id (for a later `delete_message`).
    async fn send_message_and_return_id(&self, chat: &Chat, text: &str) -> Result<String>;
    /// Sends a reply to the given message (same chat).
    async fn reply_to(&self, message: &Message, text: &str) -> Result<()>;
    async fn reply_with_file(&self, message: &Message, file: OutgoingFile) -> Result<()>;
    /// Sends images as one album; the caption goes on the first item.
    async fn send_media_group(
        &self,
        destination: &Destination,
        images: &[Vec<u8>],
        caption: Option<&str>,
    ) -> Result<()>;
    async fn delete_message(&self, chat: &Chat, message_id: &str) -> Result<()>;
    async fn send_typing(&self, chat: &Chat) -> Result<()>;
}

/// Parses a transport message id string into an i32.
pub fn parse_message_id(s: &str) -> Result<i32> {
    s.parse()
        .map_err(|_| BotError::Bot(format!("Invalid message_id: {}", s)))
}
