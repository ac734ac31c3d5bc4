//! # Prompt
//!
//! Building blocks for everything the bot sends to a model or an image backend.
//!
//! ## Contents
//!
//! - [`ChatMessage`] / [`MessageRole`]: one role-tagged unit of a conversation, one-to-one with an
//!   element of the OpenAI `messages` array. Conversation history is stored as these units.
//! - [`format_dialog`]: renders history units as the `-{content}` line block that text-only
//!   backends receive; [`dialog_prompt`] wraps a user message with that block.
//! - [`Prompt`] / [`Resolution`]: an image generation request (text, style, size, frame count).
//!
//! ## External interactions
//!
//! - **Model backends**: dialog blocks and chat messages end up in completion requests.
//! - **Image backends**: [`Prompt::description`] is the text sent for generation.

mod image;

pub use image::{Prompt, Resolution, DEFAULT_FRAMES, DEFAULT_SIZE};

/// Role of a message, one-to-one with OpenAI Chat Completions API `role` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    /// System instruction (API `role: "system"`).
    System,
    /// User message (API `role: "user"`).
    User,
    /// Assistant message (API `role: "assistant"`).
    Assistant,
}

/// A single chat message, one-to-one with one element of OpenAI `messages` array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// The two units stored for one finished exchange: the user text, then the reply.
pub fn exchange(user_text: impl Into<String>, reply: impl Into<String>) -> [ChatMessage; 2] {
    [ChatMessage::user(user_text), ChatMessage::assistant(reply)]
}

/// Renders one history unit as a dialog line.
pub fn format_dialog_line(message: &ChatMessage) -> String {
    format!("-{}", message.content)
}

/// Renders history units as a dialog block: one `-{content}` line per unit, joined with `\n`.
///
/// An empty slice renders as an empty string.
pub fn format_dialog(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .map(format_dialog_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Wraps the user message with an instruction that points the model at the dialog block.
///
/// Used by backends that only accept a single text query.
pub fn dialog_prompt(text: &str, dialog: &str) -> String {
    format!(
        "Ответь на сообщение, учитывая контекст диалога. Сообщение: {}. Диалог:\n'''\n{}'''",
        text, dialog
    )
}
