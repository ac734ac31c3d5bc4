//! Error types for the bot.
//!
//! [`BotError`] is the top-level error every handler and job returns; [`HandlerError`] covers
//! invalid user input. User-facing wording lives in `handlers::errors`.

use image_generation_client::ImageGenerationError;
use llm_client::BackendError;
use news_client::NewsError;
use thiserror::Error;

use crate::content::ContentError;
use crate::storage::StorageError;

#[derive(Error, Debug)]
pub enum BotError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Bot error: {0}")]
    Bot(String),

    #[error("Handler error: {0}")]
    Handler(#[from] HandlerError),

    #[error("Model error: {0}")]
    Model(#[from] BackendError),

    #[error("Image generation error: {0}")]
    Image(#[from] ImageGenerationError),

    #[error("News error: {0}")]
    News(#[from] NewsError),

    #[error("Content error: {0}")]
    Content(#[from] ContentError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

/// Errors produced by handlers from user input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HandlerError {
    #[error("No text in message")]
    NoText,

    /// Arguments of a command are malformed; the text is shown to the user.
    #[error("{0}")]
    InvalidArguments(String),

    #[error("Unauthorized access")]
    Unauthorized,
}

pub type Result<T> = std::result::Result<T, BotError>;
