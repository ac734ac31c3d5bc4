//! Core types and traits: Handler, Bot, Message, HandlerResponse, error, logger. Transport-agnostic.

pub mod bot;
pub mod error;
pub mod logger;
pub mod types;

pub use bot::{parse_message_id, Bot, Destination, FileKind, OutgoingFile};
pub use error::{BotError, HandlerError, Result};
pub use logger::init_tracing;
pub use types::{
    Chat, Handler, HandlerResponse, Message, ReplyContext, ToCoreMessage, ToCoreUser, User,
};
