//! # Motya
//!
//! A Telegram persona bot: answers users through a hosted language model with bounded chat
//! history, draws pictures and animations on request, and posts generated content and daily
//! news to a channel on a schedule.

pub mod app;
pub mod chain;
pub mod cli;
pub mod config;
pub mod content;
pub mod core;
pub mod handlers;
pub mod jobs;
pub mod runner;
pub mod scheduler;
pub mod session;
pub mod storage;
pub mod telegram;

pub use app::{AppContext, Settings};
pub use chain::HandlerChain;
pub use cli::{load_config, Cli};
pub use config::BotConfig;
pub use core::{
    init_tracing, Bot, BotError, Chat, Destination, FileKind, Handler, HandlerError,
    HandlerResponse, Message, OutgoingFile, ReplyContext, Result, User,
};
pub use handlers::build_handler_chain;
pub use runner::{build_context, run_bot, schedule_jobs};
