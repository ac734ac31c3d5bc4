//! Telegram transport: teloxide adapter, message conversion, command menus, REPL.

mod adapters;
mod bot_adapter;
mod commands;
mod runner;

pub use adapters::{TelegramMessageWrapper, TelegramUserWrapper};
pub use bot_adapter::TelegramBotAdapter;
pub use commands::{admin_commands, basic_commands, register_commands};
pub use runner::run_repl;
