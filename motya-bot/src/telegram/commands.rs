//! Command menus shown by Telegram clients.

use teloxide::prelude::*;
use teloxide::types::{BotCommand, BotCommandScope, ChatId, Recipient};
use tracing::info;

const BASIC_COMMANDS: &[(&str, &str)] = &[
    ("start", "Поприветствовать Мотю"),
    ("draw", "Нарисовать картинку по запросу"),
    ("ask", "Задать вопрос боту (для чатов)"),
    ("gif", "Нарисовать анимацию по запросу"),
    ("clear", "Очистить историю сообщений с ботом"),
    ("style", "Поставить стандартный стиль картинок"),
    ("res", "Поставить стандартное разрешение картинок"),
];

const ADMIN_COMMANDS: &[(&str, &str)] = &[
    ("prompt", "Поменять личность бота"),
    ("themes", "Добавить или посмотреть темы"),
    ("test", "Тестовая команда"),
];

pub fn basic_commands() -> Vec<BotCommand> {
    BASIC_COMMANDS
        .iter()
        .map(|(command, description)| BotCommand::new(*command, *description))
        .collect()
}

/// Basic commands plus the admin-only ones.
pub fn admin_commands() -> Vec<BotCommand> {
    basic_commands()
        .into_iter()
        .chain(
            ADMIN_COMMANDS
                .iter()
                .map(|(command, description)| BotCommand::new(*command, *description)),
        )
        .collect()
}

/// Registers the default menu for everyone and the extended one for the admin's chat.
pub async fn register_commands(bot: &teloxide::Bot, admin_id: i64) -> anyhow::Result<()> {
    bot.set_my_commands(basic_commands()).await?;
    bot.set_my_commands(admin_commands())
        .scope(BotCommandScope::Chat {
            chat_id: Recipient::Id(ChatId(admin_id)),
        })
        .await?;
    info!(admin_id = admin_id, "Bot commands registered");
    Ok(())
}
