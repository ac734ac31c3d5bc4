//! Converts teloxide messages and users into core types.

use crate::core::{Chat, Message, ReplyContext, ToCoreMessage, ToCoreUser, User};

pub struct TelegramUserWrapper<'a>(pub &'a teloxide::types::User);

impl ToCoreUser for TelegramUserWrapper<'_> {
    fn to_core(&self) -> User {
        User {
            id: self.0.id.0 as i64,
            username: self.0.username.clone(),
            first_name: Some(self.0.first_name.clone()),
            last_name: self.0.last_name.clone(),
        }
    }
}

pub struct TelegramMessageWrapper<'a>(pub &'a teloxide::types::Message);

fn chat_type(chat: &teloxide::types::Chat) -> &'static str {
    if chat.is_private() {
        "private"
    } else if chat.is_channel() {
        "channel"
    } else if chat.is_supergroup() {
        "supergroup"
    } else {
        "group"
    }
}

impl TelegramMessageWrapper<'_> {
    fn reply_context(&self) -> Option<ReplyContext> {
        let replied = self.0.reply_to_message()?;
        let author = replied.from.as_ref();
        Some(ReplyContext {
            id: replied.id.to_string(),
            author_id: author.map(|u| u.id.0 as i64).unwrap_or_default(),
            author_is_bot: author.map(|u| u.is_bot).unwrap_or(false),
            author_name: author.map(|u| u.full_name()).unwrap_or_default(),
            content: replied
                .text()
                .or_else(|| replied.caption())
                .unwrap_or_default()
                .to_string(),
            has_caption: replied.caption().is_some(),
        })
    }
}

impl ToCoreMessage for TelegramMessageWrapper<'_> {
    fn to_core(&self) -> Message {
        let msg = self.0;
        Message {
            id: msg.id.to_string(),
            user: msg
                .from
                .as_ref()
                .map(|u| TelegramUserWrapper(u).to_core())
                .unwrap_or(User {
                    id: 0,
                    username: None,
                    first_name: None,
                    last_name: None,
                }),
            chat: Chat {
                id: msg.chat.id.0,
                chat_type: chat_type(&msg.chat).to_string(),
            },
            content: msg.text().unwrap_or_default().to_string(),
            message_type: if msg.text().is_some() { "text" } else { "other" }.to_string(),
            created_at: msg.date,
            reply_to: self.reply_context(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_telegram_user_wrapper_to_core() {
        let user = teloxide::types::User {
            id: teloxide::types::UserId(123),
            is_bot: false,
            first_name: "Мотя".to_string(),
            last_name: Some("Тушканчик".to_string()),
            username: Some("motya".to_string()),
            language_code: Some("ru".to_string()),
            is_premium: false,
            added_to_attachment_menu: false,
        };

        let core_user = TelegramUserWrapper(&user).to_core();

        assert_eq!(core_user.id, 123);
        assert_eq!(core_user.username, Some("motya".to_string()));
        assert_eq!(core_user.full_name(), "Мотя Тушканчик");
    }
}
