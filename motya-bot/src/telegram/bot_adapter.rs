//! Wraps teloxide::Bot and implements [`crate::core::Bot`]. All text is sent with HTML parse mode.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{
    ChatAction, ChatId, InputFile, InputMedia, InputMediaPhoto, MessageId, ParseMode, Recipient,
    ReplyParameters,
};

use crate::core::{
    parse_message_id, Bot as CoreBot, BotError, Chat, Destination, FileKind, Message,
    OutgoingFile, Result,
};

fn bot_err(e: teloxide::RequestError) -> BotError {
    BotError::Bot(e.to_string())
}

fn recipient(destination: &Destination) -> Recipient {
    match destination {
        Destination::Chat(id) => Recipient::Id(ChatId(*id)),
        Destination::Channel(name) => Recipient::ChannelUsername(name.clone()),
    }
}

fn reply_parameters(message: &Message) -> Result<ReplyParameters> {
    Ok(ReplyParameters::new(MessageId(parse_message_id(&message.id)?)))
}

pub struct TelegramBotAdapter {
    bot: teloxide::Bot,
}

impl TelegramBotAdapter {
    pub fn new(bot: teloxide::Bot) -> Self {
        Self { bot }
    }

    pub fn inner(&self) -> &teloxide::Bot {
        &self.bot
    }
}

#[async_trait]
impl CoreBot for TelegramBotAdapter {
    async fn send_message(&self, destination: &Destination, text: &str) -> Result<()> {
        self.bot
            .send_message(recipient(destination), text)
            .parse_mode(ParseMode::Html)
            .await
            .map_err(bot_err)?;
        Ok(())
    }

    async fn send_message_and_return_id(&self, chat: &Chat, text: &str) -> Result<String> {
        let sent = self
            .bot
            .send_message(ChatId(chat.id), text)
            .parse_mode(ParseMode::Html)
            .await
            .map_err(bot_err)?;
        Ok(sent.id.to_string())
    }

    async fn reply_to(&self, message: &Message, text: &str) -> Result<()> {
        self.bot
            .send_message(ChatId(message.chat.id), text)
            .parse_mode(ParseMode::Html)
            .reply_parameters(reply_parameters(message)?)
            .await
            .map_err(bot_err)?;
        Ok(())
    }

    async fn reply_with_file(&self, message: &Message, file: OutgoingFile) -> Result<()> {
        let chat_id = ChatId(message.chat.id);
        let reply = reply_parameters(message)?;
        let input = InputFile::memory(file.bytes).file_name(file.file_name);
        let caption = file.caption.unwrap_or_default();

        match file.kind {
            FileKind::Photo => {
                self.bot
                    .send_photo(chat_id, input)
                    .caption(caption)
                    .reply_parameters(reply)
                    .await
                    .map_err(bot_err)?;
            }
            FileKind::Document => {
                self.bot
                    .send_document(chat_id, input)
                    .caption(caption)
                    .reply_parameters(reply)
                    .await
                    .map_err(bot_err)?;
            }
            FileKind::Animation => {
                let mut request = self
                    .bot
                    .send_animation(chat_id, input)
                    .caption(caption)
                    .reply_parameters(reply);
                if let (Some(width), Some(height)) = (file.width, file.height) {
                    request = request.width(width).height(height);
                }
                request.await.map_err(bot_err)?;
            }
        }
        Ok(())
    }

    async fn send_media_group(
        &self,
        destination: &Destination,
        images: &[Vec<u8>],
        caption: Option<&str>,
    ) -> Result<()> {
        let media: Vec<InputMedia> = images
            .iter()
            .enumerate()
            .map(|(i, bytes)| {
                let photo = InputMediaPhoto::new(
                    InputFile::memory(bytes.clone()).file_name("image.png"),
                );
                let photo = match caption {
                    Some(text) if i == 0 => photo.caption(text).parse_mode(ParseMode::Html),
                    _ => photo,
                };
                InputMedia::Photo(photo)
            })
            .collect();
        self.bot
            .send_media_group(recipient(destination), media)
            .await
            .map_err(bot_err)?;
        Ok(())
    }

    async fn delete_message(&self, chat: &Chat, message_id: &str) -> Result<()> {
        let id = parse_message_id(message_id)?;
        self.bot
            .delete_message(ChatId(chat.id), MessageId(id))
            .await
            .map_err(bot_err)?;
        Ok(())
    }

    async fn send_typing(&self, chat: &Chat) -> Result<()> {
        self.bot
            .send_chat_action(ChatId(chat.id), ChatAction::Typing)
            .await
            .map_err(bot_err)?;
        Ok(())
    }
}
