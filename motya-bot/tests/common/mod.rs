//! Shared test doubles: a recording [`Bot`], a scripted chat model, stub image and news
//! services, and a builder for [`AppContext`] on a temporary SQLite store.
#![allow(dead_code)]

use std::io::Cursor;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use image::{ImageFormat, Rgba, RgbaImage};
use image_generation_client::{ImageGenerationError, ImageGenerator};
use llm_client::{BackendError, ChatModel, Persona};
use motya_bot::app::{AppContext, Settings};
use motya_bot::storage::SqliteConfigStore;
use motya_bot::{Bot, Chat, Destination, FileKind, Message, OutgoingFile, ReplyContext, Result, User};
use news_client::{NewsError, NewsSource};
use prompt::{ChatMessage, Prompt};
use tempfile::TempDir;
use tokio::sync::mpsc;

pub const ADMIN_ID: i64 = 42;
pub const BOT_ID: i64 = 999;
pub const PLACEHOLDER_ID: &str = "100";

/// One call made through the [`Bot`] trait.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Send { destination: Destination, text: String },
    Placeholder { chat_id: i64, text: String },
    Reply { chat_id: i64, text: String },
    File {
        kind: FileKind,
        file_name: String,
        caption: Option<String>,
        size: Option<(u32, u32)>,
    },
    MediaGroup {
        destination: Destination,
        images: usize,
        caption: Option<String>,
    },
    Delete { chat_id: i64, message_id: String },
    Typing { chat_id: i64 },
}

/// Records every call on an unbounded channel.
pub struct MockBot {
    tx: mpsc::UnboundedSender<Call>,
}

impl MockBot {
    pub fn with_receiver() -> (Arc<Self>, mpsc::UnboundedReceiver<Call>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(Self { tx }), rx)
    }

    fn record(&self, call: Call) {
        let _ = self.tx.send(call);
    }
}

#[async_trait]
impl Bot for MockBot {
    async fn send_message(&self, destination: &Destination, text: &str) -> Result<()> {
        self.record(Call::Send {
            destination: destination.clone(),
            text: text.to_string(),
        });
        Ok(())
    }

    async fn send_message_and_return_id(&self, chat: &Chat, text: &str) -> Result<String> {
        self.record(Call::Placeholder {
            chat_id: chat.id,
            text: text.to_string(),
        });
        Ok(PLACEHOLDER_ID.to_string())
    }

    async fn reply_to(&self, message: &Message, text: &str) -> Result<()> {
        self.record(Call::Reply {
            chat_id: message.chat.id,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn reply_with_file(&self, _message: &Message, file: OutgoingFile) -> Result<()> {
        self.record(Call::File {
            kind: file.kind,
            file_name: file.file_name,
            caption: file.caption,
            size: file.width.zip(file.height),
        });
        Ok(())
    }

    async fn send_media_group(
        &self,
        destination: &Destination,
        images: &[Vec<u8>],
        caption: Option<&str>,
    ) -> Result<()> {
        self.record(Call::MediaGroup {
            destination: destination.clone(),
            images: images.len(),
            caption: caption.map(str::to_string),
        });
        Ok(())
    }

    async fn delete_message(&self, chat: &Chat, message_id: &str) -> Result<()> {
        self.record(Call::Delete {
            chat_id: chat.id,
            message_id: message_id.to_string(),
        });
        Ok(())
    }

    async fn send_typing(&self, chat: &Chat) -> Result<()> {
        self.record(Call::Typing { chat_id: chat.id });
        Ok(())
    }
}

/// Everything recorded so far.
pub fn drain(rx: &mut mpsc::UnboundedReceiver<Call>) -> Vec<Call> {
    let mut calls = Vec::new();
    while let Ok(call) = rx.try_recv() {
        calls.push(call);
    }
    calls
}

/// Texts of replies and sent messages, in order.
pub fn texts(calls: &[Call]) -> Vec<String> {
    calls
        .iter()
        .filter_map(|c| match c {
            Call::Reply { text, .. } | Call::Send { text, .. } => Some(text.clone()),
            _ => None,
        })
        .collect()
}

/// Answers per persona and records every request.
#[derive(Default)]
pub struct StubModel {
    pub prompts: Mutex<Vec<(Persona, String)>>,
    pub histories: Mutex<Vec<Vec<ChatMessage>>>,
    pub resets: Mutex<Vec<String>>,
    pub fail_with: Mutex<Option<BackendError>>,
}

impl StubModel {
    pub fn prompts(&self) -> Vec<(Persona, String)> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn last_history(&self) -> Option<Vec<ChatMessage>> {
        self.histories.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl ChatModel for StubModel {
    async fn answer_as(
        &self,
        persona: Persona,
        text: &str,
    ) -> std::result::Result<String, BackendError> {
        if let Some(err) = self.fail_with.lock().unwrap().clone() {
            return Err(err);
        }
        self.prompts
            .lock()
            .unwrap()
            .push((persona, text.to_string()));
        Ok(match persona {
            Persona::Main => format!("Ответ на: {}", text),
            Persona::Themes => "идея один, идея два".to_string(),
            Persona::Pictures => "поле; тополь; радуга; море".to_string(),
        })
    }

    async fn answer_with_history(
        &self,
        text: &str,
        history: &[ChatMessage],
    ) -> std::result::Result<String, BackendError> {
        self.histories.lock().unwrap().push(history.to_vec());
        self.answer(text).await
    }

    async fn reset_model(&self, prompt: &str) -> std::result::Result<(), BackendError> {
        self.resets.lock().unwrap().push(prompt.to_string());
        Ok(())
    }
}

pub fn png() -> Vec<u8> {
    let img = RgbaImage::from_pixel(2, 2, Rgba([10, 200, 30, 255]));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).unwrap();
    buf.into_inner()
}

/// One tiny PNG per prompt; records the prompts.
#[derive(Default)]
pub struct StubImageGenerator {
    pub requests: Mutex<Vec<Prompt>>,
    pub fail_with: Mutex<Option<ImageGenerationError>>,
}

impl StubImageGenerator {
    pub fn requests(&self) -> Vec<Prompt> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageGenerator for StubImageGenerator {
    async fn get_images(
        &self,
        prompts: &[Prompt],
    ) -> std::result::Result<Vec<Vec<u8>>, ImageGenerationError> {
        if let Some(err) = self.fail_with.lock().unwrap().clone() {
            return Err(err);
        }
        self.requests.lock().unwrap().extend(prompts.iter().cloned());
        Ok(prompts.iter().map(|_| png()).collect())
    }
}

/// Serves a fixed list of links, newest first.
pub struct StubNews {
    pub links: Vec<String>,
}

#[async_trait]
impl NewsSource for StubNews {
    async fn latest_link(
        &self,
        excluded: &[String],
    ) -> std::result::Result<Option<String>, NewsError> {
        Ok(self.links.iter().find(|l| !excluded.contains(l)).cloned())
    }
}

pub fn settings() -> Settings {
    Settings {
        admin_id: ADMIN_ID,
        channel: "@motya_blog".to_string(),
        blog_author_name: "Telegram".to_string(),
        chat_history_size: 10,
        session_ttl: None,
        gif_max_frames: 24,
        throttle_rate_message: Duration::ZERO,
        throttle_rate_image: Duration::ZERO,
    }
}

pub struct TestEnv {
    pub ctx: Arc<AppContext>,
    pub rx: mpsc::UnboundedReceiver<Call>,
    pub model: Arc<StubModel>,
    pub images: Arc<StubImageGenerator>,
    pub store: Arc<SqliteConfigStore>,
    _dir: TempDir,
}

pub struct TestEnvBuilder {
    settings: Settings,
    with_images: bool,
}

impl TestEnvBuilder {
    pub fn new() -> Self {
        Self {
            settings: settings(),
            with_images: true,
        }
    }

    pub fn without_images(mut self) -> Self {
        self.with_images = false;
        self
    }

    pub fn settings(mut self, f: impl FnOnce(&mut Settings)) -> Self {
        f(&mut self.settings);
        self
    }

    pub async fn build(self) -> TestEnv {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("motya.db");
        let store = Arc::new(
            SqliteConfigStore::new(db_path.to_str().unwrap())
                .await
                .unwrap(),
        );
        let (bot, rx) = MockBot::with_receiver();
        let model = Arc::new(StubModel::default());
        let images = Arc::new(StubImageGenerator::default());
        let news = Arc::new(StubNews {
            links: vec![
                "https://positivnews.ru/a".to_string(),
                "https://positivnews.ru/b".to_string(),
            ],
        });
        let image_generator: Option<Arc<dyn ImageGenerator>> = if self.with_images {
            Some(images.clone())
        } else {
            None
        };
        let ctx = Arc::new(AppContext::new(
            bot,
            model.clone(),
            image_generator,
            news,
            store.clone(),
            self.settings,
        ));
        ctx.set_bot_user_id(BOT_ID).await;
        TestEnv {
            ctx,
            rx,
            model,
            images,
            store,
            _dir: dir,
        }
    }
}

pub fn user(id: i64) -> User {
    User {
        id,
        username: Some(format!("user{}", id)),
        first_name: Some("Тест".to_string()),
        last_name: None,
    }
}

pub fn private_message(user_id: i64, text: &str) -> Message {
    Message::text("1", user(user_id), Chat::private(user_id), text)
}

pub fn group_message(user_id: i64, chat_id: i64, text: &str) -> Message {
    Message::text("1", user(user_id), Chat::group(chat_id), text)
}

pub fn reply(author_id: i64, author_name: &str, content: &str, has_caption: bool) -> ReplyContext {
    ReplyContext {
        id: "7".to_string(),
        author_id,
        author_is_bot: author_id == BOT_ID,
        author_name: author_name.to_string(),
        content: content.to_string(),
        has_caption,
    }
}
