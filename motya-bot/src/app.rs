//! Application context: every shared service, built once at startup and passed as
//! `Arc<AppContext>` into handlers and jobs.

use std::sync::Arc;
use std::time::Duration;

use image_generation_client::ImageGenerator;
use llm_client::ChatModel;
use news_client::NewsSource;
use tokio::sync::RwLock;

use crate::config::BotConfig;
use crate::content::ContentGenerator;
use crate::core::Bot;
use crate::handlers::Throttle;
use crate::session::SessionStore;
use crate::storage::ConfigStore;

/// Values handlers read on every message.
#[derive(Debug, Clone)]
pub struct Settings {
    pub admin_id: i64,
    /// Channel username scheduled posts go to.
    pub channel: String,
    /// Display name of channel posts forwarded into the discussion group.
    pub blog_author_name: String,
    pub chat_history_size: usize,
    pub session_ttl: Option<Duration>,
    pub gif_max_frames: u32,
    pub throttle_rate_message: Duration,
    pub throttle_rate_image: Duration,
}

impl Settings {
    pub fn from_config(config: &BotConfig) -> Self {
        Self {
            admin_id: config.base.admin_id,
            channel: config.base.channel.clone(),
            blog_author_name: config.base.blog_author_name.clone(),
            chat_history_size: config.limits.chat_history_size,
            session_ttl: config.limits.session_ttl,
            gif_max_frames: config.limits.gif_max_frames,
            throttle_rate_message: config.limits.throttle_rate_message,
            throttle_rate_image: config.limits.throttle_rate_image,
        }
    }
}

pub struct AppContext {
    pub bot: Arc<dyn Bot>,
    pub model: Arc<dyn ChatModel>,
    /// `None` when no image service is configured.
    pub images: Option<Arc<dyn ImageGenerator>>,
    pub generator: ContentGenerator,
    pub store: Arc<dyn ConfigStore>,
    pub sessions: SessionStore,
    pub throttle: Throttle,
    pub settings: Settings,
    /// Filled from `getMe` once the bot is connected.
    bot_user_id: RwLock<Option<i64>>,
}

impl AppContext {
    pub fn new(
        bot: Arc<dyn Bot>,
        model: Arc<dyn ChatModel>,
        images: Option<Arc<dyn ImageGenerator>>,
        news: Arc<dyn NewsSource>,
        store: Arc<dyn ConfigStore>,
        settings: Settings,
    ) -> Self {
        let generator = ContentGenerator::new(model.clone(), images.clone(), news);
        Self {
            bot,
            model,
            images,
            generator,
            store,
            sessions: SessionStore::new(settings.chat_history_size, settings.session_ttl),
            throttle: Throttle::new(),
            settings,
            bot_user_id: RwLock::new(None),
        }
    }

    pub async fn set_bot_user_id(&self, id: i64) {
        *self.bot_user_id.write().await = Some(id);
    }

    pub async fn bot_user_id(&self) -> Option<i64> {
        *self.bot_user_id.read().await
    }

    pub fn is_admin(&self, user_id: i64) -> bool {
        user_id == self.settings.admin_id
    }
}
