//! Bot configuration documents: themes, image styles, prompts, per-user preferences, news history.
//!
//! [`ConfigStore`] is the seam handlers and jobs use; [`SqliteConfigStore`] keeps bot-wide values
//! as JSON under a key, per-user preferences in their own table and seen news URLs in another.

use async_trait::async_trait;
use chrono::Utc;
use prompt::Resolution;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{info, instrument};

use super::error::StorageError;
use super::sqlite_pool::SqlitePoolManager;

const THEMES_KEY: &str = "themes";
const IMAGE_STYLES_KEY: &str = "image_styles";
const MAIN_PROMPT_KEY: &str = "main_prompt";
const HELPER_PROMPT_KEY: &str = "helper_prompt";

/// Per-user image preferences.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserConfig {
    pub style: String,
    pub resolution: Resolution,
    /// Description of the last image drawn for the user.
    pub last_image: Option<String>,
}

#[async_trait]
pub trait ConfigStore: Send + Sync {
    async fn themes(&self) -> Result<Vec<String>, StorageError>;
    /// Appends themes, skipping blanks and ones already stored.
    async fn add_themes(&self, themes: &[String]) -> Result<(), StorageError>;
    async fn image_styles(&self) -> Result<Vec<String>, StorageError>;
    async fn set_image_styles(&self, styles: &[String]) -> Result<(), StorageError>;
    async fn main_prompt(&self) -> Result<Option<String>, StorageError>;
    async fn set_main_prompt(&self, prompt: &str) -> Result<(), StorageError>;
    async fn helper_prompt(&self) -> Result<Option<String>, StorageError>;
    async fn set_helper_prompt(&self, prompt: &str) -> Result<(), StorageError>;

    /// Stored preferences, or defaults for unknown users.
    async fn user_config(&self, user_id: i64) -> Result<UserConfig, StorageError>;
    async fn set_style(&self, user_id: i64, style: &str) -> Result<(), StorageError>;
    async fn set_resolution(&self, user_id: i64, resolution: Resolution)
        -> Result<(), StorageError>;
    async fn set_last_image(&self, user_id: i64, description: &str) -> Result<(), StorageError>;

    /// News article URLs already posted.
    async fn excluded_urls(&self) -> Result<Vec<String>, StorageError>;
    async fn add_article_url(&self, url: &str) -> Result<(), StorageError>;
}

#[derive(Clone)]
pub struct SqliteConfigStore {
    pool_manager: SqlitePoolManager,
}

impl SqliteConfigStore {
    pub async fn new(database_path: &str) -> Result<Self, StorageError> {
        let pool_manager = SqlitePoolManager::new(database_path).await?;
        let store = Self { pool_manager };
        store.init().await?;
        Ok(store)
    }

    async fn init(&self) -> Result<(), StorageError> {
        info!("Creating configuration tables if not exist");
        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS bot_config (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS user_config (
                user_id INTEGER PRIMARY KEY,
                style TEXT NOT NULL DEFAULT '',
                width INTEGER NOT NULL DEFAULT 768,
                height INTEGER NOT NULL DEFAULT 768,
                last_image TEXT
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS news_history (
                url TEXT PRIMARY KEY,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    async fn get_value<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM bot_config WHERE key = ?")
            .bind(key)
            .fetch_optional(self.pool_manager.pool())
            .await?;
        row.map(|(raw,)| {
            serde_json::from_str(&raw).map_err(|e| StorageError::Corrupt {
                key: key.to_string(),
                reason: e.to_string(),
            })
        })
        .transpose()
    }

    async fn set_value<T: Serialize + Sync>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value).map_err(|e| StorageError::Corrupt {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        sqlx::query(
            "INSERT INTO bot_config (key, value) VALUES (?, ?) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(key)
        .bind(raw)
        .execute(self.pool_manager.pool())
        .await?;
        Ok(())
    }

    async fn ensure_user(&self, user_id: i64) -> Result<(), StorageError> {
        sqlx::query("INSERT OR IGNORE INTO user_config (user_id) VALUES (?)")
            .bind(user_id)
            .execute(self.pool_manager.pool())
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ConfigStore for SqliteConfigStore {
    async fn themes(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.get_value(THEMES_KEY).await?.unwrap_or_default())
    }

    #[instrument(skip(self, themes), fields(count = themes.len()))]
    async fn add_themes(&self, themes: &[String]) -> Result<(), StorageError> {
        let mut current: Vec<String> = self.themes().await?;
        for theme in themes {
            let theme = theme.trim();
            if !theme.is_empty() && !current.iter().any(|t| t == theme) {
                current.push(theme.to_string());
            }
        }
        self.set_value(THEMES_KEY, &current).await
    }

    async fn image_styles(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.get_value(IMAGE_STYLES_KEY).await?.unwrap_or_default())
    }

    async fn set_image_styles(&self, styles: &[String]) -> Result<(), StorageError> {
        self.set_value(IMAGE_STYLES_KEY, &styles).await
    }

    async fn main_prompt(&self) -> Result<Option<String>, StorageError> {
        self.get_value(MAIN_PROMPT_KEY).await
    }

    async fn set_main_prompt(&self, prompt: &str) -> Result<(), StorageError> {
        self.set_value(MAIN_PROMPT_KEY, &prompt).await
    }

    async fn helper_prompt(&self) -> Result<Option<String>, StorageError> {
        self.get_value(HELPER_PROMPT_KEY).await
    }

    async fn set_helper_prompt(&self, prompt: &str) -> Result<(), StorageError> {
        self.set_value(HELPER_PROMPT_KEY, &prompt).await
    }

    async fn user_config(&self, user_id: i64) -> Result<UserConfig, StorageError> {
        let row: Option<(String, i64, i64, Option<String>)> = sqlx::query_as(
            "SELECT style, width, height, last_image FROM user_config WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(self.pool_manager.pool())
        .await?;

        Ok(match row {
            Some((style, width, height, last_image)) => UserConfig {
                style,
                resolution: Resolution::new(width as u32, height as u32),
                last_image,
            },
            None => UserConfig::default(),
        })
    }

    async fn set_style(&self, user_id: i64, style: &str) -> Result<(), StorageError> {
        self.ensure_user(user_id).await?;
        sqlx::query("UPDATE user_config SET style = ? WHERE user_id = ?")
            .bind(style)
            .bind(user_id)
            .execute(self.pool_manager.pool())
            .await?;
        Ok(())
    }

    async fn set_resolution(
        &self,
        user_id: i64,
        resolution: Resolution,
    ) -> Result<(), StorageError> {
        self.ensure_user(user_id).await?;
        sqlx::query("UPDATE user_config SET width = ?, height = ? WHERE user_id = ?")
            .bind(resolution.width as i64)
            .bind(resolution.height as i64)
            .bind(user_id)
            .execute(self.pool_manager.pool())
            .await?;
        Ok(())
    }

    async fn set_last_image(&self, user_id: i64, description: &str) -> Result<(), StorageError> {
        self.ensure_user(user_id).await?;
        sqlx::query("UPDATE user_config SET last_image = ? WHERE user_id = ?")
            .bind(description)
            .bind(user_id)
            .execute(self.pool_manager.pool())
            .await?;
        Ok(())
    }

    async fn excluded_urls(&self) -> Result<Vec<String>, StorageError> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT url FROM news_history ORDER BY created_at")
                .fetch_all(self.pool_manager.pool())
                .await?;
        Ok(rows.into_iter().map(|(url,)| url).collect())
    }

    async fn add_article_url(&self, url: &str) -> Result<(), StorageError> {
        sqlx::query("INSERT OR IGNORE INTO news_history (url, created_at) VALUES (?, ?)")
            .bind(url)
            .bind(Utc::now().to_rfc3339())
            .execute(self.pool_manager.pool())
            .await?;
        Ok(())
    }
}
