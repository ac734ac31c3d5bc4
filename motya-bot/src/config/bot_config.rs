//! BotConfig: every section loaded from env. Call `validate()` after `load()` to fail fast.

use anyhow::Result;
use llm_client::EnvLlmConfig;

use super::{BaseConfig, LimitsConfig, ScheduleConfig, ServicesConfig};

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub base: BaseConfig,
    pub model: EnvLlmConfig,
    pub services: ServicesConfig,
    pub schedule: ScheduleConfig,
    pub limits: LimitsConfig,
}

impl BotConfig {
    /// Load full config from environment variables. If `token` is provided it overrides BOT_TOKEN.
    pub fn load(token: Option<String>) -> Result<Self> {
        Ok(Self {
            base: BaseConfig::load(token)?,
            model: EnvLlmConfig::from_env()?,
            services: ServicesConfig::from_env(),
            schedule: ScheduleConfig::from_env()?,
            limits: LimitsConfig::from_env()?,
        })
    }

    pub fn validate(&self) -> Result<()> {
        self.base.validate()?;
        self.model.validate()?;
        self.services.validate()?;
        self.schedule.validate()?;
        self.limits.validate()
    }

    pub fn bot_token(&self) -> &str {
        &self.base.bot_token
    }
    pub fn database_url(&self) -> &str {
        &self.base.database_url
    }
    pub fn log_file(&self) -> &str {
        &self.base.log_file
    }
    pub fn telegram_api_url(&self) -> Option<&str> {
        self.base.telegram_api_url.as_deref()
    }
}
