//! Model configuration from environment variables, and assembly of the [`AnswerService`].

use std::env;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use openai_client::{mask_token, OpenAIClient};
use tracing::{info, warn};

use crate::answer::AnswerService;
use crate::mindsdb::MindsDbBackend;
use crate::openai_llm::OpenAiBackend;
use crate::retry::{RetryExecutor, RulePolicy};
use crate::window::DEFAULT_HISTORY_CHAR_BUDGET;

/// Which hosted service answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    OpenAi,
    MindsDb,
}

impl std::str::FromStr for BackendKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(BackendKind::OpenAi),
            "mindsdb" => Ok(BackendKind::MindsDb),
            other => bail!("Unknown MODEL_BACKEND: {}", other),
        }
    }
}

/// Model settings loaded from environment variables.
#[derive(Debug, Clone)]
pub struct EnvLlmConfig {
    pub backend: BackendKind,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub model: String,
    pub mindsdb_url: Option<String>,
    pub retry_max_fails: u32,
    pub retry_query_delay: Duration,
    pub retry_other_max_fails: u32,
    pub history_char_budget: usize,
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{} is invalid: {}", name, e)),
        _ => Ok(default),
    }
}

fn non_empty(name: &str) -> Option<String> {
    env::var(name).ok().filter(|s| !s.trim().is_empty())
}

impl EnvLlmConfig {
    pub fn from_env() -> Result<Self> {
        let backend = match non_empty("MODEL_BACKEND") {
            Some(raw) => raw.parse()?,
            None => BackendKind::OpenAi,
        };
        let retry_query_delay_secs: u64 =
            parse_var("RETRY_QUERY_DELAY_SECS", 1).context("Failed to load retry settings")?;
        Ok(Self {
            backend,
            openai_api_key: non_empty("OPENAI_API_KEY"),
            openai_base_url: non_empty("OPENAI_BASE_URL")
                .unwrap_or_else(|| "https://api.openai.com/v1".to_string()),
            model: non_empty("MODEL").unwrap_or_else(|| "gpt-3.5-turbo".to_string()),
            mindsdb_url: non_empty("MINDSDB_URL"),
            retry_max_fails: parse_var("RETRY_MAX_FAILS", 5)?,
            retry_query_delay: Duration::from_secs(retry_query_delay_secs),
            retry_other_max_fails: parse_var("RETRY_OTHER_MAX_FAILS", 0)?,
            history_char_budget: parse_var("HISTORY_CHAR_BUDGET", DEFAULT_HISTORY_CHAR_BUDGET)?,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.history_char_budget == 0 {
            bail!("HISTORY_CHAR_BUDGET must be positive");
        }
        Ok(())
    }

    pub fn retry_executor(&self) -> RetryExecutor {
        let policy = RulePolicy::standard(
            self.retry_max_fails,
            self.retry_query_delay,
            self.retry_other_max_fails,
        );
        RetryExecutor::new(policy, self.retry_max_fails)
    }
}

/// Builds the answer service for the configured backend. A backend that cannot be set up
/// (missing key, unreachable database) yields a degraded service instead of an error.
pub async fn connect_chat_model(cfg: &EnvLlmConfig) -> AnswerService {
    let executor = cfg.retry_executor();
    let service = match cfg.backend {
        BackendKind::OpenAi => match &cfg.openai_api_key {
            Some(key) => {
                info!(
                    base_url = %cfg.openai_base_url,
                    model = %cfg.model,
                    api_key = %mask_token(key),
                    "Using OpenAI-compatible backend"
                );
                let client = OpenAIClient::with_base_url(key.clone(), cfg.openai_base_url.clone());
                AnswerService::new(Arc::new(OpenAiBackend::new(client, cfg.model.clone())), executor)
            }
            None => {
                warn!("OPENAI_API_KEY not set, answering in degraded mode");
                AnswerService::degraded(executor)
            }
        },
        BackendKind::MindsDb => match &cfg.mindsdb_url {
            Some(url) => match MindsDbBackend::connect(url).await {
                Ok(backend) => AnswerService::new(Arc::new(backend), executor),
                Err(e) => {
                    warn!(error = %e, "Connection to MindsDB failed, answering in degraded mode");
                    AnswerService::degraded(executor)
                }
            },
            None => {
                warn!("MINDSDB_URL not set, answering in degraded mode");
                AnswerService::degraded(executor)
            }
        },
    };
    service.with_history_budget(cfg.history_char_budget)
}
