//! # OpenAI API client
//!
//! Thin wrapper around [async-openai] for chat completion against any OpenAI-compatible endpoint
//! (the official API or a completion relay). Failures come back as [`CompletionError`] so callers
//! can tell a rejected request from an unreachable endpoint or an empty answer.

use async_openai::config::OpenAIConfig;
use async_openai::error::OpenAIError;
use async_openai::{types::CreateChatCompletionRequestArgs, Client};
use std::sync::Arc;
use thiserror::Error;

pub use async_openai::types::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
};

/// Hides a secret for log output, keeping its first 7 and last 4 characters. Secrets of 11
/// characters or fewer are hidden entirely. Counts characters, not bytes.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 11 {
        return "***".to_string();
    }
    let head: String = chars[..7].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}***{tail}")
}

/// Why a chat completion did not produce text.
#[derive(Error, Debug)]
pub enum CompletionError {
    /// The endpoint answered with an API error (bad request, unknown model, quota, ...).
    #[error("API error: {0}")]
    Api(String),

    /// The endpoint could not be reached (connect failure or timeout).
    #[error("Connection error: {0}")]
    Connection(String),

    /// The endpoint answered but without usable content.
    #[error("Empty response")]
    EmptyResponse,

    /// The request could not be built or the response could not be decoded.
    #[error("Invalid request or response: {0}")]
    Invalid(String),
}

impl From<OpenAIError> for CompletionError {
    fn from(e: OpenAIError) -> Self {
        match e {
            OpenAIError::ApiError(api) => CompletionError::Api(api.to_string()),
            OpenAIError::Reqwest(re) if re.is_connect() || re.is_timeout() => {
                CompletionError::Connection(re.to_string())
            }
            OpenAIError::Reqwest(re) => CompletionError::Api(re.to_string()),
            OpenAIError::JSONDeserialize(de) => CompletionError::Invalid(de.to_string()),
            other => CompletionError::Invalid(other.to_string()),
        }
    }
}

/// Chat client bound to one endpoint. The key is kept only to log it masked.
#[derive(Clone)]
pub struct OpenAIClient {
    client: Arc<Client<OpenAIConfig>>,
    masked_key: String,
}

impl OpenAIClient {
    /// Client for `base_url`, which may be the official API or a compatible relay.
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        let masked_key = mask_token(&api_key);
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(base_url);
        Self {
            client: Arc::new(Client::with_config(config)),
            masked_key,
        }
    }

    /// Sends a chat completion request and returns the assistant reply.
    ///
    /// Logs masked API key and token usage. A response without choices or with blank content is
    /// [`CompletionError::EmptyResponse`].
    pub async fn chat_completion(
        &self,
        model: &str,
        messages: Vec<ChatCompletionRequestMessage>,
    ) -> Result<String, CompletionError> {
        tracing::info!(
            model = %model,
            message_count = messages.len(),
            api_key = %self.masked_key,
            "Chat completion request"
        );

        let request = CreateChatCompletionRequestArgs::default()
            .model(model)
            .messages(messages)
            .build()?;

        if let Ok(json) = serde_json::to_string(&request) {
            tracing::debug!(request_json = %json, "Chat completion request body");
        }

        let response = self.client.chat().create(request).await?;

        if let Some(ref u) = response.usage {
            tracing::info!(
                prompt_tokens = u.prompt_tokens,
                completion_tokens = u.completion_tokens,
                total_tokens = u.total_tokens,
                "Chat completion usage"
            );
        }

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .filter(|text| !text.trim().is_empty());

        content.ok_or(CompletionError::EmptyResponse)
    }
}
