//! # LLM client abstraction
//!
//! Defines the [`ChatModel`] capability the bot talks to and the [`ModelBackend`] transport it is
//! built on. [`AnswerService`] implements [`ChatModel`] for any backend by combining dialog
//! windowing ([`window`]) with a [`RetryExecutor`] driven by a per-failure-kind policy table.
//!
//! Backends:
//! - [`OpenAiBackend`]: OpenAI-compatible chat completions (official API or a completion relay);
//!   takes role-tagged history natively.
//! - [`MindsDbBackend`]: hosted predictive-SQL models queried over the MySQL wire protocol;
//!   takes a single text query, so history is folded into an instruction template.

use async_trait::async_trait;
use prompt::ChatMessage;

mod answer;
mod backend;
mod config;
mod mindsdb;
mod openai_llm;
pub mod retry;
pub mod window;

pub use answer::{AnswerService, CONN_ERR_MSG};
pub use openai_client::mask_token;
pub use backend::{BackendError, ModelBackend, Persona};
pub use config::{connect_chat_model, BackendKind, EnvLlmConfig};
pub use mindsdb::MindsDbBackend;
pub use openai_llm::{
    OpenAiBackend, PersonaPrompts, DEFAULT_MAIN_PROMPT, DEFAULT_PICTURES_PROMPT,
    DEFAULT_THEMES_PROMPT,
};
pub use retry::{Classify, FailureKind, RetryDecision, RetryExecutor, RetryPolicy, RulePolicy};

/// What the bot needs from a language model.
///
/// Implemented by [`AnswerService`]; handlers, jobs and the content generator only see this trait.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Answers a single prompt as the main persona.
    async fn answer(&self, text: &str) -> Result<String, BackendError> {
        self.answer_as(Persona::Main, text).await
    }

    /// Answers a single prompt as the given persona.
    async fn answer_as(&self, persona: Persona, text: &str) -> Result<String, BackendError>;

    /// Answers `text` taking the trailing part of `history` that fits the dialog budget into account.
    /// The caller appends the exchange to history afterwards.
    async fn answer_with_history(
        &self,
        text: &str,
        history: &[ChatMessage],
    ) -> Result<String, BackendError>;

    /// Replaces the main persona's prompt.
    async fn reset_model(&self, prompt: &str) -> Result<(), BackendError>;
}
