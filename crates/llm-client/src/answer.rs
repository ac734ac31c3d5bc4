//! [`AnswerService`]: the [`ChatModel`] implementation over any [`ModelBackend`].

use std::sync::Arc;

use async_trait::async_trait;
use prompt::{dialog_prompt, format_dialog, ChatMessage};
use tracing::{info, instrument, warn};

use crate::backend::{BackendError, ModelBackend, Persona};
use crate::retry::RetryExecutor;
use crate::window::{window_history, DEFAULT_HISTORY_CHAR_BUDGET};
use crate::ChatModel;

/// Reply used while no backend is available.
pub const CONN_ERR_MSG: &str =
    "не могу сейчас ответить, я в отпуске 😓 используй команду /draw, чтобы порисовать!";

/// Answers prompts through a backend, retrying failures per the executor's policy and bounding
/// history by a character budget.
#[derive(Clone)]
pub struct AnswerService {
    backend: Option<Arc<dyn ModelBackend>>,
    executor: RetryExecutor,
    history_budget: usize,
}

impl AnswerService {
    pub fn new(backend: Arc<dyn ModelBackend>, executor: RetryExecutor) -> Self {
        Self {
            backend: Some(backend),
            executor,
            history_budget: DEFAULT_HISTORY_CHAR_BUDGET,
        }
    }

    /// A service without a backend: every answer is [`CONN_ERR_MSG`].
    pub fn degraded(executor: RetryExecutor) -> Self {
        Self {
            backend: None,
            executor,
            history_budget: DEFAULT_HISTORY_CHAR_BUDGET,
        }
    }

    pub fn with_history_budget(mut self, budget: usize) -> Self {
        self.history_budget = budget;
        self
    }

    pub fn is_degraded(&self) -> bool {
        self.backend.is_none()
    }

    /// True when the backend keeps role-tagged history itself (system prompts live in the client).
    pub fn has_native_history(&self) -> bool {
        self.backend.as_ref().is_some_and(|b| b.native_history())
    }

    /// Replaces any persona's prompt. [`ChatModel::reset_model`] covers the main persona.
    pub async fn reset_persona(&self, persona: Persona, prompt: &str) -> Result<(), BackendError> {
        match &self.backend {
            Some(backend) => backend.reset(persona, prompt).await,
            None => Ok(()),
        }
    }

    async fn complete(
        &self,
        backend: &Arc<dyn ModelBackend>,
        persona: Persona,
        messages: Vec<ChatMessage>,
    ) -> Result<String, BackendError> {
        let messages = messages.as_slice();
        self.executor
            .execute(move || backend.complete(persona, messages))
            .await
    }
}

#[async_trait]
impl ChatModel for AnswerService {
    #[instrument(skip(self, text), fields(persona = persona.as_str()))]
    async fn answer_as(&self, persona: Persona, text: &str) -> Result<String, BackendError> {
        let Some(backend) = &self.backend else {
            return Ok(CONN_ERR_MSG.to_string());
        };
        self.complete(backend, persona, vec![ChatMessage::user(text)])
            .await
    }

    #[instrument(skip(self, text, history), fields(history_len = history.len()))]
    async fn answer_with_history(
        &self,
        text: &str,
        history: &[ChatMessage],
    ) -> Result<String, BackendError> {
        let window = window_history(history, self.history_budget);
        info!(window_len = window.len(), "Dialog window prepared");

        if window.is_empty() {
            return self.answer(text).await;
        }
        let Some(backend) = &self.backend else {
            return Ok(CONN_ERR_MSG.to_string());
        };

        if backend.native_history() {
            let mut messages = window.to_vec();
            messages.push(ChatMessage::user(text));
            self.complete(backend, Persona::Main, messages).await
        } else {
            let prompt = dialog_prompt(text, &format_dialog(window));
            self.answer(&prompt).await
        }
    }

    async fn reset_model(&self, prompt: &str) -> Result<(), BackendError> {
        match &self.backend {
            Some(backend) => {
                info!(backend = backend.name(), "Resetting main persona prompt");
                backend.reset(Persona::Main, prompt).await
            }
            None => {
                warn!("No backend available, prompt reset skipped");
                Ok(())
            }
        }
    }
}
