//! Model backend transport trait and its error type.

use async_trait::async_trait;
use prompt::ChatMessage;
use thiserror::Error;

use crate::retry::{Classify, FailureKind};

/// Which prompt the backend answers with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Persona {
    /// The bot's personality; answers users and writes posts.
    Main,
    /// Turns a theme into a comma-separated list of post ideas.
    Themes,
    /// Turns a post into a semicolon-separated list of picture ideas.
    Pictures,
}

impl Persona {
    pub fn as_str(&self) -> &'static str {
        match self {
            Persona::Main => "main",
            Persona::Themes => "themes",
            Persona::Pictures => "pictures",
        }
    }
}

/// A failed backend call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The backend rejected the query (malformed, unsupported, model not ready).
    #[error("Backend query error: {0}")]
    Query(String),

    /// The backend answered without a result row or content.
    #[error("Backend returned no result")]
    EmptyResult,

    /// The backend could not be reached.
    #[error("Backend unreachable: {0}")]
    Connectivity(String),

    #[error("Backend error: {0}")]
    Other(String),
}

impl Classify for BackendError {
    fn failure_kind(&self) -> FailureKind {
        match self {
            BackendError::Query(_) => FailureKind::Query,
            BackendError::EmptyResult => FailureKind::EmptyResult,
            BackendError::Connectivity(_) => FailureKind::Connectivity,
            BackendError::Other(_) => FailureKind::Unclassified,
        }
    }
}

/// One hosted model service. Each call is a single network round trip; retries live in
/// [`crate::RetryExecutor`].
#[async_trait]
pub trait ModelBackend: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// True when `complete` understands role-tagged history. Otherwise callers send a single
    /// user message and fold history into its text.
    fn native_history(&self) -> bool {
        false
    }

    /// Returns the model's reply to `messages` (the last one is the user's turn).
    async fn complete(&self, persona: Persona, messages: &[ChatMessage])
        -> Result<String, BackendError>;

    /// Replaces the prompt behind `persona`.
    async fn reset(&self, persona: Persona, prompt: &str) -> Result<(), BackendError>;
}
