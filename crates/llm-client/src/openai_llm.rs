//! [`ModelBackend`] over an OpenAI-compatible chat completions endpoint. Each persona is a
//! system message prepended to the request.

use async_trait::async_trait;
use openai_client::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    CompletionError, OpenAIClient,
};
use prompt::{ChatMessage, MessageRole};
use tokio::sync::RwLock;
use tracing::{info, instrument};

use crate::backend::{BackendError, ModelBackend, Persona};

pub const DEFAULT_MAIN_PROMPT: &str = "Ты Мотя, маленький дружелюбный тушканчик, который ведёт свой блог. \
Отвечай коротко и по-русски. Не используй Markdown, только простой текст.";

pub const DEFAULT_THEMES_PROMPT: &str =
    "Придумай идеи для постов на заданную тему. Перечисли их через запятую, без нумерации.";

pub const DEFAULT_PICTURES_PROMPT: &str = "Придумай, какие картинки подойдут к посту. \
Перечисли их через точку с запятой, без нумерации. Например: поля; тополя; радуга";

/// System prompts, one per persona.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonaPrompts {
    pub main: String,
    pub themes: String,
    pub pictures: String,
}

impl Default for PersonaPrompts {
    fn default() -> Self {
        Self {
            main: DEFAULT_MAIN_PROMPT.to_string(),
            themes: DEFAULT_THEMES_PROMPT.to_string(),
            pictures: DEFAULT_PICTURES_PROMPT.to_string(),
        }
    }
}

impl PersonaPrompts {
    fn get(&self, persona: Persona) -> &str {
        match persona {
            Persona::Main => &self.main,
            Persona::Themes => &self.themes,
            Persona::Pictures => &self.pictures,
        }
    }

    fn set(&mut self, persona: Persona, prompt: String) {
        match persona {
            Persona::Main => self.main = prompt,
            Persona::Themes => self.themes = prompt,
            Persona::Pictures => self.pictures = prompt,
        }
    }
}

pub struct OpenAiBackend {
    client: OpenAIClient,
    model: String,
    prompts: RwLock<PersonaPrompts>,
}

impl OpenAiBackend {
    pub fn new(client: OpenAIClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            prompts: RwLock::new(PersonaPrompts::default()),
        }
    }

    pub fn with_prompts(mut self, prompts: PersonaPrompts) -> Self {
        self.prompts = RwLock::new(prompts);
        self
    }

    pub async fn prompt(&self, persona: Persona) -> String {
        self.prompts.read().await.get(persona).to_string()
    }
}

fn to_openai(msg: &ChatMessage) -> Result<ChatCompletionRequestMessage, BackendError> {
    let built = match msg.role {
        MessageRole::System => ChatCompletionRequestSystemMessageArgs::default()
            .content(msg.content.clone())
            .build()
            .map(Into::into),
        MessageRole::User => ChatCompletionRequestUserMessageArgs::default()
            .content(msg.content.clone())
            .build()
            .map(Into::into),
        MessageRole::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
            .content(msg.content.clone())
            .build()
            .map(Into::into),
    };
    built.map_err(|e| BackendError::Other(e.to_string()))
}

impl From<CompletionError> for BackendError {
    fn from(e: CompletionError) -> Self {
        match e {
            CompletionError::Api(detail) => BackendError::Query(detail),
            CompletionError::Connection(detail) => BackendError::Connectivity(detail),
            CompletionError::EmptyResponse => BackendError::EmptyResult,
            CompletionError::Invalid(detail) => BackendError::Other(detail),
        }
    }
}

#[async_trait]
impl ModelBackend for OpenAiBackend {
    fn name(&self) -> &str {
        "openai"
    }

    fn native_history(&self) -> bool {
        true
    }

    #[instrument(skip(self, messages), fields(persona = persona.as_str(), message_count = messages.len()))]
    async fn complete(
        &self,
        persona: Persona,
        messages: &[ChatMessage],
    ) -> Result<String, BackendError> {
        let system = ChatMessage::system(self.prompt(persona).await);
        let request = std::iter::once(&system)
            .chain(messages.iter())
            .map(to_openai)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.client.chat_completion(&self.model, request).await?)
    }

    async fn reset(&self, persona: Persona, prompt: &str) -> Result<(), BackendError> {
        self.prompts.write().await.set(persona, prompt.to_string());
        info!(persona = persona.as_str(), "System prompt replaced");
        Ok(())
    }
}
