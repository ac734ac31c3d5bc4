//! Tests for [`llm_client::OpenAiBackend`] against a mock OpenAI-compatible server.
//!
//! External interactions: HTTP to a local mockito server.

use llm_client::{BackendError, ModelBackend, OpenAiBackend, Persona};
use mockito::Matcher;
use openai_client::OpenAIClient;
use prompt::ChatMessage;

const COMPLETION: &str = r#"{
    "id": "chatcmpl-1",
    "object": "chat.completion",
    "created": 1706529600,
    "model": "gpt-3.5-turbo",
    "choices": [{"index": 0, "message": {"role": "assistant", "content": "хорошо"}, "finish_reason": "stop"}]
}"#;

/// **Test: The persona prompt goes first as a system message, then the history.**
///
/// Setup: prompt reset to "be brief". Action: complete with two messages.
/// Expected: request body carries the system prompt before both messages.
#[tokio::test]
async fn complete_prepends_persona_system_message() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::Regex(r#"(?s)be brief.*"hi".*how are you"#.to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(COMPLETION)
        .create_async()
        .await;

    let client = OpenAIClient::with_base_url("sk-test-key-123456".into(), server.url());
    let backend = OpenAiBackend::new(client, "gpt-3.5-turbo");
    backend.reset(Persona::Main, "be brief").await.unwrap();

    let reply = backend
        .complete(
            Persona::Main,
            &[ChatMessage::assistant("hi"), ChatMessage::user("how are you")],
        )
        .await
        .unwrap();

    assert_eq!(reply, "хорошо");
    assert!(backend.native_history());
    mock.assert_async().await;
}

/// **Test: An API error maps to a query failure.**
#[tokio::test]
async fn api_error_is_query_failure() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error": {"message": "bad", "type": "invalid_request_error", "param": null, "code": null}}"#)
        .create_async()
        .await;

    let client = OpenAIClient::with_base_url("sk-test-key-123456".into(), server.url());
    let backend = OpenAiBackend::new(client, "gpt-3.5-turbo");
    let err = backend
        .complete(Persona::Themes, &[ChatMessage::user("x")])
        .await
        .unwrap_err();
    assert!(matches!(err, BackendError::Query(_)));
}
