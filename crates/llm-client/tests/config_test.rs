//! Tests for [`llm_client::EnvLlmConfig`]. Serialized because they mutate the environment.

use std::env;
use std::time::Duration;

use llm_client::{connect_chat_model, BackendKind, EnvLlmConfig};
use serial_test::serial;

const VARS: &[&str] = &[
    "MODEL_BACKEND",
    "OPENAI_API_KEY",
    "OPENAI_BASE_URL",
    "MODEL",
    "MINDSDB_URL",
    "RETRY_MAX_FAILS",
    "RETRY_QUERY_DELAY_SECS",
    "RETRY_OTHER_MAX_FAILS",
    "HISTORY_CHAR_BUDGET",
];

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

/// **Test: Defaults apply when nothing is set.**
#[test]
#[serial]
fn defaults() {
    clear_env();
    let cfg = EnvLlmConfig::from_env().unwrap();
    assert_eq!(cfg.backend, BackendKind::OpenAi);
    assert_eq!(cfg.model, "gpt-3.5-turbo");
    assert_eq!(cfg.retry_max_fails, 5);
    assert_eq!(cfg.retry_query_delay, Duration::from_secs(1));
    assert_eq!(cfg.retry_other_max_fails, 0);
    assert_eq!(cfg.history_char_budget, 4096);
    assert!(cfg.validate().is_ok());
}

/// **Test: Overrides are parsed; invalid numbers and backends are errors.**
#[test]
#[serial]
fn overrides_and_errors() {
    clear_env();
    env::set_var("MODEL_BACKEND", "MindsDB");
    env::set_var("RETRY_MAX_FAILS", "20");
    let cfg = EnvLlmConfig::from_env().unwrap();
    assert_eq!(cfg.backend, BackendKind::MindsDb);
    assert_eq!(cfg.retry_executor().max_fails(), 20);

    env::set_var("RETRY_MAX_FAILS", "many");
    assert!(EnvLlmConfig::from_env().is_err());
    env::set_var("RETRY_MAX_FAILS", "5");
    env::set_var("MODEL_BACKEND", "g4f");
    assert!(EnvLlmConfig::from_env().is_err());
    clear_env();
}

/// **Test: A missing API key yields a degraded service, not an error.**
#[tokio::test]
#[serial]
async fn missing_key_is_degraded() {
    clear_env();
    let cfg = EnvLlmConfig::from_env().unwrap();
    let service = connect_chat_model(&cfg).await;
    assert!(service.is_degraded());
}
