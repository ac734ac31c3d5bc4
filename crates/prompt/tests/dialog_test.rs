//! Unit tests for dialog rendering and image prompt defaults.
//!
//! External interactions: none (pure function tests).

use prompt::{dialog_prompt, exchange, format_dialog, ChatMessage, MessageRole, Prompt, Resolution};

/// **Test: exchange() yields a user unit followed by an assistant unit.**
#[test]
fn exchange_orders_user_then_assistant() {
    let [user, assistant] = exchange("how are you", "fine");
    assert_eq!(user.role, MessageRole::User);
    assert_eq!(user.content, "how are you");
    assert_eq!(assistant.role, MessageRole::Assistant);
    assert_eq!(assistant.content, "fine");
}

/// **Test: Every unit is rendered on its own `-` line, roles are not printed.**
#[test]
fn format_dialog_renders_each_unit() {
    let messages = vec![
        ChatMessage::user("a"),
        ChatMessage::assistant("b"),
        ChatMessage::user("c"),
    ];
    assert_eq!(format_dialog(&messages), "-a\n-b\n-c");
}

/// **Test: The instruction template embeds both the message and the dialog block.**
#[test]
fn dialog_prompt_wraps_block_in_quotes() {
    let out = dialog_prompt("q", "-x");
    assert!(out.starts_with("Ответь на сообщение"));
    assert!(out.contains("'''\n-x'''"));
}

/// **Test: A prompt is default only with empty style and the default resolution.**
#[test]
fn prompt_default_detection() {
    assert!(Prompt::new("cat").is_default());
    assert!(!Prompt::new("cat").with_style("anime").is_default());
    assert!(!Prompt::new("cat")
        .with_resolution(Resolution::new(1024, 1024))
        .is_default());
}
