//! [`openai_client::mask_token`] on the secrets Motya logs at startup.

use openai_client::mask_token;

#[test]
fn short_secrets_are_hidden_entirely() {
    for secret in ["", "x", "r8_short", "12345678901"] {
        assert_eq!(mask_token(secret), "***", "{secret:?}");
    }
}

#[test]
fn bot_token_keeps_id_prefix_and_last_chars() {
    let token = "6123456789:AAFakeTokenForTestsOnly_qwerty";
    assert_eq!(mask_token(token), "6123456***erty");
}

#[test]
fn replicate_token_hides_the_middle() {
    let masked = mask_token("r8_Abcdefghijklmnopqrstuvwxyz0123");
    assert_eq!(masked, "r8_Abcd***0123");
    assert!(!masked.contains("klmnop"));
}

#[test]
fn twelve_characters_is_the_first_length_shown() {
    assert_eq!(mask_token("abcdefghijkl"), "abcdefg***ijkl");
}

#[test]
fn multibyte_secrets_do_not_split_characters() {
    assert_eq!(mask_token("ключ-секретный-ключ"), "ключ-се***ключ");
}
