//! Dialog windowing: the longest trailing part of a history whose rendered dialog fits a
//! character budget.

use prompt::{format_dialog, ChatMessage};

/// Token ceiling of the models the bot talks to.
pub const MAX_TOKENS: usize = 8192;

/// Default character budget for a rendered dialog.
pub const DEFAULT_HISTORY_CHAR_BUDGET: usize = MAX_TOKENS / 2;

/// Number of characters (not bytes) of the rendered dialog for `messages`.
pub fn dialog_len(messages: &[ChatMessage]) -> usize {
    format_dialog(messages).chars().count()
}

/// Drops units from the front of `history` until the rendered dialog is at most `budget`
/// characters. Returns an empty slice when even the last unit alone does not fit.
pub fn window_history(history: &[ChatMessage], budget: usize) -> &[ChatMessage] {
    let mut start = 0;
    while start < history.len() && dialog_len(&history[start..]) > budget {
        start += 1;
    }
    &history[start..]
}

/// Rendered dialog of [`window_history`].
pub fn prepare_dialog(history: &[ChatMessage], budget: usize) -> String {
    format_dialog(window_history(history, budget))
}
