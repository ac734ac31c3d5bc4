//! Conversation state: capped histories keyed by chat.

mod history;
mod store;

pub use history::CappedHistory;
pub use store::{Session, SessionStore};
