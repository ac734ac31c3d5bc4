//! Message handlers and the chain they form.

mod admin;
pub mod command;
mod conversation;
mod draw;
pub mod errors;
mod logging;
mod preferences;
mod session;
mod start;
mod throttle;

use std::sync::Arc;

pub use admin::AdminHandler;
pub use conversation::{ConversationHandler, ASK_HELP, MESSAGE_SPAM, PLACEHOLDER};
pub use draw::{draw_help, draw_spam, DrawHandler, GifHandler, IMAGE_CAPTION};
pub use logging::LoggingHandler;
pub use preferences::{PreferencesHandler, RESOLUTION_RESET, RESOLUTION_SET, STYLE_SET};
pub use session::{AskHandler, ClearHandler, CLEARED};
pub use start::{StartHandler, GREETING};
pub use throttle::Throttle;

use crate::app::AppContext;
use crate::chain::HandlerChain;

/// Commands first; free text last so it never shadows a command.
pub fn build_handler_chain(ctx: Arc<AppContext>) -> HandlerChain {
    HandlerChain::new()
        .add_handler(Arc::new(LoggingHandler))
        .add_handler(Arc::new(StartHandler::new(ctx.clone())))
        .add_handler(Arc::new(ClearHandler::new(ctx.clone())))
        .add_handler(Arc::new(AskHandler::new(ctx.clone())))
        .add_handler(Arc::new(DrawHandler::new(ctx.clone())))
        .add_handler(Arc::new(GifHandler::new(ctx.clone())))
        .add_handler(Arc::new(PreferencesHandler::new(ctx.clone())))
        .add_handler(Arc::new(AdminHandler::new(ctx.clone())))
        .add_handler(Arc::new(ConversationHandler::new(ctx)))
}
