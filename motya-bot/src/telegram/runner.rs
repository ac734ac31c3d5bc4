//! REPL runner: converts teloxide messages to core messages and passes each to the
//! [`HandlerChain`] in its own task. Failures are reported to the user.

use std::sync::Arc;

use anyhow::Result;
use teloxide::prelude::*;
use tracing::{info, instrument, warn};

use super::adapters::TelegramMessageWrapper;
use crate::app::AppContext;
use crate::chain::HandlerChain;
use crate::core::ToCoreMessage;
use crate::handlers::errors::report;

#[instrument(skip(bot, handler_chain, ctx))]
pub async fn run_repl(
    bot: teloxide::Bot,
    handler_chain: HandlerChain,
    ctx: Arc<AppContext>,
) -> Result<()> {
    match bot.get_me().await {
        Ok(me) => {
            ctx.set_bot_user_id(me.user.id.0 as i64).await;
            info!(username = ?me.user.username, "Bot identity loaded");
        }
        Err(e) => warn!(error = %e, "getMe failed, replies to the bot will not be recognized"),
    }

    let chain = handler_chain;
    teloxide::repl(bot, move |_bot: Bot, msg: teloxide::types::Message| {
        let chain = chain.clone();
        let ctx = ctx.clone();

        async move {
            if msg.from.is_none() || msg.text().is_none() {
                return respond(());
            }
            let core_msg = TelegramMessageWrapper(&msg).to_core();

            tokio::spawn(async move {
                if let Err(e) = chain.handle(&core_msg).await {
                    report(ctx.bot.as_ref(), &core_msg, &e).await;
                }
            });

            respond(())
        }
    })
    .await;

    Ok(())
}
