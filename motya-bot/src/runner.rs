//! Startup: logging, services, command menus, the daily schedule, then the REPL.

use std::sync::Arc;

use anyhow::{Context, Result};
use image_generation_client::{ImageGenerator, ReplicateClient};
use llm_client::{connect_chat_model, ChatModel, Persona};
use news_client::{NewsParser, NewsSource};
use teloxide::Bot as TeloxideBot;
use tracing::{error, info, instrument, warn};

use crate::app::{AppContext, Settings};
use crate::config::{BotConfig, ScheduleConfig};
use crate::core::logger::log_startup;
use crate::core::{init_tracing, Bot, Destination};
use crate::handlers::build_handler_chain;
use crate::jobs::{NewsJob, PostJob, TaskJob};
use crate::scheduler::JobRunner;
use crate::storage::{ConfigStore, SqliteConfigStore};
use crate::telegram::{register_commands, run_repl, TelegramBotAdapter};

/// Connects the model, image and news services and the configuration store.
#[instrument(skip(config, bot))]
pub async fn build_context(config: &BotConfig, bot: Arc<dyn Bot>) -> Result<Arc<AppContext>> {
    let store = SqliteConfigStore::new(config.database_url())
        .await
        .map_err(|e| {
            error!(error = %e, database_url = %config.database_url(), "Failed to open config store");
            anyhow::anyhow!("Failed to open config store: {}", e)
        })?;

    let answer_service = connect_chat_model(&config.model).await;
    // Stored prompts only reach backends that keep them client side; MindsDB models already
    // carry theirs.
    if answer_service.has_native_history() {
        if let Some(prompt) = store.main_prompt().await? {
            answer_service.reset_model(&prompt).await?;
            info!("Stored main prompt applied");
        }
        if let Some(prompt) = store.helper_prompt().await? {
            answer_service.reset_persona(Persona::Themes, &prompt).await?;
        }
    }
    let model: Arc<dyn ChatModel> = Arc::new(answer_service);

    let images: Option<Arc<dyn ImageGenerator>> = match &config.services.replicate_api_token {
        Some(token) => Some(Arc::new(ReplicateClient::new(token.clone()))),
        None => {
            warn!("REPLICATE_API_TOKEN not set, image generation is off");
            None
        }
    };
    let news: Arc<dyn NewsSource> = Arc::new(NewsParser::new(config.services.news_url.clone()));

    Ok(Arc::new(AppContext::new(
        bot,
        model,
        images,
        news,
        Arc::new(store),
        Settings::from_config(config),
    )))
}

/// Registers the channel post, news and configured task jobs.
pub fn schedule_jobs(
    schedule: &ScheduleConfig,
    channel: Destination,
    ctx: Arc<AppContext>,
) -> Result<JobRunner> {
    let mut runner = JobRunner::new();
    for time in &schedule.post_times {
        runner.every_day_at(time, Arc::new(PostJob::new(ctx.clone(), channel.clone())))?;
    }
    for task in &schedule.tasks {
        let job = TaskJob::from_spec(ctx.clone(), task, channel.clone());
        runner.every_day_at(&task.time, Arc::new(job))?;
    }
    runner.every_day_at(&schedule.news_time, Arc::new(NewsJob::new(ctx, channel)))?;
    Ok(runner)
}

fn teloxide_bot(config: &BotConfig) -> TeloxideBot {
    let bot = TeloxideBot::new(config.bot_token());
    match config.telegram_api_url() {
        Some(url_str) => match reqwest::Url::parse(url_str) {
            Ok(url) => bot.set_api_url(url),
            Err(e) => {
                error!(error = %e, url = %url_str, "Invalid TELEGRAM_API_URL, using default");
                bot
            }
        },
        None => bot,
    }
}

/// Main entry: init logging, build everything, start the scheduler, then run the REPL.
pub async fn run_bot(config: BotConfig) -> Result<()> {
    init_tracing(config.log_file()).context("Failed to initialize logging")?;
    log_startup(&config);

    let teloxide_bot = teloxide_bot(&config);
    if let Err(e) = register_commands(&teloxide_bot, config.base.admin_id).await {
        warn!(error = %e, "Failed to register bot commands");
    }

    let bot: Arc<dyn Bot> = Arc::new(TelegramBotAdapter::new(teloxide_bot.clone()));
    let ctx = build_context(&config, bot).await?;

    let channel = Destination::Channel(config.base.channel.clone());
    let scheduler = schedule_jobs(&config.schedule, channel, ctx.clone())?;
    info!(jobs = scheduler.len(), "Scheduler started");
    tokio::spawn(scheduler.run());

    let chain = build_handler_chain(ctx.clone());
    info!("Bot started successfully");
    run_repl(teloxide_bot, chain, ctx).await
}
