//! Motya's tracing setup and the startup record.
//!
//! Lines look like `2026-10-17 11:50:00 INFO [motya_bot::jobs] Post published job="post"` and go to
//! stdout and the log file at once.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Arc;

use llm_client::mask_token;
use tracing::info;
use tracing_subscriber::{
    fmt::format::{FmtSpan, Writer},
    fmt::time::FormatTime,
    fmt::writer::MakeWriterExt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

use crate::config::BotConfig;

/// Used when `RUST_LOG` is unset. Database and HTTP internals only surface warnings.
pub const DEFAULT_DIRECTIVES: &str = "info,sqlx=warn,hyper=warn,reqwest=warn,h2=warn";

struct LocalClock;

impl FormatTime for LocalClock {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{} ", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"))
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Opens `path` for appending, creating missing parent directories.
pub fn open_log_file(path: &str) -> io::Result<File> {
    if let Some(dir) = Path::new(path).parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Installs the global subscriber. Call once, after `.env` is loaded.
pub fn init_tracing(log_file_path: &str) -> anyhow::Result<()> {
    let file = Arc::new(open_log_file(log_file_path)?);

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stdout.and(file))
        .event_format(
            tracing_subscriber::fmt::format()
                .with_timer(LocalClock)
                .with_target(true)
                .with_thread_ids(false),
        )
        .with_span_events(FmtSpan::NONE)
        .with_ansi(false);

    Registry::default()
        .with(env_filter())
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to set global subscriber: {}", e))
}

/// Secrets from the config in their masked, loggable form.
#[derive(Debug, PartialEq, Eq)]
pub struct MaskedSecrets {
    pub bot_token: String,
    pub openai_api_key: Option<String>,
    pub replicate_api_token: Option<String>,
}

impl MaskedSecrets {
    pub fn from_config(config: &BotConfig) -> Self {
        Self {
            bot_token: mask_token(&config.base.bot_token),
            openai_api_key: config.model.openai_api_key.as_deref().map(mask_token),
            replicate_api_token: config.services.replicate_api_token.as_deref().map(mask_token),
        }
    }
}

/// One `info!` line describing what this process is about to run.
pub fn log_startup(config: &BotConfig) {
    let secrets = MaskedSecrets::from_config(config);
    info!(
        bot_token = %secrets.bot_token,
        openai_api_key = ?secrets.openai_api_key,
        replicate_api_token = ?secrets.replicate_api_token,
        backend = ?config.model.backend,
        model = %config.model.model,
        database_url = %config.database_url(),
        channel = %config.base.channel,
        post_times = ?config.schedule.post_times,
        news_time = %config.schedule.news_time,
        "Starting Motya"
    );
}
