//! Command-line interface. Everything else comes from the environment.

use clap::Parser;

use crate::config::BotConfig;

#[derive(Parser, Debug)]
#[command(name = "motya", version, about = "Motya: Telegram persona bot")]
pub struct Cli {
    /// Bot token; overrides BOT_TOKEN.
    #[arg(short, long)]
    pub token: Option<String>,
}

/// Loads and validates the configuration.
pub fn load_config(token: Option<String>) -> anyhow::Result<BotConfig> {
    let config = BotConfig::load(token)?;
    config.validate()?;
    Ok(config)
}
