//! Bot configuration: base (Telegram, log, DB, identity), model, external services, schedule, limits.

mod base;
mod bot_config;
mod limits;
mod schedule;
mod services;


pub use base::BaseConfig;
pub use bot_config::BotConfig;
pub use limits::LimitsConfig;
pub use schedule::{ScheduleConfig, TaskSpec, DEFAULT_NEWS_TIME, DEFAULT_POST_TIMES};
pub use services::ServicesConfig;
