//! History, session and rate limits.

use anyhow::Result;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct LimitsConfig {
    /// CHAT_HISTORY_SIZE: units kept per session
    pub chat_history_size: usize,
    /// SESSION_TTL_SECS: idle sessions are dropped after this; never when unset
    pub session_ttl: Option<Duration>,
    /// THROTTLE_RATE_MESSAGE_SECS
    pub throttle_rate_message: Duration,
    /// THROTTLE_RATE_IMAGE_SECS
    pub throttle_rate_image: Duration,
    /// GIF_MAX_FRAMES
    pub gif_max_frames: u32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            chat_history_size: 10,
            session_ttl: None,
            throttle_rate_message: Duration::from_secs(1),
            throttle_rate_image: Duration::from_secs(5),
            gif_max_frames: 24,
        }
    }
}

fn parse_opt<T: std::str::FromStr>(name: &str) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("{} is invalid: {}", name, e)),
        _ => Ok(None),
    }
}

impl LimitsConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            chat_history_size: parse_opt("CHAT_HISTORY_SIZE")?
                .unwrap_or(defaults.chat_history_size),
            session_ttl: parse_opt::<u64>("SESSION_TTL_SECS")?.map(Duration::from_secs),
            throttle_rate_message: parse_opt::<u64>("THROTTLE_RATE_MESSAGE_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.throttle_rate_message),
            throttle_rate_image: parse_opt::<u64>("THROTTLE_RATE_IMAGE_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.throttle_rate_image),
            gif_max_frames: parse_opt("GIF_MAX_FRAMES")?.unwrap_or(defaults.gif_max_frames),
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.chat_history_size == 0 {
            anyhow::bail!("CHAT_HISTORY_SIZE must be positive");
        }
        if self.gif_max_frames == 0 {
            anyhow::bail!("GIF_MAX_FRAMES must be positive");
        }
        Ok(())
    }
}
