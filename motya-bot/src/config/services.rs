//! External services besides the model: image generation and the news source.

use std::env;

#[derive(Debug, Clone)]
pub struct ServicesConfig {
    /// REPLICATE_API_TOKEN; image generation is off without it.
    pub replicate_api_token: Option<String>,
    /// NEWS_URL
    pub news_url: String,
}

impl ServicesConfig {
    pub fn from_env() -> Self {
        Self {
            replicate_api_token: env::var("REPLICATE_API_TOKEN")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            news_url: env::var("NEWS_URL")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| news_client::NEWS_URL.to_string()),
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if reqwest::Url::parse(&self.news_url).is_err() {
            anyhow::bail!("NEWS_URL is not a valid URL: {}", self.news_url);
        }
        Ok(())
    }
}
