//! # News client
//!
//! [`NewsSource`] yields the newest article link not seen before. [`NewsParser`] reads it from the
//! front page of a news site: article links are the `<a>` children of `.post-title` elements, in
//! page order (newest first).

use std::sync::OnceLock;

use async_trait::async_trait;
use scraper::{Html, Selector};
use thiserror::Error;
use tracing::{debug, instrument};

pub const NEWS_URL: &str = "https://positivnews.ru/";

const POST_TITLE_LINK: &str = ".post-title > a";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
(KHTML, like Gecko) Chrome/111.0.0.0 Safari/537.36";

#[derive(Error, Debug)]
pub enum NewsError {
    #[error("Can not connect to {url}: {reason}")]
    Unavailable { url: String, reason: String },

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Bad link selector: {0}")]
    Selector(String),
}

#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Newest article URL that is not in `excluded`, or `None` when every article was seen.
    async fn latest_link(&self, excluded: &[String]) -> Result<Option<String>, NewsError>;
}

fn post_title_link() -> Result<&'static Selector, NewsError> {
    static SELECTOR: OnceLock<Result<Selector, String>> = OnceLock::new();
    SELECTOR
        .get_or_init(|| Selector::parse(POST_TITLE_LINK).map_err(|e| e.to_string()))
        .as_ref()
        .map_err(|e| NewsError::Selector(e.clone()))
}

/// Article links in page order.
pub fn extract_links(html: &str) -> Result<Vec<String>, NewsError> {
    let selector = post_title_link()?;
    let document = Html::parse_document(html);
    Ok(document
        .select(selector)
        .filter_map(|a| a.value().attr("href"))
        .map(str::to_string)
        .collect())
}

#[derive(Clone)]
pub struct NewsParser {
    http: reqwest::Client,
    url: String,
}

impl Default for NewsParser {
    fn default() -> Self {
        Self::new(NEWS_URL)
    }
}

impl NewsParser {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl NewsSource for NewsParser {
    #[instrument(skip(self, excluded), fields(url = %self.url, excluded = excluded.len()))]
    async fn latest_link(&self, excluded: &[String]) -> Result<Option<String>, NewsError> {
        let response = self
            .http
            .get(&self.url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await
            .map_err(|e| NewsError::Unavailable {
                url: self.url.clone(),
                reason: e.to_string(),
            })?;
        if response.status() != reqwest::StatusCode::OK {
            return Err(NewsError::Unavailable {
                url: self.url.clone(),
                reason: format!("HTTP {}", response.status()),
            });
        }
        let html = response.text().await?;
        let links = extract_links(&html)?;
        debug!(found = links.len(), "Article links parsed");
        Ok(links.into_iter().find(|link| !excluded.contains(link)))
    }
}
