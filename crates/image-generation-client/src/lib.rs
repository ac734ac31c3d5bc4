//! # Image generation client
//!
//! [`ImageGenerator`] turns [`Prompt`]s into image bytes. [`ReplicateClient`] implements it on top
//! of the Replicate predictions API: create a prediction (asking the server to wait), poll until it
//! settles, then download the first output.

use std::time::Duration;

use async_trait::async_trait;
use futures::future::try_join_all;
use prompt::Prompt;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

pub const REPLICATE_API_URL: &str = "https://api.replicate.com";

/// Stable Diffusion model version.
pub const DEFAULT_MODEL_VERSION: &str =
    "db21e45d3f7023abc2a46ee38a23973f6dce16bb082a930b0c49861f96d1e5bf";

const MAX_POLLS: u32 = 120;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageGenerationError {
    /// The service refused or failed the generation; the detail is shown to users.
    #[error("{0}")]
    Generation(String),

    /// The service could not be reached.
    #[error("Image service unreachable: {0}")]
    Connection(String),
}

impl From<reqwest::Error> for ImageGenerationError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() {
            ImageGenerationError::Connection(e.to_string())
        } else {
            ImageGenerationError::Generation(e.to_string())
        }
    }
}

#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// One image per prompt, in prompt order.
    async fn get_images(&self, prompts: &[Prompt]) -> Result<Vec<Vec<u8>>, ImageGenerationError>;
}

#[derive(Debug, Deserialize)]
struct Prediction {
    id: String,
    status: String,
    #[serde(default)]
    output: Option<Vec<String>>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    detail: String,
}

#[derive(Clone)]
pub struct ReplicateClient {
    http: reqwest::Client,
    api_token: String,
    base_url: String,
    version: String,
    poll_interval: Duration,
}

impl ReplicateClient {
    pub fn new(api_token: impl Into<String>) -> Self {
        Self::with_base_url(api_token, REPLICATE_API_URL)
    }

    pub fn with_base_url(api_token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_token: api_token.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            version: DEFAULT_MODEL_VERSION.to_string(),
            poll_interval: Duration::from_secs(1),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    async fn read_prediction(
        &self,
        response: reqwest::Response,
    ) -> Result<Prediction, ImageGenerationError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.detail)
                .unwrap_or_else(|_| format!("HTTP {}", status));
            return Err(ImageGenerationError::Generation(detail));
        }
        Ok(response.json::<Prediction>().await?)
    }

    #[instrument(skip(self, prompt), fields(resolution = %prompt.resolution))]
    async fn generate_one(&self, prompt: &Prompt) -> Result<Vec<u8>, ImageGenerationError> {
        let body = json!({
            "version": self.version,
            "input": {
                "prompt": prompt.description(),
                "width": prompt.resolution.width,
                "height": prompt.resolution.height,
                "num_outputs": 1,
            }
        });
        let response = self
            .http
            .post(format!("{}/v1/predictions", self.base_url))
            .bearer_auth(&self.api_token)
            .header("Prefer", "wait")
            .json(&body)
            .send()
            .await?;
        let mut prediction = self.read_prediction(response).await?;
        debug!(id = %prediction.id, status = %prediction.status, "Prediction created");

        let mut polls = 0;
        while prediction.status == "starting" || prediction.status == "processing" {
            polls += 1;
            if polls > MAX_POLLS {
                warn!(id = %prediction.id, "Prediction did not settle in time");
                return Err(ImageGenerationError::Generation(
                    "image generation timed out".to_string(),
                ));
            }
            tokio::time::sleep(self.poll_interval).await;
            let response = self
                .http
                .get(format!("{}/v1/predictions/{}", self.base_url, prediction.id))
                .bearer_auth(&self.api_token)
                .send()
                .await?;
            prediction = self.read_prediction(response).await?;
        }

        if prediction.status != "succeeded" {
            let detail = prediction
                .error
                .unwrap_or_else(|| format!("prediction {}", prediction.status));
            return Err(ImageGenerationError::Generation(detail));
        }
        let url = prediction
            .output
            .and_then(|urls| urls.into_iter().next())
            .ok_or_else(|| ImageGenerationError::Generation("no image returned".to_string()))?;

        let bytes = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        info!(id = %prediction.id, size = bytes.len(), "Image downloaded");
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl ImageGenerator for ReplicateClient {
    async fn get_images(&self, prompts: &[Prompt]) -> Result<Vec<Vec<u8>>, ImageGenerationError> {
        try_join_all(prompts.iter().map(|p| self.generate_one(p))).await
    }
}
