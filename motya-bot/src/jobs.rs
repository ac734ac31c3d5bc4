//! Channel jobs: generated posts, the daily news post, and ad-hoc tasks.

use std::sync::Arc;

use async_trait::async_trait;
use prompt::Prompt;
use rand::seq::SliceRandom;
use tracing::{info, instrument};

use crate::app::AppContext;
use crate::config::TaskSpec;
use crate::content::{assemble, publish, Publication};
use crate::core::{Destination, Result};
use crate::scheduler::Job;

const POST_IMAGE_COUNTS: [usize; 2] = [1, 3];
pub const NEWS_TAG: &str = "#новостиотмоти";

/// Generates a post on a random configured theme and publishes it.
#[instrument(skip(ctx), fields(destination = %destination))]
pub async fn send_post(ctx: &AppContext, destination: &Destination) -> Result<()> {
    let themes = ctx.store.themes().await?;
    let styles = ctx.store.image_styles().await?;
    let images_amount = *POST_IMAGE_COUNTS
        .choose(&mut rand::thread_rng())
        .unwrap_or(&1);

    let post = ctx
        .generator
        .create_random_post_with_images(&themes, images_amount, &styles)
        .await?;
    let publication = assemble(post.text, post.images)?;
    publish(ctx.bot.as_ref(), destination, &publication).await?;
    info!("Post published");
    Ok(())
}

/// Describes the newest unseen article, publishes it and remembers its URL.
#[instrument(skip(ctx), fields(destination = %destination))]
pub async fn send_news(ctx: &AppContext, destination: &Destination) -> Result<()> {
    let excluded = ctx.store.excluded_urls().await?;
    let (text, url) = ctx.generator.random_article_description(&excluded).await?;
    let publication = Publication::Text(format!("{}\n\n{}", text, NEWS_TAG));
    publish(ctx.bot.as_ref(), destination, &publication).await?;
    ctx.store.add_article_url(&url).await?;
    info!(url = %url, "News published");
    Ok(())
}

pub struct PostJob {
    ctx: Arc<AppContext>,
    destination: Destination,
}

impl PostJob {
    pub fn new(ctx: Arc<AppContext>, destination: Destination) -> Self {
        Self { ctx, destination }
    }
}

#[async_trait]
impl Job for PostJob {
    fn name(&self) -> &str {
        "post"
    }

    async fn run(&self) -> anyhow::Result<()> {
        Ok(send_post(&self.ctx, &self.destination).await?)
    }
}

pub struct NewsJob {
    ctx: Arc<AppContext>,
    destination: Destination,
}

impl NewsJob {
    pub fn new(ctx: Arc<AppContext>, destination: Destination) -> Self {
        Self { ctx, destination }
    }
}

#[async_trait]
impl Job for NewsJob {
    fn name(&self) -> &str {
        "news"
    }

    async fn run(&self) -> anyhow::Result<()> {
        Ok(send_news(&self.ctx, &self.destination).await?)
    }
}

/// Answers a fixed instruction, draws the given pictures and publishes both.
pub struct TaskJob {
    ctx: Arc<AppContext>,
    name: String,
    what_to_do: String,
    pictures: Vec<Prompt>,
    destination: Destination,
}

impl TaskJob {
    pub fn new(
        ctx: Arc<AppContext>,
        name: impl Into<String>,
        what_to_do: impl Into<String>,
        destination: Destination,
    ) -> Self {
        Self {
            ctx,
            name: name.into(),
            what_to_do: what_to_do.into(),
            pictures: Vec::new(),
            destination,
        }
    }

    pub fn with_pictures(mut self, pictures: Vec<Prompt>) -> Self {
        self.pictures = pictures;
        self
    }

    /// A configured daily task, named `task@{time}`.
    pub fn from_spec(ctx: Arc<AppContext>, spec: &TaskSpec, destination: Destination) -> Self {
        Self::new(ctx, format!("task@{}", spec.time), &spec.what_to_do, destination)
            .with_pictures(spec.pictures.iter().map(Prompt::new).collect())
    }
}

#[async_trait]
impl Job for TaskJob {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self) -> anyhow::Result<()> {
        let text = self.ctx.model.answer(&self.what_to_do).await?;
        let images = match &self.ctx.images {
            Some(generator) if !self.pictures.is_empty() => {
                generator.get_images(&self.pictures).await?
            }
            _ => Vec::new(),
        };
        let publication = assemble(text, images)?;
        publish(self.ctx.bot.as_ref(), &self.destination, &publication).await?;
        Ok(())
    }
}
