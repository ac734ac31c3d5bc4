//! Content built on top of the chat model: post ideas, posts with pictures, news descriptions.

use std::sync::Arc;

use image_generation_client::ImageGenerator;
use llm_client::{ChatModel, Persona};
use news_client::NewsSource;
use prompt::Prompt;
use rand::seq::SliceRandom;
use tracing::{info, instrument};

use super::{ContentError, Post};
use crate::core::Result;

pub const POST_INSTRUCTION: &str = "напиши подробный пост про: ";

pub const NEWS_INSTRUCTION: &str = "опиши новость в позитивной манере по ссылке: {link}. \
в самом начале укажи заголовок статьи в формате: <b>заголовок</b>. \
напиши что это ежедневная рубрика позитивная новость дня. \
напиши 3 ключевых факта из статьи, которые тебя зацепили. \
не надо писать ничего про себя, только про новость. \
в конце добавь ссылку на новость в формате: <a href='ссылка'>тут</a>.";

const NO_TEXT_STYLE: &str = "no text";

fn split_list(raw: &str, separator: char) -> Vec<String> {
    raw.split(separator)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn pick<T: Clone>(items: &[T]) -> Option<T> {
    items.choose(&mut rand::thread_rng()).cloned()
}

#[derive(Clone)]
pub struct ContentGenerator {
    model: Arc<dyn ChatModel>,
    images: Option<Arc<dyn ImageGenerator>>,
    news: Arc<dyn NewsSource>,
}

impl ContentGenerator {
    pub fn new(
        model: Arc<dyn ChatModel>,
        images: Option<Arc<dyn ImageGenerator>>,
        news: Arc<dyn NewsSource>,
    ) -> Self {
        Self {
            model,
            images,
            news,
        }
    }

    pub fn has_images(&self) -> bool {
        self.images.is_some()
    }

    /// Post ideas for a theme.
    pub async fn get_inspirations(&self, theme: &str) -> Result<Vec<String>> {
        let raw = self.model.answer_as(Persona::Themes, theme).await?;
        Ok(split_list(&raw, ','))
    }

    /// Keywords for pictures that fit the text.
    pub async fn get_image_inspirations(&self, text: &str) -> Result<Vec<String>> {
        let raw = self.model.answer_as(Persona::Pictures, text).await?;
        Ok(split_list(&raw, ';'))
    }

    pub async fn random_inspiration(&self, themes: &[String]) -> Result<String> {
        let theme = pick(themes).ok_or(ContentError::NoThemes)?;
        let inspirations = self.get_inspirations(&theme).await?;
        let inspiration = pick(&inspirations).ok_or(ContentError::NoInspirations)?;
        info!(theme = %theme, inspiration = %inspiration, "Inspiration chosen");
        Ok(inspiration)
    }

    #[instrument(skip(self, themes, styles), fields(themes = themes.len()))]
    pub async fn create_random_post_with_images(
        &self,
        themes: &[String],
        images_amount: usize,
        styles: &[String],
    ) -> Result<Post> {
        let inspiration = self.random_inspiration(themes).await?;
        let text = self
            .model
            .answer(&format!("{}{}", POST_INSTRUCTION, inspiration))
            .await?;

        let Some(generator) = self.images.as_ref().filter(|_| images_amount > 0) else {
            return Ok(Post::new(text, Vec::new()));
        };

        let mut keywords = self.get_image_inspirations(&text).await?;
        let style = match pick(styles) {
            Some(style) if !style.trim().is_empty() => format!("{}, {}", style, NO_TEXT_STYLE),
            _ => NO_TEXT_STYLE.to_string(),
        };
        keywords.shuffle(&mut rand::thread_rng());
        let prompts: Vec<Prompt> = keywords
            .into_iter()
            .take(images_amount)
            .map(|k| Prompt::new(k).with_style(style.clone()))
            .collect();

        let images = generator.get_images(&prompts).await?;
        info!(images = images.len(), "Post images generated");
        Ok(Post::new(text, images))
    }

    /// Description of the newest article not in `excluded`, with its URL.
    #[instrument(skip(self, excluded), fields(excluded = excluded.len()))]
    pub async fn random_article_description(
        &self,
        excluded: &[String],
    ) -> Result<(String, String)> {
        let link = self
            .news
            .latest_link(excluded)
            .await?
            .ok_or(ContentError::NoFreshNews)?;
        let text = self
            .model
            .answer(&NEWS_INSTRUCTION.replace("{link}", &link))
            .await?;
        Ok((text, link))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_are_trimmed_and_blank_items_dropped() {
        assert_eq!(split_list(" a, b ,,c ", ','), vec!["a", "b", "c"]);
        assert_eq!(split_list("поле; тополь;", ';'), vec!["поле", "тополь"]);
        assert!(split_list("  ", ',').is_empty());
    }
}
