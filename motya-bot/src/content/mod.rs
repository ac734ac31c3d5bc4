//! Generated content: posts, news descriptions, animations, and their publish shapes.

mod animation;
mod assembly;
mod generator;
mod post;

use thiserror::Error;

pub use animation::{encode_gif, GIF_FRAME_DELAY_MS};
pub use assembly::{assemble, publish, Publication, MAX_CAPTION_SIZE};
pub use generator::{ContentGenerator, NEWS_INSTRUCTION, POST_INSTRUCTION};
pub use post::Post;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContentError {
    #[error("Nothing to publish")]
    Empty,

    #[error("No themes configured")]
    NoThemes,

    #[error("Model returned no inspirations")]
    NoInspirations,

    #[error("No unseen news articles")]
    NoFreshNews,

    #[error("Animation encoding failed: {0}")]
    Animation(String),
}
