//! Picks how text and images are published.
//!
//! Telegram limits media captions to 1024 characters: shorter text rides on the first image,
//! longer text follows the album as its own message.

use tracing::{debug, instrument};

use super::ContentError;
use crate::core::{Bot, Destination, Result};

pub const MAX_CAPTION_SIZE: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Publication {
    Text(String),
    MediaGroup {
        images: Vec<Vec<u8>>,
        caption: Option<String>,
    },
    MediaGroupThenText {
        images: Vec<Vec<u8>>,
        text: String,
    },
}

pub fn assemble(
    text: impl Into<String>,
    images: Vec<Vec<u8>>,
) -> std::result::Result<Publication, ContentError> {
    let text = text.into();
    if images.is_empty() {
        if text.is_empty() {
            return Err(ContentError::Empty);
        }
        return Ok(Publication::Text(text));
    }
    if text.is_empty() {
        return Ok(Publication::MediaGroup {
            images,
            caption: None,
        });
    }
    if text.chars().count() < MAX_CAPTION_SIZE {
        Ok(Publication::MediaGroup {
            images,
            caption: Some(text),
        })
    } else {
        Ok(Publication::MediaGroupThenText { images, text })
    }
}

#[instrument(skip(bot, publication), fields(destination = %destination))]
pub async fn publish(bot: &dyn Bot, destination: &Destination, publication: &Publication) -> Result<()> {
    match publication {
        Publication::Text(text) => {
            debug!("Publishing text");
            bot.send_message(destination, text).await
        }
        Publication::MediaGroup { images, caption } => {
            debug!(images = images.len(), "Publishing media group");
            bot.send_media_group(destination, images, caption.as_deref())
                .await
        }
        Publication::MediaGroupThenText { images, text } => {
            debug!(images = images.len(), "Publishing media group, then text");
            bot.send_media_group(destination, images, None).await?;
            bot.send_message(destination, text).await
        }
    }
}
