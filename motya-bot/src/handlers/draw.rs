//! `/draw` and `/gif`: image generation on request.

use std::sync::Arc;

use async_trait::async_trait;
use image_generation_client::{ImageGenerationError, ImageGenerator};
use prompt::{Prompt, Resolution};
use tracing::{info, instrument, warn};

use super::command::{parse_args, parse_command, MAX_IMAGE_SIZE};
use super::conversation::check_message_rate;
use super::errors::CONNECTION_ERROR;
use crate::app::AppContext;
use crate::content::{encode_gif, GIF_FRAME_DELAY_MS};
use crate::core::{FileKind, Handler, HandlerResponse, Message, OutgoingFile, Result};

pub const IMAGE_CAPTION: &str = "готово 🎨🐾";
const DRAWING: &str = "рисую ✏️🐾 ...";
const DRAWING_FRAMES: &str = "рисую картинки ✏️🐾 ... займет 5-7 минуток";
const DRAW_KEY: &str = "draw";

pub fn draw_help(command: &str) -> String {
    format!(
        "чтобы нарисовать что-то, нужно отправить вместе с командой {} то, что хочешь нарисовать 😉",
        command
    )
}

pub fn draw_spam(rate_secs: u64) -> String {
    format!(
        "ой 🙄 команду /draw можно нажимать не чаще чем раз в {} секунд 😝",
        rate_secs
    )
}

/// Replaces an unstyled default prompt with the user's saved style and resolution, and
/// remembers what is about to be drawn.
async fn prepare_prompt(ctx: &AppContext, user_id: i64, prompt: Prompt) -> Result<Prompt> {
    let prompt = if prompt.is_default() {
        let config = ctx.store.user_config(user_id).await?;
        prompt
            .with_style(config.style)
            .with_resolution(config.resolution)
    } else {
        prompt
    };
    ctx.store
        .set_last_image(user_id, &prompt.description())
        .await?;
    Ok(prompt)
}

async fn draw_one(generator: &dyn ImageGenerator, prompt: &Prompt) -> Result<Vec<u8>> {
    let image = generator
        .get_images(std::slice::from_ref(prompt))
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| ImageGenerationError::Generation("пустой ответ".to_string()))?;
    Ok(image)
}

/// Sends `progress`, runs `work`, then deletes the progress message whatever the outcome.
async fn with_progress<F>(ctx: &AppContext, message: &Message, progress: &str, work: F) -> Result<()>
where
    F: std::future::Future<Output = Result<()>>,
{
    let progress_id = ctx
        .bot
        .send_message_and_return_id(&message.chat, progress)
        .await?;
    let result = work.await;
    if let Err(e) = ctx.bot.delete_message(&message.chat, &progress_id).await {
        warn!(error = %e, "Failed to delete progress message");
    }
    result
}

/// Common entry: command match, help text, missing generator.
async fn parse_request(
    ctx: &AppContext,
    message: &Message,
    command: &str,
) -> Result<Option<(Arc<dyn ImageGenerator>, Prompt)>> {
    let args = match parse_command(&message.content) {
        Some((_, args)) => args,
        None => return Ok(None),
    };
    let Some(prompt) = parse_args(&args)? else {
        ctx.bot.reply_to(message, &draw_help(command)).await?;
        return Ok(None);
    };
    let Some(generator) = ctx.images.clone() else {
        ctx.bot.reply_to(message, CONNECTION_ERROR).await?;
        return Ok(None);
    };
    Ok(Some((generator, prompt)))
}

fn is_command(message: &Message, name: &str) -> bool {
    matches!(parse_command(&message.content), Some((cmd, _)) if cmd == name)
}

pub struct DrawHandler {
    ctx: Arc<AppContext>,
}

impl DrawHandler {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Handler for DrawHandler {
    #[instrument(skip(self, message), fields(user_id = message.user.id))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        if !is_command(message, "draw") {
            return Ok(HandlerResponse::Ignore);
        }
        let ctx = &self.ctx;
        let rate = ctx.settings.throttle_rate_image;
        if !ctx.throttle.allow(DRAW_KEY, message.user.id, rate).await {
            ctx.bot.reply_to(message, &draw_spam(rate.as_secs())).await?;
            return Ok(HandlerResponse::Stop);
        }
        let Some((generator, prompt)) = parse_request(ctx, message, "/draw").await? else {
            return Ok(HandlerResponse::Stop);
        };
        let prompt = prepare_prompt(ctx, message.user.id, prompt).await?;
        info!(description = %prompt.description(), resolution = %prompt.resolution, "Drawing");

        with_progress(ctx, message, DRAWING, async {
            let image = draw_one(generator.as_ref(), &prompt).await?;
            let kind = if prompt.resolution == Resolution::default() {
                FileKind::Photo
            } else {
                FileKind::Document
            };
            let file = OutgoingFile::new(kind, image, format!("{}.png", prompt.text))
                .with_caption(IMAGE_CAPTION);
            ctx.bot.reply_with_file(message, file).await
        })
        .await?;
        Ok(HandlerResponse::Reply(IMAGE_CAPTION.to_string()))
    }
}

/// `/gif`: draws `frames_count` images one by one and sends them as an animation.
pub struct GifHandler {
    ctx: Arc<AppContext>,
}

impl GifHandler {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Handler for GifHandler {
    #[instrument(skip(self, message), fields(user_id = message.user.id))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        if !is_command(message, "gif") {
            return Ok(HandlerResponse::Ignore);
        }
        let ctx = &self.ctx;
        if !check_message_rate(ctx, message).await? {
            return Ok(HandlerResponse::Stop);
        }
        let Some((generator, prompt)) = parse_request(ctx, message, "/gif").await? else {
            return Ok(HandlerResponse::Stop);
        };
        let max_frames = ctx.settings.gif_max_frames;
        if prompt.frames_count > max_frames {
            let text = format!("нельзя больше {} кадров!", max_frames);
            ctx.bot.reply_to(message, &text).await?;
            return Ok(HandlerResponse::Reply(text));
        }
        let prompt = prepare_prompt(ctx, message.user.id, prompt).await?;
        let resolution = prompt.resolution.scaled_to(MAX_IMAGE_SIZE);
        let prompt = prompt.with_resolution(resolution);
        info!(frames = prompt.frames_count, resolution = %resolution, "Drawing animation");

        with_progress(ctx, message, DRAWING_FRAMES, async {
            let mut frames = Vec::with_capacity(prompt.frames_count as usize);
            for _ in 0..prompt.frames_count {
                frames.push(draw_one(generator.as_ref(), &prompt).await?);
            }
            let gif = encode_gif(&frames, GIF_FRAME_DELAY_MS)?;
            let file = OutgoingFile::new(FileKind::Animation, gif, format!("{}.gif", prompt.text))
                .with_caption(IMAGE_CAPTION)
                .with_size(resolution.width, resolution.height);
            ctx.bot.reply_with_file(message, file).await
        })
        .await?;
        Ok(HandlerResponse::Reply(IMAGE_CAPTION.to_string()))
    }
}
