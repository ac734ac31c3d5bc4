//! GIF assembly for `/gif`.

use std::io::Cursor;

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame};

use super::ContentError;

pub const GIF_FRAME_DELAY_MS: u32 = 250;

/// Decodes every frame (any format `image` can read) and encodes them as a looping GIF.
pub fn encode_gif(frames: &[Vec<u8>], delay_ms: u32) -> Result<Vec<u8>, ContentError> {
    let animation_err = |e: image::ImageError| ContentError::Animation(e.to_string());
    if frames.is_empty() {
        return Err(ContentError::Empty);
    }

    let mut out = Cursor::new(Vec::new());
    {
        let mut encoder = GifEncoder::new(&mut out);
        encoder.set_repeat(Repeat::Infinite).map_err(animation_err)?;
        for bytes in frames {
            let rgba = image::load_from_memory(bytes)
                .map_err(animation_err)?
                .to_rgba8();
            let frame = Frame::from_parts(rgba, 0, 0, Delay::from_numer_denom_ms(delay_ms, 1));
            encoder.encode_frame(frame).map_err(animation_err)?;
        }
    }
    Ok(out.into_inner())
}
