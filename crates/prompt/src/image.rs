//! Image generation request types.

use std::fmt;

/// Default side length (pixels) of a generated image.
pub const DEFAULT_SIZE: u32 = 768;

/// Default number of frames for an animated image.
pub const DEFAULT_FRAMES: u32 = 5;

/// Image size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            width: DEFAULT_SIZE,
            height: DEFAULT_SIZE,
        }
    }
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Shrinks proportionally so that neither side exceeds `max`. Never enlarges.
    pub fn scaled_to(self, max: u32) -> Self {
        let longest = self.width.max(self.height);
        if longest <= max || longest == 0 {
            return self;
        }
        let scale = |side: u32| ((side as u64 * max as u64) / longest as u64).max(1) as u32;
        Self {
            width: scale(self.width),
            height: scale(self.height),
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A request for one generated image (or one animation when `frames_count > 1` is used by the caller).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub text: String,
    pub style: String,
    pub resolution: Resolution,
    pub frames_count: u32,
}

impl Prompt {
    /// A prompt with empty style and the default resolution.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: String::new(),
            resolution: Resolution::default(),
            frames_count: DEFAULT_FRAMES,
        }
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }

    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_frames(mut self, frames_count: u32) -> Self {
        self.frames_count = frames_count;
        self
    }

    /// True when neither style nor resolution was chosen, so per-user defaults may apply.
    pub fn is_default(&self) -> bool {
        self.style.is_empty() && self.resolution == Resolution::default()
    }

    /// Text sent to the image backend: `text`, or `text, style` when a style is set.
    pub fn description(&self) -> String {
        if self.style.is_empty() {
            self.text.clone()
        } else {
            format!("{}, {}", self.text, self.style)
        }
    }
}
