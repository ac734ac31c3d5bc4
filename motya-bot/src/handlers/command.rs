//! Command text parsing: `/cmd@bot args` and `/draw`-style image arguments.

use prompt::{Prompt, Resolution};

use crate::core::HandlerError;

pub const MAX_IMAGE_SIZE: u32 = 1024;

const RESOLUTION_FORMAT: &str = "нужно ввести ширину и высоту изображения двумя числами 🫣";
const FRAMES_FORMAT: &str = "количество кадров нужно ввести одним числом 🫣";

/// Splits `/cmd@botname rest` into the lowercased command (without slash or bot suffix) and the
/// trimmed arguments. `None` for anything that is not a command.
pub fn parse_command(text: &str) -> Option<(String, String)> {
    let text = text.trim_start();
    let rest = text.strip_prefix('/')?;
    let (head, args) = match rest.split_once(char::is_whitespace) {
        Some((head, args)) => (head, args.trim()),
        None => (rest, ""),
    };
    let name = head.split('@').next().unwrap_or(head);
    if name.is_empty() {
        return None;
    }
    Some((name.to_lowercase(), args.to_string()))
}

/// Parses `WIDTH HEIGHT`, each at most [`MAX_IMAGE_SIZE`].
pub fn validate_resolution(values: &[&str]) -> Result<Resolution, HandlerError> {
    let [width, height] = values else {
        return Err(HandlerError::InvalidArguments(RESOLUTION_FORMAT.to_string()));
    };
    let (Ok(width), Ok(height)) = (width.parse::<u32>(), height.parse::<u32>()) else {
        return Err(HandlerError::InvalidArguments(RESOLUTION_FORMAT.to_string()));
    };
    if width > MAX_IMAGE_SIZE || height > MAX_IMAGE_SIZE {
        return Err(HandlerError::InvalidArguments(format!(
            "разрешение картинки не может быть больше чем {0}x{0} пикселей 🙄",
            MAX_IMAGE_SIZE
        )));
    }
    Ok(Resolution::new(width, height))
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Target {
    Text,
    Style,
    Resolution,
    Frames,
    Unknown,
}

fn flag(token: &str) -> Option<Target> {
    match token {
        "-s" | "-style" => Some(Target::Style),
        "-r" | "-res" => Some(Target::Resolution),
        "-f" | "-frames" => Some(Target::Frames),
        t if t.starts_with('-') && t.len() > 1 => Some(Target::Unknown),
        _ => None,
    }
}

/// Parses `text [-s|-style STYLE...] [-r|-res W H] [-f|-frames N]`.
///
/// Words before the first flag are the prompt text; every flag takes the words after it up to
/// the next flag. Unknown flags and their words are ignored. `Ok(None)` when there is no text.
pub fn parse_args(args: &str) -> Result<Option<Prompt>, HandlerError> {
    let mut text = Vec::new();
    let mut style = Vec::new();
    let mut resolution: Option<Vec<&str>> = None;
    let mut frames: Option<Vec<&str>> = None;
    let mut target = Target::Text;

    for token in args.split_whitespace() {
        if let Some(next) = flag(token) {
            target = next;
            match next {
                Target::Resolution => resolution = Some(Vec::new()),
                Target::Frames => frames = Some(Vec::new()),
                _ => {}
            }
            continue;
        }
        match target {
            Target::Text => text.push(token),
            Target::Style => style.push(token),
            Target::Resolution => resolution.get_or_insert_with(Vec::new).push(token),
            Target::Frames => frames.get_or_insert_with(Vec::new).push(token),
            Target::Unknown => {}
        }
    }

    if text.is_empty() {
        return Ok(None);
    }

    let mut prompt = Prompt::new(text.join(" ")).with_style(style.join(" "));
    if let Some(values) = resolution {
        prompt = prompt.with_resolution(validate_resolution(&values)?);
    }
    if let Some(values) = frames {
        let count = match values.as_slice() {
            [n] => n.parse::<u32>().ok().filter(|n| *n > 0),
            _ => None,
        }
        .ok_or_else(|| HandlerError::InvalidArguments(FRAMES_FORMAT.to_string()))?;
        prompt = prompt.with_frames(count);
    }
    Ok(Some(prompt))
}

#[cfg(test)]
mod tests {
    use super::*;
    use prompt::DEFAULT_FRAMES;

    #[test]
    fn commands_are_split_from_arguments() {
        assert_eq!(
            parse_command("/draw кот в шляпе"),
            Some(("draw".into(), "кот в шляпе".into()))
        );
        assert_eq!(
            parse_command("/Ask@motya_bot  как дела? "),
            Some(("ask".into(), "как дела?".into()))
        );
        assert_eq!(parse_command("/clear"), Some(("clear".into(), String::new())));
        assert_eq!(parse_command("привет"), None);
        assert_eq!(parse_command("/ hi"), None);
    }

    #[test]
    fn text_only() {
        let prompt = parse_args("a cat on the moon").unwrap().unwrap();
        assert_eq!(prompt.text, "a cat on the moon");
        assert!(prompt.is_default());
        assert_eq!(prompt.frames_count, DEFAULT_FRAMES);
    }

    #[test]
    fn style_resolution_and_frames() {
        let prompt = parse_args("cat -s anime oil -r 512 640 -f 8").unwrap().unwrap();
        assert_eq!(prompt.text, "cat");
        assert_eq!(prompt.style, "anime oil");
        assert_eq!(prompt.resolution, Resolution::new(512, 640));
        assert_eq!(prompt.frames_count, 8);

        let prompt = parse_args("cat -style watercolor -res 100 200").unwrap().unwrap();
        assert_eq!(prompt.style, "watercolor");
        assert_eq!(prompt.resolution, Resolution::new(100, 200));
        assert!(!prompt.is_default());
    }

    #[test]
    fn missing_text_is_none() {
        assert_eq!(parse_args("").unwrap(), None);
        assert_eq!(parse_args("-s anime cat").unwrap(), None);
    }

    #[test]
    fn bad_resolution_is_rejected() {
        assert_eq!(
            parse_args("cat -r 512").unwrap_err(),
            HandlerError::InvalidArguments(RESOLUTION_FORMAT.into())
        );
        assert!(parse_args("cat -r wide tall").is_err());
        let err = parse_args("cat -r 2048 512").unwrap_err();
        assert!(err.to_string().contains("1024x1024"));
        assert!(parse_args("cat -r 1024 1024").is_ok());
    }

    #[test]
    fn bad_frames_are_rejected() {
        assert!(parse_args("cat -f many").is_err());
        assert!(parse_args("cat -f 0").is_err());
    }

    #[test]
    fn unknown_flags_are_ignored() {
        let prompt = parse_args("cat -x whatever").unwrap().unwrap();
        assert_eq!(prompt.text, "cat");
    }
}
