/// Generated post: text plus images in publish order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub text: String,
    pub images: Vec<Vec<u8>>,
}

impl Post {
    /// The text is lowercased, matching the persona's writing style.
    pub fn new(text: impl AsRef<str>, images: Vec<Vec<u8>>) -> Self {
        Self {
            text: text.as_ref().to_lowercase(),
            images,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_is_lowercased() {
        let post = Post::new("Привет, МИР", vec![]);
        assert_eq!(post.text, "привет, мир");
        assert!(post.images.is_empty());
    }
}
