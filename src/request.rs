//! The composed extraction request.
//!
//! An [`ExtractionRequest`] owns its [`UploadedImage`], which is the whole
//! invariant: there is no way to construct a request without an image, so
//! the "extract with nothing uploaded" case is unrepresentable past this
//! point. The strings are carried exactly as the user typed them — empty is
//! fine, and nothing is trimmed, rewritten, or validated.

use crate::pipeline::ingest::UploadedImage;

/// One extraction request: instruction text, the invoice image, and the
/// custom prompt, in submission order.
///
/// Assembled immediately before each call and dropped afterwards; nothing
/// here is persisted.
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    /// Free-text instruction, e.g. "Extract total amount and date". May be
    /// empty.
    pub instruction: String,
    /// The ingested invoice image.
    pub image: UploadedImage,
    /// Custom prompt; the web form pre-fills
    /// [`crate::prompts::DEFAULT_PROMPT`]. May be empty.
    pub prompt: String,
}

impl ExtractionRequest {
    pub fn new(
        instruction: impl Into<String>,
        image: UploadedImage,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            instruction: instruction.into(),
            image,
            prompt: prompt.into(),
        }
    }

    /// The ordered submission triple: instruction, image, prompt.
    pub fn parts(&self) -> (&str, &UploadedImage, &str) {
        (&self.instruction, &self.image, &self.prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::ingest::MediaType;

    fn image() -> UploadedImage {
        UploadedImage {
            file_name: "invoice.png".into(),
            media_type: MediaType::Png,
            bytes: vec![1, 2, 3],
            width: 1,
            height: 1,
        }
    }

    #[test]
    fn parts_preserve_order_and_content() {
        let req = ExtractionRequest::new("total and date", image(), "in English");
        let (instruction, img, prompt) = req.parts();
        assert_eq!(instruction, "total and date");
        assert_eq!(img.file_name, "invoice.png");
        assert_eq!(prompt, "in English");
    }

    #[test]
    fn empty_strings_pass_through_unchanged() {
        let req = ExtractionRequest::new("", image(), "");
        assert_eq!(req.instruction, "");
        assert_eq!(req.prompt, "");
    }
}
