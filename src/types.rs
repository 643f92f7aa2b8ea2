//! Request and response types for the model-call layer.

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::error::LlmError;

/// An image attached to a prompt for vision-capable models.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagePart {
    pub mime_type: String,
    /// Base64-encoded image bytes (standard alphabet, padded).
    pub data: String,
}

impl ImagePart {
    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: STANDARD.encode(bytes),
        }
    }

    /// Read an image file, guessing its MIME type from the extension.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, LlmError> {
        let path = path.as_ref();
        let mime = mime_guess::from_path(path).first_or_octet_stream();
        if mime.type_() != mime_guess::mime::IMAGE {
            return Err(LlmError::InvalidInput(format!(
                "{} does not look like an image ({mime})",
                path.display()
            )));
        }
        let bytes = tokio::fs::read(path).await?;
        Ok(Self::from_bytes(mime.essence_str(), &bytes))
    }

    /// `data:` URL accepted by OpenAI-style `image_url` content parts.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

/// A single prompt sent to a text model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    pub system: Option<String>,
    pub user: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<ImagePart>,
}

impl Prompt {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            user: text.into(),
            ..Default::default()
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_image(mut self, image: ImagePart) -> Self {
        self.images.push(image);
        self
    }

    /// System and user text joined by a blank line, for providers that take a
    /// single text input.
    pub fn flattened(&self) -> String {
        match &self.system {
            Some(system) if !system.is_empty() => format!("{system}\n\n{}", self.user),
            _ => self.user.clone(),
        }
    }
}

/// Token accounting reported by the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Text returned by a successful model call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    pub text: String,
    pub model: Option<String>,
    pub finish_reason: Option<String>,
    pub usage: Option<Usage>,
}

impl Completion {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_data_url() {
        let image = ImagePart::from_bytes("image/png", b"\x89PNG");
        assert_eq!(image.data, "iVBORw==");
        assert_eq!(image.data_url(), "data:image/png;base64,iVBORw==");
    }

    #[tokio::test]
    async fn test_image_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("specimen.jpg");
        std::fs::write(&path, b"jpegbytes").unwrap();

        let image = ImagePart::from_path(&path).await.unwrap();
        assert_eq!(image.mime_type, "image/jpeg");
        assert_eq!(image.data, STANDARD.encode(b"jpegbytes"));
    }

    #[tokio::test]
    async fn test_image_from_path_rejects_non_images() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"text").unwrap();

        let err = ImagePart::from_path(&path).await.unwrap_err();
        assert!(matches!(err, LlmError::InvalidInput(_)));

        let err = ImagePart::from_path(dir.path().join("missing.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::IoError(_)));
    }

    #[test]
    fn test_prompt_flattened() {
        let prompt = Prompt::user("Analyze this").with_system("You are a mycologist.");
        assert_eq!(prompt.flattened(), "You are a mycologist.\n\nAnalyze this");
        assert_eq!(Prompt::user("only").flattened(), "only");
    }
}
