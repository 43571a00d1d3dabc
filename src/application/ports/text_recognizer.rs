use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::LanguageProfile;

/// A loaded OCR engine bound to one language's recognizer locales.
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    /// Returns the text fragments found in the image, in reading order.
    async fn recognize(&self, image_path: &Path) -> Result<Vec<String>, RecognitionError>;
}

/// Builds recognizers. Construction may load models and is expected to be slow.
#[async_trait]
pub trait RecognizerFactory: Send + Sync {
    async fn create(
        &self,
        profile: &LanguageProfile,
    ) -> Result<Arc<dyn TextRecognizer>, RecognitionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RecognitionError {
    #[error("model loading failed: {0}")]
    ModelLoadFailed(String),
    #[error("recognition failed: {0}")]
    RecognitionFailed(String),
    #[error("engine unavailable: {0}")]
    EngineUnavailable(String),
}
