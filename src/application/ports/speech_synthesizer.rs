use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpeechSpeed {
    #[default]
    Normal,
    Slow,
}

#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Renders `text` in the voice for `locale` and returns MP3 bytes.
    async fn synthesize(
        &self,
        text: &str,
        locale: &str,
        speed: SpeechSpeed,
    ) -> Result<Vec<u8>, SynthesisError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SynthesisError {
    #[error("no text to speak")]
    NoText,
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("invalid api response: {0}")]
    InvalidResponse(String),
}
