use std::sync::Arc;

use bytes::Bytes;

use crate::application::ports::{
    RecognitionError, SpeechSpeed, SpeechSynthesizer, StagingStore, StagingStoreError,
    SynthesisError,
};
use crate::domain::{
    AudioFileName, ExtractedText, LanguageProfile, LanguageRegistry, StoragePath, UnknownLanguage,
    UploadedImage,
};

use super::recognizer_pool::{RecognizerPool, RecognizerPoolError};

/// Result of reading one image aloud.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Narration {
    pub text: ExtractedText,
    pub audio: AudioFileName,
}

/// Image in, text and speech out.
pub struct NarrationService {
    registry: LanguageRegistry,
    recognizers: Arc<RecognizerPool>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    uploads: Arc<dyn StagingStore>,
    audio: Arc<dyn StagingStore>,
}

impl NarrationService {
    pub fn new(
        registry: LanguageRegistry,
        recognizers: Arc<RecognizerPool>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        uploads: Arc<dyn StagingStore>,
        audio: Arc<dyn StagingStore>,
    ) -> Self {
        Self {
            registry,
            recognizers,
            synthesizer,
            uploads,
            audio,
        }
    }

    pub fn registry(&self) -> &LanguageRegistry {
        &self.registry
    }

    /// Runs the full pipeline for one upload.
    ///
    /// The language is validated before anything touches disk. Once the image
    /// has been written, it is removed again whether or not the rest of the
    /// pipeline succeeds. The audio file name depends only on the client
    /// filename and the language, so repeating a request overwrites the
    /// earlier audio.
    pub async fn narrate(
        &self,
        image: UploadedImage,
        language_code: &str,
    ) -> Result<Narration, NarrationError> {
        let profile = self
            .registry
            .resolve(language_code)
            .map_err(NarrationError::InvalidLanguage)?;

        let upload_path = StoragePath::for_upload(&image.id, &image.filename);
        let audio_name = image.audio_file_name(profile);

        let written = self.uploads.put(&upload_path, Bytes::from(image.data)).await?;
        tracing::debug!(path = %upload_path, bytes = written, "Upload staged");

        let staged = StagedUpload::new(Arc::clone(&self.uploads), upload_path);
        let outcome = self.process(staged.path(), profile, &audio_name).await;
        staged.remove().await;

        let text = outcome?;
        Ok(Narration {
            text,
            audio: audio_name,
        })
    }

    async fn process(
        &self,
        upload_path: &StoragePath,
        profile: &LanguageProfile,
        audio_name: &AudioFileName,
    ) -> Result<ExtractedText, NarrationError> {
        let recognizer = self.recognizers.get_recognizer(profile.code).await?;
        let image_path = self.uploads.local_path(upload_path)?;

        let fragments = recognizer.recognize(&image_path).await?;
        let fragment_count = fragments.len();
        let text = ExtractedText::from_fragments(fragments);

        tracing::debug!(
            language = profile.code,
            fragments = fragment_count,
            chars = text.as_str().chars().count(),
            "Recognition completed"
        );

        let audio = self
            .synthesizer
            .synthesize(text.as_str(), profile.synthesis_locale, SpeechSpeed::Normal)
            .await?;

        let audio_path = StoragePath::for_audio(audio_name);
        let size = self.audio.put(&audio_path, Bytes::from(audio)).await?;

        tracing::info!(audio = %audio_path, bytes = size, "Audio generated");

        Ok(text)
    }
}

/// Deletes the staged upload once the pipeline is done with it. If the
/// request future is dropped first, the delete is spawned from `Drop`.
struct StagedUpload {
    store: Arc<dyn StagingStore>,
    path: StoragePath,
    removed: bool,
}

impl StagedUpload {
    fn new(store: Arc<dyn StagingStore>, path: StoragePath) -> Self {
        Self {
            store,
            path,
            removed: false,
        }
    }

    fn path(&self) -> &StoragePath {
        &self.path
    }

    async fn remove(mut self) {
        delete_upload(self.store.as_ref(), &self.path).await;
        self.removed = true;
    }
}

impl Drop for StagedUpload {
    fn drop(&mut self) {
        if self.removed {
            return;
        }
        let store = Arc::clone(&self.store);
        let path = self.path.clone();
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                tracing::debug!(path = %path, "Request dropped, removing staged upload");
                handle.spawn(async move { delete_upload(store.as_ref(), &path).await });
            }
            Err(_) => {
                tracing::warn!(path = %path, "No runtime to remove staged upload");
            }
        }
    }
}

async fn delete_upload(store: &dyn StagingStore, path: &StoragePath) {
    if let Err(e) = store.delete(path).await {
        tracing::warn!(error = %e, path = %path, "Failed to remove staged upload");
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NarrationError {
    #[error("invalid language code: {0}")]
    InvalidLanguage(#[source] UnknownLanguage),
    #[error("storage: {0}")]
    Storage(#[from] StagingStoreError),
    #[error("recognizer: {0}")]
    Recognizer(#[from] RecognizerPoolError),
    #[error("recognition: {0}")]
    Recognition(#[from] RecognitionError),
    #[error("synthesis: {0}")]
    Synthesis(#[from] SynthesisError),
}

impl NarrationError {
    pub fn is_invalid_language(&self) -> bool {
        matches!(self, Self::InvalidLanguage(_))
    }
}
