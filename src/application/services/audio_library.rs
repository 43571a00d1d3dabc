use std::sync::Arc;

use crate::application::ports::{ByteStream, StagingStore, StagingStoreError};
use crate::domain::{AudioFileName, StoragePath};

pub struct AudioStream {
    pub name: AudioFileName,
    pub content_type: &'static str,
    pub size: u64,
    pub body: ByteStream,
}

/// Read side of the generated audio directory.
pub struct AudioLibrary {
    store: Arc<dyn StagingStore>,
}

impl AudioLibrary {
    pub fn new(store: Arc<dyn StagingStore>) -> Self {
        Self { store }
    }

    /// Names that would escape the audio directory are reported as missing.
    pub async fn open(&self, filename: &str) -> Result<AudioStream, AudioLookupError> {
        let name = AudioFileName::parse(filename)
            .ok_or_else(|| AudioLookupError::NotFound(filename.to_string()))?;
        let path = StoragePath::for_audio(&name);

        let size = self.store.head(&path).await.map_err(|e| not_found_or(e, &name))?;
        let body = self.store.open(&path).await.map_err(|e| not_found_or(e, &name))?;

        Ok(AudioStream {
            content_type: name.content_type(),
            name,
            size,
            body,
        })
    }
}

fn not_found_or(error: StagingStoreError, name: &AudioFileName) -> AudioLookupError {
    match error {
        StagingStoreError::NotFound(_) => AudioLookupError::NotFound(name.as_str().to_string()),
        other => AudioLookupError::Storage(other),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AudioLookupError {
    #[error("audio file not found: {0}")]
    NotFound(String),
    #[error("storage: {0}")]
    Storage(#[from] StagingStoreError),
}
