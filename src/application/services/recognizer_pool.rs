use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::OnceCell;

use crate::application::ports::{RecognitionError, RecognizerFactory, TextRecognizer};
use crate::domain::{LanguageRegistry, UnknownLanguage};

type RecognizerCell = Arc<OnceCell<Arc<dyn TextRecognizer>>>;

/// Lazily builds one recognizer per language and keeps it for the life of the
/// process. Concurrent first use of a language waits on a single
/// initialization; a failed initialization is retried by the next caller.
pub struct RecognizerPool {
    registry: LanguageRegistry,
    factory: Arc<dyn RecognizerFactory>,
    cells: Mutex<HashMap<&'static str, RecognizerCell>>,
}

impl RecognizerPool {
    pub fn new(registry: LanguageRegistry, factory: Arc<dyn RecognizerFactory>) -> Self {
        Self {
            registry,
            factory,
            cells: Mutex::new(HashMap::new()),
        }
    }

    pub async fn get_recognizer(
        &self,
        code: &str,
    ) -> Result<Arc<dyn TextRecognizer>, RecognizerPoolError> {
        let profile = self.registry.resolve(code)?;
        let cell = self.cell_for(profile.code);

        let recognizer = cell
            .get_or_try_init(|| async {
                tracing::info!(
                    language = profile.code,
                    locales = ?profile.recognizer_locales,
                    "Initializing OCR recognizer"
                );
                self.factory.create(profile).await
            })
            .await?;

        Ok(Arc::clone(recognizer))
    }

    /// Codes whose recognizer has finished initializing.
    pub fn loaded_languages(&self) -> Vec<&'static str> {
        let cells = self.cells.lock().unwrap_or_else(PoisonError::into_inner);
        let mut codes: Vec<&'static str> = cells
            .iter()
            .filter(|(_, cell)| cell.initialized())
            .map(|(code, _)| *code)
            .collect();
        codes.sort_unstable();
        codes
    }

    // The map lock is never held across engine construction.
    fn cell_for(&self, code: &'static str) -> RecognizerCell {
        let mut cells = self.cells.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(cells.entry(code).or_default())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RecognizerPoolError {
    #[error(transparent)]
    UnsupportedLanguage(#[from] UnknownLanguage),
    #[error("recognizer initialization failed: {0}")]
    Initialization(#[from] RecognitionError),
}
