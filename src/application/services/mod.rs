mod audio_library;
mod audio_retention;
mod narration_service;
mod recognizer_pool;

pub use audio_library::{AudioLibrary, AudioLookupError, AudioStream};
pub use audio_retention::AudioRetentionSweeper;
pub use narration_service::{Narration, NarrationError, NarrationService};
pub use recognizer_pool::{RecognizerPool, RecognizerPoolError};
