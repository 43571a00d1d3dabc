mod speech_synthesizer;
mod staging_store;
mod text_recognizer;

pub use speech_synthesizer::{SpeechSpeed, SpeechSynthesizer, SynthesisError};
pub use staging_store::{ByteStream, StagingStore, StagingStoreError, StoredObject};
pub use text_recognizer::{RecognitionError, RecognizerFactory, TextRecognizer};
