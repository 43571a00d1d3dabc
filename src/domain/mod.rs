mod extracted_text;
mod language;
mod storage_path;
mod upload;

pub use extracted_text::ExtractedText;
pub use language::{LanguageProfile, LanguageRegistry, UnknownLanguage};
pub use storage_path::StoragePath;
pub use upload::{AUDIO_EXTENSION, AudioFileName, UploadId, UploadedImage, sanitize_filename};
