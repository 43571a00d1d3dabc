mod audio;
mod error;
mod health;
mod root;
mod upload;

pub use audio::audio_handler;
pub use error::{AUDIO_NOT_FOUND_DETAIL, ApiError, ErrorResponse, INVALID_LANGUAGE_DETAIL};
pub use health::health_handler;
pub use root::{SERVICE_BANNER, root_handler};
pub use upload::{FILE_FIELD, LANGUAGE_FIELD, UploadResponse, upload_handler};
