mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    LoggingSettings, OcrSettings, RetentionSettings, ServerSettings, Settings, SpeechSettings,
    StorageSettings,
};
