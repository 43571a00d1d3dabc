use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File};
use serde::Deserialize;

use super::Environment;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub ocr: OcrSettings,
    pub speech: SpeechSettings,
    pub logging: LoggingSettings,
    pub retention: RetentionSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub max_upload_mb: usize,
}

impl ServerSettings {
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    pub upload_dir: PathBuf,
    pub audio_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OcrSettings {
    pub tesseract_binary: PathBuf,
    pub tessdata_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpeechSettings {
    /// Overrides the endpoint derived from `tld`.
    pub base_url: Option<String>,
    pub tld: String,
    pub timeout_secs: u64,
}

impl SpeechSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    pub enable_json: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RetentionSettings {
    /// Sweeping is off unless this is set.
    pub max_age_hours: Option<u64>,
    pub sweep_interval_secs: u64,
}

impl RetentionSettings {
    pub fn max_age(&self) -> Option<Duration> {
        self.max_age_hours
            .map(|hours| Duration::from_secs(hours.saturating_mul(3600)))
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}

impl Settings {
    /// Built-in defaults, then `appsettings.{env}` from the working directory,
    /// then `APP_`-prefixed environment variables.
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        Self::load_from(Path::new("."), environment)
    }

    pub fn load_from(config_dir: &Path, environment: Environment) -> Result<Self, ConfigError> {
        let file = config_dir.join(format!("appsettings.{}", environment.as_str()));

        defaults()?
            .add_source(File::with_name(&file.to_string_lossy()).required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8000)?
        .set_default("server.max_upload_mb", 20)?
        .set_default("storage.upload_dir", "uploads")?
        .set_default("storage.audio_dir", "audio/output")?
        .set_default("ocr.tesseract_binary", "tesseract")?
        .set_default("speech.tld", "com")?
        .set_default("speech.timeout_secs", 30)?
        .set_default("logging.level", "info")?
        .set_default("logging.enable_json", false)?
        .set_default("retention.sweep_interval_secs", 3600)
}
