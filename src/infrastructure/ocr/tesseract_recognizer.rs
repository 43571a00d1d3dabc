use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::Output;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::process::Command;

use crate::application::ports::{RecognitionError, RecognizerFactory, TextRecognizer};
use crate::domain::LanguageProfile;

const LANGUAGE_LIST_HEADER: &str = "List of available languages";

#[derive(Debug, Clone)]
pub struct TesseractConfig {
    pub binary: PathBuf,
    pub tessdata_dir: Option<PathBuf>,
}

impl Default for TesseractConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("tesseract"),
            tessdata_dir: None,
        }
    }
}

/// Runs the `tesseract` CLI with a fixed language set.
pub struct TesseractRecognizer {
    config: TesseractConfig,
    languages: String,
}

impl TesseractRecognizer {
    /// Checks that every requested language pack is installed. This is the
    /// step worth caching: it spawns the engine and scans its data directory.
    pub async fn load(
        config: TesseractConfig,
        locales: &[&str],
    ) -> Result<Self, RecognitionError> {
        if locales.is_empty() {
            return Err(RecognitionError::ModelLoadFailed(
                "no recognizer locales configured".to_string(),
            ));
        }

        let installed = installed_languages(&config).await?;
        let missing: Vec<&str> = locales
            .iter()
            .copied()
            .filter(|locale| !installed.contains(*locale))
            .collect();

        if !missing.is_empty() {
            return Err(RecognitionError::ModelLoadFailed(format!(
                "tesseract language data not installed: {}",
                missing.join(", ")
            )));
        }

        let languages = locales.join("+");
        tracing::info!(
            binary = %config.binary.display(),
            languages = %languages,
            "Tesseract recognizer loaded"
        );

        Ok(Self { config, languages })
    }

    pub fn languages(&self) -> &str {
        &self.languages
    }
}

#[async_trait]
impl TextRecognizer for TesseractRecognizer {
    async fn recognize(&self, image_path: &Path) -> Result<Vec<String>, RecognitionError> {
        let mut command = Command::new(&self.config.binary);
        command
            .kill_on_drop(true)
            .arg(image_path)
            .arg("stdout")
            .arg("-l")
            .arg(&self.languages);
        if let Some(dir) = &self.config.tessdata_dir {
            command.arg("--tessdata-dir").arg(dir);
        }

        tracing::debug!(
            image = %image_path.display(),
            languages = %self.languages,
            "Running tesseract"
        );

        let output = command
            .output()
            .await
            .map_err(|e| RecognitionError::EngineUnavailable(spawn_failure(&self.config, &e)))?;

        if !output.status.success() {
            return Err(RecognitionError::RecognitionFailed(failure_message(&output)));
        }

        Ok(parse_fragments(&String::from_utf8_lossy(&output.stdout)))
    }
}

pub struct TesseractRecognizerFactory {
    config: TesseractConfig,
}

impl TesseractRecognizerFactory {
    pub fn new(config: TesseractConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl RecognizerFactory for TesseractRecognizerFactory {
    async fn create(
        &self,
        profile: &LanguageProfile,
    ) -> Result<Arc<dyn TextRecognizer>, RecognitionError> {
        let recognizer =
            TesseractRecognizer::load(self.config.clone(), profile.recognizer_locales).await?;
        Ok(Arc::new(recognizer))
    }
}

async fn installed_languages(
    config: &TesseractConfig,
) -> Result<HashSet<String>, RecognitionError> {
    let mut command = Command::new(&config.binary);
    command.kill_on_drop(true).arg("--list-langs");
    if let Some(dir) = &config.tessdata_dir {
        command.arg("--tessdata-dir").arg(dir);
    }

    let output = command
        .output()
        .await
        .map_err(|e| RecognitionError::EngineUnavailable(spawn_failure(config, &e)))?;

    if !output.status.success() {
        return Err(RecognitionError::EngineUnavailable(failure_message(&output)));
    }

    Ok(parse_language_list(&String::from_utf8_lossy(&output.stdout)))
}

/// Parses `tesseract --list-langs` output.
pub fn parse_language_list(output: &str) -> HashSet<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with(LANGUAGE_LIST_HEADER))
        .map(String::from)
        .collect()
}

/// One fragment per non-blank output line, in output order.
pub fn parse_fragments(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

fn spawn_failure(config: &TesseractConfig, error: &std::io::Error) -> String {
    format!("failed to run {}: {}", config.binary.display(), error)
}

fn failure_message(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if stderr.is_empty() {
        format!("tesseract exited with {}", output.status)
    } else {
        format!("tesseract exited with {}: {}", output.status, stderr)
    }
}
