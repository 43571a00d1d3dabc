use std::fmt;

use uuid::Uuid;

use super::language::LanguageProfile;

pub const AUDIO_EXTENSION: &str = "mp3";
const FALLBACK_STEM: &str = "upload";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UploadId(Uuid);

impl UploadId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for UploadId {
    fn default() -> Self {
        Self::new()
    }
}

/// An image received from a client, held in memory until the language is validated.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub id: UploadId,
    pub filename: String,
    pub data: Vec<u8>,
}

impl UploadedImage {
    pub fn new(filename: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            id: UploadId::new(),
            filename: sanitize_filename(&filename.into()),
            data,
        }
    }

    /// Everything before the first dot of the client filename.
    pub fn stem(&self) -> &str {
        let stem = self.filename.split('.').next().unwrap_or_default();
        if stem.is_empty() { FALLBACK_STEM } else { stem }
    }

    pub fn audio_file_name(&self, language: &LanguageProfile) -> AudioFileName {
        AudioFileName(format!(
            "{}_{}.{}",
            self.stem(),
            language.code,
            AUDIO_EXTENSION
        ))
    }
}

/// Name of a generated audio file, safe to join onto the audio directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AudioFileName(String);

impl AudioFileName {
    /// Validates a client-supplied name exactly as given. Anything that could
    /// leave the audio directory, or that carries surrounding whitespace, is
    /// rejected.
    pub fn parse(name: &str) -> Option<Self> {
        if name.is_empty()
            || name != name.trim()
            || name == "."
            || name.contains("..")
            || name.contains(['/', '\\'])
            || name.chars().any(char::is_control)
        {
            return None;
        }
        Some(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn url_path(&self) -> String {
        format!("/audio/{}", self.0)
    }

    pub fn content_type(&self) -> &'static str {
        let extension = self
            .0
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase());
        match extension.as_deref() {
            Some("mp3") => "audio/mpeg",
            Some("wav") => "audio/wav",
            Some("ogg") => "audio/ogg",
            _ => "application/octet-stream",
        }
    }
}

impl fmt::Display for AudioFileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reduces a client filename to its final path component and strips control
/// characters.
pub fn sanitize_filename(filename: &str) -> String {
    let last = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    let cleaned: String = last
        .chars()
        .map(|c| if c.is_control() { '_' } else { c })
        .collect();

    match cleaned.as_str() {
        "" | "." | ".." => FALLBACK_STEM.to_string(),
        _ => cleaned,
    }
}
