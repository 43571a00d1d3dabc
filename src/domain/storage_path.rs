use std::fmt;

use super::upload::{AudioFileName, UploadId};

/// Object key relative to a staging store root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePath(String);

impl StoragePath {
    /// Transient image location. Prefixed with the upload id so two requests
    /// carrying the same filename never share a path.
    pub fn for_upload(upload_id: &UploadId, filename: &str) -> Self {
        Self(format!("{}-{}", upload_id.as_uuid(), filename))
    }

    pub fn for_audio(name: &AudioFileName) -> Self {
        Self(name.as_str().to_string())
    }

    pub fn from_raw(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoragePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
