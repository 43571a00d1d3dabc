use std::io;
use std::path::PathBuf;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::stream::BoxStream;

use crate::domain::StoragePath;

pub type ByteStream = BoxStream<'static, Result<Bytes, StagingStoreError>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub path: StoragePath,
    pub size: u64,
    pub last_modified: DateTime<Utc>,
}

#[async_trait::async_trait]
pub trait StagingStore: Send + Sync {
    /// Writes `data` at `path`, replacing anything already there.
    async fn put(&self, path: &StoragePath, data: Bytes) -> Result<u64, StagingStoreError>;

    async fn fetch(&self, path: &StoragePath) -> Result<Vec<u8>, StagingStoreError>;

    async fn open(&self, path: &StoragePath) -> Result<ByteStream, StagingStoreError>;

    async fn delete(&self, path: &StoragePath) -> Result<(), StagingStoreError>;

    async fn head(&self, path: &StoragePath) -> Result<u64, StagingStoreError>;

    async fn list(&self) -> Result<Vec<StoredObject>, StagingStoreError>;

    /// Location on the local filesystem, for engines that only read files.
    fn local_path(&self, path: &StoragePath) -> Result<PathBuf, StagingStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StagingStoreError {
    #[error("upload failed: {0}")]
    UploadFailed(String),
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("download failed: {0}")]
    DownloadFailed(String),
    #[error("delete failed: {0}")]
    DeleteFailed(String),
    #[error("list failed: {0}")]
    ListFailed(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
