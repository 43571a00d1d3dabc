use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use futures::{StreamExt, TryStreamExt};
use object_store::local::LocalFileSystem;
use object_store::path::Path as StorePath;
use object_store::{ObjectMeta, ObjectStore, PutPayload};
use percent_encoding::percent_decode_str;

use crate::application::ports::{ByteStream, StagingStore, StagingStoreError, StoredObject};
use crate::domain::StoragePath;

/// Staging store rooted at a directory on local disk. The directory is
/// created when the store is built.
pub struct LocalStagingStore {
    inner: Arc<LocalFileSystem>,
    base_path: PathBuf,
}

impl LocalStagingStore {
    pub fn new(base_path: PathBuf) -> Result<Self, StagingStoreError> {
        std::fs::create_dir_all(&base_path).map_err(StagingStoreError::Io)?;
        let fs = LocalFileSystem::new_with_prefix(&base_path)
            .map_err(|e| StagingStoreError::UploadFailed(e.to_string()))?;
        Ok(Self {
            inner: Arc::new(fs),
            base_path,
        })
    }

    pub fn base_path(&self) -> &std::path::Path {
        &self.base_path
    }

    // Locations are percent-encoded; the decoded form is what
    // `StorePath::from` encodes back to the same location.
    fn storage_path_of(location: &StorePath) -> Result<StoragePath, StagingStoreError> {
        let decoded = percent_decode_str(location.as_ref())
            .decode_utf8()
            .map_err(|e| StagingStoreError::ListFailed(format!("{location}: {e}")))?;
        Ok(StoragePath::from_raw(decoded.into_owned()))
    }
}

fn lookup_error(
    error: object_store::Error,
    fallback: fn(String) -> StagingStoreError,
) -> StagingStoreError {
    match error {
        object_store::Error::NotFound { path, .. } => StagingStoreError::NotFound(path),
        other => fallback(other.to_string()),
    }
}

#[async_trait::async_trait]
impl StagingStore for LocalStagingStore {
    async fn put(&self, path: &StoragePath, data: Bytes) -> Result<u64, StagingStoreError> {
        let store_path = StorePath::from(path.as_str());
        let size = data.len() as u64;

        self.inner
            .put(&store_path, PutPayload::from(data))
            .await
            .map_err(|e| StagingStoreError::UploadFailed(e.to_string()))?;

        Ok(size)
    }

    async fn fetch(&self, path: &StoragePath) -> Result<Vec<u8>, StagingStoreError> {
        let store_path = StorePath::from(path.as_str());
        let result = self
            .inner
            .get(&store_path)
            .await
            .map_err(|e| lookup_error(e, StagingStoreError::DownloadFailed))?;

        let bytes = result
            .bytes()
            .await
            .map_err(|e| StagingStoreError::DownloadFailed(e.to_string()))?;

        Ok(bytes.to_vec())
    }

    async fn open(&self, path: &StoragePath) -> Result<ByteStream, StagingStoreError> {
        let store_path = StorePath::from(path.as_str());
        let result = self
            .inner
            .get(&store_path)
            .await
            .map_err(|e| lookup_error(e, StagingStoreError::DownloadFailed))?;

        Ok(result
            .into_stream()
            .map_err(|e| StagingStoreError::DownloadFailed(e.to_string()))
            .boxed())
    }

    async fn delete(&self, path: &StoragePath) -> Result<(), StagingStoreError> {
        let store_path = StorePath::from(path.as_str());
        self.inner
            .delete(&store_path)
            .await
            .map_err(|e| lookup_error(e, StagingStoreError::DeleteFailed))
    }

    async fn head(&self, path: &StoragePath) -> Result<u64, StagingStoreError> {
        let store_path = StorePath::from(path.as_str());
        let meta = self
            .inner
            .head(&store_path)
            .await
            .map_err(|e| lookup_error(e, StagingStoreError::DownloadFailed))?;
        Ok(meta.size as u64)
    }

    async fn list(&self) -> Result<Vec<StoredObject>, StagingStoreError> {
        let metas: Vec<ObjectMeta> = self
            .inner
            .list(None)
            .try_collect()
            .await
            .map_err(|e| StagingStoreError::ListFailed(e.to_string()))?;

        metas
            .into_iter()
            .map(|meta| {
                Ok(StoredObject {
                    path: Self::storage_path_of(&meta.location)?,
                    size: meta.size as u64,
                    last_modified: meta.last_modified,
                })
            })
            .collect()
    }

    fn local_path(&self, path: &StoragePath) -> Result<PathBuf, StagingStoreError> {
        let store_path = StorePath::from(path.as_str());
        self.inner
            .path_to_filesystem(&store_path)
            .map_err(|e| StagingStoreError::NotFound(e.to_string()))
    }
}
