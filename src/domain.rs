use crate::errors::{RepoError, StorageError};
use crate::models::Photo;
use async_trait::async_trait;

/// Trait defining operations against the object storage bucket.
#[async_trait]
pub trait ObjectStorage: Send + Sync + 'static {
    // Send+Sync+'static required for Arc<dyn>

    /// Writes `data` under `key`, declaring `content_type` on the object.
    async fn upload(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError>;

    /// Resolves the stable, unauthenticated URL of a stored object.
    async fn public_url(&self, key: &str) -> Result<String, StorageError>;

    /// Removes a stored object. Only used to compensate a failed record
    /// insert; nothing else in the system deletes objects.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;
}

/// Trait defining operations for recording uploaded photos.
///
/// Records are write-once: there is no update or delete path.
#[async_trait]
pub trait PhotoRepository: Send + Sync + 'static {
    /// Inserts a photo row referencing `url` and returns the stored record.
    async fn create(&self, url: &str) -> Result<Photo, RepoError>;
}
