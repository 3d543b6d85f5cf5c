use async_trait::async_trait;

use crate::domain::error::DomainError;

/// Port for managed object storage.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store the payload of `data_uri` at `path` and return its public download URL.
    async fn upload_data_uri(&self, path: &str, data_uri: &str) -> Result<String, DomainError>;
}
