use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;
use url::Url;

use crate::domain::error::DomainError;
use crate::domain::media::DataUri;
use crate::domain::ports::ObjectStorage;

const PAYLOAD_FIELD: &str = "data_uri";

/// Decoded object as held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Object storage kept in process. Download URLs are minted under
/// `public_base_url`, which is expected to front the same paths.
pub struct InMemoryObjectStorage {
    public_base_url: Url,
    objects: DashMap<String, StoredObject>,
}

impl InMemoryObjectStorage {
    pub fn new(public_base_url: Url) -> Self {
        Self {
            public_base_url,
            objects: DashMap::new(),
        }
    }

    pub fn object(&self, path: &str) -> Option<StoredObject> {
        self.objects.get(path).map(|o| o.value().clone())
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    fn download_url(&self, path: &str) -> Result<String, DomainError> {
        let mut url = self.public_base_url.clone();
        url.path_segments_mut()
            .map_err(|_| DomainError::upstream("object_storage", "base URL cannot carry a path"))?
            .pop_if_empty()
            .extend(path.split('/'));
        Ok(url.to_string())
    }
}

#[async_trait]
impl ObjectStorage for InMemoryObjectStorage {
    async fn upload_data_uri(&self, path: &str, data_uri: &str) -> Result<String, DomainError> {
        let uri = DataUri::parse(PAYLOAD_FIELD, data_uri)?;
        let bytes = uri.decode(PAYLOAD_FIELD)?;
        let url = self.download_url(path)?;
        debug!(%path, size = bytes.len(), "Stored object");
        self.objects.insert(
            path.to_string(),
            StoredObject {
                mime_type: uri.mime_type,
                bytes,
            },
        );
        Ok(url)
    }
}
