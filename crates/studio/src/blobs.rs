//! In-memory store for generated media.
//!
//! Video clips and narration are kept as binary blobs and referenced from
//! scenes by a locally-scoped URI (`{prefix}{uuid}`) that the HTTP layer
//! serves. Blobs live only as long as the process, like browser object
//! URLs.

use std::collections::HashMap;
use std::sync::Arc;

use scriptboard_core::media::MediaBlob;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Default URI prefix, matching the media route of the HTTP API.
pub const DEFAULT_BLOB_URI_PREFIX: &str = "/api/v1/media/";

/// Blob storage keyed by UUID.
pub struct BlobStore {
    prefix: String,
    blobs: RwLock<HashMap<Uuid, Arc<MediaBlob>>>,
}

impl Default for BlobStore {
    fn default() -> Self {
        Self::new(DEFAULT_BLOB_URI_PREFIX)
    }
}

impl BlobStore {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            blobs: RwLock::new(HashMap::new()),
        }
    }

    /// Store a blob and return its URI.
    pub async fn insert(&self, blob: MediaBlob) -> String {
        let id = Uuid::new_v4();
        tracing::debug!(blob_id = %id, bytes = blob.bytes.len(), mime_type = %blob.mime_type, "Stored media blob");
        self.blobs.write().await.insert(id, Arc::new(blob));
        self.uri_for(&id)
    }

    pub async fn get(&self, id: &Uuid) -> Option<Arc<MediaBlob>> {
        self.blobs.read().await.get(id).cloned()
    }

    /// Look a blob up by the URI returned from [`BlobStore::insert`].
    pub async fn get_by_uri(&self, uri: &str) -> Option<Arc<MediaBlob>> {
        let id = self.parse_uri(uri)?;
        self.get(&id).await
    }

    /// Release a blob by URI. Unknown URIs are ignored.
    pub async fn remove_uri(&self, uri: &str) -> bool {
        match self.parse_uri(uri) {
            Some(id) => self.blobs.write().await.remove(&id).is_some(),
            None => false,
        }
    }

    /// Drop every blob.
    pub async fn clear(&self) {
        let mut blobs = self.blobs.write().await;
        let count = blobs.len();
        blobs.clear();
        tracing::debug!(count, "Cleared media blobs");
    }

    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }

    pub fn uri_for(&self, id: &Uuid) -> String {
        format!("{}{}", self.prefix, id)
    }

    /// Extract the blob ID from a URI issued by this store.
    pub fn parse_uri(&self, uri: &str) -> Option<Uuid> {
        uri.strip_prefix(&self.prefix)
            .and_then(|id| Uuid::parse_str(id).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blob() -> MediaBlob {
        MediaBlob::new("video/mp4", vec![0, 0, 0, 24])
    }

    #[tokio::test]
    async fn insert_returns_prefixed_uri() {
        let store = BlobStore::default();
        let uri = store.insert(blob()).await;
        assert!(uri.starts_with(DEFAULT_BLOB_URI_PREFIX));
        assert_eq!(store.get_by_uri(&uri).await.unwrap().bytes, vec![0, 0, 0, 24]);
    }

    #[tokio::test]
    async fn uris_are_unique() {
        let store = BlobStore::default();
        let a = store.insert(blob()).await;
        let b = store.insert(blob()).await;
        assert_ne!(a, b);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn remove_uri_releases_blob() {
        let store = BlobStore::default();
        let uri = store.insert(blob()).await;
        assert!(store.remove_uri(&uri).await);
        assert!(store.get_by_uri(&uri).await.is_none());
        assert!(!store.remove_uri(&uri).await);
    }

    #[tokio::test]
    async fn foreign_uris_are_ignored() {
        let store = BlobStore::new("/media/");
        assert!(store.parse_uri("/api/v1/media/not-a-uuid").is_none());
        assert!(!store.remove_uri("data:image/png;base64,AA==").await);
    }

    #[tokio::test]
    async fn clear_empties_store() {
        let store = BlobStore::default();
        store.insert(blob()).await;
        store.clear().await;
        assert!(store.is_empty().await);
    }
}
