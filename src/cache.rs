// # Lyric Cache
//
// Bridges an artist's lyric collection and the blob store. One entry per
// canonical artist name; every save replaces the previous entry in a single
// put, so a reader never sees a partially enriched collection.

pub mod lyric_table;

use crate::cloud_storage::{BlobStore, CloudStorageError, S3BlobStore};
use crate::config::CacheSettings;
use crate::models::LyricRecord;
use lyric_table::TableError;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("no cached lyrics for '{0}'")]
    NotCached(String),
    #[error("caching disabled: {0}")]
    CachingDisabled(String),
    #[error("storage error: {0}")]
    Storage(#[from] CloudStorageError),
    #[error("lyric table error: {0}")]
    Table(#[from] TableError),
}

enum Backend {
    Enabled {
        store: Arc<dyn BlobStore>,
        bucket_name: String,
        region: String,
    },
    Disabled {
        reason: String,
    },
}

/// Cache/persistence gateway keyed by canonical artist name
#[derive(Clone)]
pub struct LyricCache {
    backend: Arc<Backend>,
}

impl std::fmt::Debug for LyricCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.backend.as_ref() {
            Backend::Enabled { bucket_name, .. } => f
                .debug_struct("LyricCache")
                .field("store", &"<dyn BlobStore>")
                .field("bucket_name", bucket_name)
                .finish(),
            Backend::Disabled { reason } => f
                .debug_struct("LyricCache")
                .field("disabled", reason)
                .finish(),
        }
    }
}

impl LyricCache {
    /// Connect to S3 when credentials are present, otherwise build a disabled cache
    pub async fn connect(settings: CacheSettings) -> Result<Self, CacheError> {
        match settings {
            CacheSettings::Enabled(config) => {
                let bucket_name = config.bucket_name.clone();
                let region = config.region.clone();
                let store = S3BlobStore::new(config).await?;
                Ok(Self::with_store(Arc::new(store), bucket_name, region))
            }
            CacheSettings::Disabled { reason } => Ok(Self::disabled(reason)),
        }
    }

    pub fn with_store(
        store: Arc<dyn BlobStore>,
        bucket_name: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            backend: Arc::new(Backend::Enabled {
                store,
                bucket_name: bucket_name.into(),
                region: region.into(),
            }),
        }
    }

    pub fn disabled(reason: impl Into<String>) -> Self {
        Self {
            backend: Arc::new(Backend::Disabled {
                reason: reason.into(),
            }),
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self.backend.as_ref(), Backend::Enabled { .. })
    }

    fn store(&self) -> Result<&Arc<dyn BlobStore>, CacheError> {
        match self.backend.as_ref() {
            Backend::Enabled { store, .. } => Ok(store),
            Backend::Disabled { reason } => Err(CacheError::CachingDisabled(reason.clone())),
        }
    }

    /// Replace the cached collection for `artist`
    pub async fn save(&self, artist: &str, records: &[LyricRecord]) -> Result<(), CacheError> {
        let store = self.store()?;
        let bytes = lyric_table::encode(records)?;

        debug!(
            "LyricCache: saving {} records for {} ({} bytes)",
            records.len(),
            artist,
            bytes.len()
        );
        store.put(artist, bytes).await?;

        info!("LyricCache: saved {} songs for {}", records.len(), artist);
        Ok(())
    }

    /// Load the cached collection for `artist`
    pub async fn load(&self, artist: &str) -> Result<Vec<LyricRecord>, CacheError> {
        let store = self.store()?;

        let bytes = store
            .get(artist)
            .await?
            .ok_or_else(|| CacheError::NotCached(artist.to_string()))?;

        let records = lyric_table::decode(&bytes)?;
        info!("LyricCache: loaded {} songs for {}", records.len(), artist);
        Ok(records)
    }

    /// Artist names with a cache entry
    pub async fn list_artists(&self) -> Result<Vec<String>, CacheError> {
        Ok(self.store()?.list().await?)
    }

    pub async fn delete(&self, artist: &str) -> Result<(), CacheError> {
        self.store()?.delete(artist).await?;
        info!("LyricCache: deleted {}", artist);
        Ok(())
    }

    /// Provision the configured bucket in the configured region
    pub async fn create_bucket(&self) -> Result<(), CacheError> {
        match self.backend.as_ref() {
            Backend::Enabled {
                store,
                bucket_name,
                region,
            } => Ok(store.create_bucket(bucket_name, region).await?),
            Backend::Disabled { reason } => Err(CacheError::CachingDisabled(reason.clone())),
        }
    }
}
