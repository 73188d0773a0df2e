use lyricsense::cloud_storage::{BlobStore, CloudStorageError};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// In-memory blob store for tests
///
/// Counts puts and gets so tests can tell whether the cache was consulted
/// or written.
#[derive(Default)]
pub struct MockBlobStore {
    blobs: Mutex<BTreeMap<String, Vec<u8>>>,
    buckets: Mutex<Vec<(String, String)>>,
    puts: AtomicUsize,
    gets: AtomicUsize,
    fail_gets: bool,
}

impl MockBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose reads always fail with an SDK error
    pub fn failing_reads() -> Self {
        Self {
            fail_gets: true,
            ..Self::default()
        }
    }

    pub fn insert(&self, key: &str, data: Vec<u8>) {
        self.blobs.lock().unwrap().insert(key.to_string(), data);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.blobs.lock().unwrap().contains_key(key)
    }

    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    pub fn get_count(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn buckets(&self) -> Vec<(String, String)> {
        self.buckets.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl BlobStore for MockBlobStore {
    async fn put(&self, key: &str, data: Vec<u8>) -> Result<(), CloudStorageError> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.blobs.lock().unwrap().insert(key.to_string(), data);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CloudStorageError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        if self.fail_gets {
            return Err(CloudStorageError::SdkError(format!(
                "simulated read failure for {}",
                key
            )));
        }
        Ok(self.blobs.lock().unwrap().get(key).cloned())
    }

    async fn delete(&self, key: &str) -> Result<(), CloudStorageError> {
        self.blobs.lock().unwrap().remove(key);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<String>, CloudStorageError> {
        Ok(self.blobs.lock().unwrap().keys().cloned().collect())
    }

    async fn create_bucket(&self, name: &str, region: &str) -> Result<(), CloudStorageError> {
        self.buckets
            .lock()
            .unwrap()
            .push((name.to_string(), region.to_string()));
        Ok(())
    }
}
