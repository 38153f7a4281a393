//! Opaque key-value blob stores

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::errors::FlowError;
use crate::filesys::file::File;

/// Whole-value key-value storage: read whole, replace whole
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Read the blob under `key`, `None` when absent
    async fn get(&self, key: &str) -> Result<Option<String>, FlowError>;

    /// Replace the blob under `key`
    async fn put(&self, key: &str, blob: &str) -> Result<(), FlowError>;
}

/// One `<key>.json` file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    dir: PathBuf,
}

impl FileBlobStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn file(&self, key: &str) -> Result<File, FlowError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(FlowError::StorageError(format!("invalid blob key: {:?}", key)));
        }
        Ok(File::new(self.dir.join(format!("{}.json", key))))
    }
}

#[async_trait]
impl BlobStore for FileBlobStore {
    async fn get(&self, key: &str) -> Result<Option<String>, FlowError> {
        self.file(key)?.read_optional().await
    }

    async fn put(&self, key: &str, blob: &str) -> Result<(), FlowError> {
        self.file(key)?.write_atomic(blob.as_bytes()).await
    }
}

/// In-memory store, for tests and throwaway sessions
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a blob directly
    pub fn with_blob(key: &str, blob: &str) -> Self {
        let store = Self::new();
        store
            .entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), blob.to_string());
        store
    }

    pub fn len(&self) -> usize {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn get(&self, key: &str) -> Result<Option<String>, FlowError> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(key).cloned())
    }

    async fn put(&self, key: &str, blob: &str) -> Result<(), FlowError> {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), blob.to_string());
        Ok(())
    }
}
