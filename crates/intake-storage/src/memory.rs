//! In-memory filesystem, used for tests and throwaway batches.

use crate::paths;
use crate::traits::{Filesystem, FilesystemError, FilesystemResult, UploadStream};
use crate::StorageBackend;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::io::AsyncReadExt;

/// Filesystem that keeps every file in a shared map keyed by normalized path.
#[derive(Clone, Default)]
pub struct MemoryFilesystem {
    files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryFilesystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get file data (for test assertions)
    pub fn get_file(&self, path: &str) -> Option<Vec<u8>> {
        let key = paths::normalize(path).ok()?;
        self.lock().get(&key).cloned()
    }

    /// Normalized paths of every stored file, sorted
    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.lock().keys().cloned().collect();
        paths.sort();
        paths
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>> {
        // A poisoned map is still a consistent map of whole files.
        self.files.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl Filesystem for MemoryFilesystem {
    async fn write_stream(&self, path: &str, mut stream: UploadStream) -> FilesystemResult<u64> {
        let key = paths::normalize(path)?;

        if self.lock().contains_key(&key) {
            return Err(FilesystemError::AlreadyExists(path.to_string()));
        }

        let mut data = Vec::new();
        stream.read_to_end(&mut data).await.map_err(|e| {
            FilesystemError::WriteFailed(format!("Failed to read stream for {}: {}", path, e))
        })?;
        let size = data.len() as u64;

        let mut files = self.lock();
        if files.contains_key(&key) {
            return Err(FilesystemError::AlreadyExists(path.to_string()));
        }
        files.insert(key, data);

        tracing::debug!(path = %path, size_bytes = size, "Memory filesystem write successful");

        Ok(size)
    }

    async fn read(&self, path: &str) -> FilesystemResult<Vec<u8>> {
        let key = paths::normalize(path)?;
        self.lock()
            .get(&key)
            .cloned()
            .ok_or_else(|| FilesystemError::NotFound(path.to_string()))
    }

    async fn has(&self, path: &str) -> FilesystemResult<bool> {
        let key = paths::normalize(path)?;
        Ok(self.lock().contains_key(&key))
    }

    async fn delete(&self, path: &str) -> FilesystemResult<()> {
        let key = paths::normalize(path)?;
        self.lock().remove(&key);
        Ok(())
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[tokio::test]
    async fn test_memory_write_read_delete() {
        let fs = MemoryFilesystem::new();

        let size = fs
            .write_stream("/dest/a.txt", Box::new(Cursor::new(b"abc".to_vec())))
            .await
            .unwrap();

        assert_eq!(size, 3);
        assert_eq!(fs.get_file("dest/a.txt"), Some(b"abc".to_vec()));
        assert_eq!(fs.paths(), vec!["dest/a.txt".to_string()]);

        let again = fs
            .write_stream("dest/a.txt", Box::new(Cursor::new(b"zzz".to_vec())))
            .await;
        assert!(matches!(again, Err(FilesystemError::AlreadyExists(_))));

        fs.delete("/dest/a.txt").await.unwrap();
        assert!(!fs.has("dest/a.txt").await.unwrap());
    }

    #[tokio::test]
    async fn test_clones_share_contents() {
        let fs = MemoryFilesystem::new();
        let view = fs.clone();

        fs.write_stream("x", Box::new(Cursor::new(vec![1, 2])))
            .await
            .unwrap();

        assert_eq!(view.read("x").await.unwrap(), vec![1, 2]);
    }
}
