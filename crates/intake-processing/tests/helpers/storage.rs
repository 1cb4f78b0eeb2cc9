//! Filesystems that fail or stall on purpose.

use async_trait::async_trait;
use intake_storage::{
    Filesystem, FilesystemError, FilesystemResult, MemoryFilesystem, StorageBackend, UploadStream,
};
use tokio_util::sync::CancellationToken;

/// Memory filesystem that refuses to write files with a given name.
#[derive(Clone, Default)]
pub struct FailingFilesystem {
    pub inner: MemoryFilesystem,
    fail_on: String,
}

impl FailingFilesystem {
    pub fn failing_on(name: &str) -> Self {
        Self {
            inner: MemoryFilesystem::new(),
            fail_on: name.to_string(),
        }
    }
}

#[async_trait]
impl Filesystem for FailingFilesystem {
    async fn write_stream(&self, path: &str, stream: UploadStream) -> FilesystemResult<u64> {
        if path.rsplit('/').next() == Some(self.fail_on.as_str()) {
            return Err(FilesystemError::WriteFailed("disk quota exceeded".to_string()));
        }
        self.inner.write_stream(path, stream).await
    }

    async fn read(&self, path: &str) -> FilesystemResult<Vec<u8>> {
        self.inner.read(path).await
    }

    async fn has(&self, path: &str) -> FilesystemResult<bool> {
        self.inner.has(path).await
    }

    async fn delete(&self, path: &str) -> FilesystemResult<()> {
        self.inner.delete(path).await
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Memory
    }
}

/// Memory filesystem whose write of a given name cancels `token` and then
/// never completes.
#[derive(Clone)]
pub struct StallingFilesystem {
    pub inner: MemoryFilesystem,
    stall_on: String,
    token: CancellationToken,
}

impl StallingFilesystem {
    pub fn stalling_on(name: &str, token: CancellationToken) -> Self {
        Self {
            inner: MemoryFilesystem::new(),
            stall_on: name.to_string(),
            token,
        }
    }
}

#[async_trait]
impl Filesystem for StallingFilesystem {
    async fn write_stream(&self, path: &str, stream: UploadStream) -> FilesystemResult<u64> {
        if path.rsplit('/').next() == Some(self.stall_on.as_str()) {
            self.token.cancel();
            std::future::pending::<()>().await;
        }
        self.inner.write_stream(path, stream).await
    }

    async fn read(&self, path: &str) -> FilesystemResult<Vec<u8>> {
        self.inner.read(path).await
    }

    async fn has(&self, path: &str) -> FilesystemResult<bool> {
        self.inner.has(path).await
    }

    async fn delete(&self, path: &str) -> FilesystemResult<()> {
        self.inner.delete(path).await
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Memory
    }
}
