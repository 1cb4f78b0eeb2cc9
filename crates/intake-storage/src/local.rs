use crate::paths;
use crate::traits::{Filesystem, FilesystemError, FilesystemResult, UploadStream};
use crate::StorageBackend;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

/// Local filesystem implementation rooted at one directory
#[derive(Clone, Debug)]
pub struct LocalFilesystem {
    root: PathBuf,
}

/// Removes a temporary file unless the write it belongs to completed.
///
/// Also covers the write future being dropped mid-copy.
struct PartialFile {
    path: Option<PathBuf>,
}

impl PartialFile {
    fn new(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }

    fn path(&self) -> &Path {
        self.path.as_deref().unwrap_or_else(|| Path::new(""))
    }

    async fn discard(mut self) {
        if let Some(path) = self.path.take() {
            remove_partial(&path).await;
        }
    }
}

async fn remove_partial(path: &Path) {
    if let Err(e) = fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Failed to remove partial upload file"
            );
        }
    }
}

impl Drop for PartialFile {
    fn drop(&mut self) {
        let Some(path) = self.path.take() else {
            return;
        };

        // Write future dropped mid-copy
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move { remove_partial(&path).await });
            }
            Err(_) => {
                let _ = std::fs::remove_file(&path);
            }
        }
    }
}

impl LocalFilesystem {
    /// Create a new LocalFilesystem instance
    ///
    /// # Arguments
    /// * `root` - Root directory of this storage area (e.g., "/var/lib/intake/storage")
    pub async fn new(root: impl Into<PathBuf>) -> FilesystemResult<Self> {
        let root = root.into();

        fs::create_dir_all(&root).await.map_err(|e| {
            FilesystemError::Config(format!(
                "Failed to create storage directory {}: {}",
                root.display(),
                e
            ))
        })?;

        Ok(LocalFilesystem { root })
    }

    fn resolve(&self, path: &str) -> FilesystemResult<PathBuf> {
        let relative = paths::normalize(path)?;
        Ok(self.root.join(relative))
    }

    /// Ensure parent directory exists
    async fn ensure_parent_dir(&self, path: &Path) -> FilesystemResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    fn temp_sibling(path: &Path) -> PathBuf {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload");
        path.with_file_name(format!(".{}.{}.part", name, Uuid::new_v4()))
    }

    /// Copy `stream` into `partial`, then link it in at `target`.
    ///
    /// The link fails if `target` appeared in the meantime, so a concurrent
    /// writer is never overwritten.
    async fn persist(
        &self,
        path: &str,
        target: &Path,
        partial: &Path,
        stream: &mut UploadStream,
    ) -> FilesystemResult<u64> {
        let mut file = fs::File::create(partial).await.map_err(|e| {
            FilesystemError::WriteFailed(format!(
                "Failed to create file {}: {}",
                target.display(),
                e
            ))
        })?;

        let bytes_copied = tokio::io::copy(stream, &mut file).await.map_err(|e| {
            FilesystemError::WriteFailed(format!(
                "Failed to write stream to file {}: {}",
                target.display(),
                e
            ))
        })?;

        file.sync_all().await.map_err(|e| {
            FilesystemError::WriteFailed(format!(
                "Failed to sync file {}: {}",
                target.display(),
                e
            ))
        })?;
        drop(file);

        fs::hard_link(partial, target).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::AlreadyExists => FilesystemError::AlreadyExists(path.to_string()),
            _ => FilesystemError::WriteFailed(format!(
                "Failed to move file into place at {}: {}",
                target.display(),
                e
            )),
        })?;

        Ok(bytes_copied)
    }
}

#[async_trait]
impl Filesystem for LocalFilesystem {
    async fn write_stream(&self, path: &str, mut stream: UploadStream) -> FilesystemResult<u64> {
        let target = self.resolve(path)?;

        if fs::try_exists(&target).await? {
            return Err(FilesystemError::AlreadyExists(path.to_string()));
        }

        self.ensure_parent_dir(&target).await?;

        let start = std::time::Instant::now();
        let partial = PartialFile::new(Self::temp_sibling(&target));

        let result = self
            .persist(path, &target, partial.path(), &mut stream)
            .await;
        partial.discard().await;
        let bytes_copied = result?;

        tracing::info!(
            path = %target.display(),
            size_bytes = bytes_copied,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local filesystem stream write successful"
        );

        Ok(bytes_copied)
    }

    async fn read(&self, path: &str) -> FilesystemResult<Vec<u8>> {
        let target = self.resolve(path)?;

        fs::read(&target).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => FilesystemError::NotFound(path.to_string()),
            _ => FilesystemError::ReadFailed(format!(
                "Failed to read file {}: {}",
                target.display(),
                e
            )),
        })
    }

    async fn has(&self, path: &str) -> FilesystemResult<bool> {
        let target = self.resolve(path)?;
        fs::try_exists(&target).await.map_err(|e| {
            FilesystemError::ReadFailed(format!(
                "Failed to check file {}: {}",
                target.display(),
                e
            ))
        })
    }

    async fn delete(&self, path: &str) -> FilesystemResult<()> {
        let target = self.resolve(path)?;

        match fs::remove_file(&target).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => {
                return Err(FilesystemError::DeleteFailed(format!(
                    "Failed to delete file {}: {}",
                    target.display(),
                    e
                )))
            }
        }

        tracing::info!(path = %target.display(), "Local filesystem delete successful");

        Ok(())
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
