#[cfg(feature = "storage-local")]
use crate::LocalFilesystem;
#[cfg(feature = "storage-memory")]
use crate::MemoryFilesystem;
#[cfg(any(not(feature = "storage-local"), not(feature = "storage-memory")))]
use crate::FilesystemError;
use crate::{FilesystemResult, FilesystemSet, StorageBackend};
use intake_core::IntakeConfig;
use std::sync::Arc;

/// Create the filesystem selector based on configuration
pub async fn create_filesystems(config: &IntakeConfig) -> FilesystemResult<FilesystemSet> {
    let set = match config.storage_backend {
        #[cfg(feature = "storage-local")]
        StorageBackend::Local => FilesystemSet::new(
            Arc::new(LocalFilesystem::new(&config.storage_root).await?),
            Arc::new(LocalFilesystem::new(&config.web_root).await?),
            Arc::new(LocalFilesystem::new(&config.customizing_root).await?),
        ),

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => {
            return Err(FilesystemError::Config(
                "Local storage backend not available (storage-local feature not enabled)"
                    .to_string(),
            ))
        }

        #[cfg(feature = "storage-memory")]
        StorageBackend::Memory => FilesystemSet::new(
            Arc::new(MemoryFilesystem::new()),
            Arc::new(MemoryFilesystem::new()),
            Arc::new(MemoryFilesystem::new()),
        ),

        #[cfg(not(feature = "storage-memory"))]
        StorageBackend::Memory => {
            return Err(FilesystemError::Config(
                "Memory storage backend not available (storage-memory feature not enabled)"
                    .to_string(),
            ))
        }
    };

    tracing::info!(
        backend = %config.storage_backend,
        "Storage filesystems initialized"
    );

    Ok(set)
}
