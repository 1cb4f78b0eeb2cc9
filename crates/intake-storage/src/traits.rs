//! Filesystem abstraction trait
//!
//! This module defines the Filesystem trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncSeek};

/// Filesystem operation errors
#[derive(Debug, Error)]
pub enum FilesystemError {
    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("File already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for filesystem operations
pub type FilesystemResult<T> = Result<T, FilesystemError>;

/// Readable, rewindable byte stream of one uploaded file.
pub trait SeekableStream: AsyncRead + AsyncSeek + Send + Unpin {}

impl<T: AsyncRead + AsyncSeek + Send + Unpin> SeekableStream for T {}

/// Owned upload stream handle. Dropping it releases the underlying resource.
pub type UploadStream = Box<dyn SeekableStream>;

/// Filesystem abstraction trait
///
/// A filesystem is one writable storage area (persistent storage, the public
/// web area, ...). The upload pipeline only ever writes through this trait,
/// so it works with any backend without knowing where the bytes end up.
#[async_trait]
pub trait Filesystem: Send + Sync {
    /// Write a stream to `path`, consuming it until EOF.
    ///
    /// Fails with `AlreadyExists` if `path` is taken; nothing is overwritten.
    /// A write that fails or is abandoned must not leave a partial file at
    /// `path`. Returns the number of bytes written.
    async fn write_stream(&self, path: &str, stream: UploadStream) -> FilesystemResult<u64>;

    /// Read a whole file
    async fn read(&self, path: &str) -> FilesystemResult<Vec<u8>>;

    /// Check if a file exists
    async fn has(&self, path: &str) -> FilesystemResult<bool>;

    /// Delete a file. Deleting a missing file is not an error.
    async fn delete(&self, path: &str) -> FilesystemResult<()>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
