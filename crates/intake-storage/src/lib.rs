//! Intake Storage Library
//!
//! This crate provides the filesystem abstraction uploads are relocated into,
//! the selector that maps logical locations to filesystems, and the local and
//! in-memory backends.
//!
//! # Path format
//!
//! Paths are `/`-separated and relative to the filesystem root; a leading `/`
//! is accepted and ignored. Paths must not contain `..` components. Path
//! normalization is centralized in the `paths` module so all backends stay
//! consistent.

pub mod factory;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-memory")]
pub mod memory;
pub(crate) mod paths;
pub mod selector;
pub mod traits;

// Re-export commonly used types
pub use factory::create_filesystems;
pub use intake_core::StorageBackend;
#[cfg(feature = "storage-local")]
pub use local::LocalFilesystem;
#[cfg(feature = "storage-memory")]
pub use memory::MemoryFilesystem;
pub use selector::{FilesystemSet, Filesystems};
pub use traits::{Filesystem, FilesystemError, FilesystemResult, SeekableStream, UploadStream};
