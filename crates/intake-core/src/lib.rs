//! Intake Core Library
//!
//! This crate provides the value types, error types, location tokens and
//! configuration shared by every Intake component. It has no I/O of its own.

pub mod config;
pub mod constants;
pub mod error;
pub mod location;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{IntakeConfig, UploadConfig};
pub use error::{IntakeError, IntakeResult, LogLevel};
pub use location::Location;
pub use models::{ExtraMetadata, Metadata, ProcessingStatus, StatusCode, UploadResult};
pub use storage_types::StorageBackend;
