//! Data models for an upload batch
//!
//! Every model here is an immutable value: transitions build new instances
//! instead of editing existing ones, so earlier snapshots stay valid.

mod metadata;
mod result;
mod status;

pub use metadata::{ExtraMetadata, Metadata};
pub use result::UploadResult;
pub use status::{ProcessingStatus, StatusCode};
