use std::sync::Arc;

use serde::Serialize;

use super::metadata::{ExtraMetadata, Metadata};
use super::status::ProcessingStatus;

/// Final record for one uploaded file.
///
/// `path` stays empty until the file has been written to its destination.
/// The annotation map is shared read-only between a result and the results
/// derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadResult {
    name: String,
    size: u64,
    mime_type: String,
    metadata: Arc<ExtraMetadata>,
    status: ProcessingStatus,
    path: String,
}

impl UploadResult {
    pub fn new(
        name: impl Into<String>,
        size: u64,
        mime_type: impl Into<String>,
        metadata: ExtraMetadata,
        status: ProcessingStatus,
        path: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            size,
            mime_type: mime_type.into(),
            metadata: Arc::new(metadata),
            status,
            path: path.into(),
        }
    }

    /// Unmoved result built from the file descriptor and its verdict.
    pub fn from_metadata(metadata: &Metadata, status: ProcessingStatus) -> Self {
        Self::new(
            metadata.filename(),
            metadata.size(),
            metadata.mime_type(),
            metadata.extra().clone(),
            status,
            "",
        )
    }

    /// Copy of this result recording where the file was written.
    pub fn with_path(&self, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..self.clone()
        }
    }

    /// Copy of this result rejected with `reason` and without a path.
    pub fn with_rejection(&self, reason: impl Into<String>) -> Self {
        Self {
            status: ProcessingStatus::rejected(reason),
            path: String::new(),
            ..self.clone()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn metadata(&self) -> &ExtraMetadata {
        &self.metadata
    }

    pub fn status(&self) -> &ProcessingStatus {
        &self.status
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_accepted(&self) -> bool {
        self.status.is_accepted()
    }

    pub fn is_moved(&self) -> bool {
        !self.path.is_empty()
    }
}
