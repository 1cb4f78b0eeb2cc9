//! Traits for the upload pipeline.

use async_trait::async_trait;
use intake_core::{ExtraMetadata, Metadata, ProcessingStatus};
use intake_storage::UploadStream;

/// Verdict of one pre-processor, optionally carrying annotations for the
/// file's extra metadata. Annotations are only kept when the file is accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessorVerdict {
    status: ProcessingStatus,
    annotations: ExtraMetadata,
}

impl ProcessorVerdict {
    pub fn accept() -> Self {
        Self {
            status: ProcessingStatus::accepted(),
            annotations: ExtraMetadata::new(),
        }
    }

    pub fn reject(reason: impl Into<String>) -> Self {
        Self {
            status: ProcessingStatus::rejected(reason),
            annotations: ExtraMetadata::new(),
        }
    }

    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.annotations.insert(key, value);
        self
    }

    pub fn status(&self) -> &ProcessingStatus {
        &self.status
    }

    pub fn annotations(&self) -> &ExtraMetadata {
        &self.annotations
    }

    pub fn into_parts(self) -> (ProcessingStatus, ExtraMetadata) {
        (self.status, self.annotations)
    }
}

/// Single-file validation or inspection step.
///
/// A processor may read as much of the stream as it needs; the manager
/// rewinds it before the next step. Returning `Err` rejects the file with
/// the error as reason, it never aborts the batch.
#[async_trait]
pub trait PreProcessor: Send + Sync {
    /// Name of the processor (for logging and rejection reasons)
    fn name(&self) -> &str;

    async fn process(
        &self,
        stream: &mut UploadStream,
        metadata: &Metadata,
    ) -> anyhow::Result<ProcessorVerdict>;
}

/// Optional virus scanner (e.g. ClamAV). Implemented outside this crate.
#[async_trait]
pub trait VirusScanner: Send + Sync {
    async fn scan(&self, data: &[u8]) -> anyhow::Result<()>;
}
