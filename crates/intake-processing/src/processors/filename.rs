use async_trait::async_trait;
use intake_core::Metadata;
use intake_storage::UploadStream;

use crate::traits::{PreProcessor, ProcessorVerdict};
use crate::validator::ValidationError;

const MAX_FILENAME_LEN: usize = 255;

/// Annotation key carrying the storage-safe variant of the client filename
pub const SANITIZED_FILENAME_KEY: &str = "sanitized_filename";

/// Replace everything but alphanumerics, `.`, `-` and `_`, and cap the length.
pub fn sanitize_filename(filename: &str) -> String {
    let sanitized: String = filename
        .chars()
        .take(MAX_FILENAME_LEN)
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.trim_matches(|c| c == '_' || c == '.').is_empty() {
        "file".to_string()
    } else {
        sanitized
    }
}

fn check_filename(filename: &str) -> Result<(), ValidationError> {
    let reason = if filename.trim().is_empty() {
        "empty filename"
    } else if filename.contains('/') || filename.contains('\\') {
        "contains a path separator"
    } else if filename.contains("..") {
        "contains '..'"
    } else if filename.chars().any(char::is_control) {
        "contains control characters"
    } else if filename.len() > MAX_FILENAME_LEN {
        "longer than 255 bytes"
    } else {
        return Ok(());
    };

    Err(ValidationError::InvalidFilename(format!(
        "{:?} {}",
        filename, reason
    )))
}

/// Rejects client filenames that cannot be used as a single path component.
/// Accepted files are annotated with [`SANITIZED_FILENAME_KEY`].
#[derive(Debug, Default)]
pub struct FilenamePreProcessor;

impl FilenamePreProcessor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PreProcessor for FilenamePreProcessor {
    fn name(&self) -> &str {
        "filename"
    }

    async fn process(
        &self,
        _stream: &mut UploadStream,
        metadata: &Metadata,
    ) -> anyhow::Result<ProcessorVerdict> {
        if let Err(e) = check_filename(metadata.filename()) {
            return Ok(ProcessorVerdict::reject(e.to_string()));
        }

        Ok(ProcessorVerdict::accept()
            .with_annotation(SANITIZED_FILENAME_KEY, sanitize_filename(metadata.filename())))
    }
}
