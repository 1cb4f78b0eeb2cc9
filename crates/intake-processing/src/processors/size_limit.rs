use async_trait::async_trait;
use intake_core::Metadata;
use intake_storage::UploadStream;
use tokio::io::AsyncReadExt;

use crate::traits::{PreProcessor, ProcessorVerdict};
use crate::validator::{UploadValidator, ValidationError};

/// Rejects files larger than a byte limit.
///
/// The declared size is checked first; the stream is then counted (reading at
/// most one byte past the limit) since a client may under-declare.
pub struct SizeLimitPreProcessor {
    validator: UploadValidator,
}

impl SizeLimitPreProcessor {
    pub fn new(max_bytes: u64) -> Self {
        Self {
            validator: UploadValidator::new(max_bytes, Vec::new(), Vec::new()),
        }
    }

    pub fn max_bytes(&self) -> u64 {
        self.validator.max_file_size()
    }
}

#[async_trait]
impl PreProcessor for SizeLimitPreProcessor {
    fn name(&self) -> &str {
        "size_limit"
    }

    async fn process(
        &self,
        stream: &mut UploadStream,
        metadata: &Metadata,
    ) -> anyhow::Result<ProcessorVerdict> {
        if let Err(e) = self.validator.validate_file_size(metadata.size()) {
            return Ok(ProcessorVerdict::reject(e.to_string()));
        }

        let limit = self.max_bytes();
        let mut counted = (&mut *stream).take(limit.saturating_add(1));
        let actual = tokio::io::copy(&mut counted, &mut tokio::io::sink()).await?;

        if actual > limit {
            let e = ValidationError::FileTooLarge {
                size: actual,
                max: limit,
            };
            return Ok(ProcessorVerdict::reject(format!("{} (declared {} bytes)", e, metadata.size())));
        }

        Ok(ProcessorVerdict::accept())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processors::test_stream;

    #[tokio::test]
    async fn accepts_within_limit() {
        let processor = SizeLimitPreProcessor::new(5);
        let verdict = processor
            .process(&mut test_stream(b"hello"), &Metadata::new("a.txt", 5, "text/plain"))
            .await
            .unwrap();
        assert!(verdict.status().is_accepted());
        assert!(verdict.annotations().is_empty());
    }

    #[tokio::test]
    async fn rejects_declared_size_over_limit() {
        let processor = SizeLimitPreProcessor::new(4);
        let verdict = processor
            .process(&mut test_stream(b""), &Metadata::new("a.txt", 5, "text/plain"))
            .await
            .unwrap();
        assert_eq!(
            verdict.status().reason(),
            Some("File too large: 5 bytes (max: 4 bytes)")
        );
    }

    #[tokio::test]
    async fn rejects_under_declared_stream() {
        let processor = SizeLimitPreProcessor::new(4);
        let verdict = processor
            .process(&mut test_stream(b"0123456789"), &Metadata::new("a.txt", 1, "text/plain"))
            .await
            .unwrap();
        assert!(verdict.status().is_rejected());
        assert!(verdict
            .status()
            .reason()
            .unwrap()
            .starts_with("File too large: 5 bytes"));
    }
}
