use anyhow::Context;
use async_trait::async_trait;
use intake_core::Metadata;
use intake_storage::UploadStream;
use tokio::io::AsyncReadExt;

use crate::traits::{PreProcessor, ProcessorVerdict};
use crate::validator::{essence, expected_content_types};

/// Bytes inspected for magic numbers
const SNIFF_LEN: u64 = 8192;

/// Annotation key carrying the content type detected from magic bytes
pub const DETECTED_MIME_TYPE_KEY: &str = "detected_mime_type";

/// Detects the real content type from the leading bytes.
///
/// Files of an unrecognised format are accepted without annotation. In strict
/// mode a recognised type that differs from the declared one is rejected;
/// known aliases of the detected type (`audio/mp3` for `audio/mpeg`) match.
#[derive(Debug, Default)]
pub struct MimeSniffPreProcessor {
    strict: bool,
}

impl MimeSniffPreProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strict() -> Self {
        Self { strict: true }
    }
}

#[async_trait]
impl PreProcessor for MimeSniffPreProcessor {
    fn name(&self) -> &str {
        "mime_sniff"
    }

    async fn process(
        &self,
        stream: &mut UploadStream,
        metadata: &Metadata,
    ) -> anyhow::Result<ProcessorVerdict> {
        let mut head = Vec::with_capacity(SNIFF_LEN as usize);
        (&mut *stream)
            .take(SNIFF_LEN)
            .read_to_end(&mut head)
            .await
            .context("Failed to read file header")?;

        let Some(kind) = infer::get(&head) else {
            return Ok(ProcessorVerdict::accept());
        };

        let detected = kind.mime_type();
        let declared = essence(metadata.mime_type());

        if self.strict && !same_type(&declared, detected, kind.extension()) {
            tracing::warn!(
                filename = %metadata.filename(),
                declared = %declared,
                detected = %detected,
                "Declared content type does not match file content"
            );
            return Ok(ProcessorVerdict::reject(format!(
                "Declared content type {} does not match detected {}",
                metadata.mime_type(),
                detected
            )));
        }

        Ok(ProcessorVerdict::accept().with_annotation(DETECTED_MIME_TYPE_KEY, detected))
    }
}

/// Whether a declared content type essence names the detected format.
fn same_type(declared: &str, detected: &str, extension: &str) -> bool {
    declared == detected
        || expected_content_types(extension)
            .is_some_and(|aliases| aliases.contains(&detected) && aliases.contains(&declared))
}
