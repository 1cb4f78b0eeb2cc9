use async_trait::async_trait;
use intake_core::{Metadata, UploadConfig};
use intake_storage::UploadStream;

use crate::traits::{PreProcessor, ProcessorVerdict};
use crate::validator::UploadValidator;

/// Checks the client-declared content type: against the allow-list when one
/// is configured, and against the types expected for the filename's
/// extension.
pub struct ContentTypePreProcessor {
    validator: UploadValidator,
}

impl ContentTypePreProcessor {
    pub fn new(allowed_content_types: Vec<String>) -> Self {
        Self {
            validator: UploadValidator::new(u64::MAX, Vec::new(), allowed_content_types),
        }
    }

    pub fn from_config(config: &dyn UploadConfig) -> Self {
        Self::new(config.allowed_content_types().to_vec())
    }
}

#[async_trait]
impl PreProcessor for ContentTypePreProcessor {
    fn name(&self) -> &str {
        "content_type"
    }

    async fn process(
        &self,
        _stream: &mut UploadStream,
        metadata: &Metadata,
    ) -> anyhow::Result<ProcessorVerdict> {
        let checked = self
            .validator
            .validate_content_type(metadata.mime_type())
            .and_then(|_| {
                self.validator
                    .validate_extension_content_type_match(metadata.filename(), metadata.mime_type())
            });

        Ok(match checked {
            Ok(()) => ProcessorVerdict::accept(),
            Err(e) => ProcessorVerdict::reject(e.to_string()),
        })
    }
}
