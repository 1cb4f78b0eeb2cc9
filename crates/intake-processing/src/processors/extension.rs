use async_trait::async_trait;
use intake_core::Metadata;
use intake_storage::UploadStream;

use crate::traits::{PreProcessor, ProcessorVerdict};
use crate::validator::UploadValidator;

/// How the extension list is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionPolicy {
    /// Only listed extensions pass; files without an extension are rejected
    Allow,
    /// Listed extensions are rejected; files without an extension pass
    Deny,
}

/// Filters files by their (case-insensitive) extension.
pub struct ExtensionPreProcessor {
    policy: ExtensionPolicy,
    extensions: Vec<String>,
    validator: UploadValidator,
}

impl ExtensionPreProcessor {
    pub fn new(policy: ExtensionPolicy, extensions: Vec<String>) -> Self {
        let extensions: Vec<String> = extensions
            .into_iter()
            .map(|e| e.trim().trim_start_matches('.').to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        let validator = match policy {
            ExtensionPolicy::Allow => UploadValidator::new(u64::MAX, extensions.clone(), Vec::new()),
            ExtensionPolicy::Deny => UploadValidator::default(),
        };
        Self {
            policy,
            extensions,
            validator,
        }
    }

    pub fn allow(extensions: Vec<String>) -> Self {
        Self::new(ExtensionPolicy::Allow, extensions)
    }

    pub fn deny(extensions: Vec<String>) -> Self {
        Self::new(ExtensionPolicy::Deny, extensions)
    }

    pub fn policy(&self) -> ExtensionPolicy {
        self.policy
    }
}

#[async_trait]
impl PreProcessor for ExtensionPreProcessor {
    fn name(&self) -> &str {
        "extension"
    }

    async fn process(
        &self,
        _stream: &mut UploadStream,
        metadata: &Metadata,
    ) -> anyhow::Result<ProcessorVerdict> {
        let checked = match self.policy {
            // An empty allow-list admits nothing
            ExtensionPolicy::Allow if self.extensions.is_empty() => {
                return Ok(ProcessorVerdict::reject(format!(
                    "No file extensions are allowed: {}",
                    metadata.filename()
                )))
            }
            ExtensionPolicy::Allow => self.validator.validate_extension(metadata.filename()),
            ExtensionPolicy::Deny => self
                .validator
                .validate_not_denied(metadata.filename(), &self.extensions),
        };

        Ok(match checked {
            Ok(()) => ProcessorVerdict::accept(),
            Err(e) => ProcessorVerdict::reject(e.to_string()),
        })
    }
}
