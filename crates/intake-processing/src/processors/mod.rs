//! Built-in pre-processors.
//!
//! Each processor checks one property of a file. [`default_processors`]
//! assembles the chain implied by the upload configuration, and
//! [`default_processors_with_scanner`] appends a virus scan to it.

mod content_type;
mod extension;
mod filename;
#[cfg(feature = "sniff")]
mod mime_sniff;
mod size_limit;
mod virus_scan;

pub use content_type::ContentTypePreProcessor;
pub use extension::{ExtensionPolicy, ExtensionPreProcessor};
pub use filename::FilenamePreProcessor;
#[cfg(feature = "sniff")]
pub use mime_sniff::MimeSniffPreProcessor;
pub use size_limit::SizeLimitPreProcessor;
pub use virus_scan::VirusScanPreProcessor;

use std::sync::Arc;

use intake_core::UploadConfig;

use crate::traits::{PreProcessor, VirusScanner};

/// Chain derived from configuration: filename, size, extension allow-list
/// (when configured), content type, then content sniffing.
pub fn default_processors(config: &dyn UploadConfig) -> Vec<Arc<dyn PreProcessor>> {
    let mut processors: Vec<Arc<dyn PreProcessor>> = vec![
        Arc::new(FilenamePreProcessor::new()),
        Arc::new(SizeLimitPreProcessor::new(config.max_file_size())),
    ];

    if !config.allowed_extensions().is_empty() {
        processors.push(Arc::new(ExtensionPreProcessor::allow(
            config.allowed_extensions().to_vec(),
        )));
    }

    processors.push(Arc::new(ContentTypePreProcessor::from_config(config)));

    #[cfg(feature = "sniff")]
    processors.push(Arc::new(MimeSniffPreProcessor::new()));

    processors
}

/// [`default_processors`] followed by a virus scan, when a scanner is given.
///
/// The scan buffers at most `virus_scan_max_bytes()` of each file.
pub fn default_processors_with_scanner(
    config: &dyn UploadConfig,
    scanner: Option<Arc<dyn VirusScanner>>,
) -> Vec<Arc<dyn PreProcessor>> {
    let mut processors = default_processors(config);
    if let Some(scanner) = scanner {
        processors.push(Arc::new(VirusScanPreProcessor::new(
            scanner,
            config.virus_scan_max_bytes(),
        )));
    }
    processors
}

#[cfg(test)]
pub(crate) fn test_stream(data: &[u8]) -> intake_storage::UploadStream {
    Box::new(std::io::Cursor::new(data.to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_core::IntakeConfig;

    #[test]
    fn default_chain_follows_configuration() {
        let unrestricted = IntakeConfig::default();
        let names: Vec<String> = default_processors(&unrestricted)
            .iter()
            .map(|p| p.name().to_string())
            .collect();
        assert!(!names.iter().any(|n| n == "extension"));
        assert_eq!(names[0], "filename");
        assert_eq!(names[1], "size_limit");

        let restricted = IntakeConfig {
            allowed_extensions: vec!["pdf".to_string()],
            ..IntakeConfig::default()
        };
        let names: Vec<String> = default_processors(&restricted)
            .iter()
            .map(|p| p.name().to_string())
            .collect();
        assert_eq!(names[2], "extension");
    }

    struct CleanScanner;

    #[async_trait::async_trait]
    impl VirusScanner for CleanScanner {
        async fn scan(&self, _data: &[u8]) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn scanner_uses_configured_limit() {
        let config = IntakeConfig {
            virus_scan_max_bytes: 4,
            ..IntakeConfig::default()
        };

        let without = default_processors_with_scanner(&config, None);
        assert_eq!(without.len(), default_processors(&config).len());

        let with = default_processors_with_scanner(&config, Some(Arc::new(CleanScanner)));
        let scan = with.last().unwrap();
        assert_eq!(scan.name(), "virus_scan");

        let metadata = intake_core::Metadata::new("a.bin", 8, "application/octet-stream");
        let verdict = scan
            .process(&mut test_stream(b"12345678"), &metadata)
            .await
            .unwrap();
        assert_eq!(
            verdict.status().reason(),
            Some("File exceeds the virus scan limit of 4 bytes")
        );
    }
}
