use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use intake_core::Metadata;
use intake_storage::UploadStream;
use tokio::io::AsyncReadExt;

use crate::traits::{PreProcessor, ProcessorVerdict, VirusScanner};

/// Buffers the file and hands it to a [`VirusScanner`].
///
/// Files larger than `max_bytes` are rejected unscanned. A scanner error
/// rejects the file with the scanner's message.
pub struct VirusScanPreProcessor {
    scanner: Arc<dyn VirusScanner>,
    max_bytes: u64,
}

impl VirusScanPreProcessor {
    pub fn new(scanner: Arc<dyn VirusScanner>, max_bytes: u64) -> Self {
        Self { scanner, max_bytes }
    }
}

#[async_trait]
impl PreProcessor for VirusScanPreProcessor {
    fn name(&self) -> &str {
        "virus_scan"
    }

    async fn process(
        &self,
        stream: &mut UploadStream,
        metadata: &Metadata,
    ) -> anyhow::Result<ProcessorVerdict> {
        let mut data = Vec::new();
        (&mut *stream)
            .take(self.max_bytes.saturating_add(1))
            .read_to_end(&mut data)
            .await
            .context("Failed to buffer file for scanning")?;

        if data.len() as u64 > self.max_bytes {
            return Ok(ProcessorVerdict::reject(format!(
                "File exceeds the virus scan limit of {} bytes",
                self.max_bytes
            )));
        }

        match self.scanner.scan(&data).await {
            Ok(()) => Ok(ProcessorVerdict::accept().with_annotation("virus_scan", "clean")),
            Err(e) => {
                tracing::warn!(
                    filename = %metadata.filename(),
                    error = %e,
                    "Virus scan rejected file"
                );
                Ok(ProcessorVerdict::reject(format!("Virus scan failed: {}", e)))
            }
        }
    }
}
