//! Ordered pre-processor chain applied to one file.

use std::io::SeekFrom;
use std::sync::Arc;

use intake_core::{Metadata, ProcessingStatus};
use intake_storage::UploadStream;
use tokio::io::AsyncSeekExt;

use crate::traits::{PreProcessor, ProcessorVerdict};

/// Result of running the chain over one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerOutcome {
    pub status: ProcessingStatus,
    /// The file's metadata with every accepted annotation merged in
    pub metadata: Metadata,
}

/// Ordered chain of pre-processors.
///
/// The first rejection ends the chain; an empty chain accepts everything.
#[derive(Clone, Default)]
pub struct PreProcessorManager {
    processors: Vec<Arc<dyn PreProcessor>>,
}

async fn rewind(stream: &mut UploadStream) -> std::io::Result<()> {
    stream.seek(SeekFrom::Start(0)).await.map(|_| ())
}

impl PreProcessorManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a processor to the end of the chain
    pub fn with(&mut self, processor: Arc<dyn PreProcessor>) {
        self.processors.push(processor);
    }

    pub fn len(&self) -> usize {
        self.processors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }

    /// Names of the registered processors, in chain order
    pub fn names(&self) -> Vec<&str> {
        self.processors.iter().map(|p| p.name()).collect()
    }

    /// Run every processor over `stream` in chain order.
    ///
    /// The stream is rewound before each processor and after the last one, so
    /// it is positioned at its start when this returns.
    pub async fn process(&self, stream: &mut UploadStream, metadata: &Metadata) -> ManagerOutcome {
        let mut current = metadata.clone();

        for processor in &self.processors {
            if let Err(e) = rewind(stream).await {
                return ManagerOutcome {
                    status: ProcessingStatus::rejected(format!(
                        "Stream could not be rewound: {}",
                        e
                    )),
                    metadata: current,
                };
            }

            let verdict = match processor.process(stream, &current).await {
                Ok(verdict) => verdict,
                Err(e) => {
                    tracing::warn!(
                        processor = processor.name(),
                        filename = %current.filename(),
                        error = %e,
                        "Pre-processor failed"
                    );
                    ProcessorVerdict::reject(format!("{}: {}", processor.name(), e))
                }
            };

            tracing::debug!(
                processor = processor.name(),
                filename = %current.filename(),
                status = %verdict.status(),
                "Pre-processor verdict"
            );

            let (status, annotations) = verdict.into_parts();
            if status.is_rejected() {
                return ManagerOutcome {
                    status,
                    metadata: current,
                };
            }

            if !annotations.is_empty() {
                let mut extra = current.extra().clone();
                for key in extra.merge(&annotations) {
                    tracing::warn!(
                        processor = processor.name(),
                        key = %key,
                        "Annotation key already set, keeping first value"
                    );
                }
                current = current.with_extra(extra);
            }
        }

        if !self.processors.is_empty() {
            if let Err(e) = rewind(stream).await {
                return ManagerOutcome {
                    status: ProcessingStatus::rejected(format!(
                        "Stream could not be rewound: {}",
                        e
                    )),
                    metadata: current,
                };
            }
        }

        ManagerOutcome {
            status: ProcessingStatus::accepted(),
            metadata: current,
        }
    }
}
