//! Upload pipeline: collect → pre-process → relocate.
//!
//! One [`UploadPipeline`] owns one batch of uploads for its whole life. The
//! batch moves through [`Phase::Collected`], [`Phase::Processed`] and
//! [`Phase::Moved`] exactly once, in that order. Per-file problems (transport
//! errors, rejections, failed writes) end up as REJECTED results; only
//! lifecycle violations and bad arguments surface as [`IntakeError`].

use std::sync::Arc;
use std::time::Instant;

use intake_core::constants::{RELOCATION_CANCELLED_REASON, UPLOAD_FAILED_REASON};
use intake_core::{
    IntakeError, IntakeResult, Location, LogLevel, ProcessingStatus, UploadConfig, UploadResult,
};
use intake_storage::{Filesystems, UploadStream};
use tokio_util::sync::CancellationToken;

use crate::manager::PreProcessorManager;
use crate::source::UploadSource;
use crate::traits::PreProcessor;

/// Lifecycle phase of a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Uploads are known; processors may still be registered
    Collected,
    /// Every file carries a verdict
    Processed,
    /// Accepted files have been written (or failed to)
    Moved,
}

/// `destination` joined with the file name by exactly one `/`
fn target_path(destination: &str, name: &str) -> String {
    format!("{}/{}", destination.trim_end_matches('/'), name)
}

pub struct UploadPipeline {
    manager: PreProcessorManager,
    filesystems: Arc<dyn Filesystems>,
    source: Box<dyn UploadSource>,
    config: Arc<dyn UploadConfig>,
    cancellation: CancellationToken,
    phase: Phase,
    results: Arc<[UploadResult]>,
    /// Index-aligned with `results`; a slot holds a stream only while its file
    /// is accepted and not yet relocated.
    pending_streams: Vec<Option<UploadStream>>,
}

impl UploadPipeline {
    pub fn new(
        manager: PreProcessorManager,
        filesystems: Arc<dyn Filesystems>,
        source: Box<dyn UploadSource>,
        config: Arc<dyn UploadConfig>,
    ) -> Self {
        Self {
            manager,
            filesystems,
            source,
            config,
            cancellation: CancellationToken::new(),
            phase: Phase::Collected,
            results: Arc::from(Vec::new()),
            pending_streams: Vec::new(),
        }
    }

    /// Abandon relocation when `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Per-file upload limit in bytes.
    pub fn upload_size_limit(&self) -> u64 {
        self.config.max_file_size()
    }

    /// Snapshot of the results in arrival order. Empty before `process()`.
    pub fn results(&self) -> Arc<[UploadResult]> {
        Arc::clone(&self.results)
    }

    fn violation(&self, message: &str) -> IntakeError {
        let err = IntakeError::IllegalState(message.to_string());
        log_rejected_call(self.phase, &err);
        err
    }

    /// Append a processor to the chain. Only allowed before `process()`.
    pub fn register(&mut self, processor: Arc<dyn PreProcessor>) -> IntakeResult<()> {
        if self.phase != Phase::Collected {
            return Err(self.violation(
                "Can not register processor after the upload was processed.",
            ));
        }

        tracing::debug!(processor = processor.name(), "Pre-processor registered");
        self.manager.with(processor);
        Ok(())
    }

    /// Run the processor chain over every upload of the batch.
    ///
    /// Uploads the request layer failed to receive are rejected with
    /// "Upload failed" without running the chain. Streams of rejected files
    /// are released immediately.
    pub async fn process(&mut self) -> IntakeResult<()> {
        if self.phase != Phase::Collected {
            return Err(self.violation("Can not reprocess the uploaded files."));
        }

        let started = Instant::now();
        let uploads = self.source.take_uploads();
        let mut results = Vec::with_capacity(uploads.len());
        let mut streams = Vec::with_capacity(uploads.len());

        for upload in uploads {
            let (metadata, mut stream, transport) = upload.into_parts();

            if !transport.is_ok() {
                tracing::warn!(
                    filename = %metadata.filename(),
                    transport_status = %transport,
                    "Upload failed in transport"
                );
                results.push(UploadResult::from_metadata(
                    &metadata,
                    ProcessingStatus::rejected(UPLOAD_FAILED_REASON),
                ));
                streams.push(None);
                continue;
            }

            let outcome = self.manager.process(&mut stream, &metadata).await;
            if let Some(reason) = outcome.status.reason() {
                tracing::warn!(
                    filename = %metadata.filename(),
                    reason = %reason,
                    "Upload rejected"
                );
            }

            let keep = outcome.status.is_accepted();
            results.push(UploadResult::from_metadata(&outcome.metadata, outcome.status));
            streams.push(keep.then_some(stream));
        }

        let accepted = results.iter().filter(|r| r.is_accepted()).count();
        tracing::info!(
            files = results.len(),
            accepted = accepted,
            rejected = results.len() - accepted,
            processors = ?self.manager.names(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Upload batch processed"
        );

        self.results = results.into();
        self.pending_streams = streams;
        self.phase = Phase::Processed;
        Ok(())
    }

    /// Write every accepted file to `destination/<name>` on the filesystem
    /// selected by `location`.
    ///
    /// The location is validated before anything is written. A failed write
    /// rejects that file with the I/O error and the batch continues. Files
    /// already written stay in place if the cancellation token fires; the
    /// file in flight and all later accepted files are rejected.
    pub async fn move_files_to<L>(&mut self, destination: &str, location: L) -> IntakeResult<()>
    where
        L: TryInto<Location>,
        L::Error: Into<IntakeError>,
    {
        match self.phase {
            Phase::Collected => return Err(self.violation("Can not move unprocessed files.")),
            Phase::Moved => return Err(self.violation("Can not move the files a second time.")),
            Phase::Processed => {}
        }

        let phase = self.phase;
        let location: Location = location.try_into().map_err(|e| {
            let err: IntakeError = e.into();
            log_rejected_call(phase, &err);
            err
        })?;

        let filesystem = self.filesystems.select(location);
        let started = Instant::now();
        let previous = Arc::clone(&self.results);
        let mut moved = Vec::with_capacity(previous.len());
        let mut cancelled = false;

        for (index, result) in previous.iter().enumerate() {
            let stream = self.pending_streams.get_mut(index).and_then(Option::take);
            let Some(stream) = stream.filter(|_| result.is_accepted()) else {
                moved.push(result.clone());
                continue;
            };

            if cancelled || self.cancellation.is_cancelled() {
                cancelled = true;
                moved.push(result.with_rejection(RELOCATION_CANCELLED_REASON));
                continue;
            }

            let path = target_path(destination, result.name());
            let file_started = Instant::now();
            let written = tokio::select! {
                biased;
                _ = self.cancellation.cancelled() => None,
                written = filesystem.write_stream(&path, stream) => Some(written),
            };

            match written {
                Some(Ok(size_bytes)) => {
                    tracing::info!(
                        path = %path,
                        location = %location,
                        size_bytes = size_bytes,
                        duration_ms = file_started.elapsed().as_millis() as u64,
                        "Upload relocated"
                    );
                    moved.push(result.with_path(path));
                }
                Some(Err(e)) => {
                    tracing::warn!(
                        path = %path,
                        location = %location,
                        error = %e,
                        "Upload relocation failed"
                    );
                    moved.push(result.with_rejection(e.to_string()));
                }
                None => {
                    tracing::warn!(path = %path, "Upload relocation cancelled");
                    cancelled = true;
                    moved.push(result.with_rejection(RELOCATION_CANCELLED_REASON));
                }
            }
        }

        let moved_count = moved.iter().filter(|r| r.is_moved()).count();
        tracing::info!(
            destination = %destination,
            location = %location,
            files = moved.len(),
            moved = moved_count,
            cancelled = cancelled,
            duration_ms = started.elapsed().as_millis() as u64,
            "Upload batch relocated"
        );

        self.pending_streams.clear();
        self.results = moved.into();
        self.phase = Phase::Moved;
        Ok(())
    }
}

/// Log a failed call at the level its error asks for.
fn log_rejected_call(phase: Phase, err: &IntakeError) {
    let code = err.error_code();
    match err.log_level() {
        LogLevel::Debug => tracing::debug!(phase = ?phase, error_code = code, "{}", err),
        LogLevel::Warn => tracing::warn!(phase = ?phase, error_code = code, "{}", err),
        LogLevel::Error => tracing::error!(phase = ?phase, error_code = code, "{}", err),
    }
}
