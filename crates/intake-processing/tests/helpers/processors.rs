//! Hand-written pre-processors that record how they were called.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use intake_core::Metadata;
use intake_processing::{PreProcessor, ProcessorVerdict};
use intake_storage::UploadStream;
use tokio::io::AsyncReadExt;

/// Shared log of `"<processor>:<filename>"` entries
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    fn record(&self, entry: String) {
        self.0.lock().unwrap().push(entry);
    }
}

/// Drains the stream, records the call and returns its verdict for every file
/// whose name is not listed in `reject`.
pub struct RecordingProcessor {
    name: String,
    reject: Vec<String>,
    annotation: Option<(String, String)>,
    log: CallLog,
}

impl RecordingProcessor {
    pub fn accepting(name: &str, log: &CallLog) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            reject: Vec::new(),
            annotation: None,
            log: log.clone(),
        })
    }

    pub fn rejecting(name: &str, filenames: &[&str], log: &CallLog) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            reject: filenames.iter().map(|f| f.to_string()).collect(),
            annotation: None,
            log: log.clone(),
        })
    }

    pub fn annotating(name: &str, key: &str, value: &str, log: &CallLog) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            reject: Vec::new(),
            annotation: Some((key.to_string(), value.to_string())),
            log: log.clone(),
        })
    }
}

#[async_trait]
impl PreProcessor for RecordingProcessor {
    fn name(&self) -> &str {
        &self.name
    }

    async fn process(
        &self,
        stream: &mut UploadStream,
        metadata: &Metadata,
    ) -> anyhow::Result<ProcessorVerdict> {
        let mut sink = Vec::new();
        stream.read_to_end(&mut sink).await?;
        self.log
            .record(format!("{}:{}", self.name, metadata.filename()));

        if self.reject.iter().any(|f| f == metadata.filename()) {
            return Ok(ProcessorVerdict::reject(format!(
                "{} rejected {}",
                self.name,
                metadata.filename()
            )));
        }

        let verdict = ProcessorVerdict::accept();
        Ok(match &self.annotation {
            Some((key, value)) => verdict.with_annotation(key.as_str(), value.as_str()),
            None => verdict,
        })
    }
}
