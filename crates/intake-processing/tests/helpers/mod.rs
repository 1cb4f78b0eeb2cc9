//! Test helpers: build pipelines over in-memory or temp-dir filesystems.
//!
//! Run from workspace root: `cargo test -p intake-processing`.

#![allow(dead_code)]

pub mod processors;
pub mod storage;

use std::io::Cursor;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

use intake_core::IntakeConfig;
use intake_processing::{PreProcessorManager, RawUpload, UploadPipeline, VecUploadSource};
use intake_storage::{Filesystem, FilesystemSet, MemoryFilesystem};
use tokio::io::{AsyncRead, AsyncSeek, ReadBuf, SeekFrom};

/// Pipeline whose three locations are separate in-memory filesystems.
pub struct TestPipeline {
    pub pipeline: UploadPipeline,
    pub storage: MemoryFilesystem,
    pub web: MemoryFilesystem,
    pub customizing: MemoryFilesystem,
}

pub fn memory_pipeline(uploads: Vec<RawUpload>) -> TestPipeline {
    let storage = MemoryFilesystem::new();
    let web = MemoryFilesystem::new();
    let customizing = MemoryFilesystem::new();

    let filesystems = FilesystemSet::new(
        Arc::new(storage.clone()),
        Arc::new(web.clone()),
        Arc::new(customizing.clone()),
    );

    TestPipeline {
        pipeline: pipeline_over(Arc::new(filesystems), uploads),
        storage,
        web,
        customizing,
    }
}

/// Pipeline whose every location is backed by `filesystem`.
pub fn pipeline_with_storage(
    filesystem: Arc<dyn Filesystem>,
    uploads: Vec<RawUpload>,
) -> UploadPipeline {
    let filesystems = FilesystemSet::new(filesystem.clone(), filesystem.clone(), filesystem);
    pipeline_over(Arc::new(filesystems), uploads)
}

fn pipeline_over(filesystems: Arc<FilesystemSet>, uploads: Vec<RawUpload>) -> UploadPipeline {
    UploadPipeline::new(
        PreProcessorManager::new(),
        filesystems,
        Box::new(VecUploadSource::new(uploads)),
        Arc::new(IntakeConfig::default()),
    )
}

pub fn text_upload(name: &str, content: &str) -> RawUpload {
    RawUpload::from_bytes(name, "text/plain", content.as_bytes().to_vec())
}

/// Counts how many of the streams it handed out have been dropped.
#[derive(Clone, Default)]
pub struct DropCounter(Arc<AtomicUsize>);

impl DropCounter {
    pub fn dropped(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    /// Text upload whose stream reports to this counter when dropped.
    pub fn upload(&self, name: &str, content: &str) -> RawUpload {
        let stream = CountedStream {
            inner: Cursor::new(content.as_bytes().to_vec()),
            drops: self.0.clone(),
        };
        RawUpload::new(name, "text/plain", content.len() as u64, Box::new(stream))
    }
}

struct CountedStream {
    inner: Cursor<Vec<u8>>,
    drops: Arc<AtomicUsize>,
}

impl Drop for CountedStream {
    fn drop(&mut self) {
        self.drops.fetch_add(1, Ordering::SeqCst);
    }
}

impl AsyncRead for CountedStream {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<std::io::Result<()>> {
        Pin::new(&mut self.inner).poll_read(cx, buf)
    }
}

impl AsyncSeek for CountedStream {
    fn start_seek(mut self: Pin<&mut Self>, position: SeekFrom) -> std::io::Result<()> {
        Pin::new(&mut self.inner).start_seek(position)
    }

    fn poll_complete(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<std::io::Result<u64>> {
        Pin::new(&mut self.inner).poll_complete(cx)
    }
}
