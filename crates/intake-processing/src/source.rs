//! Request boundary: the raw uploads handed to a pipeline.

use std::fmt::{Debug, Display, Formatter, Result as FmtResult};
use std::io::Cursor;

use intake_core::Metadata;
use intake_storage::UploadStream;

/// Transfer outcome reported by the request layer for one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportStatus {
    #[default]
    Ok,
    /// Larger than the server-wide upload limit
    ExceedsServerLimit,
    /// Larger than the limit declared by the submitting form
    ExceedsFormLimit,
    /// Only part of the file arrived
    Partial,
    NoFile,
    MissingTempDir,
    WriteFailed,
    /// Stopped by a server-side extension
    Stopped,
}

impl TransportStatus {
    pub fn is_ok(self) -> bool {
        self == TransportStatus::Ok
    }
}

impl Display for TransportStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            TransportStatus::Ok => write!(f, "ok"),
            TransportStatus::ExceedsServerLimit => write!(f, "exceeds_server_limit"),
            TransportStatus::ExceedsFormLimit => write!(f, "exceeds_form_limit"),
            TransportStatus::Partial => write!(f, "partial"),
            TransportStatus::NoFile => write!(f, "no_file"),
            TransportStatus::MissingTempDir => write!(f, "missing_temp_dir"),
            TransportStatus::WriteFailed => write!(f, "write_failed"),
            TransportStatus::Stopped => write!(f, "stopped"),
        }
    }
}

/// One uploaded file as received from the request layer.
pub struct RawUpload {
    client_filename: String,
    size: u64,
    client_media_type: String,
    stream: UploadStream,
    status: TransportStatus,
}

impl RawUpload {
    pub fn new(
        client_filename: impl Into<String>,
        client_media_type: impl Into<String>,
        size: u64,
        stream: UploadStream,
    ) -> Self {
        Self {
            client_filename: client_filename.into(),
            size,
            client_media_type: client_media_type.into(),
            stream,
            status: TransportStatus::Ok,
        }
    }

    /// Upload whose content is already in memory.
    pub fn from_bytes(
        client_filename: impl Into<String>,
        client_media_type: impl Into<String>,
        data: impl Into<Vec<u8>>,
    ) -> Self {
        let data = data.into();
        let size = data.len() as u64;
        Self::new(
            client_filename,
            client_media_type,
            size,
            Box::new(Cursor::new(data)),
        )
    }

    /// Upload the request layer could not receive; its stream is empty.
    pub fn failed(
        client_filename: impl Into<String>,
        client_media_type: impl Into<String>,
        size: u64,
        status: TransportStatus,
    ) -> Self {
        Self::new(
            client_filename,
            client_media_type,
            size,
            Box::new(Cursor::new(Vec::new())),
        )
        .with_status(status)
    }

    pub fn with_status(mut self, status: TransportStatus) -> Self {
        self.status = status;
        self
    }

    pub fn client_filename(&self) -> &str {
        &self.client_filename
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn client_media_type(&self) -> &str {
        &self.client_media_type
    }

    pub fn status(&self) -> TransportStatus {
        self.status
    }

    /// Split into the file descriptor, its stream and the transfer outcome.
    pub fn into_parts(self) -> (Metadata, UploadStream, TransportStatus) {
        let metadata = Metadata::new(self.client_filename, self.size, self.client_media_type);
        (metadata, self.stream, self.status)
    }
}

impl Debug for RawUpload {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("RawUpload")
            .field("client_filename", &self.client_filename)
            .field("size", &self.size)
            .field("client_media_type", &self.client_media_type)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

/// Supplier of the uploads of one request.
pub trait UploadSource: Send {
    /// Hand over every upload, in arrival order. Later calls return nothing.
    fn take_uploads(&mut self) -> Vec<RawUpload>;
}

/// Upload source over an in-memory list.
#[derive(Debug, Default)]
pub struct VecUploadSource {
    uploads: Vec<RawUpload>,
}

impl VecUploadSource {
    pub fn new(uploads: Vec<RawUpload>) -> Self {
        Self { uploads }
    }

    pub fn push(&mut self, upload: RawUpload) {
        self.uploads.push(upload);
    }
}

impl From<Vec<RawUpload>> for VecUploadSource {
    fn from(uploads: Vec<RawUpload>) -> Self {
        Self::new(uploads)
    }
}

impl UploadSource for VecUploadSource {
    fn take_uploads(&mut self) -> Vec<RawUpload> {
        std::mem::take(&mut self.uploads)
    }
}
