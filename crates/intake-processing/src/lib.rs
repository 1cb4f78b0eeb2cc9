//! Intake Upload Processing Library
//!
//! This crate drives one upload batch through its lifecycle:
//! collect → pre-process → relocate. See [`UploadPipeline`].

pub mod manager;
pub mod pipeline;
pub mod processors;
pub mod source;
pub mod traits;
pub mod validator;

// Re-export commonly used types
pub use manager::{ManagerOutcome, PreProcessorManager};
pub use pipeline::{Phase, UploadPipeline};
pub use processors::{
    default_processors, default_processors_with_scanner, ContentTypePreProcessor, ExtensionPolicy,
    ExtensionPreProcessor, FilenamePreProcessor, SizeLimitPreProcessor, VirusScanPreProcessor,
};
#[cfg(feature = "sniff")]
pub use processors::MimeSniffPreProcessor;
pub use source::{RawUpload, TransportStatus, UploadSource, VecUploadSource};
pub use traits::{PreProcessor, ProcessorVerdict, VirusScanner};
pub use validator::{UploadValidator, ValidationError};
