use intake_core::UploadConfig;
use std::path::Path;

/// Validation errors shared by the built-in pre-processors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: u64, max: u64 },

    #[error("Invalid file extension: {extension} (allowed: {allowed:?})")]
    InvalidExtension {
        extension: String,
        allowed: Vec<String>,
    },

    #[error("Forbidden file extension: {0}")]
    ForbiddenExtension(String),

    #[error("Missing file extension: {0}")]
    MissingExtension(String),

    #[error("Invalid content type: {content_type} (allowed: {allowed:?})")]
    InvalidContentType {
        content_type: String,
        allowed: Vec<String>,
    },

    #[error("Content type {content_type} does not match extension '{extension}' (expected one of: {expected})")]
    ContentTypeMismatch {
        content_type: String,
        extension: String,
        expected: String,
    },

    #[error("Invalid filename: {0}")]
    InvalidFilename(String),
}

/// Lowercased extension of `filename`, if it has one
pub fn extension_of(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
        .map(|e| e.to_lowercase())
}

/// Content types a well-formed file with this extension is declared as.
/// `None` for extensions outside the table.
pub fn expected_content_types(extension: &str) -> Option<&'static [&'static str]> {
    let types: &'static [&'static str] = match extension {
        // Images
        "jpg" | "jpeg" => &["image/jpeg"],
        "png" => &["image/png"],
        "gif" => &["image/gif"],
        "webp" => &["image/webp"],
        "avif" => &["image/avif"],
        "svg" => &["image/svg+xml"],
        "bmp" => &["image/bmp"],
        "ico" => &["image/x-icon", "image/vnd.microsoft.icon"],
        // Videos
        "mp4" => &["video/mp4"],
        "webm" => &["video/webm"],
        "mov" => &["video/quicktime"],
        "avi" => &["video/x-msvideo"],
        "mkv" => &["video/x-matroska"],
        // Audio
        "mp3" => &["audio/mpeg", "audio/mp3"],
        "wav" => &["audio/wav", "audio/wave", "audio/x-wav"],
        "ogg" => &["audio/ogg", "application/ogg"],
        "flac" => &["audio/flac"],
        // Documents
        "pdf" => &["application/pdf"],
        "doc" => &["application/msword"],
        "docx" => &["application/vnd.openxmlformats-officedocument.wordprocessingml.document"],
        "xls" => &["application/vnd.ms-excel"],
        "xlsx" => &["application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"],
        "ppt" => &["application/vnd.ms-powerpoint"],
        "pptx" => &["application/vnd.openxmlformats-officedocument.presentationml.presentation"],
        "txt" => &["text/plain"],
        "csv" => &["text/csv", "text/plain"],
        "json" => &["application/json"],
        "xml" => &["application/xml", "text/xml"],
        "zip" => &["application/zip", "application/x-zip-compressed"],
        "tar" => &["application/x-tar"],
        "gz" => &["application/gzip", "application/x-gzip"],
        _ => return None,
    };
    Some(types)
}

/// Strip a `; charset=...` style parameter and lowercase
pub(crate) fn essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase()
}

/// Upload validator
///
/// Empty allow-lists mean "unrestricted".
#[derive(Debug, Clone, Default)]
pub struct UploadValidator {
    max_file_size: u64,
    allowed_extensions: Vec<String>,
    allowed_content_types: Vec<String>,
}

impl UploadValidator {
    pub fn new(
        max_file_size: u64,
        allowed_extensions: Vec<String>,
        allowed_content_types: Vec<String>,
    ) -> Self {
        Self {
            max_file_size,
            allowed_extensions: allowed_extensions
                .into_iter()
                .map(|e| e.trim_start_matches('.').to_lowercase())
                .collect(),
            allowed_content_types: allowed_content_types
                .into_iter()
                .map(|c| essence(&c))
                .collect(),
        }
    }

    pub fn from_config(config: &dyn UploadConfig) -> Self {
        Self::new(
            config.max_file_size(),
            config.allowed_extensions().to_vec(),
            config.allowed_content_types().to_vec(),
        )
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    /// Validate file size
    pub fn validate_file_size(&self, size: u64) -> Result<(), ValidationError> {
        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }
        Ok(())
    }

    /// Validate file extension against the allow-list
    pub fn validate_extension(&self, filename: &str) -> Result<(), ValidationError> {
        if self.allowed_extensions.is_empty() {
            return Ok(());
        }

        let extension = extension_of(filename)
            .ok_or_else(|| ValidationError::MissingExtension(filename.to_string()))?;

        if !self.allowed_extensions.contains(&extension) {
            return Err(ValidationError::InvalidExtension {
                extension,
                allowed: self.allowed_extensions.clone(),
            });
        }

        Ok(())
    }

    /// Validate file extension against a deny-list. Files without an
    /// extension pass.
    pub fn validate_not_denied(
        &self,
        filename: &str,
        denied: &[String],
    ) -> Result<(), ValidationError> {
        match extension_of(filename) {
            Some(extension) if denied.iter().any(|d| d.eq_ignore_ascii_case(&extension)) => {
                Err(ValidationError::ForbiddenExtension(extension))
            }
            _ => Ok(()),
        }
    }

    /// Validate content type against the allow-list
    pub fn validate_content_type(&self, content_type: &str) -> Result<(), ValidationError> {
        if self.allowed_content_types.is_empty() {
            return Ok(());
        }

        let normalized = essence(content_type);
        if !self.allowed_content_types.iter().any(|ct| ct == &normalized) {
            return Err(ValidationError::InvalidContentType {
                content_type: content_type.to_string(),
                allowed: self.allowed_content_types.clone(),
            });
        }

        Ok(())
    }

    /// Validate that the declared content type matches the file extension.
    /// Unknown or missing extensions skip the cross-check.
    pub fn validate_extension_content_type_match(
        &self,
        filename: &str,
        content_type: &str,
    ) -> Result<(), ValidationError> {
        let Some(extension) = extension_of(filename) else {
            return Ok(());
        };

        let Some(expected) = expected_content_types(&extension) else {
            tracing::debug!(
                extension = %extension,
                content_type = %content_type,
                "Unknown extension, skipping Content-Type/extension cross-validation"
            );
            return Ok(());
        };

        let normalized = essence(content_type);
        if !expected.iter().any(|ct| *ct == normalized) {
            return Err(ValidationError::ContentTypeMismatch {
                content_type: content_type.to_string(),
                extension,
                expected: expected.join(", "),
            });
        }

        Ok(())
    }

    /// Validate every rule that only needs the declared metadata
    pub fn validate_all(
        &self,
        filename: &str,
        content_type: &str,
        size: u64,
    ) -> Result<(), ValidationError> {
        self.validate_file_size(size)?;
        self.validate_extension(filename)?;
        self.validate_content_type(content_type)?;
        self.validate_extension_content_type_match(filename, content_type)?;
        Ok(())
    }
}
