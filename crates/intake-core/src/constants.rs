/// Reason attached to uploads the request layer reported as broken.
pub const UPLOAD_FAILED_REASON: &str = "Upload failed";

/// Reason attached to files whose relocation was abandoned by cancellation.
pub const RELOCATION_CANCELLED_REASON: &str = "Relocation cancelled";

/// Default per-file upload limit when `MAX_UPLOAD_SIZE_MB` is unset.
pub const DEFAULT_MAX_UPLOAD_SIZE_MB: u64 = 10;

pub const BYTES_PER_MB: u64 = 1024 * 1024;
