use std::path::{Path, PathBuf};

use intake_core::UploadResult;
use intake_processing::validator::{expected_content_types, extension_of};
use intake_processing::{RawUpload, TransportStatus, VecUploadSource};

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Truncate a string to max_len characters, appending "..." if truncated.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Content type implied by the file extension.
pub fn guess_mime_type(path: &Path) -> &'static str {
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(extension_of)
        .and_then(|ext| expected_content_types(&ext))
        .and_then(|types| types.first().copied())
        .unwrap_or("application/octet-stream")
}

/// Open every file as one upload batch, in argument order.
///
/// Files that cannot be opened are still part of the batch, reported as
/// never received.
pub async fn local_upload_source(paths: &[PathBuf]) -> VecUploadSource {
    let mut source = VecUploadSource::default();

    for path in paths {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        let mime_type = guess_mime_type(path);

        let opened = match tokio::fs::File::open(path).await {
            Ok(file) => match file.metadata().await {
                Ok(meta) if meta.is_file() => Ok((file, meta.len())),
                Ok(_) => Err("not a regular file".to_string()),
                Err(e) => Err(e.to_string()),
            },
            Err(e) => Err(e.to_string()),
        };

        let upload = match opened {
            Ok((file, size)) => RawUpload::new(name, mime_type, size, Box::new(file)),
            Err(reason) => {
                tracing::warn!(path = %path.display(), reason = %reason, "Could not open file");
                RawUpload::failed(name, mime_type, 0, TransportStatus::NoFile)
            }
        };
        source.push(upload);
    }

    source
}

/// Plain-text table of a batch's results.
pub fn render_table(results: &[UploadResult]) -> String {
    let mut out = format!(
        "{:<32} {:<9} {:>12}  {}\n",
        "NAME", "STATUS", "SIZE", "PATH / REASON"
    );
    for result in results {
        let detail = if result.is_moved() {
            result.path().to_string()
        } else {
            result.status().reason().unwrap_or_default().to_string()
        };
        out.push_str(&format!(
            "{:<32} {:<9} {:>12}  {}\n",
            truncate_string(result.name(), 32),
            result.status().code().to_string(),
            result.size(),
            detail
        ));
    }
    out
}
