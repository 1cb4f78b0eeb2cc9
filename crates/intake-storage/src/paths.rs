//! Shared path normalization for filesystem backends.

use crate::traits::{FilesystemError, FilesystemResult};

/// Normalize a logical path to its root-relative form.
///
/// Leading `/`, empty segments and `.` segments are dropped. `..` segments,
/// backslashes and NUL bytes are rejected so a path can never resolve outside
/// the filesystem root.
pub fn normalize(path: &str) -> FilesystemResult<String> {
    if path.contains('\0') || path.contains('\\') {
        return Err(FilesystemError::InvalidPath(path.to_string()));
    }

    let mut segments = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return Err(FilesystemError::InvalidPath(path.to_string())),
            s => segments.push(s),
        }
    }

    if segments.is_empty() {
        return Err(FilesystemError::InvalidPath(path.to_string()));
    }

    Ok(segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_leading_slash_and_dots() {
        assert_eq!(normalize("/dest/file.txt").unwrap(), "dest/file.txt");
        assert_eq!(normalize("dest//./file.txt").unwrap(), "dest/file.txt");
    }

    #[test]
    fn rejects_traversal_and_empty_paths() {
        assert!(matches!(
            normalize("/dest/../../etc/passwd"),
            Err(FilesystemError::InvalidPath(_))
        ));
        assert!(normalize("..").is_err());
        assert!(normalize("/").is_err());
        assert!(normalize("").is_err());
        assert!(normalize("dir\\..\\x").is_err());
    }
}
