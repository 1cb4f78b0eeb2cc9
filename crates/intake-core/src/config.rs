//! Configuration module
//!
//! Upload limits and storage roots, read from the environment (and an optional
//! `.env` file). The pipeline only sees the narrow [`UploadConfig`] view.

use std::env;
use std::path::PathBuf;

use crate::constants::{BYTES_PER_MB, DEFAULT_MAX_UPLOAD_SIZE_MB};
use crate::error::IntakeError;
use crate::storage_types::StorageBackend;

/// Upload constraints consumed by the pipeline and the built-in processors.
pub trait UploadConfig: Send + Sync {
    /// Maximum allowed file size in bytes
    fn max_file_size(&self) -> u64;

    /// Allowed file extensions (without leading dot). Empty means unrestricted.
    fn allowed_extensions(&self) -> &[String];

    /// Allowed content types. Empty means unrestricted.
    fn allowed_content_types(&self) -> &[String];

    /// Largest file handed to a virus scanner, in bytes.
    fn virus_scan_max_bytes(&self) -> u64 {
        self.max_file_size()
    }
}

#[derive(Clone, Debug)]
pub struct IntakeConfig {
    pub max_upload_size_bytes: u64,
    pub allowed_extensions: Vec<String>,
    pub allowed_content_types: Vec<String>,
    pub storage_backend: StorageBackend,
    pub storage_root: PathBuf,
    pub web_root: PathBuf,
    pub customizing_root: PathBuf,
    /// Upper bound on bytes buffered for a virus scan.
    pub virus_scan_max_bytes: u64,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        let max_upload_size_bytes = DEFAULT_MAX_UPLOAD_SIZE_MB * BYTES_PER_MB;
        Self {
            max_upload_size_bytes,
            allowed_extensions: Vec::new(),
            allowed_content_types: Vec::new(),
            storage_backend: StorageBackend::Local,
            storage_root: PathBuf::from("./data/storage"),
            web_root: PathBuf::from("./data/web"),
            customizing_root: PathBuf::from("./data/customizing"),
            virus_scan_max_bytes: max_upload_size_bytes,
        }
    }
}

fn parse_list(raw: Option<String>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

impl IntakeConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_vars<F>(var: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let max_upload_size_mb: u64 = match var("MAX_UPLOAD_SIZE_MB") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be a valid number"))?,
            None => DEFAULT_MAX_UPLOAD_SIZE_MB,
        };
        let max_upload_size_bytes = max_upload_size_mb.saturating_mul(BYTES_PER_MB);

        let storage_backend = match var("STORAGE_BACKEND") {
            Some(raw) => raw.parse()?,
            None => defaults.storage_backend,
        };

        let virus_scan_max_bytes: u64 = match var("VIRUS_SCAN_MAX_BYTES") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("VIRUS_SCAN_MAX_BYTES must be a valid number"))?,
            None => max_upload_size_bytes,
        };

        let config = Self {
            max_upload_size_bytes,
            allowed_extensions: parse_list(var("ALLOWED_EXTENSIONS")),
            allowed_content_types: parse_list(var("ALLOWED_CONTENT_TYPES")),
            storage_backend,
            storage_root: var("STORAGE_ROOT")
                .map(PathBuf::from)
                .unwrap_or(defaults.storage_root),
            web_root: var("WEB_ROOT").map(PathBuf::from).unwrap_or(defaults.web_root),
            customizing_root: var("CUSTOMIZING_ROOT")
                .map(PathBuf::from)
                .unwrap_or(defaults.customizing_root),
            virus_scan_max_bytes,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), IntakeError> {
        if self.max_upload_size_bytes == 0 {
            return Err(IntakeError::Config(
                "MAX_UPLOAD_SIZE_MB must be greater than zero".to_string(),
            ));
        }

        if self.storage_backend == StorageBackend::Local {
            let roots = [&self.storage_root, &self.web_root, &self.customizing_root];
            if roots.iter().any(|root| root.as_os_str().is_empty()) {
                return Err(IntakeError::Config(
                    "STORAGE_ROOT, WEB_ROOT and CUSTOMIZING_ROOT must not be empty".to_string(),
                ));
            }
            if self.storage_root == self.web_root
                || self.storage_root == self.customizing_root
                || self.web_root == self.customizing_root
            {
                return Err(IntakeError::Config(
                    "Each storage location needs its own root directory".to_string(),
                ));
            }
        }

        Ok(())
    }
}

impl UploadConfig for IntakeConfig {
    fn max_file_size(&self) -> u64 {
        self.max_upload_size_bytes
    }

    fn allowed_extensions(&self) -> &[String] {
        &self.allowed_extensions
    }

    fn allowed_content_types(&self) -> &[String] {
        &self.allowed_content_types
    }

    fn virus_scan_max_bytes(&self) -> u64 {
        self.virus_scan_max_bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = IntakeConfig::from_vars(vars(&[])).unwrap();
        assert_eq!(config.max_upload_size_bytes, 10 * 1024 * 1024);
        assert_eq!(config.max_file_size(), config.max_upload_size_bytes);
        assert!(config.allowed_extensions().is_empty());
        assert_eq!(config.storage_backend, StorageBackend::Local);
        assert_eq!(config.virus_scan_max_bytes(), config.max_upload_size_bytes);
    }

    #[test]
    fn lists_are_trimmed_and_lowercased() {
        let config = IntakeConfig::from_vars(vars(&[
            ("ALLOWED_EXTENSIONS", " PNG, jpg ,,pdf"),
            ("ALLOWED_CONTENT_TYPES", "Image/PNG"),
            ("MAX_UPLOAD_SIZE_MB", "2"),
        ]))
        .unwrap();

        assert_eq!(config.allowed_extensions, vec!["png", "jpg", "pdf"]);
        assert_eq!(config.allowed_content_types, vec!["image/png"]);
        assert_eq!(config.max_upload_size_bytes, 2 * 1024 * 1024);
        assert_eq!(config.virus_scan_max_bytes, 2 * 1024 * 1024);
    }

    #[test]
    fn virus_scan_limit_is_parsed_strictly() {
        let config =
            IntakeConfig::from_vars(vars(&[("VIRUS_SCAN_MAX_BYTES", " 4096 ")])).unwrap();
        assert_eq!(config.virus_scan_max_bytes(), 4096);

        let err = IntakeConfig::from_vars(vars(&[("VIRUS_SCAN_MAX_BYTES", "4k")])).unwrap_err();
        assert_eq!(err.to_string(), "VIRUS_SCAN_MAX_BYTES must be a valid number");
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(IntakeConfig::from_vars(vars(&[("MAX_UPLOAD_SIZE_MB", "lots")])).is_err());
        assert!(IntakeConfig::from_vars(vars(&[("MAX_UPLOAD_SIZE_MB", "0")])).is_err());
        assert!(IntakeConfig::from_vars(vars(&[("STORAGE_BACKEND", "ftp")])).is_err());
        assert!(IntakeConfig::from_vars(vars(&[
            ("STORAGE_ROOT", "/srv/data"),
            ("WEB_ROOT", "/srv/data"),
        ]))
        .is_err());
    }

    #[test]
    fn memory_backend_skips_root_checks() {
        let config = IntakeConfig::from_vars(vars(&[
            ("STORAGE_BACKEND", "memory"),
            ("STORAGE_ROOT", "same"),
            ("WEB_ROOT", "same"),
        ]))
        .unwrap();
        assert_eq!(config.storage_backend, StorageBackend::Memory);
    }
}
