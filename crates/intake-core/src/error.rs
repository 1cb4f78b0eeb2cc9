//! Error types module
//!
//! `IntakeError` covers the contract violations a caller can commit against an
//! upload batch. Per-file problems (broken transfers, rejections, failed writes)
//! are never errors; they are recorded as rejected `UploadResult`s instead.

use std::convert::Infallible;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues
    Warn,
    /// Error level - for caller bugs and unexpected failures
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntakeError {
    /// An operation was called in the wrong lifecycle phase.
    #[error("Illegal state: {0}")]
    IllegalState(String),

    /// An argument could not be interpreted, e.g. an unknown location token.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type IntakeResult<T> = Result<T, IntakeError>;

impl From<Infallible> for IntakeError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

impl IntakeError {
    /// Machine-readable error code (e.g., "ILLEGAL_STATE")
    pub fn error_code(&self) -> &'static str {
        match self {
            IntakeError::IllegalState(_) => "ILLEGAL_STATE",
            IntakeError::InvalidArgument(_) => "INVALID_ARGUMENT",
            IntakeError::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Level at which a failed call is logged
    pub fn log_level(&self) -> LogLevel {
        match self {
            IntakeError::IllegalState(_) => LogLevel::Error,
            IntakeError::InvalidArgument(_) => LogLevel::Warn,
            IntakeError::Config(_) => LogLevel::Error,
        }
    }
}
