//! Exit codes for CLI operations following Unix conventions.
//!
//! # Exit Code Semantics
//!
//! - `0`: Success - operation completed
//! - `1`: General error - unspecified failure
//! - `2`: Blocking error - the database cannot be used
//! - `3`: Not found - a search ran but ranked no documents
//! - `4-125`: Specific recoverable errors
//! - `126-255`: Reserved by shell

use crate::error::{EmbeddingError, ServiceError};
use crate::storage::StoreError;

/// Standard exit codes for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Operation succeeded (code 0)
    Success = 0,

    /// Unspecified error occurred (code 1)
    GeneralError = 1,

    /// Critical error that should halt automation (code 2)
    BlockingError = 2,

    /// Search ran but matched nothing (code 3)
    NotFound = 3,

    /// Invalid input such as a zero limit or wrong vector size (code 4)
    InvalidInput = 4,

    /// File I/O error (code 5)
    IoError = 5,

    /// Configuration error (code 6)
    ConfigError = 6,

    /// Embedding service could not be reached (code 7)
    ServiceUnavailable = 7,

    /// Embedding service answered with an error or garbage (code 8)
    ServiceFailure = 8,
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code as u8)
    }
}

impl ExitCode {
    /// Convert a `ServiceError` to the appropriate exit code.
    pub fn from_error(error: &ServiceError) -> Self {
        match error {
            ServiceError::Embedding(EmbeddingError::Unavailable { .. }) => {
                ExitCode::ServiceUnavailable
            }
            ServiceError::Embedding(EmbeddingError::RequestPreparation { .. }) => {
                ExitCode::GeneralError
            }
            ServiceError::Embedding(_) => ExitCode::ServiceFailure,
            ServiceError::Store(StoreError::Persistence { .. }) => ExitCode::BlockingError,
            ServiceError::Store(StoreError::InvalidLimit { .. } | StoreError::Vector(_)) => {
                ExitCode::InvalidInput
            }
        }
    }
}
