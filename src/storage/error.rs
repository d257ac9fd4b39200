use crate::vector::VectorError;
use thiserror::Error;

/// Error type produced by [`super::VectorDatabase`] backends.
pub type BackendError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error during {operation}: {source}")]
    Persistence {
        operation: &'static str,
        source: BackendError,
    },

    #[error("Invalid search limit {limit}: at least one result must be requested")]
    InvalidLimit { limit: usize },

    #[error(transparent)]
    Vector(#[from] VectorError),
}

impl StoreError {
    pub(crate) fn persistence(operation: &'static str, source: BackendError) -> Self {
        Self::Persistence { operation, source }
    }

    /// Get a stable status code for this error type.
    pub fn status_code(&self) -> String {
        match self {
            Self::Persistence { .. } => "PERSISTENCE_ERROR",
            Self::InvalidLimit { .. } => "INVALID_LIMIT",
            Self::Vector(VectorError::DimensionMismatch { .. }) => "DIMENSION_MISMATCH",
            Self::Vector(_) => "INVALID_VECTOR",
        }
        .to_string()
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            Self::Persistence { .. } => vec![
                "Check that storage.database_path is writable",
                "Run 'docsearch init' to create the database directory",
            ],
            Self::Vector(VectorError::DimensionMismatch { .. }) => vec![
                "Set storage.dimension to the output size of embedding.model",
                "Documents embedded with a different model must be re-ingested",
            ],
            Self::InvalidLimit { .. } => vec!["Pass a result limit of at least 1"],
            Self::Vector(_) => vec!["Embedding components must be finite numbers"],
        }
    }
}

/// A single row the ranked query returned but that could not be read.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed to read result row {position}: {reason}")]
pub struct RowScanError {
    /// Zero-based position of the row in the database's ordering
    pub position: usize,
    pub reason: String,
}

pub type StoreResult<T> = Result<T, StoreError>;
