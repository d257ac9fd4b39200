//! Document types flowing in and out of the store.

use crate::vector::Similarity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity assigned by the database when a document is inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(i64);

impl DocumentId {
    /// Wraps a database-generated identifier.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the underlying value.
    #[must_use]
    pub const fn get(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A document that has been embedded but not yet persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDocument {
    pub content: String,
    pub media_type: Option<String>,
    pub file_name: Option<String>,
    pub embedding: Vec<f32>,
}

impl NewDocument {
    /// Creates an unlabeled document.
    pub fn new(content: impl Into<String>, embedding: Vec<f32>) -> Self {
        Self {
            content: content.into(),
            media_type: None,
            file_name: None,
            embedding,
        }
    }

    /// Sets the media type label.
    #[must_use]
    pub fn with_media_type(mut self, media_type: Option<String>) -> Self {
        self.media_type = media_type;
        self
    }

    /// Sets the file name label.
    #[must_use]
    pub fn with_file_name(mut self, file_name: Option<String>) -> Self {
        self.file_name = file_name;
        self
    }
}

/// A persisted document.
///
/// Only produced by a successful insert or a ranked fetch, so `id` and
/// `created_at` always reflect what the database assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    pub embedding: Vec<f32>,
    pub created_at: DateTime<Utc>,
}

impl Document {
    pub(crate) fn from_new(doc: NewDocument, id: DocumentId, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            content: doc.content,
            media_type: doc.media_type,
            file_name: doc.file_name,
            embedding: doc.embedding,
            created_at,
        }
    }
}

/// A ranked search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityResult {
    pub document: Document,
    pub similarity: Similarity,
}

/// Ranked hits plus the number of rows that could not be read.
///
/// `results` keeps the order the database returned (ascending distance).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub results: Vec<SimilarityResult>,
    pub skipped: usize,
}

impl SearchOutcome {
    /// Returns true when no rows matched and none were skipped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty() && self.skipped == 0
    }
}
