//! Vector literal codec.
//!
//! Converts embeddings to and from the bracketed text form accepted by
//! vector columns (`[0.100000,0.200000,0.300000]`). Components are written
//! as fixed-point decimals with six fractional digits, so a round trip is
//! exact to within 1e-6 per component.

use super::VectorError;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use thiserror::Error;

/// Fractional digits written per component.
pub const LITERAL_PRECISION: usize = 6;

/// Errors produced by strict decoding of a vector literal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error(
        "Invalid vector component at position {index}: '{token}'\nSuggestion: The stored vector literal is corrupted; re-ingest the document"
    )]
    InvalidComponent { index: usize, token: String },
}

/// How malformed components are handled when reading stored vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodePolicy {
    /// Fail the decode; the store skips the row and counts it.
    #[default]
    Strict,
    /// Substitute 0.0 for the bad component and keep the row.
    Lenient,
}

impl DecodePolicy {
    /// Decodes `text` according to this policy.
    pub fn decode(&self, text: &str) -> Result<Vec<f32>, DecodeError> {
        match self {
            Self::Strict => decode(text),
            Self::Lenient => Ok(decode_lenient(text)),
        }
    }
}

/// Encodes a vector as a literal.
///
/// Rejects NaN and infinite components since neither the fixed-point
/// format nor a vector column can represent them.
pub fn encode(vector: &[f32]) -> Result<String, VectorError> {
    // Rough capacity: sign, a couple of integer digits, point, six decimals, comma
    let mut literal = String::with_capacity(2 + vector.len() * (LITERAL_PRECISION + 5));
    literal.push('[');

    for (index, value) in vector.iter().enumerate() {
        if !value.is_finite() {
            return Err(VectorError::NonFiniteComponent {
                index,
                value: *value,
            });
        }
        if index > 0 {
            literal.push(',');
        }
        // Writing into a String cannot fail
        let _ = write!(literal, "{value:.6}");
    }

    literal.push(']');
    Ok(literal)
}

/// Decodes a literal, failing on the first component that does not parse
/// to a finite `f32`.
pub fn decode(text: &str) -> Result<Vec<f32>, DecodeError> {
    components(text)
        .enumerate()
        .map(|(index, token)| {
            parse_component(token).ok_or_else(|| DecodeError::InvalidComponent {
                index,
                token: token.to_string(),
            })
        })
        .collect()
}

/// Decodes a literal, mapping unparseable components to 0.0.
///
/// The vector length is preserved but the affected values are lost.
#[must_use]
pub fn decode_lenient(text: &str) -> Vec<f32> {
    components(text)
        .map(|token| parse_component(token).unwrap_or(0.0))
        .collect()
}

fn components(text: &str) -> impl Iterator<Item = &str> {
    let interior = text
        .trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .trim();

    // An empty interior is a zero-length vector, not one empty component
    let mut tokens = interior.split(',');
    if interior.is_empty() {
        tokens.next();
    }
    tokens.map(str::trim)
}

fn parse_component(token: &str) -> Option<f32> {
    token.parse::<f32>().ok().filter(|v| v.is_finite())
}
