//! Type-safe wrappers and core types for vector handling.
//!
//! Newtypes here keep raw `usize`/`f64` values from leaking into the
//! storage and search APIs where a dimension or a similarity is meant.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Output dimension of the default embedding model (nomic-embed-text).
pub const VECTOR_DIMENSION_768: usize = 768;

/// Type-safe wrapper for vector dimensions.
///
/// Ensures runtime validation of vector dimensions to prevent dimension
/// mismatches between the embedding provider and the stored vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct VectorDimension(usize);

impl VectorDimension {
    /// Creates a new `VectorDimension` with validation.
    ///
    /// Returns an error if the dimension is zero.
    pub fn new(dim: usize) -> Result<Self, VectorError> {
        if dim == 0 {
            return Err(VectorError::InvalidDimension {
                dimension: 0,
                reason: "Vector dimension cannot be zero",
            });
        }
        Ok(Self(dim))
    }

    /// Creates the standard 768-dimensional vector dimension.
    #[must_use]
    pub const fn dimension_768() -> Self {
        Self(VECTOR_DIMENSION_768)
    }

    /// Returns the underlying dimension value.
    #[must_use]
    pub const fn get(&self) -> usize {
        self.0
    }

    /// Validates that a vector has the expected dimension.
    pub fn validate_vector(&self, vector: &[f32]) -> Result<(), VectorError> {
        if vector.len() != self.0 {
            return Err(VectorError::DimensionMismatch {
                expected: self.0,
                actual: vector.len(),
            });
        }
        Ok(())
    }
}

impl Default for VectorDimension {
    fn default() -> Self {
        Self::dimension_768()
    }
}

impl TryFrom<usize> for VectorDimension {
    type Error = VectorError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<VectorDimension> for usize {
    fn from(dim: VectorDimension) -> usize {
        dim.0
    }
}

impl std::fmt::Display for VectorDimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Distance metric used to rank stored vectors against a query.
///
/// Each variant mirrors one of pgvector's distance operators. Similarity is
/// always reported as `1 - distance`, so only cosine distance yields a
/// bounded score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    /// Cosine distance (`<=>`), in `[0, 2]`.
    #[default]
    Cosine,
    /// Euclidean distance (`<->`).
    L2,
    /// Negative inner product (`<#>`).
    InnerProduct,
}

impl DistanceMetric {
    /// Name of the SQL scalar function computing this metric.
    #[must_use]
    pub const fn sql_function(&self) -> &'static str {
        match self {
            Self::Cosine => "vector_cosine_distance",
            Self::L2 => "vector_l2_distance",
            Self::InnerProduct => "vector_negative_inner_product",
        }
    }

    /// Equivalent pgvector operator, for display and diagnostics.
    #[must_use]
    pub const fn pgvector_operator(&self) -> &'static str {
        match self {
            Self::Cosine => "<=>",
            Self::L2 => "<->",
            Self::InnerProduct => "<#>",
        }
    }

    /// Computes the distance between two equal-length vectors.
    ///
    /// Cosine distance against a zero vector is defined as 1.0 (orthogonal),
    /// which keeps the ranking total instead of producing NaN.
    pub fn distance(&self, a: &[f32], b: &[f32]) -> Result<f64, VectorError> {
        if a.len() != b.len() {
            return Err(VectorError::DimensionMismatch {
                expected: a.len(),
                actual: b.len(),
            });
        }

        let distance = match self {
            Self::Cosine => {
                let (mut dot, mut norm_a, mut norm_b) = (0.0f64, 0.0f64, 0.0f64);
                for (x, y) in a.iter().zip(b) {
                    let (x, y) = (f64::from(*x), f64::from(*y));
                    dot += x * y;
                    norm_a += x * x;
                    norm_b += y * y;
                }
                if norm_a == 0.0 || norm_b == 0.0 {
                    1.0
                } else {
                    1.0 - dot / (norm_a.sqrt() * norm_b.sqrt())
                }
            }
            Self::L2 => a
                .iter()
                .zip(b)
                .map(|(x, y)| {
                    let d = f64::from(*x) - f64::from(*y);
                    d * d
                })
                .sum::<f64>()
                .sqrt(),
            Self::InnerProduct => -a
                .iter()
                .zip(b)
                .map(|(x, y)| f64::from(*x) * f64::from(*y))
                .sum::<f64>(),
        };

        Ok(distance)
    }
}

impl std::fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Cosine => "cosine",
            Self::L2 => "l2",
            Self::InnerProduct => "inner_product",
        };
        f.write_str(name)
    }
}

/// Similarity score attached to a search hit.
///
/// Derived as `1 - distance`. Unlike a normalized score this is not
/// clamped: L2 and inner-product metrics can produce values outside
/// `[0.0, 1.0]`, and callers must not assume a bounded range.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Similarity(f64);

impl Similarity {
    /// Wraps a similarity already computed by the database.
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    /// Returns the underlying value.
    #[must_use]
    pub const fn get(&self) -> f64 {
        self.0
    }
}

impl std::fmt::Display for Similarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}", self.0)
    }
}

/// Errors that can occur during vector operations.
///
/// All error messages include actionable suggestions for resolution.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VectorError {
    #[error(
        "Vector dimension mismatch: expected {expected}, got {actual}\nSuggestion: Ensure storage.dimension matches the embedding model output"
    )]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid vector dimension: {dimension}\nReason: {reason}")]
    InvalidDimension {
        dimension: usize,
        reason: &'static str,
    },

    #[error(
        "Vector component {index} is not finite ({value})\nSuggestion: NaN and infinite values cannot be stored in a vector column"
    )]
    NonFiniteComponent { index: usize, value: f32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_dimension() {
        let dim = VectorDimension::new(768).unwrap();
        assert_eq!(dim.get(), 768);
        assert_eq!(VectorDimension::default(), VectorDimension::dimension_768());

        assert!(VectorDimension::new(0).is_err());

        assert!(dim.validate_vector(&vec![0.1; 768]).is_ok());
        assert_eq!(
            dim.validate_vector(&[0.1; 3]),
            Err(VectorError::DimensionMismatch {
                expected: 768,
                actual: 3
            })
        );
    }

    #[test]
    fn test_dimension_rejects_zero_when_deserialized() {
        let parsed: Result<VectorDimension, _> = serde_json::from_str("0");
        assert!(parsed.is_err());

        let parsed: VectorDimension = serde_json::from_str("384").unwrap();
        assert_eq!(parsed.get(), 384);
    }

    #[test]
    fn test_cosine_distance() {
        let metric = DistanceMetric::Cosine;
        let same = metric.distance(&[1.0, 0.0], &[2.0, 0.0]).unwrap();
        assert!(same.abs() < 1e-9);

        let orthogonal = metric.distance(&[1.0, 0.0], &[0.0, 1.0]).unwrap();
        assert!((orthogonal - 1.0).abs() < 1e-9);

        let opposite = metric.distance(&[1.0, 0.0], &[-1.0, 0.0]).unwrap();
        assert!((opposite - 2.0).abs() < 1e-9);

        // Zero vectors are treated as orthogonal rather than NaN
        let zero = metric.distance(&[0.0, 0.0], &[1.0, 0.0]).unwrap();
        assert_eq!(zero, 1.0);
    }

    #[test]
    fn test_l2_and_inner_product_distance() {
        let l2 = DistanceMetric::L2.distance(&[0.0, 0.0], &[3.0, 4.0]).unwrap();
        assert!((l2 - 5.0).abs() < 1e-9);

        let ip = DistanceMetric::InnerProduct
            .distance(&[1.0, 2.0], &[3.0, 4.0])
            .unwrap();
        assert!((ip + 11.0).abs() < 1e-9);
    }

    #[test]
    fn test_distance_dimension_mismatch() {
        assert!(DistanceMetric::L2.distance(&[1.0], &[1.0, 2.0]).is_err());
    }

    #[test]
    fn test_metric_names() {
        assert_eq!(DistanceMetric::Cosine.pgvector_operator(), "<=>");
        assert_eq!(DistanceMetric::L2.sql_function(), "vector_l2_distance");
        assert_eq!(DistanceMetric::InnerProduct.to_string(), "inner_product");

        let parsed: DistanceMetric = serde_json::from_str("\"inner_product\"").unwrap();
        assert_eq!(parsed, DistanceMetric::InnerProduct);
    }
}
