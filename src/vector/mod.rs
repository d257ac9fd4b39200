//! Vector types and the text codec used to store embeddings.
//!
//! Embeddings travel between three representations: the `Vec<f32>` the
//! embedding provider returns, the bracketed literal a vector column
//! accepts, and the decoded vector attached to a search hit. The codec
//! owns the conversion; the types module owns dimension and distance
//! semantics.

pub mod codec;
mod types;

pub use codec::{DecodeError, DecodePolicy, decode, decode_lenient, encode};
pub use types::{DistanceMetric, Similarity, VECTOR_DIMENSION_768, VectorDimension, VectorError};
