//! Similarity search orchestration.
//!
//! Ingestion path: text -> embedding provider -> store insert.
//! Query path: text -> embedding provider -> ranked store lookup, or a
//! caller-supplied vector straight to the store.

mod service;

pub use service::DocumentService;
