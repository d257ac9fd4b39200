//! Rich terminal display utilities for CLI output.
//!
//! Provides styled tables and themed messages.

pub mod tables;
pub mod theme;

pub use tables::{TableBuilder, create_document_table, create_results_table};
pub use theme::{THEME, Theme};
