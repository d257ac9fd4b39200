//! Output management for CLI commands.
//!
//! Handles formatting and display for different output formats,
//! providing a unified interface for text and JSON output.

use crate::display::tables::{create_document_table, create_results_table};
use crate::display::theme::THEME;
use crate::error::ServiceError;
use crate::io::exit_code::ExitCode;
use crate::io::format::{JsonResponse, OutputFormat, ResponseMeta};
use crate::storage::{Document, SearchOutcome};
use serde::Serialize;
use std::io::{self, Write};
use std::time::Instant;

/// Manages output formatting and display.
///
/// Provides methods for outputting documents, search results,
/// and errors in either text or JSON format based on configuration.
pub struct OutputManager {
    format: OutputFormat,
    started: Instant,
    stdout: Box<dyn Write>,
    stderr: Box<dyn Write>,
}

impl OutputManager {
    /// Create a new output manager with the specified format.
    pub fn new(format: OutputFormat) -> Self {
        Self::new_with_writers(format, Box::new(io::stdout()), Box::new(io::stderr()))
    }

    /// Create an output manager with custom writers.
    pub fn new_with_writers(
        format: OutputFormat,
        stdout: Box<dyn Write>,
        stderr: Box<dyn Write>,
    ) -> Self {
        Self {
            format,
            started: Instant::now(),
            stdout,
            stderr,
        }
    }

    fn meta(&self) -> ResponseMeta {
        ResponseMeta {
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Some(chrono::Utc::now().to_rfc3339()),
            execution_time_ms: Some(self.started.elapsed().as_millis() as u64),
        }
    }

    fn write_json<T: Serialize>(&mut self, response: &JsonResponse<T>) -> io::Result<()> {
        writeln!(self.stdout, "{}", serde_json::to_string_pretty(response)?)
    }

    /// Output a freshly stored document.
    pub fn document(&mut self, document: &Document) -> io::Result<ExitCode> {
        match self.format {
            OutputFormat::Json => {
                let response = JsonResponse::success(document).with_meta(self.meta());
                self.write_json(&response)?;
            }
            OutputFormat::Text => {
                let message = format!("Stored document {}", document.id);
                writeln!(self.stdout, "{}", THEME.success_with_icon(&message))?;
                writeln!(self.stdout, "{}", create_document_table(document))?;
            }
        }
        Ok(ExitCode::Success)
    }

    /// Output ranked search results.
    ///
    /// A search that matched nothing (and skipped nothing) is reported as
    /// not found.
    pub fn search_results(&mut self, outcome: &SearchOutcome, query: &str) -> io::Result<ExitCode> {
        if outcome.is_empty() {
            return self.not_found("documents", query);
        }

        match self.format {
            OutputFormat::Json => {
                let response = JsonResponse::success(outcome).with_meta(self.meta());
                self.write_json(&response)?;
            }
            OutputFormat::Text => {
                writeln!(
                    self.stdout,
                    "Found {} documents:",
                    THEME.apply(&THEME.number, outcome.results.len())
                )?;
                writeln!(self.stdout, "{}", create_results_table(&outcome.results))?;
                if outcome.skipped > 0 {
                    let message = format!(
                        "{} stored rows could not be read and were skipped",
                        outcome.skipped
                    );
                    writeln!(self.stderr, "{}", THEME.warning_with_icon(&message))?;
                }
            }
        }
        Ok(ExitCode::Success)
    }

    /// Output a not found result.
    pub fn not_found(&mut self, entity: &str, name: &str) -> io::Result<ExitCode> {
        match self.format {
            OutputFormat::Json => {
                let response = JsonResponse::not_found(entity, name).with_meta(self.meta());
                self.write_json(&response)?;
            }
            OutputFormat::Text => {
                writeln!(self.stderr, "No {entity} matched '{name}'")?;
            }
        }
        Ok(ExitCode::NotFound)
    }

    /// Output an error with suggestions.
    pub fn error(&mut self, error: &ServiceError) -> io::Result<ExitCode> {
        match self.format {
            OutputFormat::Json => {
                let response = JsonResponse::from_error(error).with_meta(self.meta());
                writeln!(self.stderr, "{}", serde_json::to_string_pretty(&response)?)?;
            }
            OutputFormat::Text => {
                let message = format!("Error: {error}");
                writeln!(self.stderr, "{}", THEME.error_with_icon(&message))?;
                for suggestion in error.recovery_suggestions() {
                    writeln!(self.stderr, "  Suggestion: {suggestion}")?;
                }
            }
        }
        Ok(ExitCode::from_error(error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{DocumentId, SimilarityResult};
    use crate::vector::Similarity;
    use chrono::{TimeZone, Utc};
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Writer that keeps what was written for later inspection.
    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock()).into_owned()
        }
    }

    fn manager(format: OutputFormat) -> (OutputManager, SharedBuffer, SharedBuffer) {
        let stdout = SharedBuffer::default();
        let stderr = SharedBuffer::default();
        let manager =
            OutputManager::new_with_writers(format, Box::new(stdout.clone()), Box::new(stderr.clone()));
        (manager, stdout, stderr)
    }

    fn outcome() -> SearchOutcome {
        SearchOutcome {
            results: vec![SimilarityResult {
                document: Document {
                    id: DocumentId::new(4),
                    content: "borrow checker notes".to_string(),
                    media_type: Some("text/markdown".to_string()),
                    file_name: Some("notes.md".to_string()),
                    embedding: vec![0.1, 0.2, 0.3],
                    created_at: Utc.with_ymd_and_hms(2024, 5, 17, 9, 30, 0).unwrap(),
                },
                similarity: Similarity::new(0.93),
            }],
            skipped: 1,
        }
    }

    #[test]
    fn test_search_results_json() {
        let (mut manager, stdout, _) = manager(OutputFormat::Json);

        let code = manager.search_results(&outcome(), "ownership").unwrap();
        assert_eq!(code, ExitCode::Success);

        let json: serde_json::Value = serde_json::from_str(&stdout.contents()).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["data"]["skipped"], 1);
        assert_eq!(json["data"]["results"][0]["document"]["id"], 4);
        assert!(json["meta"]["version"].is_string());
    }

    #[test]
    fn test_search_results_text_reports_skipped_rows() {
        let (mut manager, stdout, stderr) = manager(OutputFormat::Text);

        manager.search_results(&outcome(), "ownership").unwrap();

        assert!(stdout.contents().contains("notes.md"));
        assert!(stderr.contents().contains("1 stored rows could not be read"));
    }

    #[test]
    fn test_empty_search_is_not_found() {
        let (mut manager, _, stderr) = manager(OutputFormat::Text);

        let code = manager
            .search_results(&SearchOutcome::default(), "nothing")
            .unwrap();

        assert_eq!(code, ExitCode::NotFound);
        assert!(stderr.contents().contains("No documents matched 'nothing'"));
    }

    #[test]
    fn test_error_writes_suggestions() {
        let (mut manager, stdout, stderr) = manager(OutputFormat::Text);
        let error = ServiceError::from(crate::storage::StoreError::InvalidLimit { limit: 0 });

        let code = manager.error(&error).unwrap();

        assert_eq!(code, ExitCode::InvalidInput);
        assert!(stdout.contents().is_empty());
        assert!(stderr.contents().contains("Suggestion:"));
    }
}
