//! Table formatting utilities for structured output.

use crate::storage::{Document, SimilarityResult};
use comfy_table::{
    Attribute, Cell, Color, ContentArrangement, Table, modifiers::UTF8_ROUND_CORNERS,
    presets::UTF8_FULL,
};

/// Characters of content shown in a results row.
const PREVIEW_CHARS: usize = 60;

/// Builder for creating formatted tables.
pub struct TableBuilder {
    table: Table,
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TableBuilder {
    /// Create a new table builder.
    pub fn new() -> Self {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        // Apply rounded corners
        table.apply_modifier(UTF8_ROUND_CORNERS);
        table.set_content_arrangement(ContentArrangement::Dynamic);
        Self { table }
    }

    /// Set the table headers.
    pub fn set_headers(mut self, headers: Vec<&str>) -> Self {
        let header_cells: Vec<Cell> = headers
            .into_iter()
            .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
            .collect();
        self.table.set_header(header_cells);
        self
    }

    /// Add a row to the table.
    pub fn add_row(mut self, row: Vec<Cell>) -> Self {
        self.table.add_row(row);
        self
    }

    /// Build and return the formatted table.
    pub fn build(self) -> String {
        self.table.to_string()
    }
}

/// Single-line preview of document content.
fn preview(content: &str) -> String {
    let flat = content.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= PREVIEW_CHARS {
        return flat;
    }
    let cut: String = flat.chars().take(PREVIEW_CHARS).collect();
    format!("{cut}…")
}

fn similarity_color(similarity: f64) -> Color {
    if similarity >= 0.8 {
        Color::Green
    } else if similarity >= 0.5 {
        Color::Yellow
    } else {
        Color::Red
    }
}

/// Create a table of ranked search results.
pub fn create_results_table(results: &[SimilarityResult]) -> String {
    let builder = TableBuilder::new().set_headers(vec![
        "#",
        "ID",
        "Similarity",
        "File",
        "Type",
        "Content",
    ]);

    results
        .iter()
        .enumerate()
        .fold(builder, |builder, (rank, result)| {
            let doc = &result.document;
            // Add rows without ANSI colors (comfy-table doesn't handle them well)
            builder.add_row(vec![
                Cell::new(rank + 1),
                Cell::new(doc.id),
                Cell::new(result.similarity)
                    .fg(similarity_color(result.similarity.get()))
                    .add_attribute(Attribute::Bold),
                Cell::new(doc.file_name.as_deref().unwrap_or("-")),
                Cell::new(doc.media_type.as_deref().unwrap_or("-")),
                Cell::new(preview(&doc.content)),
            ])
        })
        .build()
}

/// Create a summary table for a stored document.
pub fn create_document_table(document: &Document) -> String {
    TableBuilder::new()
        .set_headers(vec!["Field", "Value"])
        .add_row(vec![Cell::new("ID"), Cell::new(document.id)])
        .add_row(vec![
            Cell::new("File"),
            Cell::new(document.file_name.as_deref().unwrap_or("-")),
        ])
        .add_row(vec![
            Cell::new("Type"),
            Cell::new(document.media_type.as_deref().unwrap_or("-")),
        ])
        .add_row(vec![
            Cell::new("Dimensions"),
            Cell::new(document.embedding.len()),
        ])
        .add_row(vec![
            Cell::new("Created"),
            Cell::new(document.created_at.format("%Y-%m-%d %H:%M:%S UTC")),
        ])
        .add_row(vec![Cell::new("Content"), Cell::new(preview(&document.content))])
        .build()
}
