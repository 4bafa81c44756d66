//! # flatpdf
//!
//! Flatten a PDF's page layout and bookmark outline into a structured,
//! serialized document model.
//!
//! The output is an ordered list of pages (each with its geometric text
//! blocks) plus an ordered forest of outline nodes, serialized as JSON
//! with a canonical key order. Downstream tooling gets a flat,
//! language-neutral view of a document's layout and navigation without
//! depending on a PDF engine.
//!
//! ## Quick Start
//!
//! ```no_run
//! use flatpdf::render::{to_json, JsonFormat};
//!
//! fn main() -> flatpdf::Result<()> {
//!     let doc = flatpdf::convert_file("document.pdf")?;
//!     let json = to_json(&doc, JsonFormat::Pretty)?;
//!     std::fs::write("document.json", json)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Behavior notes
//!
//! - Page and block order follow the engine exactly; nothing is re-sorted.
//! - Malformed outline nodes truncate the remainder of their sibling level
//!   rather than failing the conversion; cyclic outline graphs are detected
//!   and bounded.
//! - An unreadable input is fatal; there is no partial output.

pub mod engine;
pub mod error;
pub mod extract;
pub mod model;
pub mod render;

// Re-export commonly used types
pub use engine::LopdfEngine;
pub use error::{Error, Result};
pub use extract::{assemble, build_outline_forest, extract_page, ExtractOptions};
pub use model::{Block, Document, OutlineNode, Page, SearchHit};
pub use render::{to_json, JsonFormat};

use std::path::Path;

/// Convert a PDF file into the flattened document model.
///
/// # Example
///
/// ```no_run
/// let doc = flatpdf::convert_file("document.pdf").unwrap();
/// println!("pages: {}", doc.page_count());
/// ```
pub fn convert_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    convert_file_with_options(path, &ExtractOptions::default())
}

/// Convert a PDF file with custom options.
pub fn convert_file_with_options<P: AsRef<Path>>(
    path: P,
    options: &ExtractOptions,
) -> Result<Document> {
    let engine = LopdfEngine::open(path)?;
    assemble(&engine, options)
}

/// Convert an in-memory PDF into the flattened document model.
pub fn convert_bytes(data: &[u8]) -> Result<Document> {
    convert_bytes_with_options(data, &ExtractOptions::default())
}

/// Convert an in-memory PDF with custom options.
pub fn convert_bytes_with_options(data: &[u8], options: &ExtractOptions) -> Result<Document> {
    let engine = LopdfEngine::from_bytes(data)?;
    assemble(&engine, options)
}
