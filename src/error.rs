//! Error types for the flatpdf library.

use std::io;
use thiserror::Error;

/// Result type alias for flatpdf operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while flattening a document.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input cannot be opened or is not a valid PDF.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// A single outline node's attributes are unreadable, or the outline
    /// graph loops back on itself. Absorbed by the forest builder's
    /// truncation policy; never escapes document assembly.
    #[error("unreadable outline node: {0}")]
    OutlineNode(String),

    /// The engine failed to compute a page's text regions.
    #[error("block extraction error: {0}")]
    BlockExtract(String),

    /// Error serializing the assembled model.
    #[error("rendering error: {0}")]
    Render(String),
}
