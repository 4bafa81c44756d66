//! JSON rendering for the assembled document model.

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::{Error, Result};
use crate::model::Document;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed with stable 4-space indentation, for human-diffable
    /// output.
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace.
    Compact,
}

/// Serialize a document to JSON.
///
/// Key order is canonical (it follows model field order), so equal
/// documents always serialize to byte-identical output.
pub fn to_json(doc: &Document, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => {
            let mut buf = Vec::new();
            let formatter = PrettyFormatter::with_indent(b"    ");
            let mut ser = Serializer::with_formatter(&mut buf, formatter);
            doc.serialize(&mut ser).map(|_| buf)
        }
        JsonFormat::Compact => serde_json::to_vec(doc),
    };

    result
        .map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
        .and_then(|buf| {
            String::from_utf8(buf).map_err(|e| Error::Render(format!("non-UTF-8 output: {}", e)))
        })
}
