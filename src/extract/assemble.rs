//! Document assembly.

use rayon::prelude::*;

use crate::engine::{DocumentEngine, PageHandle};
use crate::error::Result;
use crate::model::{Document, Page};

use super::{build_outline_forest, extract_page};

/// Options for document assembly.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Whether to extract pages in parallel. Page extraction has no
    /// cross-page dependency; results are always collected back in page
    /// order.
    pub parallel: bool,
}

impl ExtractOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable parallel page extraction.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel page extraction.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self { parallel: true }
    }
}

/// Assemble the flattened document: outline forest first, then every page
/// in engine page order.
///
/// Outline faults never surface here; they are absorbed by the forest
/// builder's truncation policy. Engine faults reading a page do surface:
/// with no page there is no meaningful partial document.
pub fn assemble<E>(engine: &E, options: &ExtractOptions) -> Result<Document>
where
    E: DocumentEngine + Sync,
{
    let outline = build_outline_forest(engine.outline_root()?);

    let page_count = engine.page_count();
    log::debug!(
        "assembling {} pages, {} root outline nodes",
        page_count,
        outline.len()
    );

    let pages: Vec<Page> = if options.parallel {
        // Indexed fan-out keeps collection in original page order.
        (0..page_count)
            .into_par_iter()
            .map(|index| page_at(engine, index))
            .collect::<Result<_>>()?
    } else {
        (0..page_count)
            .map(|index| page_at(engine, index))
            .collect::<Result<_>>()?
    };

    Ok(Document { pages, outline })
}

fn page_at<E: DocumentEngine>(engine: &E, index: usize) -> Result<Page> {
    let handle = engine.page(index)?;
    let rect = handle.bounds()?;
    let raw_blocks = handle.text_blocks()?;
    Ok(extract_page(rect, raw_blocks))
}
