//! Plain-text search over an assembled document model.

use serde::{Deserialize, Serialize};

use super::{Block, Document, Page};

/// Location of one search match inside a document.
///
/// Ordering follows document position: page, then block, then byte offset
/// within the block text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SearchHit {
    /// Index of the page containing the match.
    pub page_index: usize,
    /// Index of the block within the page.
    pub block_index: usize,
    /// Byte offset of the match within the block text.
    pub char_index: usize,
}

impl Block {
    /// Find every occurrence of `query` in this block's text.
    ///
    /// Returned hits carry only the byte offset; page and block indices are
    /// filled in by the enclosing [`Page`] and [`Document`].
    pub fn search(&self, query: &str) -> Vec<SearchHit> {
        if query.is_empty() {
            return Vec::new();
        }

        self.text
            .match_indices(query)
            .map(|(offset, _)| SearchHit {
                page_index: 0,
                block_index: 0,
                char_index: offset,
            })
            .collect()
    }
}

impl Page {
    /// Find every occurrence of `query` on this page, in block order.
    pub fn search(&self, query: &str) -> Vec<SearchHit> {
        if query.is_empty() {
            return Vec::new();
        }

        let mut results = Vec::new();

        for (block_index, block) in self.blocks.iter().enumerate() {
            let mut block_results = block.search(query);
            for hit in &mut block_results {
                hit.block_index = block_index;
            }
            results.extend(block_results);
        }

        results
    }
}

impl Document {
    /// Find every occurrence of `query` in the document, in page order.
    ///
    /// An empty query yields no hits.
    pub fn search(&self, query: &str) -> Vec<SearchHit> {
        if query.is_empty() {
            return Vec::new();
        }

        let mut results = Vec::new();

        for (page_index, page) in self.pages.iter().enumerate() {
            let mut page_results = page.search(query);
            for hit in &mut page_results {
                hit.page_index = page_index;
            }
            results.extend(page_results);
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_document() -> Document {
        let mut doc = Document::new();

        let mut first = Page::new(612.0, 792.0);
        first
            .blocks
            .push(Block::new(36.0, 36.0, 576.0, 100.0, "alpha beta alpha"));
        first.blocks.push(Block::new(36.0, 110.0, 576.0, 140.0, ""));
        doc.pages.push(first);

        let mut second = Page::new(612.0, 792.0);
        second
            .blocks
            .push(Block::new(36.0, 36.0, 576.0, 100.0, "beta\nalpha"));
        doc.pages.push(second);

        doc
    }

    #[test]
    fn test_search_finds_all_occurrences_in_order() {
        let doc = sample_document();
        let hits = doc.search("alpha");

        assert_eq!(
            hits,
            vec![
                SearchHit {
                    page_index: 0,
                    block_index: 0,
                    char_index: 0,
                },
                SearchHit {
                    page_index: 0,
                    block_index: 0,
                    char_index: 11,
                },
                SearchHit {
                    page_index: 1,
                    block_index: 0,
                    char_index: 5,
                },
            ]
        );
        // Hits come out already sorted by document position.
        let mut sorted = hits.clone();
        sorted.sort();
        assert_eq!(hits, sorted);
    }

    #[test]
    fn test_search_empty_query() {
        let doc = sample_document();
        assert!(doc.search("").is_empty());
    }

    #[test]
    fn test_search_no_match() {
        let doc = sample_document();
        assert!(doc.search("gamma").is_empty());
    }

    #[test]
    fn test_block_search_spans_lines() {
        let block = Block::new(0.0, 0.0, 10.0, 10.0, "one\ntwo");
        let hits = block.search("e\nt");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].char_index, 2);
    }
}
