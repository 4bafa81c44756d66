//! Document-level types.

use super::Page;
use serde::{Deserialize, Serialize};

/// A flattened PDF document: ordered pages plus the outline forest.
///
/// Constructed once per run by the assembler and read once by the
/// serializer; nothing mutates it after assembly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Pages in engine order. This order is load-bearing.
    pub pages: Vec<Page>,

    /// Root-level outline nodes (a forest, not a single tree).
    pub outline: Vec<OutlineNode>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self {
            pages: Vec::new(),
            outline: Vec::new(),
        }
    }

    /// Parse a previously serialized document model.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| crate::Error::Render(format!("invalid document model: {}", e)))
    }

    /// Get the number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Check if the document has any pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Get the total number of outline nodes, including nested ones.
    pub fn outline_node_count(&self) -> usize {
        self.outline.iter().map(OutlineNode::node_count).sum()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// A single node in the document outline (bookmark).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlineNode {
    /// Bookmark title as reported by the engine.
    pub title: String,

    /// Target page index, 0-based. `-1` when the bookmark has no
    /// resolvable target (external link, missing destination).
    pub page: i32,

    /// Child nodes, recursively the same shape.
    pub outline: Vec<OutlineNode>,
}

impl OutlineNode {
    /// Create a new outline node with no children.
    pub fn new(title: impl Into<String>, page: i32) -> Self {
        Self {
            title: title.into(),
            page,
            outline: Vec::new(),
        }
    }

    /// Number of nodes in this subtree, including self.
    pub fn node_count(&self) -> usize {
        1 + self.outline.iter().map(OutlineNode::node_count).sum::<usize>()
    }

    /// Depth of this subtree. A leaf has depth 1.
    pub fn max_depth(&self) -> usize {
        1 + self
            .outline
            .iter()
            .map(OutlineNode::max_depth)
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_new() {
        let doc = Document::new();
        assert!(doc.is_empty());
        assert_eq!(doc.page_count(), 0);
        assert_eq!(doc.outline_node_count(), 0);
    }

    #[test]
    fn test_outline_node_count_and_depth() {
        let mut chapter = OutlineNode::new("Chapter 1", 0);
        chapter.outline.push(OutlineNode::new("Section 1.1", 2));
        let mut deep = OutlineNode::new("Section 1.2", 5);
        deep.outline.push(OutlineNode::new("Section 1.2.1", 6));
        chapter.outline.push(deep);

        assert_eq!(chapter.node_count(), 4);
        assert_eq!(chapter.max_depth(), 3);
    }

    #[test]
    fn test_from_json_round_trip() {
        let mut doc = Document::new();
        doc.pages.push(crate::model::Page::new(612.0, 792.0));
        doc.outline.push(OutlineNode::new("Intro", -1));

        let json = serde_json::to_string(&doc).unwrap();
        let loaded = Document::from_json(&json).unwrap();
        assert_eq!(loaded.page_count(), 1);
        assert_eq!(loaded.outline[0].title, "Intro");
        assert_eq!(loaded.outline[0].page, -1);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(Document::from_json("{\"pages\": 3}").is_err());
    }
}
