//! Page-level types.

use serde::{Deserialize, Serialize};

/// A single page in the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Page width in points (1 point = 1/72 inch).
    pub width: f64,

    /// Page height in points.
    pub height: f64,

    /// Text blocks in engine reading order. Never re-sorted here.
    pub blocks: Vec<Block>,
}

impl Page {
    /// Create a new page with the given dimensions and no blocks.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            blocks: Vec::new(),
        }
    }

    /// Get the number of blocks on the page.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Check if the page has no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Get page dimensions as (width, height).
    pub fn dimensions(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Check if the page is in landscape orientation.
    pub fn is_landscape(&self) -> bool {
        self.width > self.height
    }
}

/// A rectangular text region on a page.
///
/// Geometry is in page-local coordinates exactly as the engine reported it;
/// inverted rectangles pass through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Left edge.
    pub left: f64,
    /// Top edge.
    pub top: f64,
    /// Right edge.
    pub right: f64,
    /// Bottom edge.
    pub bottom: f64,
    /// Text content. May be empty, never absent.
    pub text: String,
}

impl Block {
    /// Create a new block.
    pub fn new(left: f64, top: f64, right: f64, bottom: f64, text: impl Into<String>) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
            text: text.into(),
        }
    }
}
