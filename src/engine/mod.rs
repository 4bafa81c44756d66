//! PDF engine abstraction layer.
//!
//! Provides a trait-based interface for the document engine, isolating the
//! concrete PDF library (lopdf) from the flattening logic. The outline
//! surface is an opaque cursor with a fixed set of fallible accessors:
//! every read has its own error channel, and cursor identities support
//! cycle detection in the traversal above.

mod layout;
mod lopdf_engine;

pub use lopdf_engine::{LopdfCursor, LopdfEngine, LopdfPage};

use crate::error::Result;
use std::fmt::Debug;
use std::hash::Hash;

/// A page's bounding rectangle in engine coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Rect {
    /// Width of the rectangle.
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    /// Height of the rectangle.
    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }
}

/// Kind of a reported text region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawBlockKind {
    /// A run of text lines.
    Text,
    /// An image placement.
    Image,
}

/// One text region as reported by the engine for a page.
///
/// `index` and `kind` are engine bookkeeping and are dropped from the
/// flattened model.
#[derive(Debug, Clone, PartialEq)]
pub struct RawBlock {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub text: String,
    pub index: usize,
    pub kind: RawBlockKind,
}

/// Access to one page of an opened document.
pub trait PageHandle {
    /// The page's bounding rectangle.
    fn bounds(&self) -> Result<Rect>;

    /// The page's text regions in engine reading order.
    fn text_blocks(&self) -> Result<Vec<RawBlock>>;
}

/// A cursor into the engine's outline graph.
///
/// Cursors navigate an untrusted external structure: any accessor may fail
/// on a malformed node, and sibling/child links may form cycles. Callers are
/// expected to track [`OutlineCursor::id`] values to bound traversal.
pub trait OutlineCursor: Sized {
    /// Stable identity of the underlying node, used for cycle detection.
    type Id: Eq + Hash + Clone + Debug;

    /// Identity of this cursor's node.
    fn id(&self) -> Self::Id;

    /// The node's title.
    fn title(&self) -> Result<String>;

    /// The node's target page index, 0-based; `-1` when the node has no
    /// resolvable target.
    fn target_page(&self) -> Result<i32>;

    /// Cursor to the node's first child, if any.
    fn first_child(&self) -> Result<Option<Self>>;

    /// Cursor to the node's next sibling, if any.
    fn next_sibling(&self) -> Result<Option<Self>>;
}

/// Abstract interface for an opened document.
pub trait DocumentEngine {
    /// Page access type.
    type Page<'a>: PageHandle
    where
        Self: 'a;

    /// Outline cursor type.
    type Cursor<'a>: OutlineCursor
    where
        Self: 'a;

    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Handle to the page at `index` (0-based, engine page order).
    fn page(&self, index: usize) -> Result<Self::Page<'_>>;

    /// Cursor to the first root-level outline node, or `None` when the
    /// document has no outline.
    fn outline_root(&self) -> Result<Option<Self::Cursor<'_>>>;
}
