//! Per-page block extraction.

use crate::engine::{RawBlock, Rect};
use crate::model::{Block, Page};

/// Reshape one page's engine-reported regions into the canonical page
/// record.
///
/// Pure data reshaping: width/height are computed from the bounding
/// rectangle, every reported region passes through in order (empty-text and
/// zero-area ones included), and the engine's `index`/`kind` bookkeeping is
/// dropped. Geometry is not validated or normalized here: inverted
/// rectangles stay inverted.
pub fn extract_page(rect: Rect, raw_blocks: Vec<RawBlock>) -> Page {
    let blocks = raw_blocks
        .into_iter()
        .map(|raw| Block {
            left: raw.left,
            top: raw.top,
            right: raw.right,
            bottom: raw.bottom,
            text: raw.text,
        })
        .collect();

    Page {
        width: rect.width(),
        height: rect.height(),
        blocks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::RawBlockKind;

    fn raw(
        left: f64,
        top: f64,
        right: f64,
        bottom: f64,
        text: &str,
        index: usize,
    ) -> RawBlock {
        RawBlock {
            left,
            top,
            right,
            bottom,
            text: text.to_string(),
            index,
            kind: RawBlockKind::Text,
        }
    }

    const LETTER: Rect = Rect {
        x0: 0.0,
        y0: 0.0,
        x1: 612.0,
        y1: 792.0,
    };

    #[test]
    fn test_dimensions_from_rect() {
        let page = extract_page(LETTER, Vec::new());
        assert_eq!(page.width, 612.0);
        assert_eq!(page.height, 792.0);
        assert!(page.is_empty());
    }

    #[test]
    fn test_dimensions_from_offset_rect() {
        let rect = Rect {
            x0: 10.0,
            y0: 20.0,
            x1: 310.0,
            y1: 420.0,
        };
        let page = extract_page(rect, Vec::new());
        assert_eq!(page.width, 300.0);
        assert_eq!(page.height, 400.0);
    }

    #[test]
    fn test_blocks_pass_through_in_order() {
        let page = extract_page(
            LETTER,
            vec![
                raw(36.0, 36.0, 576.0, 100.0, "Hello", 0),
                raw(36.0, 110.0, 576.0, 140.0, "", 1),
                raw(200.0, 150.0, 200.0, 150.0, "zero area", 2),
            ],
        );

        assert_eq!(page.block_count(), 3);
        assert_eq!(
            page.blocks[0],
            Block::new(36.0, 36.0, 576.0, 100.0, "Hello")
        );
        assert_eq!(page.blocks[1].text, "");
        assert_eq!(page.blocks[2].left, page.blocks[2].right);
    }

    #[test]
    fn test_inverted_geometry_is_not_repaired() {
        let page = extract_page(LETTER, vec![raw(500.0, 200.0, 100.0, 50.0, "x", 0)]);
        assert_eq!(page.blocks[0].left, 500.0);
        assert_eq!(page.blocks[0].right, 100.0);
        assert_eq!(page.blocks[0].top, 200.0);
        assert_eq!(page.blocks[0].bottom, 50.0);
    }

    #[test]
    fn test_serialized_block_has_no_engine_bookkeeping() {
        let page = extract_page(LETTER, vec![raw(0.0, 0.0, 1.0, 1.0, "t", 7)]);
        let json = serde_json::to_string(&page.blocks[0]).unwrap();
        assert!(!json.contains("index"));
        assert!(!json.contains("kind"));
    }
}
