//! Outline forest building.
//!
//! The outline is an externally owned linked graph reached through
//! [`OutlineCursor`] handles. Real-world documents hand back nodes with
//! unreadable attributes, dangling links, and even cycles, so the walk here
//! guarantees two things: it always terminates, and it never raises. Every
//! fault is absorbed by truncating the remainder of the faulty node's
//! sibling level.

use std::collections::HashSet;

use crate::engine::OutlineCursor;
use crate::model::OutlineNode;

/// Flatten the sibling chain starting at `root` (and every level below it)
/// into an ordered forest.
///
/// Fault policy, per level: the first node whose title, target page, or
/// child link cannot be read ends that level; the faulty node and all of
/// its later siblings are dropped, while prior siblings and ancestors are
/// kept. A node seen twice anywhere in the walk counts as a fault at the
/// position of the second sighting, which bounds the traversal on cyclic
/// graphs; a cycle never raises on its own, it loops.
pub fn build_outline_forest<C: OutlineCursor>(root: Option<C>) -> Vec<OutlineNode> {
    let mut visited = HashSet::new();
    build_level(root, &mut visited)
}

fn build_level<C: OutlineCursor>(
    first: Option<C>,
    visited: &mut HashSet<C::Id>,
) -> Vec<OutlineNode> {
    let mut nodes = Vec::new();
    let mut cursor = first;

    while let Some(node) = cursor {
        if !visited.insert(node.id()) {
            log::debug!("outline node {:?} revisited, truncating level", node.id());
            break;
        }

        let built = read_node(&node, visited);
        match built {
            Ok(n) => nodes.push(n),
            Err(e) => {
                log::debug!("{}, truncating level", e);
                break;
            }
        }

        cursor = match node.next_sibling() {
            Ok(next) => next,
            Err(e) => {
                log::debug!("{}, truncating level", e);
                None
            }
        };
    }

    nodes
}

fn read_node<C: OutlineCursor>(
    node: &C,
    visited: &mut HashSet<C::Id>,
) -> crate::Result<OutlineNode> {
    let title = node.title()?;
    let page = node.target_page()?;
    let children = build_level(node.first_child()?, visited);

    Ok(OutlineNode {
        title,
        page,
        outline: children,
    })
}
