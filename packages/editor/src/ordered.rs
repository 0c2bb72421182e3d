//! Ordered-children repair
//!
//! Given a node and the groups its children should follow, find the first
//! child that is out of order and move it next to the siblings of its
//! group. One move per call: callers re-run until nothing is left to fix.

use crate::{Change, EditorError};
use cnx_model::{Key, Tree};

/// Group predicate
pub type MatchNode = fn(&Tree, &Key) -> bool;

/// Called with `(change, child, parent)` for a child matching no group
pub type Fallback = fn(&mut Change<'_>, &Key, &Key) -> Result<(), EditorError>;

/// Move the first misplaced child of `node` to where it belongs
///
/// Returns `true` when something was fixed (a move, or the fallback was
/// invoked), `false` when the children are already in group order.
pub fn normalize_ordered_children(
    change: &mut Change<'_>,
    node: &Key,
    groups: &[MatchNode],
    fallback: Fallback,
) -> Result<bool, EditorError> {
    let tree = change.tree();
    let children = tree.children(node).to_vec();

    let mut current = 0;
    // For each group, whether a child has matched it so far
    let mut matched = vec![false; groups.len()];

    for child in &children {
        while current < groups.len() && !groups[current](tree, child) {
            current += 1;
        }

        if current < groups.len() {
            matched[current] = true;
            continue;
        }

        let Some(inx) = groups.iter().position(|group| group(tree, child)) else {
            fallback(change, child, node)?;
            return Ok(true);
        };

        // The child should directly follow the last sibling of its own
        // group, or of the group before it
        let predicate = if matched[inx] {
            Some(groups[inx])
        } else if inx > 0 && matched[inx - 1] {
            Some(groups[inx - 1])
        } else {
            None
        };
        let previous = predicate.and_then(|predicate| tree.previous_sibling(child, predicate));

        let target = match previous.and_then(|previous| tree.index_of(&previous)) {
            // Moving left: the previous sibling's index is unaffected
            Some(index) => index + 1,
            None => 0,
        };
        let child = child.clone();
        change.move_node(&child, node, target)?;
        return Ok(true);
    }

    Ok(false)
}
