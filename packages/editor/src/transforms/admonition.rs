use super::{child_containing, isolate_range, selected_blocks};
use crate::{Change, EditorError};

/// Move the selected blocks out of their admonition
///
/// The admonition is split around the selection, so blocks before and
/// after it stay inside (two) admonitions of the same type.
pub fn lift_from_admonition(change: &mut Change<'_>) -> Result<bool, EditorError> {
    let Some((start, end)) = selected_blocks(change) else {
        return Ok(false);
    };
    let tree = change.tree();
    let Some(admonition) = tree.closest(&start, |tree, key| tree.node_type(key) == Some("admonition")) else {
        return Ok(false);
    };
    let Some(first) = child_containing(tree, &admonition, &start) else {
        return Ok(false);
    };
    // An end outside the admonition extends the range to its last block
    let last = child_containing(tree, &admonition, &end)
        .or_else(|| tree.children(&admonition).last().cloned());
    let Some(last) = last else {
        return Ok(false);
    };
    let Some(parent) = tree.parent(&admonition).cloned() else {
        return Ok(false);
    };

    {
        let mut change = change.without_normalizing();
        let (_, first) = change.locate(&first)?;
        let (_, last) = change.locate(&last)?;
        let fragment = isolate_range(&mut change, &admonition, first, last)?;
        change.unwrap_node(&fragment)?;
    }

    if change.is_normalizing() {
        change.normalize_node(&parent)?;
    }
    Ok(true)
}
