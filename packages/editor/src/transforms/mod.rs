//! # Structural Transforms
//!
//! Selection-driven edits bound to editor commands. A transform runs its
//! primitive edits with normalization suppressed, then normalizes the part
//! of the tree it touched once. Unmet preconditions (no selection, no
//! enclosing exercise, ...) are no-ops reported as `Ok(false)`.

mod admonition;
mod exercise;
mod figure;
mod marks;

pub use admonition::lift_from_admonition;
pub use exercise::{insert_commentary, insert_exercise, insert_solution};
pub use figure::{insert_figure, MediaKind, MediaSource};
pub use marks::remove_marks;

use crate::{Change, EditorError};
use cnx_model::{Key, Tree};
use serde::{Deserialize, Serialize};

/// Named transform, as bound to a menu entry or keybinding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    InsertExercise,
    InsertSolution,
    InsertCommentary,
    InsertFigure(MediaSource),
    LiftFromAdmonition,
    RemoveMarks,
}

impl Command {
    /// Run against the change's selection, `false` when nothing was done
    pub fn run(self, change: &mut Change<'_>) -> Result<bool, EditorError> {
        tracing::debug!(command = self.name(), "running command");
        match self {
            Command::InsertExercise => insert_exercise(change),
            Command::InsertSolution => insert_solution(change),
            Command::InsertCommentary => insert_commentary(change),
            Command::InsertFigure(source) => insert_figure(change, &source),
            Command::LiftFromAdmonition => lift_from_admonition(change),
            Command::RemoveMarks => remove_marks(change),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::InsertExercise => "insert_exercise",
            Command::InsertSolution => "insert_solution",
            Command::InsertCommentary => "insert_commentary",
            Command::InsertFigure(_) => "insert_figure",
            Command::LiftFromAdmonition => "lift_from_admonition",
            Command::RemoveMarks => "remove_marks",
        }
    }
}

/// Selected block range: closest elements around the selection's start and end
pub(crate) fn selected_blocks(change: &Change<'_>) -> Option<(Key, Key)> {
    let tree = change.tree();
    let selection = change.selection()?;
    Some((selection.start_block(tree)?, selection.end_block(tree)?))
}

/// Child of `ancestor` on the way down to `key` (or `key` itself)
pub(crate) fn child_containing(tree: &Tree, ancestor: &Key, key: &Key) -> Option<Key> {
    tree.closest(key, |tree, k| tree.parent(k) == Some(ancestor))
}

/// Raise `key` until it is a direct child of `ancestor`
///
/// A boundary that is not the first child of its parent splits the parent
/// right before it and continues from the second half, so nothing that
/// precedes the boundary comes along.
pub(crate) fn promote_start(change: &mut Change<'_>, key: &Key, ancestor: &Key) -> Result<Key, EditorError> {
    let mut boundary = key.clone();
    loop {
        let (parent, index) = change.locate(&boundary)?;
        if &parent == ancestor {
            return Ok(boundary);
        }
        boundary = if index == 0 {
            parent
        } else {
            change.split_node(&parent, index)?
        };
    }
}

/// Mirror of [`promote_start`]: splits right after the boundary and keeps
/// the first half
pub(crate) fn promote_end(change: &mut Change<'_>, key: &Key, ancestor: &Key) -> Result<Key, EditorError> {
    let mut boundary = key.clone();
    loop {
        let (parent, index) = change.locate(&boundary)?;
        if &parent == ancestor {
            return Ok(boundary);
        }
        if index + 1 < change.tree().children(&parent).len() {
            change.split_node(&parent, index + 1)?;
        }
        boundary = parent;
    }
}

/// Split `parent` so that one piece holds exactly its children
/// `start..=end`, returning that piece
pub(crate) fn isolate_range(
    change: &mut Change<'_>,
    parent: &Key,
    start: usize,
    end: usize,
) -> Result<Key, EditorError> {
    if end + 1 < change.tree().children(parent).len() {
        change.split_node(parent, end + 1)?;
    }
    if start > 0 {
        return change.split_node(parent, start);
    }
    Ok(parent.clone())
}

/// Move `key` out of its parent into the grandparent, splitting the
/// parent around it
pub(crate) fn lift_node(change: &mut Change<'_>, key: &Key) -> Result<(), EditorError> {
    let (parent, index) = change.locate(key)?;
    let fragment = isolate_range(change, &parent, index, index)?;
    change.unwrap_node(&fragment)
}
