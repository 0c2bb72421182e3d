//! Exercise transforms: wrap a selection into a new exercise, append a
//! solution or a commentary to the selected one.

use super::{isolate_range, lift_node, promote_end, promote_start, selected_blocks};
use crate::schema::{is_exercise_content, is_exercise_parent};
use crate::{Change, EditorError, Point, Selection};
use cnx_model::{Element, ElementData, Key, Text, TreeError};

/// Wrap the selected blocks in `exercise > exercise_problem`
///
/// Boundaries are raised to their lowest common ancestor, splitting
/// containers so that only selected content moves. Until that ancestor may
/// hold an exercise, the selected content is lifted out of it. The
/// surrounding tree keeps its structure, split containers aside.
pub fn insert_exercise(change: &mut Change<'_>) -> Result<bool, EditorError> {
    let Some((start, end)) = selected_blocks(change) else {
        return Ok(false);
    };

    let lca = {
        let mut change = change.without_normalizing();
        wrap_in_exercise(&mut change, &start, &end)?
    };

    if change.is_normalizing() {
        change.normalize_node(&lca)?;
    }
    Ok(true)
}

/// Returns the node the new exercise was inserted into
fn wrap_in_exercise(change: &mut Change<'_>, start: &Key, end: &Key) -> Result<Key, EditorError> {
    let tree = change.tree();
    let mut lca = if start == end || tree.is_ancestor(start, end) {
        tree.parent(start).cloned()
    } else if tree.is_ancestor(end, start) {
        tree.parent(end).cloned()
    } else {
        tree.common_ancestor(start, end)
    }
    .ok_or_else(|| TreeError::NodeNotFound(start.clone()))?;

    // Fast path: both blocks already sit in a legal exercise parent
    if is_exercise_parent(tree, &lca)
        && tree.parent(start) == Some(&lca)
        && tree.parent(end) == Some(&lca)
    {
        let (_, first) = change.locate(start)?;
        let (_, last) = change.locate(end)?;
        let problem = change.wrap_nodes(&lca, first..last + 1, ElementData::new("exercise_problem"))?;
        change.wrap_node(&problem, ElementData::new("exercise"))?;
        return Ok(lca);
    }

    let mut start = promote_start(change, start, &lca)?;
    let mut end = promote_end(change, end, &lca)?;
    // Once a container was dissolved its former children no longer fit the
    // containers above, so those are dissolved as well
    let mut keep_containers = true;

    while !is_exercise_parent(change.tree(), &lca) {
        if start == end {
            lift_node(change, &start)?;
        } else {
            let (_, first) = change.locate(&start)?;
            let (_, last) = change.locate(&end)?;
            let fragment = isolate_range(change, &lca, first, last)?;

            if keep_containers && is_exercise_content(change.tree(), &fragment) {
                start = fragment.clone();
                end = fragment;
            } else {
                let children = change.tree().children(&fragment);
                let (Some(first), Some(last)) = (children.first().cloned(), children.last().cloned()) else {
                    return Err(TreeError::NodeNotFound(fragment).into());
                };
                change.unwrap_node(&fragment)?;
                start = first;
                end = last;
                keep_containers = false;
            }
        }
        lca = change
            .tree()
            .parent(&start)
            .cloned()
            .ok_or_else(|| TreeError::NodeNotFound(start.clone()))?;
    }

    let (_, first) = change.locate(&start)?;
    let (_, last) = change.locate(&end)?;
    let selected = change.tree().children(&lca)[first..=last].to_vec();

    let problem = Element::new("exercise_problem");
    let problem_key = problem.key.clone();
    change.insert_node(&lca, first, Element::new("exercise").with_child(problem))?;
    for (index, node) in selected.iter().enumerate() {
        change.move_node(node, &problem_key, index)?;
    }

    tracing::debug!(parent = %lca, blocks = selected.len(), "wrapped selection in exercise");
    Ok(lca)
}

/// Exercise around the selection start
fn selected_exercise(change: &Change<'_>) -> Option<Key> {
    let tree = change.tree();
    let point = change.selection()?.start(tree);
    tree.closest(&point.key, |tree, key| tree.node_type(key) == Some("exercise"))
}

fn ends_with_commentary(change: &Change<'_>, exercise: &Key) -> bool {
    let tree = change.tree();
    tree.children(exercise)
        .last()
        .is_some_and(|last| tree.node_type(last) == Some("exercise_commentary"))
}

/// Insert an exercise part holding an empty paragraph and put the cursor
/// into it
fn insert_part(change: &mut Change<'_>, exercise: &Key, index: usize, ty: &str) -> Result<(), EditorError> {
    let text = Text::empty();
    let cursor = Point::new(text.key.clone(), 0);
    let part = Element::new(ty).with_child(Element::new("paragraph").with_child(text));

    change.insert_node(exercise, index, part)?;
    change.select(Selection::collapsed(cursor));
    Ok(())
}

/// Append an empty solution to the selected exercise, before its
/// commentary if it has one
pub fn insert_solution(change: &mut Change<'_>) -> Result<bool, EditorError> {
    let Some(exercise) = selected_exercise(change) else {
        return Ok(false);
    };
    let len = change.tree().children(&exercise).len();
    let index = if ends_with_commentary(change, &exercise) {
        len - 1
    } else {
        len
    };

    insert_part(change, &exercise, index, "exercise_solution")?;
    Ok(true)
}

/// Append an empty commentary to the selected exercise unless it already
/// has one
pub fn insert_commentary(change: &mut Change<'_>) -> Result<bool, EditorError> {
    let Some(exercise) = selected_exercise(change) else {
        return Ok(false);
    };
    if ends_with_commentary(change, &exercise) {
        return Ok(false);
    }
    let len = change.tree().children(&exercise).len();

    insert_part(change, &exercise, len, "exercise_commentary")?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;
    use crate::EditorConfig;
    use cnx_model::Tree;

    fn paragraph(id: &str) -> Element {
        Element::new("paragraph")
            .with_key(Key::from_id(id))
            .with_child(Text::new(id).with_key(Key::from_id(format!("{}.t", id))))
    }

    fn cursor_in(id: &str) -> Option<Selection> {
        Some(Selection::collapsed(Point::new(Key::from_id(format!("{}.t", id)), 0)))
    }

    #[test]
    fn test_paragraph_in_list_is_lifted_into_section() {
        let mut tree = Tree::from_nodes(vec![Element::new("section")
            .with_child(
                Element::new("ul_list")
                    .with_child(Element::new("list_item").with_child(paragraph("a")))
                    .with_child(Element::new("list_item").with_child(paragraph("b")))
                    .with_child(Element::new("list_item").with_child(paragraph("c"))),
            )
            .into()])
        .unwrap();
        let schema = Schema::cnx();
        let config = EditorConfig::default();
        let mut selection = cursor_in("b");
        let mut change = Change::new(&mut tree, &schema, &mut selection, &config);

        assert!(insert_exercise(&mut change).unwrap());

        assert_eq!(
            tree.outline(tree.root()),
            r#"section(ul_list(list_item(paragraph("a"))), exercise(exercise_problem(paragraph("b"))), ul_list(list_item(paragraph("c"))))"#
        );
    }

    #[test]
    fn test_solution_goes_before_commentary() {
        let mut tree = Tree::from_nodes(vec![Element::new("exercise")
            .with_child(Element::new("exercise_problem").with_child(paragraph("q")))
            .with_child(Element::new("exercise_commentary").with_child(paragraph("c")))
            .into()])
        .unwrap();
        let schema = Schema::cnx();
        let config = EditorConfig::default();
        let mut selection = cursor_in("q");
        let mut change = Change::new(&mut tree, &schema, &mut selection, &config);

        assert!(insert_solution(&mut change).unwrap());
        assert!(!insert_commentary(&mut change).unwrap());

        let cursor = change.selection().cloned().unwrap();
        assert!(cursor.is_collapsed());
        assert_eq!(
            change.tree().outline(change.tree().root()),
            r#"exercise(exercise_problem(paragraph("q")), exercise_solution(paragraph("")), exercise_commentary(paragraph("c")))"#
        );
        let solution = change.tree().children(change.tree().root())[0].clone();
        let solution = change.tree().children(&solution)[1].clone();
        assert!(change.tree().is_ancestor(&solution, &cursor.anchor.key));
    }

    #[test]
    fn test_no_exercise_selected_is_a_no_op() {
        let mut tree = Tree::from_nodes(vec![paragraph("p").into()]).unwrap();
        let schema = Schema::cnx();
        let config = EditorConfig::default();
        let mut selection = cursor_in("p");
        let mut change = Change::new(&mut tree, &schema, &mut selection, &config);

        assert!(!insert_solution(&mut change).unwrap());
        assert!(!insert_commentary(&mut change).unwrap());
        assert!(change.operations().is_empty());
    }

    #[test]
    fn test_without_selection_nothing_is_wrapped() {
        let mut tree = Tree::from_nodes(vec![paragraph("p").into()]).unwrap();
        let schema = Schema::cnx();
        let config = EditorConfig::default();
        let mut selection = None;
        let mut change = Change::new(&mut tree, &schema, &mut selection, &config);

        assert!(!insert_exercise(&mut change).unwrap());
        assert!(change.operations().is_empty());
    }
}
