use crate::{Change, EditorError, Point, Selection};
use cnx_model::{Key, Tree};

/// Clear every mark inside the selection
///
/// Text leaves crossing a selection edge are split at the selection offset
/// so marks outside the selection survive. Afterwards the selection spans
/// exactly the cleared leaves.
pub fn remove_marks(change: &mut Change<'_>) -> Result<bool, EditorError> {
    let Some(selection) = change.selection() else {
        return Ok(false);
    };
    if selection.is_collapsed() {
        return Ok(false);
    }
    let tree = change.tree();
    let start = selection.start(tree).clone();
    let end = selection.end(tree).clone();

    let marked = leaves_between(tree, &start.key, &end.key)
        .iter()
        .any(|leaf| tree.text(leaf).is_some_and(|text| !text.marks.is_empty()));
    if !marked {
        return Ok(false);
    }

    let (first, last) = {
        let mut change = change.without_normalizing();

        // The end first, so the start offset stays valid for a shared leaf
        let end_len = text_len(change.tree(), &end.key);
        if end.offset < end_len {
            change.split_node(&end.key, end.offset)?;
        }
        let first = if start.offset > 0 {
            change.split_node(&start.key, start.offset)?
        } else {
            start.key.clone()
        };
        let last = if start.key == end.key {
            first.clone()
        } else {
            end.key.clone()
        };

        for leaf in leaves_between(change.tree(), &first, &last) {
            let marked = change
                .tree()
                .text(&leaf)
                .is_some_and(|text| !text.marks.is_empty());
            if marked {
                change.set_marks(&leaf, Vec::new())?;
            }
        }
        (first, last)
    };

    let focus = Point::new(last.clone(), text_len(change.tree(), &last));
    change.select(Selection::new(Point::new(first.clone(), 0), focus));

    if change.is_normalizing() {
        let tree = change.tree();
        let scope = tree
            .common_ancestor(&first, &last)
            .unwrap_or_else(|| tree.root().clone());
        change.normalize_node(&scope)?;
    }
    Ok(true)
}

fn text_len(tree: &Tree, key: &Key) -> usize {
    tree.text(key).map_or(0, |text| text.value.chars().count())
}

/// Text leaves from `first` to `last`, both included, in document order
fn leaves_between(tree: &Tree, first: &Key, last: &Key) -> Vec<Key> {
    let leaves: Vec<Key> = tree
        .descendants(tree.root())
        .into_iter()
        .filter(|key| tree.text(key).is_some())
        .collect();
    let Some(from) = leaves.iter().position(|key| key == first) else {
        return Vec::new();
    };
    let Some(to) = leaves.iter().position(|key| key == last) else {
        return Vec::new();
    };
    leaves.get(from..=to).map(<[Key]>::to_vec).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;
    use crate::EditorConfig;
    use cnx_model::{Element, Mark, Text};

    fn tree() -> Tree {
        Tree::from_nodes(vec![
            Element::new("paragraph")
                .with_child(Text::new("bold text").with_key(Key::from_id("t1")).with_mark(Mark::new("strong")))
                .into(),
            Element::new("paragraph")
                .with_child(Text::new("more").with_key(Key::from_id("t2")).with_mark(Mark::new("emphasis")))
                .into(),
        ])
        .unwrap()
    }

    #[test]
    fn test_partial_leaf_keeps_marks_outside_selection() {
        let mut tree = tree();
        let schema = Schema::cnx();
        let config = EditorConfig::default();
        let mut selection = Some(Selection::new(
            Point::new(Key::from_id("t1"), 5),
            Point::new(Key::from_id("t1"), 7),
        ));
        let mut change = Change::new(&mut tree, &schema, &mut selection, &config);

        assert!(remove_marks(&mut change).unwrap());

        let selected = change.selection().cloned().unwrap();
        assert_eq!(selected.focus.offset, 2);
        assert_eq!(change.tree().text(&selected.anchor.key).unwrap().value, "te");
        assert_eq!(
            change.tree().outline(change.tree().root()),
            r#"paragraph("bold "{strong}, "te", "xt"{strong}), paragraph("more"{emphasis})"#
        );
    }

    #[test]
    fn test_range_across_blocks() {
        let mut tree = tree();
        let schema = Schema::cnx();
        let config = EditorConfig::default();
        let mut selection = Some(Selection::new(
            Point::new(Key::from_id("t2"), 2),
            Point::new(Key::from_id("t1"), 0),
        ));
        let mut change = Change::new(&mut tree, &schema, &mut selection, &config);

        assert!(remove_marks(&mut change).unwrap());

        assert_eq!(
            tree.outline(tree.root()),
            r#"paragraph("bold text"), paragraph("mo", "re"{emphasis})"#
        );
    }

    #[test]
    fn test_unmarked_or_collapsed_selection_is_a_no_op() {
        let mut tree = Tree::from_nodes(vec![Element::new("paragraph")
            .with_child(Text::new("plain").with_key(Key::from_id("t")))
            .into()])
        .unwrap();
        let schema = Schema::cnx();
        let config = EditorConfig::default();
        let mut selection = Some(Selection::new(
            Point::new(Key::from_id("t"), 0),
            Point::new(Key::from_id("t"), 5),
        ));
        let mut change = Change::new(&mut tree, &schema, &mut selection, &config);

        assert!(!remove_marks(&mut change).unwrap());

        change.select(Selection::collapsed(Point::new(Key::from_id("t"), 2)));
        assert!(!remove_marks(&mut change).unwrap());
        assert!(change.operations().is_empty());
    }
}
