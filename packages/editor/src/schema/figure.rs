//! Figures: an optional title, media or subfigures, an optional caption.

use super::{ChildGroup, Match, Rule, Violation};
use crate::ordered::{normalize_ordered_children, MatchNode};
use crate::{Change, EditorError};
use cnx_model::{DataValue, Key, Tree};

/// Where the figure command places new figures
pub const FIGURE_PARENT: &[Match] = &[Match::Document, Match::Type("section")];

/// Element types a media element may show
pub const MEDIA_OBJECTS: &[Match] = &[Match::Type("image"), Match::Type("video"), Match::Type("audio")];

const FIGURE_CONTENT: &[Match] = &[Match::Type("media"), Match::Type("figure")];

const FIGURE_PARTS: &[ChildGroup] = &[
    ChildGroup::new(&[Match::Type("title")], 0, 1),
    ChildGroup::new(FIGURE_CONTENT, 1, usize::MAX),
    ChildGroup::new(&[Match::Type("figure_caption")], 0, 1),
];

pub const FIGURE: Rule = Rule {
    ty: "figure",
    parent: None,
    children: Some(FIGURE_PARTS),
    marks: None,
    data: &[],
    normalize: normalize_figure,
};

pub const MEDIA: Rule = Rule {
    ty: "media",
    parent: None,
    children: Some(&[ChildGroup::new(MEDIA_OBJECTS, 1, usize::MAX)]),
    marks: None,
    data: &[("alt", is_text)],
    normalize: normalize_media,
};

fn is_text(value: Option<&DataValue>) -> bool {
    value.and_then(DataValue::as_str).is_some()
}

fn is_title(tree: &Tree, key: &Key) -> bool {
    tree.node_type(key) == Some("title")
}

fn is_figure_content(tree: &Tree, key: &Key) -> bool {
    Match::any(FIGURE_CONTENT, tree, key)
}

fn is_caption(tree: &Tree, key: &Key) -> bool {
    tree.node_type(key) == Some("figure_caption")
}

const FIGURE_GROUPS: &[MatchNode] = &[is_title, is_figure_content, is_caption];

fn normalize_figure(change: &mut Change<'_>, violation: &Violation) -> Result<(), EditorError> {
    match violation {
        Violation::ChildTypeInvalid { child, .. } | Violation::ChildUnknown { child, .. }
            if change.tree().text(child).is_some() =>
        {
            change.remove_node(child)
        }

        Violation::ChildTypeInvalid { node, .. } | Violation::ChildUnknown { node, .. } => {
            if normalize_ordered_children(change, node, FIGURE_GROUPS, move_after_figure)? {
                return Ok(());
            }
            let tree = change.tree();
            if !tree.children(node).iter().any(|child| is_figure_content(tree, child)) {
                return change.remove_node(node);
            }
            tracing::warn!(%violation, "unhandled figure violation");
            Ok(())
        }

        // Nothing left to show
        Violation::ChildRequired { node, .. } => change.remove_node(node),

        Violation::ParentInvalid { .. } | Violation::NodeDataInvalid { .. } | Violation::MarkInvalid { .. } => {
            tracing::warn!(%violation, "unhandled figure violation");
            Ok(())
        }
    }
}

/// Blocks which have no place in a figure follow it instead
fn move_after_figure(change: &mut Change<'_>, child: &Key, figure: &Key) -> Result<(), EditorError> {
    let (parent, index) = change.locate(figure)?;
    change.move_node(child, &parent, index + 1)
}

fn normalize_media(change: &mut Change<'_>, violation: &Violation) -> Result<(), EditorError> {
    match violation {
        Violation::NodeDataInvalid { node, key } if key == "alt" => {
            change.set_data(node, "alt", Some(DataValue::from("")))
        }

        Violation::ChildTypeInvalid { child, .. } | Violation::ChildUnknown { child, .. }
            if change.tree().text(child).is_some() =>
        {
            change.remove_node(child)
        }

        Violation::ChildRequired { node, .. } => change.remove_node(node),

        Violation::ChildTypeInvalid { .. }
        | Violation::ChildUnknown { .. }
        | Violation::ParentInvalid { .. }
        | Violation::NodeDataInvalid { .. }
        | Violation::MarkInvalid { .. } => {
            tracing::warn!(%violation, "unhandled media violation");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;
    use crate::EditorConfig;
    use cnx_model::{Element, Node, Text};

    fn image(src: &str) -> Node {
        Element::new("media")
            .with_data("alt", src)
            .with_child(Element::new("image").with_data("src", src).void())
            .into()
    }

    fn normalized(nodes: Vec<Node>) -> String {
        let mut tree = Tree::from_nodes(nodes).unwrap();
        let schema = Schema::cnx();
        let config = EditorConfig::default();
        let mut selection = None;
        let mut change = Change::new(&mut tree, &schema, &mut selection, &config);
        let report = change.normalize_document().unwrap();
        assert!(report.unresolved.is_empty(), "{:?}", report.unresolved);
        tree.outline(tree.root())
    }

    #[test]
    fn test_caption_is_moved_behind_media() {
        let caption = Element::new("figure_caption").with_child(Text::new("Cat"));

        assert_eq!(
            normalized(vec![Element::new("figure")
                .with_child(caption)
                .with_child(image("cat.png"))
                .into()]),
            r#"figure(media[alt=cat.png](image[src=cat.png]), figure_caption("Cat"))"#
        );
    }

    #[test]
    fn test_paragraph_in_figure_moves_after_it() {
        let paragraph = Element::new("paragraph").with_child(Text::new("loose"));

        assert_eq!(
            normalized(vec![Element::new("section")
                .with_child(Element::new("figure").with_child(image("a.png")).with_child(paragraph))
                .into()]),
            r#"section(figure(media[alt=a.png](image[src=a.png])), paragraph("loose"))"#
        );
    }

    #[test]
    fn test_media_without_alt_gets_an_empty_one() {
        let media = Element::new("media").with_child(Element::new("video").with_data("src", "v.mp4").void());

        assert_eq!(
            normalized(vec![Element::new("figure").with_child(media).into()]),
            r#"figure(media[alt=](video[src=v.mp4]))"#
        );
    }

    #[test]
    fn test_empty_media_and_figure_are_removed() {
        let figure = Element::new("figure")
            .with_child(Element::new("title").with_child(Text::new("T")))
            .with_child(Element::new("media").with_data("alt", "x"));

        assert_eq!(
            normalized(vec![
                figure.into(),
                Element::new("paragraph").with_child(Text::new("p")).into(),
            ]),
            r#"paragraph("p")"#
        );
    }
}
