//! Exercises: a problem, any number of solutions, an optional commentary.

use super::{ChildGroup, Match, Rule, Violation};
use crate::ordered::{normalize_ordered_children, MatchNode};
use crate::{Change, EditorError};
use cnx_model::{Element, ElementData, Key, Text, Tree};

/// Where an exercise may be placed
pub const EXERCISE_PARENT: &[Match] = &[Match::Document, Match::Type("section")];

const CONTENT: &[ChildGroup] = &[ChildGroup::new(
    &[Match::Type("paragraph"), Match::Type("ul_list"), Match::Type("ol_list")],
    1,
    usize::MAX,
)];

/// One problem, any number of solutions, at most one commentary
const PARTS: &[ChildGroup] = &[
    ChildGroup::new(&[Match::Type("exercise_problem")], 1, 1),
    ChildGroup::new(&[Match::Type("exercise_solution")], 0, usize::MAX),
    ChildGroup::new(&[Match::Type("exercise_commentary")], 0, 1),
];

pub const EXERCISE: Rule = Rule {
    ty: "exercise",
    parent: Some(EXERCISE_PARENT),
    children: Some(PARTS),
    marks: None,
    data: &[],
    normalize: normalize_exercise,
};

pub const PROBLEM: Rule = content_rule("exercise_problem");
pub const SOLUTION: Rule = content_rule("exercise_solution");
pub const COMMENTARY: Rule = content_rule("exercise_commentary");

const INSIDE_EXERCISE: &[Match] = &[Match::Type("exercise")];

const fn content_rule(ty: &'static str) -> Rule {
    Rule {
        ty,
        parent: Some(INSIDE_EXERCISE),
        children: Some(CONTENT),
        marks: None,
        data: &[],
        normalize: normalize_content,
    }
}

pub fn is_exercise_parent(tree: &Tree, key: &Key) -> bool {
    Match::any(EXERCISE_PARENT, tree, key)
}

/// Whether `key` may be a child of a problem, solution or commentary
pub fn is_exercise_content(tree: &Tree, key: &Key) -> bool {
    CONTENT.iter().any(|group| group.matches(tree, key))
}

fn is_problem(tree: &Tree, key: &Key) -> bool {
    tree.node_type(key) == Some("exercise_problem")
}

fn is_solution(tree: &Tree, key: &Key) -> bool {
    tree.node_type(key) == Some("exercise_solution")
}

fn is_commentary(tree: &Tree, key: &Key) -> bool {
    tree.node_type(key) == Some("exercise_commentary")
}

const EXERCISE_GROUPS: &[MatchNode] = &[is_problem, is_solution, is_commentary];

/// Empty paragraph, as placed in freshly created exercise parts
pub fn empty_paragraph() -> Element {
    Element::new("paragraph").with_child(Text::empty())
}

fn normalize_exercise(change: &mut Change<'_>, violation: &Violation) -> Result<(), EditorError> {
    match violation {
        Violation::ChildTypeInvalid { node, child, .. } | Violation::ChildUnknown { node, child, .. }
            if change.tree().text(child).is_some() =>
        {
            // Text only ends up directly in an exercise once everything else
            // was deleted, nothing worth keeping is left
            change.remove_node(node)
        }

        Violation::ChildTypeInvalid { node, index: 0, .. } => {
            let problem = Element::new("exercise_problem").with_child(empty_paragraph());
            change.insert_node(node, 0, problem).map(|_| ())
        }

        Violation::ChildTypeInvalid { node, child, .. } | Violation::ChildUnknown { node, child, .. } => {
            // A solution after the commentary is moved back in front of it
            // rather than folded into the commentary, so it stays a solution
            if normalize_ordered_children(change, node, EXERCISE_GROUPS, fold_into_exercise)? {
                return Ok(());
            }
            // In order, but still invalid (a second problem or commentary)
            fold_into_exercise(change, child, node)
        }

        Violation::ChildRequired { node, .. } => change.remove_node(node),

        Violation::ParentInvalid { node, .. } => change.unwrap_node(node),

        Violation::NodeDataInvalid { .. } | Violation::MarkInvalid { .. } => {
            tracing::warn!(%violation, "unhandled exercise violation");
            Ok(())
        }
    }
}

/// Put a stray exercise child where it can live: into a commentary it
/// follows, otherwise into a new solution
fn fold_into_exercise(change: &mut Change<'_>, child: &Key, _exercise: &Key) -> Result<(), EditorError> {
    let tree = change.tree();
    let previous = tree.previous_sibling(child, |_, _| true);

    match previous {
        Some(commentary) if is_commentary(tree, &commentary) => {
            let end = tree.children(&commentary).len();
            change.move_node(child, &commentary, end)
        }
        _ => change
            .wrap_node(child, ElementData::new("exercise_solution"))
            .map(|_| ()),
    }
}

fn normalize_content(change: &mut Change<'_>, violation: &Violation) -> Result<(), EditorError> {
    match violation {
        // Problems, solutions and commentaries make no sense outside an
        // exercise, keep just their content
        Violation::ParentInvalid { node, .. } => change.unwrap_node(node),

        Violation::ChildRequired { node, index } => {
            change.insert_node(node, *index, empty_paragraph()).map(|_| ())
        }

        Violation::ChildTypeInvalid { child, .. } if change.tree().text(child).is_some() => change
            .wrap_node(child, ElementData::new("paragraph"))
            .map(|_| ()),

        Violation::ChildTypeInvalid { .. }
        | Violation::ChildUnknown { .. }
        | Violation::NodeDataInvalid { .. }
        | Violation::MarkInvalid { .. } => {
            tracing::warn!(%violation, "unhandled exercise content violation");
            Ok(())
        }
    }
}
