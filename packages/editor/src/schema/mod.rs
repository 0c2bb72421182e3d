//! # Schema Registry
//!
//! Per-type structural rules. A [`Rule`] constrains an element's parent,
//! the order and cardinality of its children, the marks allowed on its text
//! and its data. [`Schema::check`] reports the first rule broken by a node
//! as a [`Violation`]; the rule's handler is then responsible for repairing
//! it.
//!
//! Checks run in a fixed order: parent, children, data, marks.

mod admonition;
mod exercise;
mod figure;
mod heading;

pub use admonition::{ADMONITION, ADMONITION_TYPES};
pub use exercise::{is_exercise_content, is_exercise_parent, COMMENTARY, EXERCISE, EXERCISE_PARENT, PROBLEM, SOLUTION};
pub use figure::{FIGURE, FIGURE_PARENT, MEDIA, MEDIA_OBJECTS};
pub use heading::HEADING;

use crate::{Change, EditorError};
use cnx_model::{DataValue, Key, Tree};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Shape a node can be matched against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Match {
    /// The document root
    Document,
    /// An element of the given type
    Type(&'static str),
}

impl Match {
    pub fn matches(&self, tree: &Tree, key: &Key) -> bool {
        match self {
            Match::Document => tree.is_document(key),
            Match::Type(ty) => tree.node_type(key) == Some(*ty),
        }
    }

    pub fn any(matches: &[Match], tree: &Tree, key: &Key) -> bool {
        matches.iter().any(|m| m.matches(tree, key))
    }
}

/// A run of consecutive children matching any of `matches`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildGroup {
    pub matches: &'static [Match],
    pub min: usize,
    pub max: usize,
}

impl ChildGroup {
    pub const fn new(matches: &'static [Match], min: usize, max: usize) -> Self {
        Self { matches, min, max }
    }

    pub fn matches(&self, tree: &Tree, key: &Key) -> bool {
        Match::any(self.matches, tree, key)
    }
}

pub type DataValidator = fn(Option<&DataValue>) -> bool;

pub type Handler = fn(&mut Change<'_>, &Violation) -> Result<(), EditorError>;

#[derive(Clone, Copy)]
pub struct Rule {
    pub ty: &'static str,
    /// Allowed parents, `None` allows any
    pub parent: Option<&'static [Match]>,
    /// Child groups in order, `None` allows any children
    pub children: Option<&'static [ChildGroup]>,
    /// Marks allowed on direct text children, `None` allows any
    pub marks: Option<&'static [&'static str]>,
    pub data: &'static [(&'static str, DataValidator)],
    pub normalize: Handler,
}

/// A detected schema non-conformance
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum Violation {
    /// The node's parent fails the parent constraint
    ParentInvalid { node: Key, parent: Key },

    /// A child at `index` is not what the current group requires
    ChildTypeInvalid { node: Key, index: usize, child: Key },

    /// A child at `index` follows the last group
    ChildUnknown { node: Key, index: usize, child: Key },

    /// A group's minimum is unmet, `index` is where the child is missing
    ChildRequired { node: Key, index: usize },

    /// Data entry `key` fails its validator
    NodeDataInvalid { node: Key, key: String },

    /// Text child `text` carries `mark`, which the node does not allow
    MarkInvalid { node: Key, text: Key, mark: String },
}

impl Violation {
    /// The node the violation was found on
    pub fn node(&self) -> &Key {
        match self {
            Violation::ParentInvalid { node, .. }
            | Violation::ChildTypeInvalid { node, .. }
            | Violation::ChildUnknown { node, .. }
            | Violation::ChildRequired { node, .. }
            | Violation::NodeDataInvalid { node, .. }
            | Violation::MarkInvalid { node, .. } => node,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Violation::ParentInvalid { .. } => "parent_invalid",
            Violation::ChildTypeInvalid { .. } => "child_type_invalid",
            Violation::ChildUnknown { .. } => "child_unknown",
            Violation::ChildRequired { .. } => "child_required",
            Violation::NodeDataInvalid { .. } => "node_data_invalid",
            Violation::MarkInvalid { .. } => "mark_invalid",
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::ParentInvalid { node, parent } => {
                write!(f, "{}: not allowed inside {}", node, parent)
            }
            Violation::ChildTypeInvalid { node, index, child } => {
                write!(f, "{}: child {} at {} has the wrong type", node, child, index)
            }
            Violation::ChildUnknown { node, index, child } => {
                write!(f, "{}: unexpected child {} at {}", node, child, index)
            }
            Violation::ChildRequired { node, index } => {
                write!(f, "{}: missing required child at {}", node, index)
            }
            Violation::NodeDataInvalid { node, key } => {
                write!(f, "{}: invalid data `{}`", node, key)
            }
            Violation::MarkInvalid { node, text, mark } => {
                write!(f, "{}: mark `{}` not allowed on {}", node, mark, text)
            }
        }
    }
}

/// Rule table, keyed by element type
#[derive(Clone, Default)]
pub struct Schema {
    rules: BTreeMap<&'static str, Rule>,
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("rules", &self.rules.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Schema {
    /// Schema without any rules
    pub fn empty() -> Self {
        Self::default()
    }

    /// Rules for CNXML content
    pub fn cnx() -> Self {
        Self::empty()
            .with_rule(EXERCISE)
            .with_rule(PROBLEM)
            .with_rule(SOLUTION)
            .with_rule(COMMENTARY)
            .with_rule(FIGURE)
            .with_rule(MEDIA)
            .with_rule(HEADING)
            .with_rule(ADMONITION)
    }

    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.insert(rule.ty, rule);
        self
    }

    pub fn rule(&self, ty: &str) -> Option<&Rule> {
        self.rules.get(ty)
    }

    pub fn rule_for(&self, tree: &Tree, key: &Key) -> Option<&Rule> {
        self.rule(tree.node_type(key)?)
    }

    pub fn types(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.keys().copied()
    }

    /// First violation of `key`, if any
    pub fn check(&self, tree: &Tree, key: &Key) -> Option<Violation> {
        let rule = self.rule_for(tree, key)?;
        check_parent(rule, tree, key)
            .or_else(|| check_children(rule, tree, key))
            .or_else(|| check_data(rule, tree, key))
            .or_else(|| check_marks(rule, tree, key))
    }

    /// First violation of every node, in document order
    pub fn validate(&self, tree: &Tree) -> Vec<Violation> {
        tree.descendants(tree.root())
            .iter()
            .filter_map(|key| self.check(tree, key))
            .collect()
    }
}

fn check_parent(rule: &Rule, tree: &Tree, key: &Key) -> Option<Violation> {
    let allowed = rule.parent?;
    let parent = tree.parent(key)?;
    if Match::any(allowed, tree, parent) {
        return None;
    }
    Some(Violation::ParentInvalid {
        node: key.clone(),
        parent: parent.clone(),
    })
}

/// Greedy group matcher. A group is left as soon as its `max` is reached,
/// or when a child does not match it and its `min` is already satisfied.
fn check_children(rule: &Rule, tree: &Tree, key: &Key) -> Option<Violation> {
    let groups = rule.children?;
    let children = tree.children(key);
    let mut current = 0;
    let mut count = 0;

    for (index, child) in children.iter().enumerate() {
        loop {
            let Some(group) = groups.get(current) else {
                return Some(Violation::ChildUnknown {
                    node: key.clone(),
                    index,
                    child: child.clone(),
                });
            };

            if group.matches(tree, child) {
                count += 1;
                if count >= group.max {
                    current += 1;
                    count = 0;
                }
                break;
            }

            if count >= group.min && current + 1 < groups.len() {
                current += 1;
                count = 0;
                continue;
            }

            return Some(Violation::ChildTypeInvalid {
                node: key.clone(),
                index,
                child: child.clone(),
            });
        }
    }

    let unmet = groups
        .get(current)
        .is_some_and(|group| count < group.min)
        || groups.iter().skip(current + 1).any(|group| group.min > 0);
    if unmet {
        return Some(Violation::ChildRequired {
            node: key.clone(),
            index: children.len(),
        });
    }
    None
}

fn check_data(rule: &Rule, tree: &Tree, key: &Key) -> Option<Violation> {
    let element = tree.element(key)?;
    rule.data
        .iter()
        .find(|(name, validate)| !validate(element.data.get(*name)))
        .map(|(name, _)| Violation::NodeDataInvalid {
            node: key.clone(),
            key: name.to_string(),
        })
}

fn check_marks(rule: &Rule, tree: &Tree, key: &Key) -> Option<Violation> {
    let allowed = rule.marks?;
    for child in tree.children(key) {
        let Some(text) = tree.text(child) else {
            continue;
        };
        if let Some(mark) = text.marks.iter().find(|m| !allowed.contains(&m.ty.as_str())) {
            return Some(Violation::MarkInvalid {
                node: key.clone(),
                text: child.clone(),
                mark: mark.ty.clone(),
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use cnx_model::{Element, Node, Text};

    fn ok(_: &mut Change<'_>, _: &Violation) -> Result<(), EditorError> {
        Ok(())
    }

    const GROUPS: &[ChildGroup] = &[
        ChildGroup::new(&[Match::Type("a")], 1, 1),
        ChildGroup::new(&[Match::Type("b")], 0, usize::MAX),
        ChildGroup::new(&[Match::Type("c")], 0, 1),
    ];

    const PARENT: Rule = Rule {
        ty: "parent",
        parent: Some(&[Match::Document]),
        children: Some(GROUPS),
        marks: None,
        data: &[],
        normalize: ok,
    };

    fn parent(children: &[&str]) -> (Tree, Key) {
        let key = Key::generate();
        let children: Vec<Node> = children
            .iter()
            .map(|ty| Element::new(*ty).into())
            .collect();
        let tree = Tree::from_nodes(vec![Element::new("parent")
            .with_key(key.clone())
            .with_children(children)
            .into()])
        .unwrap();
        (tree, key)
    }

    fn code(children: &[&str]) -> Option<(&'static str, usize)> {
        let (tree, key) = parent(children);
        let schema = Schema::empty().with_rule(PARENT);
        schema.check(&tree, &key).map(|violation| {
            let index = match &violation {
                Violation::ChildTypeInvalid { index, .. }
                | Violation::ChildUnknown { index, .. }
                | Violation::ChildRequired { index, .. } => *index,
                _ => usize::MAX,
            };
            (violation.code(), index)
        })
    }

    #[test]
    fn test_valid_sequences() {
        assert_eq!(code(&["a"]), None);
        assert_eq!(code(&["a", "b", "b", "c"]), None);
        assert_eq!(code(&["a", "c"]), None);
    }

    #[test]
    fn test_child_violations() {
        assert_eq!(code(&["b"]), Some(("child_type_invalid", 0)));
        assert_eq!(code(&["a", "x"]), Some(("child_type_invalid", 1)));
        assert_eq!(code(&["a", "c", "x"]), Some(("child_unknown", 2)));
        assert_eq!(code(&["a", "c", "b"]), Some(("child_unknown", 2)));
        assert_eq!(code(&[]), Some(("child_required", 0)));
    }

    #[test]
    fn test_parent_checked_first() {
        let tree = Tree::from_nodes(vec![Element::new("section")
            .with_child(Element::new("parent").with_key(Key::from_id("p")))
            .into()])
        .unwrap();
        let schema = Schema::empty().with_rule(PARENT);

        assert!(matches!(
            schema.check(&tree, &Key::from_id("p")),
            Some(Violation::ParentInvalid { .. })
        ));
    }

    #[test]
    fn test_marks_checked_on_direct_text_children() {
        let tree = Tree::from_nodes(vec![Element::new("heading")
            .with_key(Key::from_id("h"))
            .with_data("depth", 1.0)
            .with_child(Text::new("x").with_mark(cnx_model::Mark::new("strong")))
            .with_child(Text::new("y").with_key(Key::from_id("y")).with_mark(cnx_model::Mark::new("code")))
            .into()])
        .unwrap();

        assert_eq!(
            Schema::cnx().check(&tree, &Key::from_id("h")),
            Some(Violation::MarkInvalid {
                node: Key::from_id("h"),
                text: Key::from_id("y"),
                mark: "code".to_string(),
            })
        );
    }

    #[test]
    fn test_violation_json() {
        let violation = Violation::NodeDataInvalid {
            node: Key::from_id("h"),
            key: "depth".to_string(),
        };
        let json = serde_json::to_value(&violation).unwrap();

        assert_eq!(json["code"], "node_data_invalid");
        assert_eq!(json["node"], "h");
    }
}
