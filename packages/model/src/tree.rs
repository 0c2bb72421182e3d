//! # Document Tree
//!
//! Arena of nodes addressed by [`Key`]. Keys are the only references that
//! survive an edit; paths are recomputed on demand because inserting or
//! removing a sibling shifts indices.
//!
//! ## Primitive operations
//!
//! - `insert` / `remove`: attach or detach a whole subtree
//! - `move_node`: relocate a node, keeping its key
//! - `wrap` / `unwrap`: introduce or dissolve a container around children
//! - `split`: cut a node in two, the second half gets a new key
//! - `set_data` / `set_marks` / `set_text`: change node payloads
//!
//! Every operation validates before touching the arena, so an `Err` means
//! nothing changed.

use crate::error::{TreeError, TreeResult};
use crate::key::Key;
use crate::node::{Data, DataValue, Element, Mark, Node, Text};
use std::collections::{HashMap, HashSet};
use std::ops::Range;

/// What a node is
#[derive(Debug, Clone, PartialEq)]
pub enum Kind {
    Document,
    Element(ElementData),
    Text(TextData),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElementData {
    pub ty: String,
    pub data: Data,
    pub is_void: bool,
}

impl ElementData {
    pub fn new(ty: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            data: Data::new(),
            is_void: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextData {
    pub value: String,
    pub marks: Vec<Mark>,
}

#[derive(Debug, Clone)]
struct Entry {
    kind: Kind,
    parent: Option<Key>,
    children: Vec<Key>,
}

/// Editable document tree
#[derive(Debug, Clone)]
pub struct Tree {
    root: Key,
    entries: HashMap<Key, Entry>,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// Create an empty document
    pub fn new() -> Self {
        let root = Key::generate();
        let mut entries = HashMap::new();
        entries.insert(
            root.clone(),
            Entry {
                kind: Kind::Document,
                parent: None,
                children: Vec::new(),
            },
        );

        Self { root, entries }
    }

    /// Create a document holding `nodes` as top-level blocks
    pub fn from_nodes(nodes: Vec<Node>) -> TreeResult<Self> {
        let mut tree = Self::new();
        let root = tree.root.clone();
        for (index, node) in nodes.into_iter().enumerate() {
            tree.insert(&root, index, node)?;
        }
        Ok(tree)
    }

    pub fn root(&self) -> &Key {
        &self.root
    }

    /// Number of nodes, including the document root
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children(&self.root).is_empty()
    }

    pub fn contains(&self, key: &Key) -> bool {
        self.entries.contains_key(key)
    }

    pub fn kind(&self, key: &Key) -> Option<&Kind> {
        self.entries.get(key).map(|entry| &entry.kind)
    }

    pub fn is_document(&self, key: &Key) -> bool {
        matches!(self.kind(key), Some(Kind::Document))
    }

    pub fn element(&self, key: &Key) -> Option<&ElementData> {
        match self.kind(key)? {
            Kind::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn text(&self, key: &Key) -> Option<&TextData> {
        match self.kind(key)? {
            Kind::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Element type, `None` for text leaves and the document
    pub fn node_type(&self, key: &Key) -> Option<&str> {
        self.element(key).map(|element| element.ty.as_str())
    }

    pub fn parent(&self, key: &Key) -> Option<&Key> {
        self.entries.get(key)?.parent.as_ref()
    }

    /// Ordered child keys (empty for leaves and unknown keys)
    pub fn children(&self, key: &Key) -> &[Key] {
        self.entries
            .get(key)
            .map(|entry| entry.children.as_slice())
            .unwrap_or(&[])
    }

    /// Position of `key` among its siblings
    pub fn index_of(&self, key: &Key) -> Option<usize> {
        let parent = self.parent(key)?;
        self.children(parent).iter().position(|k| k == key)
    }

    /// Proper ancestors, nearest first
    pub fn ancestors(&self, key: &Key) -> Vec<Key> {
        let mut ancestors = Vec::new();
        let mut current = self.parent(key);
        while let Some(parent) = current {
            ancestors.push(parent.clone());
            current = self.parent(parent);
        }
        ancestors
    }

    /// Nearest proper ancestor satisfying `predicate`
    pub fn ancestor_matching(
        &self,
        key: &Key,
        predicate: impl Fn(&Tree, &Key) -> bool,
    ) -> Option<Key> {
        self.ancestors(key)
            .into_iter()
            .find(|ancestor| predicate(self, ancestor))
    }

    /// Like [`Tree::ancestor_matching`], but `key` itself is considered first
    pub fn closest(&self, key: &Key, predicate: impl Fn(&Tree, &Key) -> bool) -> Option<Key> {
        if !self.contains(key) {
            return None;
        }
        if predicate(self, key) {
            return Some(key.clone());
        }
        self.ancestor_matching(key, predicate)
    }

    /// Nearest preceding sibling satisfying `predicate`
    pub fn previous_sibling(
        &self,
        key: &Key,
        predicate: impl Fn(&Tree, &Key) -> bool,
    ) -> Option<Key> {
        let parent = self.parent(key)?;
        let index = self.index_of(key)?;
        self.children(parent)[..index]
            .iter()
            .rev()
            .find(|sibling| predicate(self, sibling))
            .cloned()
    }

    /// Whether `ancestor` is a proper ancestor of `key`
    pub fn is_ancestor(&self, ancestor: &Key, key: &Key) -> bool {
        let mut current = self.parent(key);
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.parent(parent);
        }
        false
    }

    /// Lowest node that is a proper ancestor of both `a` and `b`
    pub fn common_ancestor(&self, a: &Key, b: &Key) -> Option<Key> {
        if !self.contains(b) {
            return None;
        }
        self.ancestors(a)
            .into_iter()
            .find(|ancestor| self.is_ancestor(ancestor, b))
    }

    /// Child indices from the root down to `key`
    pub fn path(&self, key: &Key) -> Option<Vec<usize>> {
        if !self.contains(key) {
            return None;
        }
        let mut path = Vec::new();
        let mut current = key;
        while let Some(parent) = self.parent(current) {
            path.push(self.index_of(current)?);
            current = parent;
        }
        path.reverse();
        Some(path)
    }

    pub fn node_at(&self, path: &[usize]) -> Option<&Key> {
        let mut current = &self.root;
        for &index in path {
            current = self.children(current).get(index)?;
        }
        Some(current)
    }

    /// `key` and its descendants, children before parents
    pub fn post_order(&self, key: &Key) -> Vec<Key> {
        let mut out = Vec::new();
        if self.contains(key) {
            self.collect_post_order(key, &mut out);
        }
        out
    }

    fn collect_post_order(&self, key: &Key, out: &mut Vec<Key>) {
        for child in self.children(key) {
            self.collect_post_order(child, out);
        }
        out.push(key.clone());
    }

    /// Descendants of `key` in document order, excluding `key`
    pub fn descendants(&self, key: &Key) -> Vec<Key> {
        let mut out = Vec::new();
        let mut stack: Vec<&Key> = self.children(key).iter().rev().collect();
        while let Some(current) = stack.pop() {
            out.push(current.clone());
            stack.extend(self.children(current).iter().rev());
        }
        out
    }

    /// Concatenated value of all text leaves under `key`
    pub fn text_content(&self, key: &Key) -> String {
        if let Some(text) = self.text(key) {
            return text.value.clone();
        }
        self.descendants(key)
            .iter()
            .filter_map(|k| self.text(k))
            .map(|text| text.value.as_str())
            .collect()
    }

    /// Compact one-line rendering of the subtree at `key`, keys omitted
    ///
    /// `section(paragraph("Hi"{strong}), image[src=a.png])`
    pub fn outline(&self, key: &Key) -> String {
        let mut out = String::new();
        self.write_outline(key, &mut out);
        out
    }

    fn write_outline(&self, key: &Key, out: &mut String) {
        let write_children = |tree: &Tree, out: &mut String| {
            for (i, child) in tree.children(key).iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                tree.write_outline(child, out);
            }
        };

        match self.kind(key) {
            None => {}
            Some(Kind::Document) => write_children(self, out),
            Some(Kind::Text(text)) => {
                out.push_str(&format!("{:?}", text.value));
                if !text.marks.is_empty() {
                    let marks: Vec<&str> = text.marks.iter().map(|m| m.ty.as_str()).collect();
                    out.push_str(&format!("{{{}}}", marks.join(",")));
                }
            }
            Some(Kind::Element(element)) => {
                out.push_str(&element.ty);
                if !element.data.is_empty() {
                    let data: Vec<String> = element
                        .data
                        .iter()
                        .map(|(name, value)| match value {
                            DataValue::String(s) => format!("{}={}", name, s),
                            DataValue::Number(n) => format!("{}={}", name, n),
                            DataValue::Bool(b) => format!("{}={}", name, b),
                        })
                        .collect();
                    out.push_str(&format!("[{}]", data.join(",")));
                }
                if !element.is_void {
                    out.push('(');
                    write_children(self, out);
                    out.push(')');
                }
            }
        }
    }

    /// Copy the subtree at `key` out as a detached node
    pub fn export(&self, key: &Key) -> Option<Node> {
        let entry = self.entries.get(key)?;
        match &entry.kind {
            Kind::Document => None,
            Kind::Text(text) => Some(Node::Text(Text {
                key: key.clone(),
                value: text.value.clone(),
                marks: text.marks.clone(),
            })),
            Kind::Element(element) => Some(Node::Element(Element {
                key: key.clone(),
                ty: element.ty.clone(),
                data: element.data.clone(),
                is_void: element.is_void,
                children: self.export_children(key),
            })),
        }
    }

    pub fn export_children(&self, key: &Key) -> Vec<Node> {
        self.children(key)
            .iter()
            .filter_map(|child| self.export(child))
            .collect()
    }

    /// Attach `node` (and its subtree) under `parent` at `index`
    ///
    /// The index is clamped to the number of children.
    pub fn insert(&mut self, parent: &Key, index: usize, node: Node) -> TreeResult<Key> {
        self.ensure_container(parent)?;

        let mut seen = HashSet::new();
        let mut duplicate = None;
        node.for_each(&mut |n| {
            let key = n.key();
            if duplicate.is_none() && (self.entries.contains_key(key) || !seen.insert(key.clone())) {
                duplicate = Some(key.clone());
            }
        });
        if let Some(key) = duplicate {
            return Err(TreeError::DuplicateKey(key));
        }

        let key = self.attach(node, parent.clone());
        let siblings = &mut self.entry_mut(parent)?.children;
        let index = index.min(siblings.len());
        siblings.insert(index, key.clone());
        Ok(key)
    }

    /// Detach the subtree at `key` and return it
    pub fn remove(&mut self, key: &Key) -> TreeResult<Node> {
        self.detach(key)?;
        self.take(key)
            .ok_or_else(|| TreeError::NodeNotFound(key.clone()))
    }

    /// Move `key` under `new_parent` so that it ends up at `index`
    pub fn move_node(&mut self, key: &Key, new_parent: &Key, index: usize) -> TreeResult<()> {
        if !self.contains(key) {
            return Err(TreeError::NodeNotFound(key.clone()));
        }
        self.ensure_container(new_parent)?;
        if key == new_parent || self.is_ancestor(key, new_parent) {
            return Err(TreeError::CycleDetected);
        }

        self.detach(key)?;
        let siblings = &mut self.entry_mut(new_parent)?.children;
        let index = index.min(siblings.len());
        siblings.insert(index, key.clone());
        self.entry_mut(key)?.parent = Some(new_parent.clone());
        Ok(())
    }

    /// Move the children of `parent` in `range` into a new element
    pub fn wrap(
        &mut self,
        parent: &Key,
        range: Range<usize>,
        key: Key,
        wrapper: ElementData,
    ) -> TreeResult<Key> {
        self.ensure_container(parent)?;
        let len = self.children(parent).len();
        if range.start > range.end || range.end > len {
            return Err(TreeError::InvalidRange {
                start: range.start,
                end: range.end,
                len,
            });
        }
        if self.contains(&key) {
            return Err(TreeError::DuplicateKey(key));
        }

        let moved: Vec<Key> = self
            .entry_mut(parent)?
            .children
            .splice(range, std::iter::once(key.clone()))
            .collect();
        for child in &moved {
            if let Some(entry) = self.entries.get_mut(child) {
                entry.parent = Some(key.clone());
            }
        }
        self.entries.insert(
            key.clone(),
            Entry {
                kind: Kind::Element(ElementData {
                    is_void: false,
                    ..wrapper
                }),
                parent: Some(parent.clone()),
                children: moved,
            },
        );
        Ok(key)
    }

    /// Replace `key` with its children
    pub fn unwrap(&mut self, key: &Key) -> TreeResult<()> {
        match self.kind(key) {
            None => return Err(TreeError::NodeNotFound(key.clone())),
            Some(Kind::Text(_)) => return Err(TreeError::NotAContainer(key.clone())),
            Some(_) => {}
        }

        let (parent, index) = self.detach(key)?;
        let children = self
            .entries
            .remove(key)
            .map(|entry| entry.children)
            .unwrap_or_default();
        for child in &children {
            if let Some(entry) = self.entries.get_mut(child) {
                entry.parent = Some(parent.clone());
            }
        }
        self.entry_mut(&parent)?
            .children
            .splice(index..index, children);
        Ok(())
    }

    /// Split `key` at `at`, returning the key of the new second half
    ///
    /// Elements split their child list, text leaves split their value at a
    /// character offset. The new node copies type, data and marks and is
    /// inserted right after the original.
    pub fn split(&mut self, key: &Key, at: usize, new_key: Key) -> TreeResult<Key> {
        let (parent, kind) = {
            let entry = self
                .entries
                .get(key)
                .ok_or_else(|| TreeError::NodeNotFound(key.clone()))?;
            let parent = entry.parent.clone().ok_or(TreeError::CannotDetachRoot)?;
            (parent, entry.kind.clone())
        };
        if self.contains(&new_key) {
            return Err(TreeError::DuplicateKey(new_key));
        }

        let (kind, moved) = match kind {
            Kind::Document => return Err(TreeError::CannotDetachRoot),
            Kind::Element(element) => {
                let len = self.children(key).len();
                if at > len {
                    return Err(TreeError::IndexOutOfBounds { index: at, len });
                }
                let moved = self.entry_mut(key)?.children.split_off(at);
                (Kind::Element(element), moved)
            }
            Kind::Text(mut text) => {
                let len = text.value.chars().count();
                if at > len {
                    return Err(TreeError::IndexOutOfBounds { index: at, len });
                }
                let byte = text
                    .value
                    .char_indices()
                    .nth(at)
                    .map(|(byte, _)| byte)
                    .unwrap_or(text.value.len());
                let tail = text.value.split_off(byte);
                self.set_text(key, text.value)?;
                (
                    Kind::Text(TextData {
                        value: tail,
                        marks: text.marks,
                    }),
                    Vec::new(),
                )
            }
        };

        for child in &moved {
            if let Some(entry) = self.entries.get_mut(child) {
                entry.parent = Some(new_key.clone());
            }
        }
        self.entries.insert(
            new_key.clone(),
            Entry {
                kind,
                parent: Some(parent.clone()),
                children: moved,
            },
        );

        let siblings = &mut self.entry_mut(&parent)?.children;
        let index = siblings
            .iter()
            .position(|k| k == key)
            .map(|i| i + 1)
            .unwrap_or(siblings.len());
        siblings.insert(index, new_key.clone());
        Ok(new_key)
    }

    /// Set (`Some`) or clear (`None`) one data entry of an element
    pub fn set_data(&mut self, key: &Key, name: &str, value: Option<DataValue>) -> TreeResult<()> {
        match &mut self.entry_mut(key)?.kind {
            Kind::Element(element) => {
                match value {
                    Some(value) => element.data.insert(name.to_string(), value),
                    None => element.data.remove(name),
                };
                Ok(())
            }
            _ => Err(TreeError::NotAnElement(key.clone())),
        }
    }

    pub fn set_marks(&mut self, key: &Key, marks: Vec<Mark>) -> TreeResult<()> {
        match &mut self.entry_mut(key)?.kind {
            Kind::Text(text) => {
                text.marks = marks;
                Ok(())
            }
            _ => Err(TreeError::NotText(key.clone())),
        }
    }

    pub fn set_text(&mut self, key: &Key, value: impl Into<String>) -> TreeResult<()> {
        match &mut self.entry_mut(key)?.kind {
            Kind::Text(text) => {
                text.value = value.into();
                Ok(())
            }
            _ => Err(TreeError::NotText(key.clone())),
        }
    }

    fn entry_mut(&mut self, key: &Key) -> TreeResult<&mut Entry> {
        self.entries
            .get_mut(key)
            .ok_or_else(|| TreeError::NodeNotFound(key.clone()))
    }

    fn ensure_container(&self, key: &Key) -> TreeResult<()> {
        match self.kind(key) {
            None => Err(TreeError::NodeNotFound(key.clone())),
            Some(Kind::Document) => Ok(()),
            Some(Kind::Element(element)) if !element.is_void => Ok(()),
            Some(_) => Err(TreeError::NotAContainer(key.clone())),
        }
    }

    /// Unlink `key` from its parent's child list
    fn detach(&mut self, key: &Key) -> TreeResult<(Key, usize)> {
        let parent = self
            .entries
            .get(key)
            .ok_or_else(|| TreeError::NodeNotFound(key.clone()))?
            .parent
            .clone()
            .ok_or(TreeError::CannotDetachRoot)?;
        let siblings = &mut self.entry_mut(&parent)?.children;
        let index = siblings
            .iter()
            .position(|k| k == key)
            .ok_or_else(|| TreeError::NodeNotFound(key.clone()))?;
        siblings.remove(index);
        Ok((parent, index))
    }

    fn attach(&mut self, node: Node, parent: Key) -> Key {
        match node {
            Node::Text(text) => {
                let key = text.key;
                self.entries.insert(
                    key.clone(),
                    Entry {
                        kind: Kind::Text(TextData {
                            value: text.value,
                            marks: text.marks,
                        }),
                        parent: Some(parent),
                        children: Vec::new(),
                    },
                );
                key
            }
            Node::Element(element) => {
                let key = element.key;
                let children = element
                    .children
                    .into_iter()
                    .map(|child| self.attach(child, key.clone()))
                    .collect();
                self.entries.insert(
                    key.clone(),
                    Entry {
                        kind: Kind::Element(ElementData {
                            ty: element.ty,
                            data: element.data,
                            is_void: element.is_void,
                        }),
                        parent: Some(parent),
                        children,
                    },
                );
                key
            }
        }
    }

    /// Remove the entries of a detached subtree, rebuilding it as a node
    fn take(&mut self, key: &Key) -> Option<Node> {
        let entry = self.entries.remove(key)?;
        match entry.kind {
            Kind::Document => None,
            Kind::Text(text) => Some(Node::Text(Text {
                key: key.clone(),
                value: text.value,
                marks: text.marks,
            })),
            Kind::Element(element) => {
                let children = entry
                    .children
                    .iter()
                    .filter_map(|child| self.take(child))
                    .collect();
                Some(Node::Element(Element {
                    key: key.clone(),
                    ty: element.ty,
                    data: element.data,
                    is_void: element.is_void,
                    children,
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn para(id: &str, text: &str) -> Node {
        Element::new("paragraph")
            .with_key(Key::from_id(id))
            .with_child(Text::new(text))
            .into()
    }

    fn sample() -> Tree {
        Tree::from_nodes(vec![Element::new("section")
            .with_key(Key::from_id("s"))
            .with_children(vec![para("a", "A"), para("b", "B"), para("c", "C")])
            .into()])
        .unwrap()
    }

    fn ids(tree: &Tree, key: &str) -> Vec<String> {
        tree.children(&Key::from_id(key))
            .iter()
            .map(|k| k.to_string())
            .collect()
    }

    #[test]
    fn test_paths_follow_edits() {
        let mut tree = sample();
        let c = Key::from_id("c");

        assert_eq!(tree.path(&c), Some(vec![0, 2]));
        tree.remove(&Key::from_id("a")).unwrap();
        assert_eq!(tree.path(&c), Some(vec![0, 1]));
        assert_eq!(tree.node_at(&[0, 1]), Some(&c));
    }

    #[test]
    fn test_move_preserves_key() {
        let mut tree = sample();
        let s = Key::from_id("s");

        tree.move_node(&Key::from_id("c"), &s, 0).unwrap();

        assert_eq!(ids(&tree, "s"), vec!["c", "a", "b"]);
        assert_eq!(tree.text_content(&Key::from_id("c")), "C");
    }

    #[test]
    fn test_move_rejects_cycles() {
        let mut tree = sample();
        let s = Key::from_id("s");

        let err = tree.move_node(&s, &Key::from_id("a"), 0).unwrap_err();
        assert_eq!(err, TreeError::CycleDetected);
        assert_eq!(tree.parent(&s), Some(tree.root()));
    }

    #[test]
    fn test_wrap_and_unwrap() {
        let mut tree = sample();
        let s = Key::from_id("s");
        let w = Key::from_id("w");

        tree.wrap(&s, 1..3, w.clone(), ElementData::new("exercise_problem"))
            .unwrap();
        assert_eq!(ids(&tree, "s"), vec!["a", "w"]);
        assert_eq!(ids(&tree, "w"), vec!["b", "c"]);
        assert_eq!(tree.parent(&Key::from_id("b")), Some(&w));

        tree.unwrap(&w).unwrap();
        assert_eq!(ids(&tree, "s"), vec!["a", "b", "c"]);
        assert!(!tree.contains(&w));
    }

    #[test]
    fn test_split_element_moves_tail_into_new_node() {
        let mut tree = sample();
        let s = Key::from_id("s");

        let new = tree.split(&s, 1, Key::generate()).unwrap();

        assert_eq!(ids(&tree, "s"), vec!["a"]);
        assert_eq!(tree.children(&new).len(), 2);
        assert_eq!(tree.node_type(&new), Some("section"));
        assert_eq!(tree.index_of(&new), Some(1));
        assert_eq!(tree.parent(&Key::from_id("c")), Some(&new));
    }

    #[test]
    fn test_split_text_by_character() {
        let mut tree = Tree::from_nodes(vec![Element::new("paragraph")
            .with_child(
                Text::new("żółw!")
                    .with_key(Key::from_id("t"))
                    .with_mark(Mark::new("strong")),
            )
            .into()])
        .unwrap();
        let t = Key::from_id("t");

        let tail = tree.split(&t, 3, Key::generate()).unwrap();

        assert_eq!(tree.text(&t).unwrap().value, "żół");
        assert_eq!(tree.text(&tail).unwrap().value, "w!");
        assert_eq!(tree.text(&tail).unwrap().marks, vec![Mark::new("strong")]);
    }

    #[test]
    fn test_duplicate_keys_rejected_without_side_effects() {
        let mut tree = sample();
        let root = tree.root().clone();
        let before = tree.len();

        let err = tree.insert(&root, 0, para("a", "again")).unwrap_err();

        assert_eq!(err, TreeError::DuplicateKey(Key::from_id("a")));
        assert_eq!(tree.len(), before);
    }

    #[test]
    fn test_void_elements_hold_no_children() {
        let mut tree = Tree::from_nodes(vec![Element::new("image")
            .with_key(Key::from_id("img"))
            .void()
            .into()])
        .unwrap();

        let err = tree
            .insert(&Key::from_id("img"), 0, Text::new("x").into())
            .unwrap_err();
        assert_eq!(err, TreeError::NotAContainer(Key::from_id("img")));
    }

    #[test]
    fn test_common_ancestor_is_proper() {
        let tree = sample();
        let a = Key::from_id("a");
        let c = Key::from_id("c");

        assert_eq!(tree.common_ancestor(&a, &c), Some(Key::from_id("s")));
        assert_eq!(tree.common_ancestor(&a, &a), Some(Key::from_id("s")));
    }

    #[test]
    fn test_outline() {
        let tree = Tree::from_nodes(vec![
            Element::new("section")
                .with_child(Element::new("paragraph").with_child(Text::new("Hi").with_mark(Mark::new("strong"))))
                .with_child(Element::new("image").with_data("src", "a.png").void())
                .into(),
            Element::new("paragraph").into(),
        ])
        .unwrap();

        assert_eq!(
            tree.outline(tree.root()),
            r#"section(paragraph("Hi"{strong}), image[src=a.png]), paragraph()"#
        );
    }

    #[test]
    fn test_remove_returns_subtree() {
        let mut tree = sample();
        let removed = tree.remove(&Key::from_id("b")).unwrap();

        let element = removed.as_element().unwrap();
        assert_eq!(element.ty, "paragraph");
        assert_eq!(element.children[0].as_text().unwrap().value, "B");
        let root = tree.root().clone();
        assert_eq!(tree.remove(&root), Err(TreeError::CannotDetachRoot));
    }
}
