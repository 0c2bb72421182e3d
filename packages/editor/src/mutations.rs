//! # Tree Mutations
//!
//! Primitive edits, recorded as values so a batch can be logged, inspected
//! and replayed against another copy of the same document.
//!
//! ## Mutation Semantics
//!
//! ### Keys
//! - Every node created by a mutation carries its key inside the mutation
//!   (`WrapNodes::key`, `SplitNode::new_key`, the keys inside
//!   `InsertNode::node`), so replaying yields identical keys
//! - Moving, wrapping and unwrapping never change the key of existing nodes
//!
//! ### Failure
//! - A mutation that fails validation leaves the tree untouched

use cnx_model::{Data, DataValue, ElementData, Key, Mark, Node, Tree, TreeError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Mutation {
    /// Attach a new subtree under `parent` at `index`
    InsertNode {
        parent: Key,
        index: usize,
        node: Node,
    },

    /// Remove a node and all descendants
    RemoveNode { key: Key },

    /// Move a node to a new parent at index
    MoveNode {
        key: Key,
        new_parent: Key,
        index: usize,
    },

    /// Move children `start..end` of `parent` into a new element
    WrapNodes {
        parent: Key,
        start: usize,
        end: usize,
        key: Key,
        #[serde(rename = "type")]
        ty: String,
        #[serde(default)]
        data: Data,
    },

    /// Replace a node with its children
    UnwrapNode { key: Key },

    /// Split a node at `at`; the second half gets `new_key`
    SplitNode { key: Key, at: usize, new_key: Key },

    /// Set (`Some`) or clear (`None`) one data entry
    SetData {
        key: Key,
        name: String,
        value: Option<DataValue>,
    },

    /// Replace the marks of a text leaf
    SetMarks { key: Key, marks: Vec<Mark> },

    /// Replace the value of a text leaf
    SetText { key: Key, value: String },
}

impl Mutation {
    pub fn apply(&self, tree: &mut Tree) -> Result<(), TreeError> {
        match self {
            Mutation::InsertNode { parent, index, node } => {
                tree.insert(parent, *index, node.clone()).map(|_| ())
            }

            Mutation::RemoveNode { key } => tree.remove(key).map(|_| ()),

            Mutation::MoveNode { key, new_parent, index } => tree.move_node(key, new_parent, *index),

            Mutation::WrapNodes {
                parent,
                start,
                end,
                key,
                ty,
                data,
            } => {
                let wrapper = ElementData {
                    ty: ty.clone(),
                    data: data.clone(),
                    is_void: false,
                };
                tree.wrap(parent, *start..*end, key.clone(), wrapper).map(|_| ())
            }

            Mutation::UnwrapNode { key } => tree.unwrap(key),

            Mutation::SplitNode { key, at, new_key } => {
                tree.split(key, *at, new_key.clone()).map(|_| ())
            }

            Mutation::SetData { key, name, value } => tree.set_data(key, name, value.clone()),

            Mutation::SetMarks { key, marks } => tree.set_marks(key, marks.clone()),

            Mutation::SetText { key, value } => tree.set_text(key, value.clone()),
        }
    }

    /// Nodes whose subtrees need normalizing once this mutation is applied
    ///
    /// Must be called before [`Mutation::apply`], while removed nodes still
    /// have a parent.
    pub fn scopes(&self, tree: &Tree) -> Vec<Key> {
        let parent_of = |key: &Key| tree.parent(key).cloned();

        let scopes = match self {
            Mutation::InsertNode { parent, .. } | Mutation::WrapNodes { parent, .. } => {
                vec![Some(parent.clone())]
            }
            Mutation::RemoveNode { key }
            | Mutation::UnwrapNode { key }
            | Mutation::SplitNode { key, .. }
            | Mutation::SetMarks { key, .. }
            | Mutation::SetText { key, .. } => vec![parent_of(key)],
            Mutation::MoveNode { key, new_parent, .. } => {
                vec![parent_of(key), Some(new_parent.clone())]
            }
            Mutation::SetData { key, .. } => vec![Some(key.clone())],
        };

        let mut out: Vec<Key> = Vec::new();
        for scope in scopes.into_iter().flatten() {
            if !out.contains(&scope) {
                out.push(scope);
            }
        }
        out
    }
}

/// Result of applying a batch of mutations to a document
#[derive(Debug, Clone, PartialEq)]
pub struct MutationResult<T = ()> {
    /// New version number
    pub version: u64,

    /// Every primitive applied, normalization included, in order
    pub operations: Vec<Mutation>,

    /// Value returned by the batch
    pub value: T,
}
