//! # Change
//!
//! Mutable view of a document used by transforms and normalization
//! handlers. Every primitive goes through [`Change::apply`], which records
//! it and, unless normalization is suppressed, normalizes the nodes it
//! touched.
//!
//! ```rust,ignore
//! let mut change = change.without_normalizing();
//! change.split_node(&list, 2)?;
//! change.unwrap_node(&fragment)?;
//! // guard dropped here, normalization resumes
//! ```

use crate::normalize::{self, NormalizeReport};
use crate::schema::Schema;
use crate::{EditorConfig, EditorError, Mutation, Selection};
use cnx_model::{DataValue, ElementData, Key, Mark, Node, Tree};
use std::ops::{Deref, DerefMut, Range};

pub struct Change<'a> {
    tree: &'a mut Tree,
    schema: &'a Schema,
    selection: &'a mut Option<Selection>,
    config: &'a EditorConfig,
    operations: Vec<Mutation>,
    /// Depth of nested [`WithoutNormalizing`] guards
    suppressed: usize,
}

impl<'a> Change<'a> {
    pub fn new(
        tree: &'a mut Tree,
        schema: &'a Schema,
        selection: &'a mut Option<Selection>,
        config: &'a EditorConfig,
    ) -> Self {
        Self {
            tree,
            schema,
            selection,
            config,
            operations: Vec::new(),
            suppressed: 0,
        }
    }

    pub fn tree(&self) -> &Tree {
        &*self.tree
    }

    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    pub fn config(&self) -> &'a EditorConfig {
        self.config
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn select(&mut self, selection: Selection) {
        *self.selection = Some(selection);
    }

    pub fn deselect(&mut self) {
        *self.selection = None;
    }

    /// Mutations applied so far
    pub fn operations(&self) -> &[Mutation] {
        &self.operations
    }

    pub fn into_operations(self) -> Vec<Mutation> {
        self.operations
    }

    pub fn is_normalizing(&self) -> bool {
        self.suppressed == 0
    }

    /// Suppress normalization until the returned guard is dropped
    pub fn without_normalizing(&mut self) -> WithoutNormalizing<'_, 'a> {
        self.suppressed += 1;
        WithoutNormalizing { change: self }
    }

    /// Apply one primitive mutation
    pub fn apply(&mut self, mutation: Mutation) -> Result<(), EditorError> {
        let scopes = mutation.scopes(self.tree);
        mutation.apply(self.tree)?;
        self.repair_selection(&mutation);
        self.operations.push(mutation);

        if self.is_normalizing() {
            for scope in scopes {
                if self.tree.contains(&scope) {
                    self.normalize_node(&scope)?;
                }
            }
        }
        Ok(())
    }

    /// Normalize the subtree rooted at `key`
    pub fn normalize_node(&mut self, key: &Key) -> Result<NormalizeReport, EditorError> {
        normalize::normalize(self, key)
    }

    pub fn normalize_document(&mut self) -> Result<NormalizeReport, EditorError> {
        let root = self.tree.root().clone();
        self.normalize_node(&root)
    }

    pub fn insert_node(&mut self, parent: &Key, index: usize, node: impl Into<Node>) -> Result<Key, EditorError> {
        let node = node.into();
        let key = node.key().clone();
        self.apply(Mutation::InsertNode {
            parent: parent.clone(),
            index,
            node,
        })?;
        Ok(key)
    }

    pub fn remove_node(&mut self, key: &Key) -> Result<(), EditorError> {
        self.apply(Mutation::RemoveNode { key: key.clone() })
    }

    pub fn move_node(&mut self, key: &Key, new_parent: &Key, index: usize) -> Result<(), EditorError> {
        self.apply(Mutation::MoveNode {
            key: key.clone(),
            new_parent: new_parent.clone(),
            index,
        })
    }

    /// Wrap children `range` of `parent` in a new element, returning its key
    pub fn wrap_nodes(&mut self, parent: &Key, range: Range<usize>, wrapper: ElementData) -> Result<Key, EditorError> {
        let key = Key::generate();
        self.apply(Mutation::WrapNodes {
            parent: parent.clone(),
            start: range.start,
            end: range.end,
            key: key.clone(),
            ty: wrapper.ty,
            data: wrapper.data,
        })?;
        Ok(key)
    }

    /// Wrap a single node in a new element
    pub fn wrap_node(&mut self, key: &Key, wrapper: ElementData) -> Result<Key, EditorError> {
        let (parent, index) = self.locate(key)?;
        self.wrap_nodes(&parent, index..index + 1, wrapper)
    }

    pub fn unwrap_node(&mut self, key: &Key) -> Result<(), EditorError> {
        self.apply(Mutation::UnwrapNode { key: key.clone() })
    }

    /// Split `key` at `at`, returning the key of the second half
    pub fn split_node(&mut self, key: &Key, at: usize) -> Result<Key, EditorError> {
        let new_key = Key::generate();
        self.apply(Mutation::SplitNode {
            key: key.clone(),
            at,
            new_key: new_key.clone(),
        })?;
        Ok(new_key)
    }

    pub fn set_data(&mut self, key: &Key, name: &str, value: Option<DataValue>) -> Result<(), EditorError> {
        self.apply(Mutation::SetData {
            key: key.clone(),
            name: name.to_string(),
            value,
        })
    }

    pub fn set_marks(&mut self, key: &Key, marks: Vec<Mark>) -> Result<(), EditorError> {
        self.apply(Mutation::SetMarks {
            key: key.clone(),
            marks,
        })
    }

    pub fn set_text(&mut self, key: &Key, value: impl Into<String>) -> Result<(), EditorError> {
        self.apply(Mutation::SetText {
            key: key.clone(),
            value: value.into(),
        })
    }

    /// Parent and index of `key`
    pub fn locate(&self, key: &Key) -> Result<(Key, usize), EditorError> {
        let not_found = || cnx_model::TreeError::NodeNotFound(key.clone());
        let parent = self.tree.parent(key).cloned().ok_or_else(not_found)?;
        let index = self.tree.index_of(key).ok_or_else(not_found)?;
        Ok((parent, index))
    }

    /// Keep the selection pointing at live nodes
    fn repair_selection(&mut self, mutation: &Mutation) {
        let Some(selection) = self.selection.as_mut() else {
            return;
        };

        if let Mutation::SplitNode { key, at, new_key } = mutation {
            if self.tree.text(new_key).is_some() {
                for point in [&mut selection.anchor, &mut selection.focus] {
                    if &point.key == key && point.offset >= *at {
                        point.key = new_key.clone();
                        point.offset -= *at;
                    }
                }
            }
        }

        let live = self.tree.contains(&selection.anchor.key) && self.tree.contains(&selection.focus.key);
        if !live {
            tracing::debug!("selected node was removed, clearing selection");
            *self.selection = None;
        }
    }
}

/// Normalization suppression scope, see [`Change::without_normalizing`]
pub struct WithoutNormalizing<'c, 'a> {
    change: &'c mut Change<'a>,
}

impl<'a> Deref for WithoutNormalizing<'_, 'a> {
    type Target = Change<'a>;

    fn deref(&self) -> &Self::Target {
        &*self.change
    }
}

impl<'a> DerefMut for WithoutNormalizing<'_, 'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.change
    }
}

impl Drop for WithoutNormalizing<'_, '_> {
    fn drop(&mut self) {
        self.change.suppressed -= 1;
    }
}
