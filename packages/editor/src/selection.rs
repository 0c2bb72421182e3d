use cnx_model::{Key, Tree};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Position inside a node, `offset` counts characters of a text leaf
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub key: Key,
    pub offset: usize,
}

impl Point {
    pub fn new(key: Key, offset: usize) -> Self {
        Self { key, offset }
    }

    /// Start of the first text leaf in `key` (or `key` itself)
    pub fn start_of(tree: &Tree, key: &Key) -> Option<Self> {
        if tree.text(key).is_some() {
            return Some(Self::new(key.clone(), 0));
        }
        tree.descendants(key)
            .into_iter()
            .find(|k| tree.text(k).is_some())
            .map(|k| Self::new(k, 0))
    }

    /// End of the last text leaf in `key` (or `key` itself)
    pub fn end_of(tree: &Tree, key: &Key) -> Option<Self> {
        let leaf = if tree.text(key).is_some() {
            key.clone()
        } else {
            tree.descendants(key)
                .into_iter()
                .rev()
                .find(|k| tree.text(k).is_some())?
        };
        let len = tree.text(&leaf)?.value.chars().count();
        Some(Self::new(leaf, len))
    }

    /// Document order of two points
    pub fn compare(&self, other: &Point, tree: &Tree) -> Ordering {
        match (tree.path(&self.key), tree.path(&other.key)) {
            (Some(a), Some(b)) => a.cmp(&b).then(self.offset.cmp(&other.offset)),
            _ => Ordering::Equal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub anchor: Point,
    pub focus: Point,
}

impl Selection {
    pub fn new(anchor: Point, focus: Point) -> Self {
        Self { anchor, focus }
    }

    pub fn collapsed(point: Point) -> Self {
        Self {
            anchor: point.clone(),
            focus: point,
        }
    }

    /// Selection spanning all text of `key`
    pub fn covering(tree: &Tree, key: &Key) -> Option<Self> {
        Some(Self::new(Point::start_of(tree, key)?, Point::end_of(tree, key)?))
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    pub fn is_backward(&self, tree: &Tree) -> bool {
        self.anchor.compare(&self.focus, tree) == Ordering::Greater
    }

    pub fn start(&self, tree: &Tree) -> &Point {
        if self.is_backward(tree) {
            &self.focus
        } else {
            &self.anchor
        }
    }

    pub fn end(&self, tree: &Tree) -> &Point {
        if self.is_backward(tree) {
            &self.anchor
        } else {
            &self.focus
        }
    }

    /// Lowest element containing the start point
    pub fn start_block(&self, tree: &Tree) -> Option<Key> {
        closest_element(tree, &self.start(tree).key)
    }

    /// Lowest element containing the end point
    pub fn end_block(&self, tree: &Tree) -> Option<Key> {
        closest_element(tree, &self.end(tree).key)
    }
}

fn closest_element(tree: &Tree, key: &Key) -> Option<Key> {
    tree.closest(key, |tree, k| tree.element(k).is_some())
}
