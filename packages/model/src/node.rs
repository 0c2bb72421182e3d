use crate::key::Key;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Scalar stored under an element data key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataValue {
    Bool(bool),
    Number(f64),
    String(String),
}

impl DataValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            DataValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            DataValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<&str> for DataValue {
    fn from(value: &str) -> Self {
        DataValue::String(value.to_string())
    }
}

impl From<String> for DataValue {
    fn from(value: String) -> Self {
        DataValue::String(value)
    }
}

impl From<f64> for DataValue {
    fn from(value: f64) -> Self {
        DataValue::Number(value)
    }
}

impl From<bool> for DataValue {
    fn from(value: bool) -> Self {
        DataValue::Bool(value)
    }
}

/// Element attributes, ordered for stable output
pub type Data = BTreeMap<String, DataValue>;

/// Formatting applied to a text leaf
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Mark {
    #[serde(rename = "type")]
    pub ty: String,
}

impl Mark {
    pub fn new(ty: impl Into<String>) -> Self {
        Self { ty: ty.into() }
    }
}

/// Detached node, used to build new content and to export subtrees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "object", rename_all = "lowercase")]
pub enum Node {
    Element(Element),
    Text(Text),
}

impl Node {
    pub fn key(&self) -> &Key {
        match self {
            Node::Element(element) => &element.key,
            Node::Text(text) => &text.key,
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Node::Text(text) => Some(text),
            Node::Element(_) => None,
        }
    }

    /// Visit this node and every descendant, parents first
    pub fn for_each<'a>(&'a self, f: &mut impl FnMut(&'a Node)) {
        f(self);
        if let Node::Element(element) = self {
            for child in &element.children {
                child.for_each(f);
            }
        }
    }

    /// Mutable counterpart of [`Node::for_each`]
    pub fn for_each_mut(&mut self, f: &mut impl FnMut(&mut Node)) {
        f(self);
        if let Node::Element(element) = self {
            for child in &mut element.children {
                child.for_each_mut(f);
            }
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl From<Text> for Node {
    fn from(text: Text) -> Self {
        Node::Text(text)
    }
}

/// Typed node with data and ordered children
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub key: Key,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default, skip_serializing_if = "Data::is_empty")]
    pub data: Data,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_void: bool,
    #[serde(default)]
    pub children: Vec<Node>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Element {
    pub fn new(ty: impl Into<String>) -> Self {
        Self::keyed(Key::generate(), ty)
    }

    /// Element under a key chosen by the caller
    pub fn keyed(key: Key, ty: impl Into<String>) -> Self {
        Self {
            key,
            ty: ty.into(),
            data: Data::new(),
            is_void: false,
            children: Vec::new(),
        }
    }

    pub fn with_key(mut self, key: Key) -> Self {
        self.key = key;
        self
    }

    pub fn with_data(mut self, name: impl Into<String>, value: impl Into<DataValue>) -> Self {
        self.data.insert(name.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    /// Mark as an element that never holds children
    pub fn void(mut self) -> Self {
        self.is_void = true;
        self.children.clear();
        self
    }
}

/// Text leaf
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub key: Key,
    pub value: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub marks: Vec<Mark>,
}

impl Text {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            key: Key::generate(),
            value: value.into(),
            marks: Vec::new(),
        }
    }

    pub fn with_key(mut self, key: Key) -> Self {
        self.key = key;
        self
    }

    /// An empty leaf, as placed in freshly created paragraphs
    pub fn empty() -> Self {
        Self::new("")
    }

    pub fn with_mark(mut self, mark: Mark) -> Self {
        self.marks.push(mark);
        self
    }
}
