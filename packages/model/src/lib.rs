//! Node model shared by the loader, the serializer and the editor.
//!
//! A document is a [`Tree`] of typed elements and text leaves. Nodes are
//! addressed by [`Key`]; detached [`Node`] values are used to build new
//! content and to export subtrees.

mod error;
mod key;
mod node;
mod tree;

pub use error::{TreeError, TreeResult};
pub use key::{Key, GENERATED_PREFIX};
pub use node::{Data, DataValue, Element, Mark, Node, Text};
pub use tree::{ElementData, Kind, Tree, TextData};
