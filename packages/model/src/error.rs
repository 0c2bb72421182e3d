use crate::key::Key;
use thiserror::Error;

pub type TreeResult<T> = Result<T, TreeError>;

/// Structural errors raised by primitive tree operations
///
/// A failing operation leaves the tree as it was.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TreeError {
    #[error("Node not found: {0}")]
    NodeNotFound(Key),

    #[error("Node cannot hold children: {0}")]
    NotAContainer(Key),

    #[error("Node is not an element: {0}")]
    NotAnElement(Key),

    #[error("Node is not a text leaf: {0}")]
    NotText(Key),

    #[error("The document root cannot be detached")]
    CannotDetachRoot,

    #[error("Would create cycle")]
    CycleDetected,

    #[error("Key already in use: {0}")]
    DuplicateKey(Key),

    #[error("Index {index} out of bounds (len {len})")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Invalid range {start}..{end} (len {len})")]
    InvalidRange { start: usize, end: usize, len: usize },
}
