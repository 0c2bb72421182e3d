use cnx_model::TreeError;
use quick_xml::events::attributes::AttrError;
use thiserror::Error;

pub type LoadResult<T> = Result<T, LoadError>;

/// Hard failures while reading markup
///
/// Unknown tags are not errors: they are dropped during loading.
#[derive(Error, Debug, Clone)]
pub enum LoadError {
    #[error("Malformed XML at byte {pos}: {message}")]
    Xml { pos: u64, message: String },

    #[error("Invalid attribute at byte {pos}: {message}")]
    Attribute { pos: u64, message: String },

    #[error("Unexpected end of input, <{tag}> is not closed")]
    UnexpectedEof { tag: String },

    #[error("Document has no root element")]
    Empty,

    #[error("Invalid tree: {0}")]
    Tree(#[from] TreeError),
}

impl LoadError {
    pub fn xml(pos: u64, err: quick_xml::Error) -> Self {
        Self::Xml {
            pos,
            message: err.to_string(),
        }
    }

    pub fn attribute(pos: u64, err: AttrError) -> Self {
        Self::Attribute {
            pos,
            message: err.to_string(),
        }
    }

    pub fn unexpected_eof(tag: impl Into<String>) -> Self {
        Self::UnexpectedEof { tag: tag.into() }
    }
}
