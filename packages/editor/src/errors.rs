//! Error types for the editor

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Load error: {0}")]
    Load(#[from] cnx_parser::LoadError),

    #[error("Tree error: {0}")]
    Tree(#[from] cnx_model::TreeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Normalization did not converge after {passes} passes")]
    NormalizationDiverged { passes: usize },

    #[error("Document is not file-backed")]
    NotFileBacked,
}
