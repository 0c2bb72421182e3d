//! # Document Handle
//!
//! A Document is one CNXML module and its editing state: tree, selection,
//! schema and settings. Documents can be:
//! - **Memory-backed**: built from source text, for tests and tooling
//! - **File-backed**: loaded from disk and saved back
//!
//! ## Lifecycle
//!
//! ```text
//! Load → Normalize → Edit (transact) → Serialize → Save
//!   ↓        ↓             ↓               ↓         ↓
//! File     Tree        Mutations         CNXML      File
//! ```
//!
//! All edits go through [`Document::transact`]: either the whole batch
//! applies and the document is normalized once, or nothing changes.

use crate::normalize::NormalizeReport;
use crate::schema::{Schema, Violation};
use crate::{Change, Command, EditorConfig, EditorError, Mutation, MutationResult, Selection};
use cnx_model::{Node, Tree};
use std::path::{Path, PathBuf};

/// Editable CNXML document
#[derive(Debug)]
pub struct Document {
    /// Path to the source file (nominal for memory-backed documents)
    pub path: PathBuf,

    /// Current version number (increments on each effective transaction)
    pub version: u64,

    tree: Tree,
    schema: Schema,
    selection: Option<Selection>,
    config: EditorConfig,

    /// Backing storage strategy
    storage: DocumentStorage,
}

/// Storage backend for a document
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentStorage {
    /// In-memory only (for testing, temp docs)
    Memory,

    /// File-backed, `dirty` until the next save
    File { dirty: bool },
}

impl Document {
    /// Create document from source text (memory-backed)
    pub fn from_source(path: impl Into<PathBuf>, source: &str) -> Result<Self, EditorError> {
        Self::from_source_with_config(path, source, EditorConfig::default())
    }

    pub fn from_source_with_config(
        path: impl Into<PathBuf>,
        source: &str,
        config: EditorConfig,
    ) -> Result<Self, EditorError> {
        let tree = cnx_parser::load(source)?;
        Self::new(path.into(), tree, config, DocumentStorage::Memory)
    }

    /// Load document from file (file-backed)
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EditorError> {
        Self::load_with_config(path, EditorConfig::default())
    }

    pub fn load_with_config(path: impl AsRef<Path>, config: EditorConfig) -> Result<Self, EditorError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let tree = cnx_parser::load(&source)?;
        tracing::info!(path = %path.display(), nodes = tree.len(), "loaded document");

        Self::new(path.to_path_buf(), tree, config, DocumentStorage::File { dirty: false })
    }

    fn new(
        path: PathBuf,
        mut tree: Tree,
        config: EditorConfig,
        storage: DocumentStorage,
    ) -> Result<Self, EditorError> {
        let schema = Schema::cnx();
        let mut selection = None;

        // Loading is not an edit: no version bump, not dirty
        if config.normalize_on_load {
            let mut change = Change::new(&mut tree, &schema, &mut selection, &config);
            let report = change.normalize_document()?;
            if report.edits > 0 {
                tracing::debug!(edits = report.edits, "normalized document on load");
            }
        }

        Ok(Self {
            path,
            version: 0,
            tree,
            schema,
            selection,
            config,
            storage,
        })
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn set_selection(&mut self, selection: Option<Selection>) {
        self.selection = selection;
    }

    /// Run a batch of edits as one transaction
    ///
    /// On error the tree and selection are restored to their state before
    /// the call. On success the document is normalized once more and the
    /// version increments if any primitive was applied.
    pub fn transact<T>(
        &mut self,
        edit: impl FnOnce(&mut Change<'_>) -> Result<T, EditorError>,
    ) -> Result<MutationResult<T>, EditorError> {
        let tree = self.tree.clone();
        let selection = self.selection.clone();

        let mut change = Change::new(&mut self.tree, &self.schema, &mut self.selection, &self.config);
        let outcome = edit(&mut change).and_then(|value| change.normalize_document().map(|_| value));
        let operations = change.into_operations();

        let value = match outcome {
            Ok(value) => value,
            Err(err) => {
                tracing::debug!(error = %err, "transaction failed, rolling back");
                self.tree = tree;
                self.selection = selection;
                return Err(err);
            }
        };

        if !operations.is_empty() {
            self.version += 1;
            if let DocumentStorage::File { dirty } = &mut self.storage {
                *dirty = true;
            }
        }

        Ok(MutationResult {
            version: self.version,
            operations,
            value,
        })
    }

    /// Apply a mutation
    pub fn apply(&mut self, mutation: Mutation) -> Result<MutationResult, EditorError> {
        self.transact(|change| change.apply(mutation))
    }

    /// Run a command against the current selection
    pub fn run(&mut self, command: Command) -> Result<MutationResult<bool>, EditorError> {
        self.transact(|change| command.run(change))
    }

    /// Normalize the whole document
    pub fn normalize(&mut self) -> Result<MutationResult<NormalizeReport>, EditorError> {
        self.transact(|change| change.normalize_document())
    }

    /// First violation of every node still non-conformant
    pub fn violations(&self) -> Vec<Violation> {
        self.schema.validate(&self.tree)
    }

    /// CNXML source of the current tree
    pub fn source(&self) -> String {
        cnx_parser::serialize(&self.tree)
    }

    /// Top-level nodes as JSON
    pub fn to_json(&self) -> Result<String, EditorError> {
        let nodes: Vec<Node> = self.tree.export_children(self.tree.root());
        Ok(serde_json::to_string_pretty(&nodes)?)
    }

    pub fn storage(&self) -> &DocumentStorage {
        &self.storage
    }

    /// Check if document has unsaved changes
    pub fn is_dirty(&self) -> bool {
        match &self.storage {
            DocumentStorage::File { dirty } => *dirty,
            DocumentStorage::Memory => false,
        }
    }

    /// Save document to disk (if file-backed)
    pub fn save(&mut self) -> Result<(), EditorError> {
        let source = self.source();
        match &mut self.storage {
            DocumentStorage::File { dirty } => {
                std::fs::write(&self.path, source)?;
                *dirty = false;
                tracing::info!(path = %self.path.display(), version = self.version, "saved document");
                Ok(())
            }
            DocumentStorage::Memory => Err(EditorError::NotFileBacked),
        }
    }
}
