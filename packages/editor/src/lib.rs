//! # CNX Editor
//!
//! Schema-enforcing editing engine for CNXML documents.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ parser: CNXML text → Tree                   │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: Document lifecycle + edits          │
//! │  - Load/save documents                      │
//! │  - Apply mutations in transactions          │
//! │  - Validate against the schema              │
//! │  - Normalize violations to a fixpoint       │
//! │  - Selection-driven transforms (commands)   │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ parser: Tree → CNXML text                   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Keys, not paths**: nodes are referenced by key across edits
//! 2. **Normalize after every edit**: the tree conforms at quiescence
//! 3. **Transforms suppress normalization**: and normalize once at the end
//! 4. **Transactions**: a failed batch leaves the document untouched
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cnx_editor::{Command, Document, Point, Selection};
//!
//! let mut doc = Document::load("module.cnxml")?;
//!
//! doc.set_selection(Some(Selection::collapsed(Point::new(key, 0))));
//! let result = doc.run(Command::InsertExercise)?;
//! assert!(result.value);
//!
//! doc.save()?;
//! ```

mod change;
mod config;
mod document;
mod errors;
mod mutations;
mod normalize;
mod ordered;
pub mod schema;
mod selection;
pub mod transforms;

pub use change::{Change, WithoutNormalizing};
pub use config::{EditorConfig, DEFAULT_MAX_NORMALIZE_PASSES};
pub use document::{Document, DocumentStorage};
pub use errors::EditorError;
pub use mutations::{Mutation, MutationResult};
pub use normalize::NormalizeReport;
pub use ordered::{normalize_ordered_children, Fallback, MatchNode};
pub use schema::{ChildGroup, Match, Rule, Schema, Violation};
pub use selection::{Point, Selection};
pub use transforms::{Command, MediaKind, MediaSource};
