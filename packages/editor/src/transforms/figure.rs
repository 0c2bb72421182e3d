//! Figure insertion.

use super::selected_blocks;
use crate::schema::{Match, FIGURE_PARENT};
use crate::{Change, EditorError};
use cnx_model::Element;
use serde::{Deserialize, Serialize};

/// Kind of media object a figure shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    Video,
    Audio,
}

impl MediaKind {
    pub fn element_type(self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
            MediaKind::Audio => "audio",
        }
    }
}

/// Media object a new figure is built around
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaSource {
    pub kind: MediaKind,
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intended_use: Option<String>,
}

impl MediaSource {
    pub fn new(kind: MediaKind, src: impl Into<String>) -> Self {
        Self {
            kind,
            src: src.into(),
            intended_use: None,
        }
    }

    pub fn with_intended_use(mut self, intended_use: impl Into<String>) -> Self {
        self.intended_use = Some(intended_use.into());
        self
    }

    /// `figure > media > object`, the alt text left empty for the author
    fn to_figure(&self) -> Element {
        let mut object = Element::new(self.kind.element_type())
            .with_data("src", self.src.as_str())
            .void();
        if let Some(intended_use) = &self.intended_use {
            object = object.with_data("intended-use", intended_use.as_str());
        }

        Element::new("figure").with_child(Element::new("media").with_data("alt", "").with_child(object))
    }
}

/// Insert a figure showing `source` after the selected block
///
/// The figure follows the closest block around the selection start that
/// sits directly in the document or in a section, so it never lands inside
/// a paragraph, list or admonition. The selection is left where it was.
pub fn insert_figure(change: &mut Change<'_>, source: &MediaSource) -> Result<bool, EditorError> {
    let Some((start, _)) = selected_blocks(change) else {
        return Ok(false);
    };
    let anchor = change.tree().closest(&start, |tree, key| {
        tree.parent(key)
            .is_some_and(|parent| Match::any(FIGURE_PARENT, tree, parent))
    });
    let Some(anchor) = anchor else {
        return Ok(false);
    };

    let figure = {
        let mut change = change.without_normalizing();
        let (parent, index) = change.locate(&anchor)?;
        change.insert_node(&parent, index + 1, source.to_figure())?
    };

    if change.is_normalizing() {
        change.normalize_node(&figure)?;
    }
    tracing::debug!(%figure, media = source.kind.element_type(), "inserted figure");
    Ok(true)
}
