use super::{Rule, Violation};
use crate::{Change, EditorError};
use cnx_model::{DataValue, Mark};

pub const HEADING: Rule = Rule {
    ty: "heading",
    parent: None,
    children: None,
    marks: Some(&["strong", "emphasis", "underline", "superscript", "subscript"]),
    data: &[("depth", valid_depth)],
    normalize: normalize_heading,
};

fn valid_depth(value: Option<&DataValue>) -> bool {
    matches!(value.and_then(DataValue::as_number), Some(depth) if depth >= 0.0)
}

fn normalize_heading(change: &mut Change<'_>, violation: &Violation) -> Result<(), EditorError> {
    match violation {
        Violation::MarkInvalid { text, mark, .. } => {
            let marks: Vec<Mark> = change
                .tree()
                .text(text)
                .map(|t| t.marks.iter().filter(|m| &m.ty != mark).cloned().collect())
                .unwrap_or_default();
            change.set_marks(text, marks)
        }

        // No policy for correcting a bad depth yet
        Violation::NodeDataInvalid { .. }
        | Violation::ParentInvalid { .. }
        | Violation::ChildTypeInvalid { .. }
        | Violation::ChildUnknown { .. }
        | Violation::ChildRequired { .. } => {
            tracing::warn!(%violation, "unhandled heading violation");
            Ok(())
        }
    }
}
