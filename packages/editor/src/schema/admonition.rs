use super::{Rule, Violation};
use crate::{Change, EditorError};
use cnx_model::DataValue;

/// Values accepted for an admonition's `type`
pub const ADMONITION_TYPES: &[&str] = &["note", "warning", "tip", "important"];

pub const ADMONITION: Rule = Rule {
    ty: "admonition",
    parent: None,
    children: None,
    marks: None,
    data: &[("type", valid_type)],
    normalize: normalize_admonition,
};

fn valid_type(value: Option<&DataValue>) -> bool {
    value
        .and_then(DataValue::as_str)
        .is_some_and(|ty| ADMONITION_TYPES.contains(&ty))
}

fn normalize_admonition(change: &mut Change<'_>, violation: &Violation) -> Result<(), EditorError> {
    match violation {
        Violation::NodeDataInvalid { node, key } if key == "type" => {
            change.set_data(node, "type", Some(DataValue::from("note")))
        }

        Violation::NodeDataInvalid { .. }
        | Violation::ParentInvalid { .. }
        | Violation::ChildTypeInvalid { .. }
        | Violation::ChildUnknown { .. }
        | Violation::ChildRequired { .. }
        | Violation::MarkInvalid { .. } => {
            tracing::warn!(%violation, "unhandled admonition violation");
            Ok(())
        }
    }
}
