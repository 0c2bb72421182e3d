//! # Normalization
//!
//! Brings a subtree back to schema conformance. Each pass walks the scope
//! children-first and stops at the first violation whose handler edits the
//! tree; the next pass starts over, since that edit may have created or
//! resolved other violations. A run ends with the first pass that edits
//! nothing.

use crate::schema::Violation;
use crate::{Change, EditorError};
use cnx_model::Key;
use serde::Serialize;

/// Outcome of one normalization run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalizeReport {
    /// Passes over the scope, including the final clean one
    pub passes: usize,
    /// Primitive mutations emitted by handlers
    pub edits: usize,
    /// Violations whose handler left the tree as it was
    pub unresolved: Vec<Violation>,
}

impl NormalizeReport {
    pub fn is_clean(&self) -> bool {
        self.unresolved.is_empty()
    }
}

pub(crate) fn normalize(change: &mut Change<'_>, scope: &Key) -> Result<NormalizeReport, EditorError> {
    let schema = change.schema();
    let max_passes = change.config().max_normalize_passes;
    let mut report = NormalizeReport::default();
    let mut scope = scope.clone();

    loop {
        if report.passes >= max_passes {
            return Err(EditorError::NormalizationDiverged {
                passes: report.passes,
            });
        }
        report.passes += 1;

        if !change.tree().contains(&scope) {
            tracing::debug!(%scope, "normalization scope is gone, restarting at the root");
            scope = change.tree().root().clone();
        }

        let mut edited = false;
        for key in change.tree().post_order(&scope) {
            let Some(violation) = schema.check(change.tree(), &key) else {
                continue;
            };
            if report.unresolved.contains(&violation) {
                continue;
            }
            let Some(rule) = schema.rule_for(change.tree(), &key) else {
                continue;
            };
            let handler = rule.normalize;

            tracing::debug!(%violation, pass = report.passes, "normalizing");
            let before = change.operations().len();
            {
                let mut change = change.without_normalizing();
                handler(&mut change, &violation)?;
            }
            let edits = change.operations().len() - before;

            if edits > 0 {
                report.edits += edits;
                edited = true;
                break;
            }

            tracing::warn!(%violation, "violation left unresolved");
            report.unresolved.push(violation);
        }

        if !edited {
            return Ok(report);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Rule, Schema};
    use crate::EditorConfig;
    use cnx_model::{DataValue, Element, Text, Tree};

    fn never_valid(_: Option<&DataValue>) -> bool {
        false
    }

    fn bump(change: &mut Change<'_>, violation: &Violation) -> Result<(), EditorError> {
        let node = violation.node().clone();
        let count = change
            .tree()
            .element(&node)
            .and_then(|element| element.data.get("count"))
            .and_then(DataValue::as_number)
            .unwrap_or(0.0);
        change.set_data(&node, "count", Some(DataValue::from(count + 1.0)))
    }

    const RESTLESS: Rule = Rule {
        ty: "restless",
        parent: None,
        children: None,
        marks: None,
        data: &[("count", never_valid)],
        normalize: bump,
    };

    fn broken_exercises() -> Tree {
        Tree::from_nodes(vec![
            Element::new("exercise")
                .with_child(Element::new("paragraph").with_child(Text::new("Q")))
                .into(),
            Element::new("exercise").with_child(Text::new("stray")).into(),
        ])
        .unwrap()
    }

    #[test]
    fn test_second_run_makes_no_edits() {
        let mut tree = broken_exercises();
        let schema = Schema::cnx();
        let config = EditorConfig::default();
        let mut selection = None;
        let mut change = Change::new(&mut tree, &schema, &mut selection, &config);

        let first = change.normalize_document().unwrap();
        assert!(first.edits > 0);
        assert!(first.is_clean());

        let second = change.normalize_document().unwrap();
        assert_eq!(second.edits, 0);
        assert_eq!(second.passes, 1);
        assert!(schema.validate(&tree).is_empty());
    }

    #[test]
    fn test_never_converging_handler_is_fatal() {
        let mut tree = Tree::from_nodes(vec![Element::new("restless").into()]).unwrap();
        let schema = Schema::empty().with_rule(RESTLESS);
        let config = EditorConfig {
            max_normalize_passes: 5,
            ..EditorConfig::default()
        };
        let mut selection = None;
        let mut change = Change::new(&mut tree, &schema, &mut selection, &config);

        let result = change.normalize_document();

        assert!(matches!(
            result,
            Err(EditorError::NormalizationDiverged { passes: 5 })
        ));
    }

    #[test]
    fn test_removed_scope_restarts_at_root() {
        let mut tree = Tree::from_nodes(vec![Element::new("exercise")
            .with_key(Key::from_id("ex"))
            .with_child(Text::new("stray"))
            .into()])
        .unwrap();
        let schema = Schema::cnx();
        let config = EditorConfig::default();
        let mut selection = None;
        let mut change = Change::new(&mut tree, &schema, &mut selection, &config);

        let report = change.normalize_node(&Key::from_id("ex")).unwrap();

        assert_eq!(report.edits, 1);
        assert_eq!(report.passes, 2);
        assert!(!tree.contains(&Key::from_id("ex")));
    }
}
