//! Building the effective variable set for one output.

use crate::document::{Document, StructuralIssue, Value};

use super::types::{Variable, VariableSet};

/// Effective variables for one output, plus any markers that pointed at
/// globals nobody defined.
#[derive(Debug, Clone, Default)]
pub struct Classified {
    pub variables: VariableSet,
    pub issues: Vec<StructuralIssue>,
}

/// Overlay `changes` onto `base`: a key present in both takes the entry from
/// `changes` in full.
#[must_use]
pub fn merge_with_overwrite(mut base: VariableSet, changes: VariableSet) -> VariableSet {
    for (key, var) in changes {
        base.insert(key, var);
    }
    base
}

/// Single-output mode: every top-level string is a local.
#[must_use]
pub fn classify_single(doc: &Document) -> Classified {
    Classified { variables: strings(doc, |k, v| Variable::local(k, v)), issues: Vec::new() }
}

/// Multi-output mode: globals from the top level, shadowed by the unit's
/// locals, with `true` markers turning globals into acknowledged references.
///
/// Markers are collected first so every variable is built once with its
/// final origin.
#[must_use]
pub fn classify_multi(doc: &Document, unit_name: &str, unit: &Document) -> Classified {
    let markers: Vec<&str> = unit
        .iter()
        .filter(|(_, v)| matches!(v, Value::Boolean(true)))
        .map(|(k, _)| k.as_str())
        .collect();

    let locals = strings(unit, |k, v| Variable::local(k, v));
    let globals =
        strings(doc, |k, v| Variable::global(k, v, markers.iter().any(|m| *m == k)));
    let variables = merge_with_overwrite(globals, locals);

    let issues = markers
        .iter()
        .filter(|m| !variables.get(**m).is_some_and(Variable::is_global))
        .map(|m| StructuralIssue::UnknownGlobalReference {
            unit: unit_name.to_string(),
            key: (*m).to_string(),
        })
        .collect();

    Classified { variables, issues }
}

fn strings(doc: &Document, make: impl Fn(&str, &str) -> Variable) -> VariableSet {
    doc.iter()
        .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), make(k, s))))
        .collect()
}

/// The variable a template reference to `name` resolves to. Names compare
/// without regard to case; among keys differing only in case the last one
/// wins, as it does when rendering.
#[must_use]
pub fn find_variable<'a>(vars: &'a VariableSet, name: &str) -> Option<&'a Variable> {
    let wanted = name.to_lowercase();
    vars.values().rev().find(|v| v.key.to_lowercase() == wanted)
}

/// Output names in document order: every top-level table.
pub fn output_units(doc: &Document) -> impl Iterator<Item = (&str, &Document)> {
    doc.iter().filter_map(|(k, v)| v.as_table().map(|t| (k.as_str(), t)))
}
