//! Shape checks on the merged variable document.

use std::fmt;

use super::value::{Document, Value};

/// A structural problem with the variable document.
///
/// Issues are reported through the warning policy; none of them stops
/// processing on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructuralIssue {
    /// Top-level entry of a type that is not expected in the current mode.
    UnexpectedTopLevel { key: String, type_name: &'static str, multifile: bool },
    /// Output unit marks a global with `false`.
    FalseMarker { unit: String, key: String },
    /// Output unit entry that is neither a string nor a boolean.
    UnexpectedInUnit { unit: String, key: String, type_name: &'static str },
    /// Output unit marks a global that no source defines.
    UnknownGlobalReference { unit: String, key: String },
}

impl fmt::Display for StructuralIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructuralIssue::UnexpectedTopLevel { key, type_name, multifile: false } => write!(
                f,
                "top-level element '{key}' is of type '{type_name}'. Only strings are expected here"
            ),
            StructuralIssue::UnexpectedTopLevel { key, type_name, multifile: true } => write!(
                f,
                "top-level element '{key}' is of type '{type_name}'. Only tables (output files) and strings (globals) are expected here"
            ),
            StructuralIssue::FalseMarker { unit, key } => write!(
                f,
                "Template '{unit}' has '{key}' set to 'false'. This key will be ignored"
            ),
            StructuralIssue::UnexpectedInUnit { unit, key, type_name } => write!(
                f,
                "Template '{unit}' has '{key}' of type '{type_name}'. Only strings (locals) and booleans (global references) are expected here"
            ),
            StructuralIssue::UnknownGlobalReference { unit, key } => write!(
                f,
                "Template '{unit}' has '{key}' global reference, but there is no such global defined"
            ),
        }
    }
}

/// Check every entry of the merged document against the shape allowed by the
/// mode. Issues come back in document order.
#[must_use]
pub fn validate_structure(doc: &Document, multifile: bool) -> Vec<StructuralIssue> {
    let mut issues = Vec::new();
    for (key, value) in doc {
        match value {
            Value::String(_) => {}
            Value::Table(unit) if multifile => validate_unit(key, unit, &mut issues),
            other => issues.push(StructuralIssue::UnexpectedTopLevel {
                key: key.clone(),
                type_name: other.type_name(),
                multifile,
            }),
        }
    }
    issues
}

fn validate_unit(name: &str, unit: &Document, issues: &mut Vec<StructuralIssue>) {
    for (key, value) in unit {
        match value {
            Value::String(_) | Value::Boolean(true) => {}
            Value::Boolean(false) => issues.push(StructuralIssue::FalseMarker {
                unit: name.to_string(),
                key: key.clone(),
            }),
            other => issues.push(StructuralIssue::UnexpectedInUnit {
                unit: name.to_string(),
                key: key.clone(),
                type_name: other.type_name(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::VariableSource;
    use std::path::Path;

    fn doc(text: &str) -> Document {
        VariableSource::parse(text, Path::new("vars.toml")).unwrap().document
    }

    #[test]
    fn single_mode_accepts_only_strings() {
        let d = doc("a = \"1\"\nb = true\nc = 3\n[t]\nx = \"y\"\n");
        let issues = validate_structure(&d, false);
        let keys: Vec<_> = issues
            .iter()
            .map(|i| match i {
                StructuralIssue::UnexpectedTopLevel { key, .. } => key.as_str(),
                other => panic!("unexpected issue {other:?}"),
            })
            .collect();
        assert_eq!(keys, vec!["b", "c", "t"]);
        assert_eq!(
            issues[1].to_string(),
            "top-level element 'c' is of type 'integer'. Only strings are expected here"
        );
    }

    #[test]
    fn multi_mode_accepts_strings_and_tables() {
        let d = doc("g = \"1\"\nflag = true\n[\"out.txt\"]\nlocal = \"x\"\ng = true\n");
        let issues = validate_structure(&d, true);
        assert_eq!(
            issues,
            vec![StructuralIssue::UnexpectedTopLevel {
                key: "flag".into(),
                type_name: "boolean",
                multifile: true,
            }]
        );
    }

    #[test]
    fn false_marker_is_reported_separately() {
        let d = doc("g = \"1\"\n[\"out.txt\"]\ng = false\nport = 80\n");
        let issues = validate_structure(&d, true);
        assert_eq!(
            issues,
            vec![
                StructuralIssue::FalseMarker { unit: "out.txt".into(), key: "g".into() },
                StructuralIssue::UnexpectedInUnit {
                    unit: "out.txt".into(),
                    key: "port".into(),
                    type_name: "integer",
                },
            ]
        );
        assert_eq!(
            issues[0].to_string(),
            "Template 'out.txt' has 'g' set to 'false'. This key will be ignored"
        );
    }

    #[test]
    fn clean_documents_have_no_issues() {
        assert!(validate_structure(&doc("a = \"1\"\n"), false).is_empty());
        assert!(validate_structure(&doc("a = \"1\"\n[u]\na = true\nb = \"2\"\n"), true).is_empty());
    }
}
