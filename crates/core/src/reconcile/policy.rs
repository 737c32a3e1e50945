//! Strictness switches for a run.

use crate::document::StructuralIssue;

use super::report::{Diagnostic, PolicyViolation, Severity, ViolationKind};

/// How drift between variables and templates is treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Policy {
    /// `-q`: do not report unused variables (or unresolved references, with `-p`).
    pub suppress_warnings: bool,
    /// `-p`: a template may reference names no variable supplies.
    pub allow_partial_templates: bool,
    /// `-s`: warnings terminate the run.
    pub warnings_as_errors: bool,
    /// `-g`: unreferenced globals count as unused variables.
    pub warn_about_globals: bool,
}

/// Outcome of passing a structural issue through the policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Routed {
    Suppressed,
    Warning(Diagnostic),
    Fatal(PolicyViolation),
}

impl Policy {
    /// Structural issues are dropped under `-q`, fatal under `-s`, and plain
    /// warnings otherwise. `-q` takes precedence.
    #[must_use]
    pub fn route(&self, issue: StructuralIssue) -> Routed {
        if self.suppress_warnings {
            Routed::Suppressed
        } else if self.warnings_as_errors {
            Routed::Fatal(PolicyViolation { scope: None, kind: ViolationKind::Structural(issue) })
        } else {
            Routed::Warning(Diagnostic::message(Severity::Warning, issue.to_string()))
        }
    }
}
