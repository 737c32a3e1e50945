//! Reconciliation of variables against template references.
//!
//! Computes the drift sets for one output and evaluates them against the
//! run policy, producing diagnostics to report and at most one violation
//! that stops the run.

pub mod diff;
pub mod policy;
pub mod report;

use std::path::Path;

pub use diff::Drift;
pub use policy::{Policy, Routed};
pub use report::{Diagnostic, PolicyViolation, Severity, ViolationKind};

use crate::vars::{Variable, VariableSet, find_variable};

/// Result of reconciling one output.
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub drift: Drift,
    /// Findings to report, in evaluation order.
    pub diagnostics: Vec<Diagnostic>,
    /// Set when the output must not be written.
    pub violation: Option<PolicyViolation>,
}

/// Evaluate drift between `vars` and `template_names` under `policy`.
///
/// Checks run in a fixed order. Every reporting check contributes its
/// diagnostic; the first fatal check sets the violation.
#[must_use]
pub fn reconcile(
    vars: &VariableSet,
    template_names: &[String],
    template: &Path,
    policy: &Policy,
) -> Reconciliation {
    let drift = Drift::compute(vars, template_names, policy.warn_about_globals);
    let listed = |names: &[String]| -> Vec<Variable> {
        names
            .iter()
            .map(|n| {
                find_variable(vars, n).cloned().unwrap_or_else(|| Variable::unresolved(n.clone()))
            })
            .collect()
    };
    let scope = template.to_path_buf();
    let mut diagnostics = Vec::new();

    if !drift.unacknowledged_globals.is_empty() {
        diagnostics.push(Diagnostic::listing(
            Severity::Warning,
            scope.clone(),
            "these global variables are used in the template, but not marked as global references in toml:",
            listed(&drift.unacknowledged_globals),
        ));
    }

    if !drift.extra_in_template.is_empty()
        && (!policy.suppress_warnings || !policy.allow_partial_templates)
    {
        let severity =
            if policy.allow_partial_templates { Severity::Warning } else { Severity::Error };
        diagnostics.push(Diagnostic::listing(
            severity,
            scope.clone(),
            "these variables are present in the template but not in the variables toml file:",
            listed(&drift.extra_in_template),
        ));
    }

    if !drift.extra_in_vars.is_empty() && !policy.suppress_warnings {
        diagnostics.push(Diagnostic::listing(
            Severity::Warning,
            scope.clone(),
            "these variables are present in the variables toml file but not in the template:",
            listed(&drift.extra_in_vars),
        ));
    }

    // Unacknowledged globals are checked twice: once as a warning above and
    // once here as a fatal trigger under -s.
    let kind = if !drift.extra_in_vars.is_empty() && policy.warnings_as_errors {
        Some(ViolationKind::UnusedVariables)
    } else if !drift.unacknowledged_globals.is_empty() && policy.warnings_as_errors {
        Some(ViolationKind::UnacknowledgedGlobals)
    } else if !drift.extra_in_template.is_empty() && !policy.allow_partial_templates {
        Some(ViolationKind::MissingVariables)
    } else {
        None
    };
    let violation = kind.map(|kind| PolicyViolation { scope: Some(scope), kind });

    Reconciliation { drift, diagnostics, violation }
}
