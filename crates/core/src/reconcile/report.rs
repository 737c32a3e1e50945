//! Diagnostics produced while reconciling.

use std::fmt;
use std::path::PathBuf;

use crate::document::StructuralIssue;
use crate::vars::Variable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Warning => "Warning",
            Severity::Error => "Error",
        })
    }
}

/// A non-fatal finding, with the variables it is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Template the finding belongs to.
    pub scope: Option<PathBuf>,
    pub headline: String,
    pub variables: Vec<Variable>,
}

impl Diagnostic {
    #[must_use]
    pub fn message(severity: Severity, headline: impl Into<String>) -> Self {
        Self { severity, scope: None, headline: headline.into(), variables: Vec::new() }
    }

    #[must_use]
    pub fn listing(
        severity: Severity,
        scope: PathBuf,
        headline: impl Into<String>,
        variables: Vec<Variable>,
    ) -> Self {
        Self { severity, scope: Some(scope), headline: headline.into(), variables }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sev = self.severity;
        if let Some(scope) = &self.scope {
            writeln!(f, "{sev}: In file {}", scope.display())?;
        }
        write!(f, "{sev}: {}", self.headline)?;
        for var in &self.variables {
            write!(f, "\n{var}")?;
        }
        Ok(())
    }
}

/// Why a run was stopped by the policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    /// Variables not used by the template, under `-s`.
    UnusedVariables,
    /// Globals used without a marker, under `-s`.
    UnacknowledgedGlobals,
    /// Template references nothing supplies, without `-p`.
    MissingVariables,
    /// A structural warning promoted by `-s`.
    Structural(StructuralIssue),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyViolation {
    pub scope: Option<PathBuf>,
    pub kind: ViolationKind,
}

impl fmt::Display for PolicyViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(scope) = &self.scope {
            write!(f, "In file {}. ", scope.display())?;
        }
        match &self.kind {
            ViolationKind::UnusedVariables => f.write_str(
                "There are some variables present in the variables toml file that are not in the template and you specified to treat these as errors",
            ),
            ViolationKind::UnacknowledgedGlobals => f.write_str(
                "There are some global variables used that are not marked as global references and you specified to treat these as errors",
            ),
            ViolationKind::MissingVariables => f.write_str(
                "There are some variables in the template that cannot be substituted because they are missing in the variables toml file",
            ),
            ViolationKind::Structural(issue) => write!(f, "{issue}"),
        }
    }
}

impl std::error::Error for PolicyViolation {}
