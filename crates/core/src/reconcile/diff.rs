//! Drift between declared variables and template references.

use std::collections::HashSet;

use crate::vars::{Variable, VariableSet};

/// The three drift sets for one (variables, template) pair.
///
/// Names are compared without regard to case; each set keeps the spelling of
/// the side it was taken from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Drift {
    /// Considered variable keys the template never references.
    pub extra_in_vars: Vec<String>,
    /// Template references no variable supplies.
    pub extra_in_template: Vec<String>,
    /// Globals the template consumes without a marker.
    pub unacknowledged_globals: Vec<String>,
}

impl Drift {
    /// Compare `vars` against `template_names`.
    ///
    /// Unreferenced globals are only considered unused when
    /// `warn_about_globals` is set. Unacknowledged globals are collected
    /// regardless.
    #[must_use]
    pub fn compute(
        vars: &VariableSet,
        template_names: &[String],
        warn_about_globals: bool,
    ) -> Self {
        let in_template: HashSet<String> =
            template_names.iter().map(|n| n.to_lowercase()).collect();
        let in_vars: HashSet<String> = vars.keys().map(|k| k.to_lowercase()).collect();

        let considered =
            |v: &&Variable| warn_about_globals || !v.is_global() || v.is_global_reference();

        let extra_in_vars = vars
            .values()
            .filter(considered)
            .filter(|v| !in_template.contains(&v.key.to_lowercase()))
            .map(|v| v.key.clone())
            .collect();

        let extra_in_template = template_names
            .iter()
            .filter(|n| !in_vars.contains(&n.to_lowercase()))
            .cloned()
            .collect();

        let unacknowledged_globals = vars
            .values()
            .filter(|v| v.is_global() && !v.is_global_reference())
            .filter(|v| in_template.contains(&v.key.to_lowercase()))
            .map(|v| v.key.clone())
            .collect();

        Self { extra_in_vars, extra_in_template, unacknowledged_globals }
    }
}
