//! Variable record types.

use std::fmt;

use indexmap::IndexMap;

/// Where a variable came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Declared for this output (or anywhere in single-output mode).
    Local,
    /// Declared at the top level in multi-output mode.
    Global {
        /// The output unit marked this global as consumed.
        referenced: bool,
    },
}

/// One reconciled variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub key: String,
    /// Absent for names only known from a template reference.
    pub value: Option<String>,
    pub origin: Origin,
}

/// Variables keyed by their case-preserved name, in declaration order.
pub type VariableSet = IndexMap<String, Variable>;

impl Variable {
    #[must_use]
    pub fn local(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self { key: key.into(), value: Some(value.into()), origin: Origin::Local }
    }

    #[must_use]
    pub fn global(key: impl Into<String>, value: impl Into<String>, referenced: bool) -> Self {
        Self { key: key.into(), value: Some(value.into()), origin: Origin::Global { referenced } }
    }

    /// A name referenced by a template that no variable supplies.
    #[must_use]
    pub fn unresolved(key: impl Into<String>) -> Self {
        Self { key: key.into(), value: None, origin: Origin::Local }
    }

    #[must_use]
    pub fn is_global(&self) -> bool {
        matches!(self.origin, Origin::Global { .. })
    }

    #[must_use]
    pub fn is_global_reference(&self) -> bool {
        matches!(self.origin, Origin::Global { referenced: true })
    }
}

/// Renders as `key = value` followed by the global status, if any.
impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)?;
        if let Some(value) = self.value.as_deref().filter(|v| !v.is_empty()) {
            write!(f, " = {value}")?;
        }
        match self.origin {
            Origin::Local => Ok(()),
            Origin::Global { referenced: true } => f.write_str(" (global reference)"),
            Origin::Global { referenced: false } => f.write_str(" (global, no reference)"),
        }
    }
}
