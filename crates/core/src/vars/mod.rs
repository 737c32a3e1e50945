//! Reconciled variables and how they are built from a merged document.
//!
//! A variable is either a local (declared for the output being rendered) or
//! a global (declared at the top level in multi-output mode). Globals carry
//! whether the output unit acknowledged them with a `name = true` marker.

pub mod classify;
pub mod types;

pub use classify::{
    Classified, classify_multi, classify_single, find_variable, merge_with_overwrite,
    output_units,
};
pub use types::{Origin, Variable, VariableSet};
