//! Variable source documents.
//!
//! This module provides:
//! - A typed view over parsed TOML (`Value`, `Document`)
//! - Loading variable sources from disk
//! - Merging several sources with last-wins precedence
//! - Structural validation of the merged document

pub mod merger;
pub mod source;
pub mod validate;
pub mod value;

pub use merger::merge_sources;
pub use source::{DocumentError, VariableSource};
pub use validate::{StructuralIssue, validate_structure};
pub use value::{Document, Value};
