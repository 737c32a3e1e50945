//! Template parsing and rendering.
//!
//! Templates use `{{name}}` placeholders. Parsing validates the placeholders
//! and exposes the referenced names; rendering substitutes values from a
//! case-insensitive context and leaves unknown placeholders untouched.

pub mod engine;
pub mod parser;

pub use engine::{RenderContext, render};
pub use parser::{Segment, Template, TemplateError};
