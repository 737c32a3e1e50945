//! Typed values of a variable source.

use indexmap::IndexMap;

/// An ordered mapping of key to typed value, in document order.
pub type Document = IndexMap<String, Value>;

/// A value found in a variable source.
///
/// Only strings, booleans and tables carry meaning. Every other TOML type is
/// kept as `Other` so validation can report it by name.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Boolean(bool),
    Table(Document),
    Other(&'static str),
}

impl Value {
    /// Name of the value's type as it appears in diagnostics.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Boolean(_) => "boolean",
            Value::Table(_) => "table",
            Value::Other(kind) => kind,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_table(&self) -> Option<&Document> {
        match self {
            Value::Table(t) => Some(t),
            _ => None,
        }
    }
}

impl From<toml::Value> for Value {
    fn from(value: toml::Value) -> Self {
        match value {
            toml::Value::String(s) => Value::String(s),
            toml::Value::Boolean(b) => Value::Boolean(b),
            toml::Value::Table(t) => Value::Table(document_from_table(t)),
            other => Value::Other(other.type_str()),
        }
    }
}

/// Convert a parsed TOML table into a `Document`, keeping key order.
#[must_use]
pub fn document_from_table(table: toml::Table) -> Document {
    table.into_iter().map(|(k, v)| (k, Value::from(v))).collect()
}
