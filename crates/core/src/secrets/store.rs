use serde_json::{Map, Value};

use super::SecretError;

/// The `data` object of a secret read, with the body it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct SecretDocument {
    pub data: Map<String, Value>,
    pub raw: String,
}

/// Something secrets can be read from.
pub trait SecretStore {
    fn read(&self, path: &str) -> Result<SecretDocument, SecretError>;

    /// Returns the name of this store for display purposes
    fn name(&self) -> &'static str;
}
