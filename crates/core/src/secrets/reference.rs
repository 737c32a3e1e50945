/// Value prefix marking a secret reference.
pub const SECRET_PREFIX: &str = "vault:";

/// Key selecting the entire data object.
pub const WILDCARD: &str = "*";

/// A parsed `vault:<path>:<key>` reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretReference {
    pub path: String,
    pub key: String,
}

impl SecretReference {
    #[must_use]
    pub fn is_reference(value: &str) -> bool {
        value.starts_with(SECRET_PREFIX)
    }

    /// Parse a reference. Returns `None` unless the value is exactly three
    /// colon-separated parts starting with the prefix.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        if !Self::is_reference(value) {
            return None;
        }
        let parts: Vec<&str> = value.split(':').collect();
        match parts.as_slice() {
            [_, path, key] => Some(Self { path: (*path).to_string(), key: (*key).to_string() }),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.key == WILDCARD
    }
}
