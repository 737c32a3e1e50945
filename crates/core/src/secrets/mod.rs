//! Secret references and their resolution against a Vault-style store.
//!
//! A variable whose value starts with `vault:` is a reference of the form
//! `vault:<path>:<key>`. The resolver reads `<path>` from the store and
//! substitutes the field `<key>`, or the whole data object for `*`.
//! Response bodies are kept out of error messages unless dumping was
//! explicitly requested, since they may hold secret material.

pub mod reference;
pub mod resolver;
pub mod store;
pub mod vault;

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

pub use reference::{SECRET_PREFIX, SecretReference, WILDCARD};
pub use resolver::SecretResolver;
pub use store::{SecretDocument, SecretStore};
pub use vault::{VaultSettings, VaultStore};

#[derive(Debug, Error)]
pub enum SecretError {
    #[error(
        "{key} in {file}. Value {value} is expected to have the following format: 'vault:path:key', for example: 'vault:secret/mysecret:mykey'"
    )]
    MalformedReference { key: String, file: String, value: String },

    #[error("VAULT_ADDR environment variable is not set. Vault value {key} in {file}")]
    MissingAddress { key: String, file: String },

    #[error("{} is not found. Please login to vault first with 'vault login'", .token_file.display())]
    MissingToken { token_file: PathBuf },

    #[error("failed to read vault token from {path}: {source}")]
    TokenRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("querying vault at {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("querying vault at {url}. {status} {reason}{dump}")]
    Status { url: String, status: u16, reason: String, dump: ResponseDump },

    #[error("response from {url} does not contain a 'data' object{dump}")]
    MalformedResponse { url: String, dump: ResponseDump },

    #[error("object at '{path}' does not contain requested key '{key}'{dump}")]
    MissingKey { path: String, key: String, dump: ResponseDump },

    #[error("failed to serialize secret data: {0}")]
    Json(#[from] serde_json::Error),
}

/// A response body attached to an error, shown only when it was captured.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseDump(Option<String>);

impl ResponseDump {
    /// Keep `body` only if the operator asked for responses to be dumped.
    #[must_use]
    pub fn capture(body: &str, enabled: bool) -> Self {
        Self(enabled.then(|| body.to_string()))
    }
}

impl fmt::Display for ResponseDump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(body) => write!(f, "\n{body}"),
            None => Ok(()),
        }
    }
}
