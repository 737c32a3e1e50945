use std::fs;
use std::path::PathBuf;

use reqwest::blocking::Client;
use serde_json::Value;

use super::store::{SecretDocument, SecretStore};
use super::{ResponseDump, SecretError};

const TOKEN_HEADER: &str = "X-Vault-Token";

/// Where to find the secret store and how to authenticate.
///
/// Nothing here is validated up front; a missing address or token is only
/// an error once a reference has to be resolved.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct VaultSettings {
    pub address: Option<String>,
    pub token: Option<String>,
    /// Read when no token is configured.
    pub token_file: PathBuf,
}

impl std::fmt::Debug for VaultSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultSettings")
            .field("address", &self.address)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("token_file", &self.token_file)
            .finish()
    }
}

/// HTTP client for a Vault server.
pub struct VaultStore {
    client: Client,
    address: String,
    token: String,
    dump_responses: bool,
}

impl std::fmt::Debug for VaultStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultStore")
            .field("address", &self.address)
            .field("dump_responses", &self.dump_responses)
            .finish_non_exhaustive()
    }
}

impl VaultStore {
    /// Build a client from `settings`. `key` and `file` name the variable that
    /// needed the store, for the error message.
    pub fn connect(
        settings: &VaultSettings,
        dump_responses: bool,
        key: &str,
        file: &str,
    ) -> Result<Self, SecretError> {
        let address = settings
            .address
            .as_deref()
            .filter(|a| !a.trim().is_empty())
            .ok_or_else(|| SecretError::MissingAddress {
                key: key.to_string(),
                file: file.to_string(),
            })?;
        let token = resolve_token(settings)?;

        Ok(Self {
            client: Client::new(),
            address: address.trim_end_matches('/').to_string(),
            token,
            dump_responses,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{}", self.address, path)
    }
}

fn resolve_token(settings: &VaultSettings) -> Result<String, SecretError> {
    if let Some(token) = settings.token.as_deref().filter(|t| !t.trim().is_empty()) {
        return Ok(token.to_string());
    }

    let path = &settings.token_file;
    if !path.exists() {
        return Err(SecretError::MissingToken { token_file: path.clone() });
    }
    let token = fs::read_to_string(path)
        .map_err(|e| SecretError::TokenRead { path: path.clone(), source: e })?;
    Ok(token.trim().to_string())
}

impl SecretStore for VaultStore {
    fn read(&self, path: &str) -> Result<SecretDocument, SecretError> {
        let url = self.url(path);
        tracing::debug!("reading secret from {url}");

        let response = self
            .client
            .get(&url)
            .header(TOKEN_HEADER, &self.token)
            .send()
            .map_err(|e| SecretError::Http { url: url.clone(), source: e })?;
        let status = response.status();
        let body = response.text().map_err(|e| SecretError::Http { url: url.clone(), source: e })?;

        if !status.is_success() {
            return Err(SecretError::Status {
                url,
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
                dump: ResponseDump::capture(&body, self.dump_responses),
            });
        }

        let data = match serde_json::from_str::<Value>(&body) {
            Ok(Value::Object(mut root)) => match root.remove("data") {
                Some(Value::Object(data)) => Some(data),
                _ => None,
            },
            _ => None,
        };

        match data {
            Some(data) => Ok(SecretDocument { data, raw: body }),
            None => Err(SecretError::MalformedResponse {
                url,
                dump: ResponseDump::capture(&body, self.dump_responses),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "vault"
    }
}
