use serde_json::Value;

use super::reference::SecretReference;
use super::store::{SecretDocument, SecretStore};
use super::vault::{VaultSettings, VaultStore};
use super::{ResponseDump, SecretError};

/// Turns secret references into their values.
///
/// The store is connected on the first reference, so runs without
/// references never need an address or token. Every reference is a fresh
/// read; nothing is cached between variables.
pub struct SecretResolver {
    settings: VaultSettings,
    store: Option<Box<dyn SecretStore>>,
    dump_responses: bool,
    lookups: usize,
}

impl std::fmt::Debug for SecretResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretResolver")
            .field("store", &self.store.as_ref().map(|s| s.name()))
            .field("dump_responses", &self.dump_responses)
            .field("lookups", &self.lookups)
            .finish_non_exhaustive()
    }
}

impl SecretResolver {
    #[must_use]
    pub fn new(settings: VaultSettings, dump_responses: bool) -> Self {
        Self { settings, store: None, dump_responses, lookups: 0 }
    }

    /// Use an already connected store.
    #[must_use]
    pub fn with_store(store: Box<dyn SecretStore>, dump_responses: bool) -> Self {
        Self { settings: VaultSettings::default(), store: Some(store), dump_responses, lookups: 0 }
    }

    /// Number of successful store reads so far. A read that fails is not
    /// counted.
    #[must_use]
    pub fn lookups(&self) -> usize {
        self.lookups
    }

    /// Resolve `value` of variable `key` used by `file`. Values that are not
    /// references are returned unchanged.
    pub fn resolve(&mut self, file: &str, key: &str, value: &str) -> Result<String, SecretError> {
        if !SecretReference::is_reference(value) {
            return Ok(value.to_string());
        }
        let reference =
            SecretReference::parse(value).ok_or_else(|| SecretError::MalformedReference {
                key: key.to_string(),
                file: file.to_string(),
                value: value.to_string(),
            })?;

        let dump = self.dump_responses;
        let document = self.store(key, file)?.read(&reference.path)?;
        self.lookups += 1;
        select(&reference, document, dump)
    }

    fn store(&mut self, key: &str, file: &str) -> Result<&dyn SecretStore, SecretError> {
        let store = match self.store.take() {
            Some(store) => store,
            None => Box::new(VaultStore::connect(&self.settings, self.dump_responses, key, file)?),
        };
        Ok(&**self.store.insert(store))
    }
}

fn select(
    reference: &SecretReference,
    mut document: SecretDocument,
    dump: bool,
) -> Result<String, SecretError> {
    if reference.is_wildcard() {
        return Ok(serde_json::to_string_pretty(&Value::Object(document.data))?);
    }
    match document.data.remove(&reference.key) {
        Some(Value::String(s)) => Ok(s),
        Some(other) => Ok(other.to_string()),
        None => Err(SecretError::MissingKey {
            path: reference.path.clone(),
            key: reference.key.clone(),
            dump: ResponseDump::capture(&document.raw, dump),
        }),
    }
}
