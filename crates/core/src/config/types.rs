use std::path::PathBuf;

use serde::Deserialize;

use crate::secrets::VaultSettings;

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub vault: VaultConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub file_level: Option<String>,
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), file_level: None, file: None }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Secret store settings from the config file. `VAULT_ADDR` and
/// `VAULT_TOKEN` take precedence.
#[derive(Debug, Deserialize, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct VaultConfig {
    #[serde(default)]
    pub address: Option<String>,
    /// Defaults to `~/.vault-token`.
    #[serde(default)]
    pub token_file: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Config file that was read, if any.
    pub source: Option<PathBuf>,
    pub logging: LoggingConfig,
    pub vault: VaultSettings,
}
