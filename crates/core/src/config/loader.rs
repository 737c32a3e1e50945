use crate::config::types::{ConfigFile, LoggingConfig, ResolvedConfig, VaultConfig};
use crate::secrets::VaultSettings;
use shellexpand::full;
use std::path::{Path, PathBuf};
use std::{env, fs};

use dirs::home_dir;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found at {0}")]
    NotFound(String),

    #[error("failed to read config file {0}: {1}")]
    ReadError(String, #[source] std::io::Error),

    #[error("failed to parse TOML in {0}: {1}")]
    ParseError(String, #[source] toml::de::Error),

    #[error("home directory not available to expand '~'")]
    NoHome,
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration using the process environment.
    pub fn load(config_path: Option<&Path>) -> Result<ResolvedConfig, ConfigError> {
        Self::load_with_env(config_path, |name| env::var(name).ok())
    }

    /// Load configuration, reading environment variables through `env`.
    ///
    /// An explicit `config_path` must exist. The default location is optional
    /// and yields defaults when absent.
    pub fn load_with_env(
        config_path: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<ResolvedConfig, ConfigError> {
        let (path, required) = match config_path {
            Some(p) => (p.to_path_buf(), true),
            None => (default_config_path_with(&env), false),
        };

        let (cf, source) = if path.exists() {
            let s = fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.display().to_string(), e))?;
            let cf: ConfigFile = toml::from_str(&s)
                .map_err(|e| ConfigError::ParseError(path.display().to_string(), e))?;
            (cf, Some(path))
        } else if required {
            return Err(ConfigError::NotFound(path.display().to_string()));
        } else {
            (ConfigFile::default(), None)
        };

        Ok(ResolvedConfig {
            source,
            logging: resolve_logging(&cf.logging)?,
            vault: resolve_vault(&cf.vault, &env)?,
        })
    }
}

fn resolve_logging(log_cfg: &LoggingConfig) -> Result<LoggingConfig, ConfigError> {
    let file = match &log_cfg.file {
        Some(file) => Some(expand_path(&file.to_string_lossy())?),
        None => None,
    };
    Ok(LoggingConfig { file, ..log_cfg.clone() })
}

fn resolve_vault(
    vault: &VaultConfig,
    env: &impl Fn(&str) -> Option<String>,
) -> Result<VaultSettings, ConfigError> {
    let non_blank = |v: String| if v.trim().is_empty() { None } else { Some(v) };

    let address = env("VAULT_ADDR").and_then(non_blank).or_else(|| vault.address.clone());
    let token = env("VAULT_TOKEN").and_then(non_blank);
    let token_file = match &vault.token_file {
        Some(file) => expand_path(file)?,
        None => default_token_file(),
    };

    Ok(VaultSettings { address, token, token_file })
}

fn default_config_path_with(env: &impl Fn(&str) -> Option<String>) -> PathBuf {
    if let Some(xdg) = env("XDG_CONFIG_HOME") {
        return Path::new(&xdg).join("varmerge").join("config.toml");
    }
    let home = home_dir().unwrap_or_else(|| PathBuf::from("~"));
    home.join(".config").join("varmerge").join("config.toml")
}

/// Token file written by `vault login`.
pub fn default_token_file() -> PathBuf {
    let home = home_dir().unwrap_or_else(|| PathBuf::from("~"));
    home.join(".vault-token")
}

fn expand_path(input: &str) -> Result<PathBuf, ConfigError> {
    let expanded = full(input).map_err(|_| ConfigError::NoHome)?;
    Ok(PathBuf::from(expanded.to_string()))
}
