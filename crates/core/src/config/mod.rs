pub mod loader;
pub mod types;

pub use loader::{ConfigError, ConfigLoader, default_token_file};
pub use types::{ConfigFile, LoggingConfig, ResolvedConfig, VaultConfig};
