use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::value::{Document, document_from_table};

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("File {0} does not exist")]
    NotFound(String),

    #[error("failed to read variables file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed parsing variables toml file {path}. {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// One input document of variables, with the file it came from.
#[derive(Debug, Clone)]
pub struct VariableSource {
    pub origin: PathBuf,
    pub document: Document,
}

impl VariableSource {
    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        if !path.exists() {
            return Err(DocumentError::NotFound(path.display().to_string()));
        }
        let text = fs::read_to_string(path)
            .map_err(|e| DocumentError::Io { path: path.to_path_buf(), source: e })?;
        Self::parse(&text, path)
    }

    pub fn parse(text: &str, origin: &Path) -> Result<Self, DocumentError> {
        let table: toml::Table = toml::from_str(text)
            .map_err(|e| DocumentError::Parse { path: origin.to_path_buf(), source: e })?;
        Ok(Self { origin: origin.to_path_buf(), document: document_from_table(table) })
    }
}
