use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::document::DocumentError;
use crate::reconcile::PolicyViolation;
use crate::secrets::SecretError;
use crate::templates::TemplateError;

/// Any error that ends a run.
#[derive(Debug, Error)]
pub enum MergeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Secret(#[from] SecretError),

    #[error(transparent)]
    Policy(#[from] PolicyViolation),

    #[error("File {0} does not exist")]
    MissingFile(String),

    #[error("failed to write result file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl MergeError {
    /// Process exit status for this error: 1 for input and policy problems,
    /// 255 for I/O failures nothing in the input explains.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            MergeError::Write { .. } | MergeError::Template(TemplateError::Io { .. }) => 255,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::ViolationKind;

    #[test]
    fn exit_codes() {
        let policy = MergeError::from(PolicyViolation {
            scope: None,
            kind: ViolationKind::MissingVariables,
        });
        assert_eq!(policy.exit_code(), 1);
        assert_eq!(MergeError::MissingFile("x".into()).exit_code(), 1);

        let write = MergeError::Write {
            path: PathBuf::from("out.txt"),
            source: std::io::Error::other("disk full"),
        };
        assert_eq!(write.exit_code(), 255);
    }
}
