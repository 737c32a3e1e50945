use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_.\-]*$").expect("valid regex"));

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("failed to read template file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not parse template in file {path}. Unclosed placeholder at line {line}")]
    Unclosed { path: PathBuf, line: usize },

    #[error("Could not parse template in file {path}. Invalid placeholder '{expr}' at line {line}")]
    InvalidPlaceholder { path: PathBuf, expr: String, line: usize },
}

/// A piece of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    /// `raw` is the placeholder exactly as written, braces included.
    Placeholder { name: String, raw: String },
}

#[derive(Debug, Clone)]
pub struct Template {
    pub path: PathBuf,
    pub segments: Vec<Segment>,
}

impl Template {
    pub fn load(path: &Path) -> Result<Self, TemplateError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| TemplateError::Io { path: path.to_path_buf(), source: e })?;
        Self::parse(&text, path)
    }

    /// Split `text` into literals and placeholders.
    pub fn parse(text: &str, path: &Path) -> Result<Self, TemplateError> {
        let line_at = |offset: usize| text[..offset].matches('\n').count() + 1;
        let mut segments = Vec::new();
        let mut pos = 0;

        while let Some(found) = text[pos..].find("{{") {
            let open = pos + found;
            if open > pos {
                segments.push(Segment::Literal(text[pos..open].to_string()));
            }

            let body_start = open + 2;
            let unclosed = || TemplateError::Unclosed { path: path.to_path_buf(), line: line_at(open) };
            let Some(len) = text[body_start..].find("}}") else {
                return Err(unclosed());
            };
            let body = &text[body_start..body_start + len];
            if body.contains("{{") {
                return Err(unclosed());
            }

            let name = body.trim();
            if !NAME_RE.is_match(name) {
                return Err(TemplateError::InvalidPlaceholder {
                    path: path.to_path_buf(),
                    expr: body.to_string(),
                    line: line_at(open),
                });
            }

            let close = body_start + len + 2;
            segments.push(Segment::Placeholder {
                name: name.to_string(),
                raw: text[open..close].to_string(),
            });
            pos = close;
        }

        if pos < text.len() {
            segments.push(Segment::Literal(text[pos..].to_string()));
        }

        Ok(Self { path: path.to_path_buf(), segments })
    }

    /// Names referenced by the template, first spelling wins when two
    /// references differ only in case.
    #[must_use]
    pub fn references(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Placeholder { name, .. } => Some(name),
                Segment::Literal(_) => None,
            })
            .filter(|name| seen.insert(name.to_lowercase()))
            .cloned()
            .collect()
    }
}
