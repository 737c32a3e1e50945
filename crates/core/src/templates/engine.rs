use std::collections::HashMap;

use super::parser::{Segment, Template};

/// Values available to a template, looked up without regard to case.
///
/// When two keys differ only in case the one inserted last wins.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    values: HashMap<String, String>,
}

impl RenderContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_lowercase(), value.into());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(&key.to_lowercase()).map(String::as_str)
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for RenderContext {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut ctx = Self::new();
        for (k, v) in iter {
            ctx.insert(k.as_ref(), v);
        }
        ctx
    }
}

/// Substitute every placeholder the context knows about. Unknown
/// placeholders are written back exactly as they appeared.
#[must_use]
pub fn render(template: &Template, ctx: &RenderContext) -> String {
    let mut out = String::new();
    for segment in &template.segments {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Placeholder { name, raw } => out.push_str(ctx.get(name).unwrap_or(raw)),
        }
    }
    out
}
