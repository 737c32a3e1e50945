//! Layering of variable sources.

use super::source::VariableSource;
use super::value::Document;

/// Merge sources in order; a key from a later source replaces the earlier
/// entry outright.
///
/// Replacement is whole-value: a table in a later source does not merge with
/// an earlier table of the same name. A replaced key keeps the position where
/// it first appeared.
#[must_use]
pub fn merge_sources(sources: &[VariableSource]) -> Document {
    let mut merged = Document::new();
    for source in sources {
        for (key, value) in &source.document {
            if merged.insert(key.clone(), value.clone()).is_some() {
                tracing::debug!(
                    "{} overrides '{}' from an earlier source",
                    source.origin.display(),
                    key
                );
            }
        }
    }
    merged
}
